//! Bootstrap reconciliation for management server installations
//!
//! Converges a freshly installed (or previously bootstrapped) management
//! server to a desired administrative state: an authenticated session,
//! the two global settings, a rotated admin token, and a rotated admin
//! password. Every remote operation is idempotent, so a failed run is
//! recovered by invoking the same operation again; nothing is rolled
//! back.

mod bootstrap;
mod error;

pub use bootstrap::{ADMIN_USERNAME, Bootstrap, SETTING_SERVER_URL, SETTING_TELEMETRY};
pub use error::{BootstrapError, Result};
