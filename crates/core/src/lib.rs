//! Core types and collaborator contracts for stirrup
//!
//! This crate defines the seams the bootstrap reconciler works against:
//! the [`ManagementApi`] trait covering every remote operation it needs,
//! the [`AttributeStore`] trait covering durable attribute persistence,
//! and the typed [`BootstrapState`] that maps onto that store.

pub mod api;
pub mod error;
pub mod state;
pub mod store;

pub use api::{AdminUser, CreatedToken, ManagementApi, PasswordReset};
pub use error::{ApiError, ApiResult};
pub use state::BootstrapState;
pub use store::{AttributeStore, MemoryStore};
