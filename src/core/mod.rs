//! Core components of the `moex-iss-rs` client.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The main [`IssClient`] and its builder, with the MOEX Passport session logic.
//! - The primary [`IssError`] type.
//! - The [`Table`] result shape and the [`Session`] model.
//! - The endpoint descriptor table and the shared pagination loop.

/// The main client (`IssClient`), builder, and passport authentication.
pub mod client;
/// Wall-clock abstraction for cookie expiry and default dates.
pub mod clock;
/// The primary error type (`IssError`) for the crate.
pub mod error;
/// Result and session models.
pub mod models;

pub(crate) mod endpoint;
pub(crate) mod paging;
pub(crate) mod wire;

#[cfg(feature = "dataframe")]
pub mod dataframe;

// convenient re-exports so most code can just `use crate::core::IssClient`
pub use client::{Credentials, IssClient, IssClientBuilder};
pub use clock::{Clock, SystemClock};
pub use error::IssError;
pub use models::{Row, Session, SessionStatus, Table};
