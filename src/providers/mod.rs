//! External collaborators consumed by the recommendation core.
//!
//! - [`traits`]: the [`CatalogClient`] and [`FlagGate`] seams
//! - [`flagd`]: flag gate speaking flagd's OFREP HTTP API
//! - [`static_flags`]: in-memory flag gate
//!
//! The gRPC catalog client lives in [`crate::server::catalog`] because it
//! shares the generated proto types with the server.

pub mod flagd;
pub mod static_flags;
pub mod traits;

pub use flagd::{OfrepConfig, OfrepFlagGate};
pub use static_flags::StaticFlags;
pub use traits::{CatalogClient, FlagGate};
