//! Per-client object index for Vellum.
//!
//! The index is the source of truth for an object's title and creation date.
//! It is owned by an external service; this crate only reads it, once per
//! request, through the [`IndexResolver`] trait.
//!
//! # Key Types
//!
//! - [`ClientIndex`] -- Ordered snapshot of one client's descriptors
//! - [`IndexResolver`] -- Lookup contract implemented by every backend
//! - [`InMemoryIndexResolver`] -- `HashMap`-based resolver for tests and embedding
//! - [`JsonIndexResolver`] -- Reads `<root>/<client>/index.json` from disk

pub mod error;
pub mod index;
pub mod json;
pub mod memory;
pub mod traits;

pub use error::{IndexError, IndexResult};
pub use index::ClientIndex;
pub use json::JsonIndexResolver;
pub use memory::InMemoryIndexResolver;
pub use traits::IndexResolver;
