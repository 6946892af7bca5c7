//! Streaming content store for Vellum.
//!
//! Object bodies live in a store keyed by `client/object-id`. A fetch copies
//! the body straight into a caller-supplied sink, so the full object is never
//! held in memory by the caller.
//!
//! # Storage Backends
//!
//! All backends implement the [`ContentStore`] trait:
//!
//! - [`InMemoryContentStore`] -- `HashMap`-based store for tests and embedding
//! - [`LocalContentStore`] -- one file per object under a root directory
//!
//! # Design Rules
//!
//! 1. A missing object is `Ok(FetchOutcome::Missing)`, never an error.
//! 2. Bytes are written to the sink in order and exactly once.
//! 3. A fetch stops promptly once its cancellation token fires.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod key;
pub mod local;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use key::ObjectKey;
pub use local::LocalContentStore;
pub use memory::InMemoryContentStore;
pub use traits::{ContentStore, FetchOutcome};
