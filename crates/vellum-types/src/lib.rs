//! Foundation types for Vellum.
//!
//! This crate provides the identifier, identity, and metadata types shared by
//! every other Vellum crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Validated version-4 UUID naming a stored object
//! - [`IdentifierClass`] -- Result of classifying a raw identifier string
//! - [`ClientId`] -- Opaque tenant identity the caller was authenticated as
//! - [`ObjectDescriptor`] -- Index entry carrying an object's title and date

pub mod client;
pub mod descriptor;
pub mod error;
pub mod object;
pub mod temporal;

pub use client::ClientId;
pub use descriptor::ObjectDescriptor;
pub use error::TypeError;
pub use object::{classify, IdentifierClass, ObjectId, SENTINEL_OBJECT_ID};
pub use temporal::{format_http_date, http_date_from_epoch, HTTP_DATE_FORMAT};
