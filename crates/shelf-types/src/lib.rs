//! Foundation types for shelf.
//!
//! This crate provides the identity, location, and trait primitives used
//! throughout the shelf system. Every other shelf crate depends on
//! `shelf-types`.
//!
//! # Key Types
//!
//! - [`Container`] — a directory uniquely associated with one record,
//!   derived from a name and a parent folder
//! - [`Record`] — the trait a value must implement to live in a record store
//! - [`AssetId`] — UUID identity for binary assets; doubles as the asset's
//!   on-disk file name
//! - [`ContainerError`] — name validation and filesystem location failures

pub mod container;
pub mod error;
pub mod id;
pub mod names;
pub mod record;

pub use container::Container;
pub use error::{ContainerError, Result};
pub use id::AssetId;
pub use names::validate_container_name;
pub use record::Record;
