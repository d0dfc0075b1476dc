//! # forma-registry
//!
//! Picks the registry entry that applies to a tenant and client, and turns
//! it into a ready-to-render document:
//! - [`resolver`]: industry entry, then common entry, then local fallback,
//!   with a hard client-compatibility gate
//! - [`loader`]: resolve, validate, migrate, bind translations, gate on the
//!   client version, and cache the result
//!
//! Registry rows and translations are fetched through the
//! [`RegistrySource`] and [`forma_schema::TranslationSource`] traits; this
//! crate performs no I/O of its own.

pub mod loader;
pub mod resolver;

mod error;

pub use error::{SchemaLoadError, SchemaLoadErrorCode};
pub use loader::{LoadRequest, LoadedSchema, LoaderOptions, RegistrySource, SchemaLoader};
pub use resolver::{ResolveOptions, Resolved, resolve};
