//! # forma-schema
//!
//! Static processing of schema documents, in the order the loader runs it:
//! - [`validator`]: JSON shape check against a schema generated from the
//!   Rust types, then structural and cross-field checks
//! - [`migration`]: moves a document from an older version's shape to a
//!   newer one
//! - [`i18n`]: binds label/placeholder/message keys to display strings
//!
//! ## Architecture
//!
//! Document types are defined in `forma-core` with `#[derive(JsonSchema)]`.
//! This crate compiles the generated schema with `jsonschema` and layers
//! the checks a JSON Schema cannot express (references between fields,
//! self-writes, source-dependent rules) on top.

pub mod i18n;
pub mod migration;
pub mod validator;

mod error;
mod shape;
mod style;

pub use error::{IssueCode, SchemaError, ValidationIssue};
pub use i18n::{BindOptions, TranslationMap, TranslationSource, apply_translations, bind};
pub use migration::{FieldTransformRule, MigrationRule, MigrationSet};
pub use validator::{SchemaValidator, collect_issues};
