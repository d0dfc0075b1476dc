//! # forma-core
//!
//! Core types shared by every Forma crate:
//! - `FieldValue`, the typed value carried by watched-value maps and rules
//! - `SchemaDocument` and its form/table/filter/detail/widget payloads
//! - Field, condition, and action-bundle declarations
//! - Declarative action definitions dispatched by the action engine
//! - Registry entries and their lifecycle status
//! - Semantic-version helpers for client compatibility
//! - `RenderScope`, the mounted/cancelled guard for async work
//! - Cross-cutting error types

pub mod action;
pub mod condition;
pub mod document;
pub mod entry;
pub mod enums;
pub mod errors;
pub mod field;
pub mod scope;
pub mod value;
pub mod version;

pub use action::{ActionDefinition, ActionKind};
pub use condition::{ActionBundle, ConditionRule, MultiConditionRule, SetOptions, SetValue};
pub use document::SchemaDocument;
pub use entry::RegistryEntry;
pub use errors::CoreError;
pub use field::{FieldOption, FieldSchema, FieldValidation, UiDescriptor};
pub use scope::RenderScope;
pub use value::{FieldValue, ValueMap};
