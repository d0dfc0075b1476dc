//! # forma-widgets
//!
//! Maps the `customComponentType` of `custom` fields to asynchronous
//! loaders of the widget implementation. A load that fails, or resolves to
//! nothing, is logged with the registered types and yields `None` so the
//! caller can render an explicit "widget unavailable" state.
//!
//! One registry is installed process-wide with [`init`] and removed with
//! [`teardown`]; independent registries can also be created directly.

mod error;
mod global;
mod registry;

pub use error::WidgetError;
pub use global::{global, init, teardown};
pub use registry::{WidgetLoader, WidgetModule, WidgetRegistry, downcast};
