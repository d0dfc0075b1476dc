//! # forma-rules
//!
//! Pure evaluation over live form state:
//! - [`condition`]: operator semantics, multi-rule folding, and the
//!   per-field hidden/disabled/required state the render layer applies
//! - [`constraints`]: compiles a field's static validation block into an
//!   executable constraint set, with the live required flag layered on top
//! - [`options`]: option lists for `setOptions`, static or fetched through
//!   an injected provider under a `RenderScope`
//!
//! Everything except option fetching is synchronous and shares no state,
//! so it is safe to call from any number of threads.

pub mod condition;
pub mod constraints;
pub mod options;

mod error;

pub use condition::{
    ConditionalState, evaluate_condition_rule, evaluate_fields, evaluate_multi_condition_rule,
    get_conditional_actions, watched_fields,
};
pub use constraints::{ConstraintSet, ConstraintViolation, ViolationKind, build_constraints};
pub use error::RulesError;
pub use options::{OptionsProvider, resolve_options};
