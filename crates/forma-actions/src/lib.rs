//! # forma-actions
//!
//! Executes the declarative actions a document attaches to events
//! (`onSubmit`, `onClick`, ...). The engine performs no I/O itself: every
//! action type needs one capability of the injected [`ExecutionContext`],
//! and a missing capability is an error rather than a silent no-op.
//!
//! Failure policy:
//! - independent actions of one event are isolated; a failure is logged
//!   and the next action still runs
//! - `sequence` steps and the `onSubmit` batch stop at the first failure

pub mod context;
pub mod engine;

mod error;

pub use context::{
    ApiCaller, Capability, ConfirmPrompt, ExecutionContext, FormResetter, FormValueSetter, Navigator, PanelHost,
    SchemaReloader, ToastPresenter,
};
pub use engine::{ActionEngine, ActionOutcome, SubmitOutcome};
pub use error::ActionError;
