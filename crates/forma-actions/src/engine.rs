//! Dispatch of action definitions to context capabilities.

use std::sync::Arc;

use forma_core::action::{ActionDefinition, ActionKind};
use futures::future::BoxFuture;
use serde_json::Value;

use crate::context::{Capability, ExecutionContext};
use crate::error::ActionError;

pub const ON_SUBMIT: &str = "onSubmit";
pub const ON_SUBMIT_SUCCESS: &str = "onSubmitSuccess";
pub const ON_SUBMIT_ERROR: &str = "onSubmitError";

/// Result of one action inside an event batch.
#[derive(Debug)]
pub struct ActionOutcome {
    pub action_type: String,
    pub result: Result<Value, ActionError>,
}

impl ActionOutcome {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Result of the submit lifecycle.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Every `onSubmit` action succeeded; `after` holds the
    /// `onSubmitSuccess` batch.
    Succeeded {
        results: Vec<Value>,
        after: Vec<ActionOutcome>,
    },
    /// An `onSubmit` action failed; the rest were skipped and `after` holds
    /// the `onSubmitError` batch.
    Failed {
        error: ActionError,
        after: Vec<ActionOutcome>,
    },
}

impl SubmitOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionEngine {
    context: ExecutionContext,
}

impl ActionEngine {
    #[must_use]
    pub const fn new(context: ExecutionContext) -> Self {
        Self { context }
    }

    #[must_use]
    pub const fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Execute one action. Unknown types are logged and resolve to `null`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::MissingCapability`] if the capability the
    /// type needs is absent, [`ActionError::Failed`] if the capability
    /// fails, and [`ActionError::SequenceAborted`] if a sequence step fails.
    pub fn execute<'a>(&'a self, action: &'a ActionDefinition) -> BoxFuture<'a, Result<Value, ActionError>> {
        Box::pin(async move {
            let action_type = action.type_name();
            let ctx = &self.context;
            let failed = |source: anyhow::Error| ActionError::Failed {
                action_type: action_type.to_string(),
                source,
            };

            match &action.kind {
                ActionKind::ApiCall(params) => {
                    let caller = require(&ctx.api_call, action_type, Capability::ApiCall)?;
                    caller.call(params).await.map_err(failed)
                }
                ActionKind::Navigate(params) => {
                    let navigator = require(&ctx.navigate, action_type, Capability::Navigate)?;
                    navigator.navigate(&params.to, params.params.as_ref()).map_err(failed)?;
                    Ok(Value::Null)
                }
                ActionKind::OpenDrawer(params) => {
                    let host = require(&ctx.open_drawer, action_type, Capability::OpenDrawer)?;
                    host.open(&params.component, params.props.as_ref()).map_err(failed)?;
                    Ok(Value::Null)
                }
                ActionKind::OpenModal(params) => {
                    let host = require(&ctx.open_modal, action_type, Capability::OpenModal)?;
                    host.open(&params.component, params.props.as_ref()).map_err(failed)?;
                    Ok(Value::Null)
                }
                ActionKind::SetValue(params) => {
                    let setter = require(&ctx.set_form_value, action_type, Capability::SetFormValue)?;
                    setter.set_value(&params.field, &params.value).map_err(failed)?;
                    Ok(Value::Null)
                }
                ActionKind::Reset(params) => {
                    let resetter = require(&ctx.reset_form, action_type, Capability::ResetForm)?;
                    resetter.reset(&params.fields).map_err(failed)?;
                    Ok(Value::Null)
                }
                ActionKind::ReloadSchema(params) => {
                    let reloader = require(&ctx.reload_schema, action_type, Capability::ReloadSchema)?;
                    reloader.reload(params.entity.as_deref()).await.map_err(failed)?;
                    Ok(Value::Null)
                }
                ActionKind::Toast(params) => {
                    let presenter = require(&ctx.show_toast, action_type, Capability::ShowToast)?;
                    let message = ctx.text(params.message.as_deref(), params.message_key.as_deref());
                    presenter.show_toast(&message, params.variant).map_err(failed)?;
                    Ok(Value::Null)
                }
                ActionKind::Confirm(params) => {
                    let prompt = require(&ctx.show_confirm, action_type, Capability::ShowConfirm)?;
                    let title = (params.title.is_some() || params.title_key.is_some())
                        .then(|| ctx.text(params.title.as_deref(), params.title_key.as_deref()));
                    let message = ctx.text(params.message.as_deref(), params.message_key.as_deref());
                    let confirmed = prompt.confirm(title.as_deref(), &message).await.map_err(failed)?;

                    let branch = if confirmed { &params.on_confirm } else { &params.on_cancel };
                    self.run_ordered(branch).await?;
                    Ok(Value::Bool(confirmed))
                }
                ActionKind::Sequence(params) => self.run_ordered(&params.actions).await.map(Value::Array),
                ActionKind::Unknown { type_name } => {
                    tracing::warn!(action_type = %type_name, "unknown action type, skipping");
                    Ok(Value::Null)
                }
            }
        })
    }

    /// Run every action declared for `event`, isolating failures: a failed
    /// action is logged and the next one still runs.
    pub async fn execute_for_event(&self, event: &str, actions: &[ActionDefinition]) -> Vec<ActionOutcome> {
        let mut outcomes = Vec::new();
        for action in actions.iter().filter(|a| a.event == event) {
            let result = self.execute(action).await;
            if let Err(e) = &result {
                tracing::warn!(event, action_type = action.type_name(), error = %e, "action failed");
            }
            outcomes.push(ActionOutcome {
                action_type: action.type_name().to_string(),
                result,
            });
        }
        outcomes
    }

    /// Run `onSubmit` in order, stopping at the first failure, then the
    /// `onSubmitSuccess` or `onSubmitError` batch.
    pub async fn execute_submit(&self, actions: &[ActionDefinition]) -> SubmitOutcome {
        let submit: Vec<ActionDefinition> = actions.iter().filter(|a| a.event == ON_SUBMIT).cloned().collect();
        match self.run_ordered(&submit).await {
            Ok(results) => SubmitOutcome::Succeeded {
                results,
                after: self.execute_for_event(ON_SUBMIT_SUCCESS, actions).await,
            },
            Err(error) => {
                tracing::warn!(error = %error, "submit failed");
                SubmitOutcome::Failed {
                    error,
                    after: self.execute_for_event(ON_SUBMIT_ERROR, actions).await,
                }
            }
        }
    }

    async fn run_ordered(&self, steps: &[ActionDefinition]) -> Result<Vec<Value>, ActionError> {
        let mut results = Vec::with_capacity(steps.len());
        for (step, action) in steps.iter().enumerate() {
            let value = self
                .execute(action)
                .await
                .map_err(|source| ActionError::SequenceAborted {
                    step,
                    source: Box::new(source),
                })?;
            results.push(value);
        }
        Ok(results)
    }
}

fn require<'c, T: ?Sized>(
    slot: &'c Option<Arc<T>>,
    action_type: &str,
    capability: Capability,
) -> Result<&'c T, ActionError> {
    slot.as_deref().ok_or_else(|| ActionError::MissingCapability {
        action_type: action_type.to_string(),
        capability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use forma_core::action::{NavigateParams, ResetParams, SequenceParams, ToastParams};
    use forma_core::enums::ToastVariant;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    use crate::context::{FormResetter, Navigator, ToastPresenter};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Recorder {
        fn log(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Navigator for Recorder {
        fn navigate(&self, to: &str, _params: Option<&Value>) -> anyhow::Result<()> {
            if to == "/broken" {
                anyhow::bail!("route not found");
            }
            self.0.lock().unwrap().push(format!("navigate {to}"));
            Ok(())
        }
    }

    impl ToastPresenter for Recorder {
        fn show_toast(&self, message: &str, variant: ToastVariant) -> anyhow::Result<()> {
            self.0.lock().unwrap().push(format!("toast {variant:?} {message}"));
            Ok(())
        }
    }

    impl FormResetter for Recorder {
        fn reset(&self, fields: &[String]) -> anyhow::Result<()> {
            self.0.lock().unwrap().push(format!("reset {}", fields.join(",")));
            Ok(())
        }
    }

    fn navigate(event: &str, to: &str) -> ActionDefinition {
        ActionDefinition::new(
            event,
            ActionKind::Navigate(NavigateParams {
                to: to.into(),
                params: None,
            }),
        )
    }

    fn engine(recorder: &Arc<Recorder>) -> ActionEngine {
        ActionEngine::new(ExecutionContext {
            navigate: Some(recorder.clone()),
            show_toast: Some(recorder.clone()),
            reset_form: Some(recorder.clone()),
            ..ExecutionContext::default()
        })
    }

    #[tokio::test]
    async fn missing_capability_fails_loudly() {
        let engine = ActionEngine::default();
        let err = engine.execute(&navigate("onClick", "/home")).await.unwrap_err();
        assert!(matches!(
            err,
            ActionError::MissingCapability {
                capability: Capability::Navigate,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn unknown_type_resolves_to_null() {
        let engine = ActionEngine::default();
        let action = ActionDefinition::new(
            "onClick",
            ActionKind::Unknown {
                type_name: "print".into(),
            },
        );
        assert_eq!(engine.execute(&action).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn sequence_runs_in_order_and_aborts() {
        let recorder = Arc::new(Recorder::default());
        let engine = engine(&recorder);
        let sequence = ActionDefinition::new(
            "onClick",
            ActionKind::Sequence(SequenceParams {
                actions: vec![
                    navigate("", "/a"),
                    ActionDefinition::new("", ActionKind::Reset(ResetParams::default())),
                    navigate("", "/broken"),
                    navigate("", "/never"),
                ],
            }),
        );

        let err = engine.execute(&sequence).await.unwrap_err();
        assert!(matches!(err, ActionError::SequenceAborted { step: 2, .. }));
        assert_eq!(recorder.log(), vec!["navigate /a", "reset "]);
    }

    #[tokio::test]
    async fn event_batch_isolates_failures() {
        let recorder = Arc::new(Recorder::default());
        let engine = engine(&recorder);
        let actions = vec![
            navigate("onClick", "/first"),
            navigate("onClick", "/broken"),
            navigate("onHover", "/ignored"),
            navigate("onClick", "/third"),
        ];

        let outcomes = engine.execute_for_event("onClick", &actions).await;
        let oks: Vec<bool> = outcomes.iter().map(ActionOutcome::is_ok).collect();
        assert_eq!(oks, vec![true, false, true]);
        assert_eq!(recorder.log(), vec!["navigate /first", "navigate /third"]);
    }

    #[tokio::test]
    async fn toast_translates_message_key() {
        let recorder = Arc::new(Recorder::default());
        let mut engine = engine(&recorder);
        engine
            .context
            .translations
            .insert("student.saved".into(), "Aluno gravado".into());
        let toast = ActionDefinition::new(
            "onSubmitSuccess",
            ActionKind::Toast(ToastParams {
                message: None,
                message_key: Some("student.saved".into()),
                variant: ToastVariant::Success,
            }),
        );

        engine.execute(&toast).await.unwrap();
        assert_eq!(recorder.log(), vec!["toast Success Aluno gravado"]);
    }
}
