use crate::core::submitter::{submit_registration, SubmitOutcome};
use crate::core::validator::validate_registration;
use crate::domain::model::{EchoedFields, FieldErrors, RegistrationSubmission};
use crate::domain::ports::AuthBackend;
use std::sync::Arc;

/// `register` 動作的結果，由 HTTP 層轉成回應
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Redirect { status: u16, location: String },
    /// 表單需要重填：只回傳 email 與 username
    Invalid {
        data: EchoedFields,
        errors: FieldErrors,
    },
    Failed { status: u16, message: String },
}

impl From<SubmitOutcome> for ActionOutcome {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Redirect { status, location } => {
                ActionOutcome::Redirect { status, location }
            }
            SubmitOutcome::Failed { status, message } => ActionOutcome::Failed { status, message },
        }
    }
}

#[derive(Clone)]
pub struct RegisterAction {
    backend: Arc<dyn AuthBackend>,
}

impl RegisterAction {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self { backend }
    }

    /// 驗證後再交給認證服務
    pub async fn register(&self, submission: RegistrationSubmission) -> ActionOutcome {
        tracing::debug!("Validating registration form...");
        let registration = match validate_registration(&submission) {
            Ok(registration) => registration,
            Err(err) => {
                tracing::info!("Registration form rejected: {}", err);
                return ActionOutcome::Invalid {
                    data: submission.echoed_fields(),
                    errors: err.into_field_errors(),
                };
            }
        };

        tracing::debug!("Registration form valid for {}", registration.username);
        submit_registration(self.backend.as_ref(), &registration.credentials())
            .await
            .into()
    }
}
