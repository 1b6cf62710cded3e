pub mod action;
pub mod guard;
pub mod submitter;
pub mod validator;

pub use crate::domain::model::{
    EchoedFields, FieldErrors, RegistrationSubmission, RequestContext, Session,
    SignUpCredentials, SignUpResponse, ValidRegistration,
};
pub use crate::domain::ports::{AuthBackend, AuthConfigProvider, SessionProvider};
pub use crate::utils::error::Result;
