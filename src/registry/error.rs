use thiserror::Error;

/// Why a registration was refused. Never fatal to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Component {0} is already registered")]
    AlreadyRegistered(String),

    #[error("Component {id} requires core version {required}, but current is {core}")]
    Incompatible {
        id: String,
        required: String,
        core: String,
    },

    #[error("Registration is disabled, ignoring {0}")]
    ApiDisabled(String),
}
