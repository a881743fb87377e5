use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("structure source could not be read: {0}")]
    SourceUnreadable(#[from] crate::io::Error),

    #[error("structure contains no atoms")]
    EmptyStructure,

    #[error("invalid bond configuration: {details}")]
    InvalidConfig { details: String },
}

impl Error {
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            details: details.into(),
        }
    }
}
