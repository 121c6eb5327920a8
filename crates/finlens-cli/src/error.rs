use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] finlens_core::ValidationError),

    #[error(transparent)]
    Analysis(#[from] finlens_core::AnalysisError),

    #[error(transparent)]
    Export(#[from] finlens_core::ExportError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Analysis(_) => 3,
            Self::Serialization(_) => 4,
            Self::Export(_) => 6,
            Self::Io(_) => 10,
        }
    }
}
