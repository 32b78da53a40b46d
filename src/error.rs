use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Document errors
    #[error("Document not found: '{path}'")]
    DocumentNotFound { path: String },

    #[error("Failed to read document '{path}': {source}")]
    DocumentRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write document '{path}': {source}")]
    DocumentWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse document '{path}': {source}")]
    DocumentParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // Request errors
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    Persistence {
        message: String,
        #[source]
        source: Box<AppError>,
        /// Set when the compensating write also failed
        rollback_error: Option<Box<AppError>>,
    },

    #[error("Bot not found")]
    NotFound { id: String },

    // Startup errors
    #[error("Failed to initialize document '{path}': {source}")]
    Startup {
        path: String,
        #[source]
        source: Box<AppError>,
    },

    // Generic errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn persistence(message: impl Into<String>, source: AppError) -> Self {
        AppError::Persistence {
            message: message.into(),
            source: Box::new(source),
            rollback_error: None,
        }
    }
}

/// Business rule failures raised before any state is touched
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("private flag required")]
    PrivateFlagRequired,

    #[error("username required")]
    UsernameRequired,

    #[error("bot limit reached")]
    BotLimitReached,

    #[error("private bot limit reached")]
    PrivateBotLimitReached,

    #[error("insufficient points")]
    InsufficientPoints,
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
