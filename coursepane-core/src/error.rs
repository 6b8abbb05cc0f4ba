use thiserror::Error;

/// Errors raised while loading course content or building locators.
#[derive(Error, Debug)]
pub enum CoursepaneError {
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {context}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid article base URL '{base}': {reason}")]
    InvalidBase { base: String, reason: String },
}

impl CoursepaneError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn parse(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }
}

/// Errors from decoding or dispatching a script message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("message payload is a {0}, expected a string")]
    NonStringPayload(&'static str),

    #[error("no handler registered for channel '{0}'")]
    UnknownChannel(String),

    #[error("message payload is not valid JSON: {0}")]
    MalformedJson(String),
}

pub type Result<T> = std::result::Result<T, CoursepaneError>;
