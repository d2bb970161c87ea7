//! Failure kinds raised inside one poll cycle.
//!
//! Startup problems live in [`crate::config::ConfigError`]; everything here is
//! recoverable and ends the current cycle only.
use reqwest::StatusCode;
use thiserror::Error;

/// The status API could not be reached or did not answer with a usable body.
#[derive(Debug, Error)]
pub enum NetworkProblem {
    #[error("endpoint {endpoint} unavailable (from_date={from_date}): {source}")]
    Transport {
        endpoint: String,
        from_date: i64,
        #[source]
        source: reqwest::Error,
    },
    #[error("API answered with unexpected status: {0}")]
    Status(StatusCode),
    #[error("API response is not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

/// The decoded payload does not follow the expected contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("API response is not an object")]
    NotAnObject,
    #[error("API response has no `homeworks` key")]
    MissingHomeworks,
    #[error("`homeworks` in API response is not a list")]
    HomeworksNotAList,
    #[error("homework entry is malformed: {0}")]
    MalformedHomework(String),
    #[error("homework entry has no `{0}` key")]
    MissingField(&'static str),
    #[error("unknown homework status: {0:?}")]
    UnknownStatus(String),
}

#[derive(Debug, Error)]
#[error("message to chat {chat_id} was not delivered: {source}")]
pub struct SendMessageError {
    pub chat_id: String,
    #[source]
    pub source: anyhow::Error,
}

/// Everything that can cut a cycle short.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Network(#[from] NetworkProblem),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Send(#[from] SendMessageError),
}

impl CycleError {
    pub fn kind(&self) -> &'static str {
        match self {
            CycleError::Network(_) => "network",
            CycleError::Api(_) => "api",
            CycleError::Send(_) => "send",
        }
    }
}
