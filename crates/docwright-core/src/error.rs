use thiserror::Error;

/// Error taxonomy for the analysis–clustering–agent pipeline.
///
/// Variants map onto the error kinds named in the error-handling design:
/// analysis-phase errors (`Parse`, `Graph`) are expected to be logged and
/// recovered from locally; `Agent` and `Model` are the only kinds the
/// orchestrator surfaces as a run failure.
#[derive(Error, Debug)]
pub enum DocwrightError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Cluster error: {0}")]
    Cluster(String),

    #[error("Tool violation: {0}")]
    Tool(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model fatal: {0}")]
    ModelFatal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, DocwrightError>;
