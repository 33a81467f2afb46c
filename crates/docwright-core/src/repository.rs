use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identity of the repository under analysis: a local clone path plus a
/// stable analysis id used to namespace output artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub url: Option<String>,
    pub local_path: PathBuf,
    pub analysis_id: String,
}

impl Repository {
    pub fn local(local_path: PathBuf, analysis_id: impl Into<String>) -> Self {
        Self {
            url: None,
            local_path,
            analysis_id: analysis_id.into(),
        }
    }
}
