use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;
use xmlaudit_fragment::{
    FragmentValidator, Markers, NamespaceBinding, Suppressions, Wrapper,
};

use crate::error::AuditError;

/// Settings of an audit run, read from a JSON file.
///
/// Unknown keys are ignored so the file can be shared with other tools
/// (database credentials and the like).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuditConfig {
    /// Prefix of context URLs, up to the resource id.
    pub base_url: String,
    #[serde(default)]
    pub output_csv: Option<PathBuf>,
    #[serde(default = "default_suppressed")]
    pub suppressed: Vec<String>,
    #[serde(default = "default_namespaces")]
    pub namespaces: Vec<NamespaceBinding>,
    #[serde(default)]
    pub markers: Markers,
}

fn default_suppressed() -> Vec<String> {
    Suppressions::default().substrings().to_vec()
}

fn default_namespaces() -> Vec<NamespaceBinding> {
    Wrapper::default().bindings().to_vec()
}

impl AuditConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            output_csv: None,
            suppressed: default_suppressed(),
            namespaces: default_namespaces(),
            markers: Markers::default(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();
        debug!("loading configuration from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| AuditError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, AuditError> {
        serde_json::from_str(text).map_err(AuditError::ConfigFormat)
    }

    pub fn validator(&self) -> Result<FragmentValidator, AuditError> {
        Ok(FragmentValidator::new(
            Wrapper::new(self.namespaces.iter().cloned())?,
            Suppressions::new(self.suppressed.iter().cloned()),
            self.markers.clone(),
        ))
    }
}
