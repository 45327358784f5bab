//! Policy documents shipped next to the function.
//!
//! The trust policy is a template containing exactly one
//! [`EXTERNAL_ID_PLACEHOLDER`]; the sync policy is used verbatim.

use crate::config::Settings;
use crate::error::{StackerError, StackerResult};
use std::path::Path;
use tokio::fs;

pub const EXTERNAL_ID_PLACEHOLDER: &str = "{{external_id}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyArtifacts {
    assume_role_template: String,
    sync_policy: String,
}

impl PolicyArtifacts {
    /// Build from in-memory documents, checking the template placeholder.
    pub fn new(
        assume_role_template: impl Into<String>,
        sync_policy: impl Into<String>,
    ) -> Result<Self, String> {
        let assume_role_template = assume_role_template.into();
        let occurrences = assume_role_template
            .matches(EXTERNAL_ID_PLACEHOLDER)
            .count();
        if occurrences != 1 {
            return Err(format!(
                "expected exactly one {EXTERNAL_ID_PLACEHOLDER} placeholder, found {occurrences}"
            ));
        }
        Ok(Self {
            assume_role_template,
            sync_policy: sync_policy.into(),
        })
    }

    /// Read both documents from the paths in `settings`.
    pub async fn load(settings: &Settings) -> StackerResult<Self> {
        let template = read_artifact(&settings.assume_role_policy_path).await?;
        let sync_policy = read_artifact(&settings.sync_policy_path).await?;
        Self::new(template, sync_policy)
            .map_err(|message| StackerError::artifact_read(&settings.assume_role_policy_path, message))
    }

    /// The trust policy with `external_id` substituted.
    pub fn assume_role_policy(&self, external_id: &str) -> String {
        self.assume_role_template
            .replacen(EXTERNAL_ID_PLACEHOLDER, external_id, 1)
    }

    pub fn sync_policy(&self) -> &str {
        &self.sync_policy
    }
}

async fn read_artifact(path: &Path) -> StackerResult<String> {
    log::debug!("Reading policy artifact {}", path.display());
    fs::read_to_string(path)
        .await
        .map_err(|e| StackerError::artifact_read(path, e.to_string()))
}
