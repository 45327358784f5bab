//! Secret lookup against SSM Parameter Store.

use crate::error::{StackerError, StackerResult};
use async_trait::async_trait;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::Client as SsmClient;

/// Source of decrypted secret values, addressed by path.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, name: &str) -> StackerResult<String>;
}

pub struct SsmSecretStore {
    client: SsmClient,
}

impl SsmSecretStore {
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for SsmSecretStore {
    async fn get_secret(&self, name: &str) -> StackerResult<String> {
        log::debug!("Fetching parameter {} from SSM", name);
        let out = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| {
                StackerError::secret_resolution(
                    name,
                    format!("SSM GetParameter failed: {}", DisplayErrorContext(&e)),
                )
            })?;

        out.parameter()
            .and_then(|p| p.value())
            .map(ToString::to_string)
            .ok_or_else(|| {
                StackerError::secret_resolution(name, "SSM GetParameter returned no value")
            })
    }
}
