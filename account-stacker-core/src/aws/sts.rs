//! STS helpers for reaching into a newly created account

use crate::aws::iam_client::{AwsIamClient, IamConnector, IamOperations};
use crate::aws::role_arn;
use crate::error::{IamStep, StackerError, StackerResult};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::Credentials;
use aws_sdk_iam::Client as IamClient;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::Client as StsClient;
use std::time::SystemTime;

const SESSION_NAME: &str = "account-stacker";
const PROVIDER_NAME: &str = "AccountStackerAssumeRole";

/// Assume `role_arn` and return the temporary credentials.
///
/// # Arguments
///
/// * `client` - STS client of the calling (management) account
/// * `role_arn` - execution role that exists in the target account
pub async fn assume_role(client: &StsClient, role_arn: &str) -> StackerResult<Credentials> {
    let out = client
        .assume_role()
        .role_arn(role_arn)
        .role_session_name(SESSION_NAME)
        .send()
        .await
        .map_err(|e| {
            StackerError::iam(
                IamStep::AssumeRole,
                format!("Failed to assume '{role_arn}': {}", DisplayErrorContext(&e)),
            )
        })?;

    let creds = out.credentials().ok_or_else(|| {
        StackerError::iam(
            IamStep::AssumeRole,
            format!("STS AssumeRole for '{role_arn}' returned no credentials"),
        )
    })?;

    Ok(Credentials::new(
        creds.access_key_id(),
        creds.secret_access_key(),
        Some(creds.session_token().to_string()),
        SystemTime::try_from(*creds.expiration()).ok(),
        PROVIDER_NAME,
    ))
}

/// Builds IAM clients for target accounts by assuming the configured execution role.
pub struct AssumeRoleIamConnector {
    sdk_config: SdkConfig,
    sts_client: StsClient,
    execution_role_name: String,
}

impl AssumeRoleIamConnector {
    pub fn new(sdk_config: &SdkConfig, execution_role_name: impl Into<String>) -> Self {
        Self {
            sdk_config: sdk_config.clone(),
            sts_client: StsClient::new(sdk_config),
            execution_role_name: execution_role_name.into(),
        }
    }
}

#[async_trait]
impl IamConnector for AssumeRoleIamConnector {
    async fn connect(&self, account_id: &str) -> StackerResult<Box<dyn IamOperations>> {
        let execution_role = role_arn(account_id, &self.execution_role_name);
        log::info!("Assuming {} in target account", execution_role);
        let credentials = assume_role(&self.sts_client, &execution_role).await?;

        let iam_config = aws_sdk_iam::config::Builder::from(&self.sdk_config)
            .credentials_provider(credentials)
            .build();
        Ok(Box::new(AwsIamClient::new(IamClient::from_conf(
            iam_config,
        ))))
    }
}
