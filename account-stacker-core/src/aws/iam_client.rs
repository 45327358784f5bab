//! AWS IAM client wrapper for the provisioning calls

use crate::error::{IamStep, StackerError, StackerResult};
use async_trait::async_trait;
use aws_sdk_iam::error::DisplayErrorContext;
use aws_sdk_iam::Client as IamClient;

/// The IAM operations performed in a target account.
#[async_trait]
pub trait IamOperations: Send + Sync {
    async fn create_role(
        &self,
        role_name: &str,
        assume_role_policy: &str,
        description: &str,
    ) -> StackerResult<()>;

    async fn create_policy(&self, policy_name: &str, policy_document: &str) -> StackerResult<()>;

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> StackerResult<()>;
}

/// Hands out [`IamOperations`] scoped to a target account.
#[async_trait]
pub trait IamConnector: Send + Sync {
    async fn connect(&self, account_id: &str) -> StackerResult<Box<dyn IamOperations>>;
}

pub struct AwsIamClient {
    client: IamClient,
}

impl AwsIamClient {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IamOperations for AwsIamClient {
    async fn create_role(
        &self,
        role_name: &str,
        assume_role_policy: &str,
        description: &str,
    ) -> StackerResult<()> {
        self.client
            .create_role()
            .role_name(role_name)
            .assume_role_policy_document(assume_role_policy)
            .description(description)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .is_some_and(|se| se.is_entity_already_exists_exception())
                {
                    log::warn!(
                        "Role '{}' already exists; this event was most likely delivered more than once",
                        role_name
                    );
                }
                StackerError::iam(
                    IamStep::CreateRole,
                    format!(
                        "Failed to create role '{role_name}': {}",
                        DisplayErrorContext(&e)
                    ),
                )
            })?;
        Ok(())
    }

    async fn create_policy(&self, policy_name: &str, policy_document: &str) -> StackerResult<()> {
        self.client
            .create_policy()
            .policy_name(policy_name)
            .policy_document(policy_document)
            .send()
            .await
            .map_err(|e| {
                StackerError::iam(
                    IamStep::CreatePolicy,
                    format!(
                        "Failed to create policy '{policy_name}': {}",
                        DisplayErrorContext(&e)
                    ),
                )
            })?;
        Ok(())
    }

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> StackerResult<()> {
        self.client
            .attach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| {
                StackerError::iam(
                    IamStep::AttachRolePolicy,
                    format!(
                        "Failed to attach '{policy_arn}' to role '{role_name}': {}",
                        DisplayErrorContext(&e)
                    ),
                )
            })?;
        Ok(())
    }
}
