//! The per-event integration workflow

use crate::artifacts::PolicyArtifacts;
use crate::error::StackerResult;
use crate::events::{determine_account_id, EventBridgeEvent};
use crate::provisioning::provision_integration_role;
use crate::vendor::IntegrationRegistration;
use serde::Serialize;
use std::fmt;

/// What a successful invocation created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationOutcome {
    pub org_id: String,
    pub account_id: String,
    pub role_arn: String,
    pub integration_id: String,
}

impl fmt::Display for IntegrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully created integration with EC2 sync in org {} using ARN {}",
            self.org_id, self.role_arn
        )
    }
}

impl super::service::StackerService {
    /// Integrate the account announced by `event`.
    ///
    /// Classify the event, read the policy artifacts, register the vendor
    /// integration and enable EC2 sync, then create the role and policy in the
    /// new account. Every step depends on the previous one and the first
    /// failure ends the invocation. Nothing is rolled back and nothing is
    /// deduplicated: a redelivered event registers a second integration and then
    /// fails at role creation.
    pub async fn handle(&self, event: &EventBridgeEvent) -> StackerResult<IntegrationOutcome> {
        let settings = &self.config.settings;

        let account_id =
            determine_account_id(event).map_err(|e| e.context("unable to get target account id"))?;

        let artifacts = PolicyArtifacts::load(settings)
            .await
            .map_err(|e| e.context("unable to read policy artifacts"))?;

        let registration = self
            .setup_integration(&account_id)
            .await
            .map_err(|e| e.context("unable to setup integration"))?;

        let iam = self
            .iam
            .connect(&account_id)
            .await
            .map_err(|e| e.context("unable to provision IAM resources"))?;
        let role_arn = provision_integration_role(
            iam.as_ref(),
            &account_id,
            &settings.target_role_name,
            &registration.external_id,
            &artifacts,
        )
        .await
        .map_err(|e| e.context("unable to provision IAM resources"))?;

        let outcome = IntegrationOutcome {
            org_id: settings.org_id.clone(),
            account_id,
            role_arn,
            integration_id: registration.integration_id,
        };
        log::info!("{}", outcome);
        Ok(outcome)
    }

    async fn setup_integration(&self, account_id: &str) -> StackerResult<IntegrationRegistration> {
        let settings = &self.config.settings;
        let registration = self
            .vendor
            .register_integration(account_id, &settings.target_role_name)
            .await
            .map_err(|e| e.context("unable to set up AWS integration"))?;

        self.vendor
            .enable_ec2_sync(&registration.integration_id, &settings.ec2_sync_regions)
            .await
            .map_err(|e| e.context("unable to set up EC2 Sync"))?;

        Ok(registration)
    }
}
