//! Creates the vendor-facing role and its sync policy in the target account.

use crate::artifacts::PolicyArtifacts;
use crate::aws::iam_client::IamOperations;
use crate::aws::{policy_arn, role_arn};
use crate::error::StackerResult;

pub const SYNC_POLICY_NAME: &str = "f5-aip-ec2-sync";
pub const ROLE_DESCRIPTION: &str = "F5 AIP EC2 Integration";

/// Provision the integration role: create role, create policy, attach.
///
/// Steps run strictly in order and stop at the first failure. Resources created
/// by earlier steps are left in place.
pub async fn provision_integration_role(
    iam: &dyn IamOperations,
    account_id: &str,
    role_name: &str,
    external_id: &str,
    artifacts: &PolicyArtifacts,
) -> StackerResult<String> {
    let trust_policy = artifacts.assume_role_policy(external_id);
    iam.create_role(role_name, &trust_policy, ROLE_DESCRIPTION)
        .await?;
    log::info!("Created role {} in {}", role_name, account_id);

    iam.create_policy(SYNC_POLICY_NAME, artifacts.sync_policy())
        .await
        .inspect_err(|_| log::warn!("Role {} was created but is left without a policy", role_name))?;

    let sync_policy_arn = policy_arn(account_id, SYNC_POLICY_NAME);
    iam.attach_role_policy(role_name, &sync_policy_arn)
        .await
        .inspect_err(|_| {
            log::warn!(
                "Role {} and policy {} were created but are not attached",
                role_name,
                sync_policy_arn
            );
        })?;

    Ok(role_arn(account_id, role_name))
}
