//! AWS SDK integration: SSM secret lookup, STS role assumption, IAM client wrapper.

pub mod iam_client;
pub mod ssm;
pub mod sts;

/// ARN of an IAM role in the given account.
pub fn role_arn(account_id: &str, role_name: &str) -> String {
    format!("arn:aws:iam::{account_id}:role/{role_name}")
}

/// ARN of a customer managed IAM policy in the given account.
pub fn policy_arn(account_id: &str, policy_name: &str) -> String {
    format!("arn:aws:iam::{account_id}:policy/{policy_name}")
}

/// Check that an account ID is exactly 12 ASCII digits.
pub fn is_valid_account_id(account_id: &str) -> bool {
    account_id.len() == 12 && account_id.chars().all(|c| c.is_ascii_digit())
}
