//! Configuration loaded once from the process environment.
//!
//! [`Settings`] is the raw environment snapshot with presence checks applied;
//! [`Config`] adds the vendor API key resolved from the parameter store.

use crate::aws::ssm::SecretStore;
use crate::error::{StackerError, StackerResult};
use std::fmt;
use std::path::PathBuf;

pub const ENV_EC2_REGIONS: &str = "F5_EC2_REGIONS";
pub const ENV_TARGET_ACCOUNT_EXECUTION_ROLE: &str = "F5_TARGET_ACCOUNT_EXECUTION_ROLE";
pub const ENV_TARGET_ROLE_NAME: &str = "F5_TARGET_ROLE_NAME";
pub const ENV_API_KEY_PATH: &str = "F5_API_KEY_PATH";
pub const ENV_ORG_ID: &str = "F5_ORG_ID";
pub const ENV_USER_ID: &str = "F5_USER_ID";
pub const ENV_API_PATH: &str = "F5_API_PATH";
pub const ENV_ASSUME_ROLE_POLICY_PATH: &str = "F5_ASSUME_ROLE_POLICY_PATH";
pub const ENV_SYNC_POLICY_PATH: &str = "F5_SYNC_POLICY_PATH";

pub const DEFAULT_API_PATH: &str = "https://api.threatstack.com";
pub const DEFAULT_ASSUME_ROLE_POLICY_PATH: &str = "assumeRolePolicy.json";
pub const DEFAULT_SYNC_POLICY_PATH: &str = "syncPolicy.json";

/// Environment-derived settings, before the API key secret is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub ec2_sync_regions: Vec<String>,
    pub target_account_execution_role: String,
    pub target_role_name: String,
    pub api_path: String,
    pub api_key_path: String,
    pub org_id: String,
    pub user_id: String,
    pub assume_role_policy_path: PathBuf,
    pub sync_policy_path: PathBuf,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> StackerResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, collecting every missing required variable.
    ///
    /// Unset and empty variables are treated the same way.
    pub fn from_lookup<F>(lookup: F) -> StackerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut required = |name: &str| -> String {
            match lookup(name).filter(|value| !value.trim().is_empty()) {
                Some(value) => value,
                None => {
                    missing.push(name.to_string());
                    String::new()
                }
            }
        };

        let regions = required(ENV_EC2_REGIONS);
        let target_account_execution_role = required(ENV_TARGET_ACCOUNT_EXECUTION_ROLE);
        let target_role_name = required(ENV_TARGET_ROLE_NAME);
        let api_key_path = required(ENV_API_KEY_PATH);
        let org_id = required(ENV_ORG_ID);
        let user_id = required(ENV_USER_ID);

        let ec2_sync_regions = split_regions(&regions);
        if ec2_sync_regions.is_empty() && !missing.iter().any(|m| m == ENV_EC2_REGIONS) {
            // e.g. F5_EC2_REGIONS=","
            missing.insert(0, ENV_EC2_REGIONS.to_string());
        }

        if !missing.is_empty() {
            return Err(StackerError::configuration(missing));
        }

        let optional = |name: &str, default: &str| -> String {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            ec2_sync_regions,
            target_account_execution_role,
            target_role_name,
            api_path: optional(ENV_API_PATH, DEFAULT_API_PATH),
            api_key_path,
            org_id,
            user_id,
            assume_role_policy_path: optional(
                ENV_ASSUME_ROLE_POLICY_PATH,
                DEFAULT_ASSUME_ROLE_POLICY_PATH,
            )
            .into(),
            sync_policy_path: optional(ENV_SYNC_POLICY_PATH, DEFAULT_SYNC_POLICY_PATH).into(),
        })
    }
}

fn split_regions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|region| !region.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Immutable configuration for the lifetime of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub settings: Settings,
    pub api_key: String,
}

impl Config {
    /// Resolve the vendor API key and produce the final configuration.
    pub async fn load(settings: Settings, secrets: &dyn SecretStore) -> StackerResult<Self> {
        let api_key = secrets.get_secret(&settings.api_key_path).await?;
        if api_key.is_empty() {
            return Err(StackerError::secret_resolution(
                &settings.api_key_path,
                "parameter value is empty",
            ));
        }
        log::info!(
            "Loaded configuration for org {} ({} sync regions)",
            settings.org_id,
            settings.ec2_sync_regions.len()
        );
        Ok(Self { settings, api_key })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("settings", &self.settings)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
