//! Account Stacker Service Layer
//!
//! The service owns the process-wide configuration and the clients for the
//! three external systems (vendor API, SSM, target-account IAM). It is built
//! once at process start and then handles one event per invocation.

use crate::aws::iam_client::IamConnector;
use crate::aws::ssm::SsmSecretStore;
use crate::aws::sts::AssumeRoleIamConnector;
use crate::config::{Config, Settings};
use crate::error::{StackerError, StackerResult};
use crate::vendor::hawk::HawkRequestFactory;
use crate::vendor::VendorClient;

pub struct StackerService {
    pub(crate) config: Config,
    pub(crate) vendor: VendorClient,
    pub(crate) iam: Box<dyn IamConnector>,
}

impl StackerService {
    /// Assemble a service from already constructed parts.
    pub fn new(config: Config, vendor: VendorClient, iam: Box<dyn IamConnector>) -> Self {
        Self {
            config,
            vendor,
            iam,
        }
    }

    /// Build the service from the process environment.
    ///
    /// Reads the settings, resolves the vendor API key from SSM and creates
    /// the AWS and HTTP clients using the default credential provider chain.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or the API key
    /// cannot be resolved.
    pub async fn from_env() -> StackerResult<Self> {
        let settings = Settings::from_env().map_err(|e| e.context("unable to build config"))?;

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        let secrets = SsmSecretStore::new(aws_sdk_ssm::Client::new(&sdk_config));
        let config = Config::load(settings, &secrets)
            .await
            .map_err(|e| e.context("unable to build config"))?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| StackerError::vendor_request(format!("unable to build HTTP client: {e}")))?;
        let vendor = VendorClient::new(
            http,
            &config.settings.api_path,
            Box::new(HawkRequestFactory::new(
                &config.settings.user_id,
                &config.api_key,
                &config.settings.org_id,
            )),
        );
        let iam = AssumeRoleIamConnector::new(
            &sdk_config,
            &config.settings.target_account_execution_role,
        );

        Ok(Self::new(config, vendor, Box::new(iam)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // handle() method implementation is in integrate.rs
}
