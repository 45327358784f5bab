//! In-memory stand-ins for SSM and IAM, for tests of this and downstream crates.

use crate::aws::iam_client::{IamConnector, IamOperations};
use crate::aws::ssm::SecretStore;
use crate::error::{IamStep, StackerError, StackerResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

/// Secret store backed by a fixed map.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    values: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get_secret(&self, name: &str) -> StackerResult<String> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| StackerError::secret_resolution(name, "ParameterNotFound"))
    }
}

/// One recorded IAM call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IamCall {
    CreateRole {
        role_name: String,
        assume_role_policy: String,
        description: String,
    },
    CreatePolicy {
        policy_name: String,
        policy_document: String,
    },
    AttachRolePolicy {
        role_name: String,
        policy_arn: String,
    },
}

#[derive(Debug, Default)]
struct FakeIamState {
    calls: Vec<IamCall>,
    connected_accounts: Vec<String>,
    roles: HashSet<String>,
    policies: HashSet<String>,
    fail_on: Option<IamStep>,
}

/// IAM that remembers what exists, so repeated runs hit "already exists".
///
/// Clones share state; it is also its own [`IamConnector`].
#[derive(Debug, Clone, Default)]
pub struct FakeIam {
    state: Arc<Mutex<FakeIamState>>,
}

impl FakeIam {
    /// Make every call of `step` fail.
    #[must_use]
    pub fn failing_on(self, step: IamStep) -> Self {
        self.with_state(|state| state.fail_on = Some(step));
        self
    }

    pub fn calls(&self) -> Vec<IamCall> {
        self.with_state(|state| state.calls.clone())
    }

    pub fn connected_accounts(&self) -> Vec<String> {
        self.with_state(|state| state.connected_accounts.clone())
    }

    pub fn has_role(&self, role_name: &str) -> bool {
        self.with_state(|state| state.roles.contains(role_name))
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut FakeIamState) -> T) -> T {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn check_forced_failure(state: &FakeIamState, step: IamStep) -> StackerResult<()> {
        if state.fail_on == Some(step) {
            return Err(StackerError::iam(step, "AccessDenied: injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl IamOperations for FakeIam {
    async fn create_role(
        &self,
        role_name: &str,
        assume_role_policy: &str,
        description: &str,
    ) -> StackerResult<()> {
        self.with_state(|state| {
            state.calls.push(IamCall::CreateRole {
                role_name: role_name.to_string(),
                assume_role_policy: assume_role_policy.to_string(),
                description: description.to_string(),
            });
            Self::check_forced_failure(state, IamStep::CreateRole)?;
            if !state.roles.insert(role_name.to_string()) {
                return Err(StackerError::iam(
                    IamStep::CreateRole,
                    format!(
                        "EntityAlreadyExists: Role with name {role_name} already exists."
                    ),
                ));
            }
            Ok(())
        })
    }

    async fn create_policy(&self, policy_name: &str, policy_document: &str) -> StackerResult<()> {
        self.with_state(|state| {
            state.calls.push(IamCall::CreatePolicy {
                policy_name: policy_name.to_string(),
                policy_document: policy_document.to_string(),
            });
            Self::check_forced_failure(state, IamStep::CreatePolicy)?;
            if !state.policies.insert(policy_name.to_string()) {
                return Err(StackerError::iam(
                    IamStep::CreatePolicy,
                    format!("EntityAlreadyExists: A policy called {policy_name} already exists."),
                ));
            }
            Ok(())
        })
    }

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> StackerResult<()> {
        self.with_state(|state| {
            state.calls.push(IamCall::AttachRolePolicy {
                role_name: role_name.to_string(),
                policy_arn: policy_arn.to_string(),
            });
            Self::check_forced_failure(state, IamStep::AttachRolePolicy)?;
            if !state.roles.contains(role_name) {
                return Err(StackerError::iam(
                    IamStep::AttachRolePolicy,
                    format!("NoSuchEntity: The role with name {role_name} cannot be found."),
                ));
            }
            Ok(())
        })
    }
}

#[async_trait]
impl IamConnector for FakeIam {
    async fn connect(&self, account_id: &str) -> StackerResult<Box<dyn IamOperations>> {
        self.with_state(|state| {
            state.connected_accounts.push(account_id.to_string());
            Self::check_forced_failure(state, IamStep::AssumeRole)
        })?;
        Ok(Box::new(self.clone()))
    }
}
