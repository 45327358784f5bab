//! This crate provides the core logic for Account Stacker:
//! - Account creation event classification (Organizations and Control Tower)
//! - Configuration from the environment and SSM Parameter Store
//! - F5 AIP integration registration and EC2 sync through the vendor API
//! - Cross-account IAM role and policy provisioning
//!

pub mod artifacts;
pub mod aws;
pub mod commands;
pub mod config;
mod error;
pub mod events;
pub mod provisioning;
pub mod vendor;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// Re-exports for a small, focused public API
pub use commands::{IntegrationOutcome, StackerService};
pub use config::{Config, Settings};
pub use error::{ErrorKind, IamStep, StackerError, StackerResult};
pub use events::{determine_account_id, AccountCreationEvent, EventBridgeEvent};
