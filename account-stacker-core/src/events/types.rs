//! Wire types for EventBridge events carrying CloudTrail service events.

use serde::{Deserialize, Serialize};

/// The EventBridge envelope every event is delivered in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBridgeEvent {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "detail-type", default)]
    pub detail_type: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub detail: EventBridgeDetail,
}

/// The CloudTrail record inside `detail`.
///
/// `service_event_details` is kept as raw JSON; its shape depends on the
/// event source and is decoded by [`super::AccountCreationEvent::classify`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventBridgeDetail {
    pub event_version: String,
    pub user_identity: UserIdentity,
    pub event_time: String,
    pub event_source: String,
    pub event_name: String,
    pub aws_region: String,
    #[serde(rename = "sourceIPAddress")]
    pub source_ip_address: String,
    pub user_agent: String,
    #[serde(rename = "eventID")]
    pub event_id: String,
    pub read_only: bool,
    pub event_type: String,
    pub service_event_details: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserIdentity {
    pub account_id: String,
    pub invoked_by: String,
}

/// Control Tower `createManagedAccountStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateManagedAccountStatus {
    #[serde(default)]
    pub organizational_unit: OrganizationalUnit,
    pub account: ControlTowerAccount,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub requested_timestamp: String,
    #[serde(default)]
    pub completed_timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationalUnit {
    pub organizational_unit_name: String,
    pub organizational_unit_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlTowerAccount {
    #[serde(default)]
    pub account_name: String,
    pub account_id: String,
}

/// Organizations `createAccountStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountStatus {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(alias = "AccountId")]
    pub account_id: String,
    #[serde(default)]
    pub requested_timestamp: String,
    #[serde(default)]
    pub completed_timestamp: String,
}
