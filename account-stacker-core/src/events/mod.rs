//! EventBridge account creation events and target account classification.
//!
//! Both AWS Organizations (`CreateAccountResult`) and Control Tower
//! (`CreateManagedAccount`) announce new accounts through CloudTrail events
//! delivered by EventBridge. The account ID lives at a different path in each,
//! so the service event details are only interpreted once the
//! (event source, event name) pair has selected a variant.

mod types;

pub use types::{
    ControlTowerAccount, CreateAccountStatus, CreateManagedAccountStatus, EventBridgeDetail,
    EventBridgeEvent, OrganizationalUnit, UserIdentity,
};

use crate::aws::is_valid_account_id;
use crate::error::{StackerError, StackerResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const CONTROL_TOWER_SOURCE: &str = "controltower.amazonaws.com";
pub const CREATE_MANAGED_ACCOUNT: &str = "CreateManagedAccount";
pub const ORGANIZATIONS_SOURCE: &str = "organizations.amazonaws.com";
pub const CREATE_ACCOUNT_RESULT: &str = "CreateAccountResult";

/// A recognized account creation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountCreationEvent {
    ControlTower(CreateManagedAccountStatus),
    Organizations(CreateAccountStatus),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ControlTowerDetails {
    create_managed_account_status: CreateManagedAccountStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrganizationsDetails {
    create_account_status: CreateAccountStatus,
}

impl AccountCreationEvent {
    /// Select the event variant by (event source, event name) and decode its details.
    pub fn classify(detail: &EventBridgeDetail) -> StackerResult<Self> {
        match (detail.event_source.as_str(), detail.event_name.as_str()) {
            (CONTROL_TOWER_SOURCE, CREATE_MANAGED_ACCOUNT) => {
                let details: ControlTowerDetails = decode_details(detail)?;
                Ok(Self::ControlTower(details.create_managed_account_status))
            }
            (ORGANIZATIONS_SOURCE, CREATE_ACCOUNT_RESULT) => {
                let details: OrganizationsDetails = decode_details(detail)?;
                Ok(Self::Organizations(details.create_account_status))
            }
            (source, name) => Err(StackerError::unrecognized_event(format!(
                "unknown EventSource/EventName '{source}'/'{name}'"
            ))),
        }
    }

    pub fn account_id(&self) -> &str {
        match self {
            Self::ControlTower(status) => &status.account.account_id,
            Self::Organizations(status) => &status.account_id,
        }
    }
}

fn decode_details<T: DeserializeOwned>(detail: &EventBridgeDetail) -> StackerResult<T> {
    serde_json::from_value(detail.service_event_details.clone()).map_err(|e| {
        StackerError::unrecognized_event(format!(
            "malformed serviceEventDetails for {}/{}: {e}",
            detail.event_source, detail.event_name
        ))
    })
}

/// Determine the newly created account that should be provisioned.
pub fn determine_account_id(event: &EventBridgeEvent) -> StackerResult<String> {
    let classified = AccountCreationEvent::classify(&event.detail)?;
    let account_id = classified.account_id();
    if !is_valid_account_id(account_id) {
        return Err(StackerError::unrecognized_event(format!(
            "'{account_id}' is not a 12-digit account id"
        )));
    }
    log::info!(
        "Classified {} event {} for account {}",
        event.detail.event_source,
        event.id,
        account_id
    );
    Ok(account_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn envelope(detail: serde_json::Value) -> EventBridgeEvent {
        serde_json::from_value(json!({
            "version": "0",
            "id": "a1b2c3d4-0000-0000-0000-000000000000",
            "detail-type": "AWS Service Event via CloudTrail",
            "source": "aws.controltower",
            "account": "123456789012",
            "time": "2024-01-01T00:00:00Z",
            "region": "us-east-1",
            "resources": [],
            "detail": detail
        }))
        .expect("envelope should deserialize")
    }

    fn control_tower_event(account_id: &str) -> EventBridgeEvent {
        envelope(json!({
            "eventVersion": "1.08",
            "userIdentity": {"accountId": "123456789012", "invokedBy": "AWS Internal"},
            "eventTime": "2024-01-01T00:00:00Z",
            "eventSource": "controltower.amazonaws.com",
            "eventName": "CreateManagedAccount",
            "awsRegion": "us-east-1",
            "sourceIPAddress": "AWS Internal",
            "userAgent": "AWS Internal",
            "eventID": "evt-1",
            "readOnly": false,
            "eventType": "AwsServiceEvent",
            "serviceEventDetails": {
                "createManagedAccountStatus": {
                    "organizationalUnit": {
                        "organizationalUnitName": "Sandbox",
                        "organizationalUnitId": "ou-abcd-12345678"
                    },
                    "account": {"accountName": "dev", "accountId": account_id},
                    "state": "SUCCEEDED",
                    "message": "AWS Control Tower successfully created an enrolled account.",
                    "requestedTimestamp": "2024-01-01T00:00:00Z",
                    "completedTimestamp": "2024-01-01T00:30:00Z"
                }
            }
        }))
    }

    fn organizations_event(account_id: &str) -> EventBridgeEvent {
        envelope(json!({
            "eventSource": "organizations.amazonaws.com",
            "eventName": "CreateAccountResult",
            "serviceEventDetails": {
                "createAccountStatus": {
                    "id": "car-0123456789abcdef",
                    "state": "SUCCEEDED",
                    "accountName": "dev",
                    "accountId": account_id,
                    "requestedTimestamp": "Jan 1, 2024 12:00:00 AM",
                    "completedTimestamp": "Jan 1, 2024 12:01:00 AM"
                }
            }
        }))
    }

    #[test]
    fn test_control_tower_event() {
        let event = control_tower_event("111122223333");
        assert_eq!(determine_account_id(&event).expect("recognized"), "111122223333");
        assert!(matches!(
            AccountCreationEvent::classify(&event.detail),
            Ok(AccountCreationEvent::ControlTower(_))
        ));
    }

    #[test]
    fn test_organizations_event() {
        let event = organizations_event("111122223333");
        assert_eq!(determine_account_id(&event).expect("recognized"), "111122223333");
        assert!(matches!(
            AccountCreationEvent::classify(&event.detail),
            Ok(AccountCreationEvent::Organizations(_))
        ));
    }

    #[test]
    fn test_organizations_event_with_capitalized_key() {
        let event = envelope(json!({
            "eventSource": "organizations.amazonaws.com",
            "eventName": "CreateAccountResult",
            "serviceEventDetails": {
                "createAccountStatus": {"state": "SUCCEEDED", "AccountId": "111122223333"}
            }
        }));
        assert_eq!(determine_account_id(&event).expect("recognized"), "111122223333");
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        for name in ["CreateManagedAccount", "CreateAccountResult", "RunInstances"] {
            let event = envelope(json!({
                "eventSource": "some.other.service",
                "eventName": name,
                "serviceEventDetails": {
                    "createAccountStatus": {"accountId": "111122223333"}
                }
            }));
            let err = determine_account_id(&event).expect_err("should be rejected");
            assert_eq!(err.kind(), ErrorKind::UnrecognizedEvent);
        }
    }

    #[test]
    fn test_source_and_name_must_match_together() {
        // Control Tower source with the Organizations event name
        let event = envelope(json!({
            "eventSource": "controltower.amazonaws.com",
            "eventName": "CreateAccountResult",
            "serviceEventDetails": {
                "createAccountStatus": {"accountId": "111122223333"}
            }
        }));
        let err = determine_account_id(&event).expect_err("should be rejected");
        assert_eq!(err.kind(), ErrorKind::UnrecognizedEvent);
    }

    #[test]
    fn test_selection_ignores_other_populated_branch() {
        // Both nested structures present; the pair decides which one is read.
        let event = envelope(json!({
            "eventSource": "organizations.amazonaws.com",
            "eventName": "CreateAccountResult",
            "serviceEventDetails": {
                "createManagedAccountStatus": {
                    "account": {"accountName": "other", "accountId": "999999999999"}
                },
                "createAccountStatus": {"accountId": "111122223333"}
            }
        }));
        assert_eq!(determine_account_id(&event).expect("recognized"), "111122223333");
    }

    #[test]
    fn test_recognized_event_without_account_id() {
        let event = envelope(json!({
            "eventSource": "controltower.amazonaws.com",
            "eventName": "CreateManagedAccount",
            "serviceEventDetails": {
                "createAccountStatus": {"accountId": "111122223333"}
            }
        }));
        let err = determine_account_id(&event).expect_err("should be rejected");
        assert_eq!(err.kind(), ErrorKind::UnrecognizedEvent);
        assert!(err.to_string().contains("malformed serviceEventDetails"));
    }

    #[test]
    fn test_invalid_account_id() {
        let err = determine_account_id(&organizations_event("")).expect_err("empty id");
        assert_eq!(err.kind(), ErrorKind::UnrecognizedEvent);

        let err = determine_account_id(&control_tower_event("12345")).expect_err("short id");
        assert!(err.to_string().contains("not a 12-digit account id"));
    }
}
