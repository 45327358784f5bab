use account_stacker_core::{EventBridgeEvent, IntegrationOutcome, StackerService};
use lambda_runtime::{Error, LambdaEvent};

pub(crate) async fn function_handler(
    event: LambdaEvent<EventBridgeEvent>,
    service: &StackerService,
) -> Result<IntegrationOutcome, Error> {
    log::debug!(
        "Received {} event {} (request {})",
        event.payload.detail_type,
        event.payload.id,
        event.context.request_id
    );
    service.handle(&event.payload).await.map_err(|err| {
        log::error!("{} ({:?})", err, err.kind());
        Error::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_stacker_core::testing::FakeIam;
    use account_stacker_core::vendor::hawk::HawkRequestFactory;
    use account_stacker_core::vendor::VendorClient;
    use account_stacker_core::{Config, Settings};
    use lambda_runtime::Context;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(api_path: &str, dir: &TempDir, iam: &FakeIam) -> StackerService {
        let trust = dir.path().join("assumeRolePolicy.json");
        let sync = dir.path().join("syncPolicy.json");
        std::fs::write(
            &trust,
            r#"{"Condition":{"StringEquals":{"sts:ExternalId":"{{external_id}}"}}}"#,
        )
        .expect("write trust policy");
        std::fs::write(&sync, r#"{"Statement":[]}"#).expect("write sync policy");

        let settings = Settings::from_lookup(|name| {
            let value = match name {
                "F5_EC2_REGIONS" => "us-east-1",
                "F5_TARGET_ACCOUNT_EXECUTION_ROLE" => "OrganizationAccountAccessRole",
                "F5_TARGET_ROLE_NAME" => "F5AIPIntegration",
                "F5_API_KEY_PATH" => "/f5/api-key",
                "F5_ORG_ID" => "org-1",
                "F5_USER_ID" => "user-1",
                "F5_API_PATH" => api_path,
                "F5_ASSUME_ROLE_POLICY_PATH" => trust.to_str()?,
                "F5_SYNC_POLICY_PATH" => sync.to_str()?,
                _ => return None,
            };
            Some(value.to_string())
        })
        .expect("complete settings");
        let config = Config {
            settings,
            api_key: "key".to_string(),
        };
        let vendor = VendorClient::new(
            reqwest::Client::new(),
            &config.settings.api_path,
            Box::new(HawkRequestFactory::new("user-1", "key", "org-1")),
        );
        StackerService::new(config, vendor, Box::new(iam.clone()))
    }

    fn organizations_event(account_id: &str) -> EventBridgeEvent {
        serde_json::from_value(json!({
            "id": "7f0e6a52-0000-0000-0000-000000000001",
            "detail-type": "AWS Service Event via CloudTrail",
            "source": "aws.organizations",
            "detail": {
                "eventSource": "organizations.amazonaws.com",
                "eventName": "CreateAccountResult",
                "serviceEventDetails": {
                    "createAccountStatus": {
                        "id": "car-1234",
                        "state": "SUCCEEDED",
                        "accountName": "payments-dev",
                        "accountId": account_id
                    }
                }
            }
        }))
        .expect("valid event")
    }

    #[tokio::test]
    async fn test_handler_returns_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/integrations/aws"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "int-1", "externalId": "ext-1"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v2/integrations/aws/int-1/ec2"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let dir = TempDir::new().expect("temp dir");
        let iam = FakeIam::default();
        let service = service(&server.uri(), &dir, &iam);

        let event = LambdaEvent::new(organizations_event("777788889999"), Context::default());
        let outcome = function_handler(event, &service)
            .await
            .expect("handler should succeed");

        assert_eq!(outcome.account_id, "777788889999");
        assert_eq!(outcome.integration_id, "int-1");
        assert_eq!(
            outcome.role_arn,
            "arn:aws:iam::777788889999:role/F5AIPIntegration"
        );
        assert!(iam.has_role("F5AIPIntegration"));
    }

    #[tokio::test]
    async fn test_handler_reports_workflow_error() {
        let server = MockServer::start().await;
        let dir = TempDir::new().expect("temp dir");
        let iam = FakeIam::default();
        let service = service(&server.uri(), &dir, &iam);

        let mut payload = organizations_event("777788889999");
        payload.detail.event_source = "aws.s3".to_string();
        let event = LambdaEvent::new(payload, Context::default());
        let err = function_handler(event, &service)
            .await
            .expect_err("unknown event should fail");

        assert!(err
            .to_string()
            .starts_with("unable to get target account id: unable to determine target account"));
        assert!(iam.calls().is_empty());
    }
}
