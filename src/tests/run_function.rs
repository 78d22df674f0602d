#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::{json, Value};

    use crate::function::{
        ConditionStatus, Function, RunFunctionRequest, RunFunctionResponse, Severity, Target,
    };
    use crate::tests::common::{default_client, FakeProvider};

    fn function(provider: &Arc<FakeProvider>) -> Function<FakeProvider> {
        Function::with_options(default_client(provider), 60, None)
    }

    fn request(input: Value, observed: Value) -> RunFunctionRequest {
        serde_json::from_value(json!({
            "meta": {"tag": "step-1"},
            "input": input,
            "observed": {"composite": {"resource": observed}},
            "desired": {"composite": {"resource": {}}}
        }))
        .unwrap()
    }

    fn fetch_user_input() -> Value {
        json!({
            "apiVersion": "groupresolver.fn.example.org/v1beta1",
            "kind": "Input",
            "functionType": "FetchUser",
            "groupList": {"fromCompositeField": "spec.adminGroups"},
            "outputField": "spec.status.adminUsers"
        })
    }

    fn observed_composite() -> Value {
        json!({
            "apiVersion": "platform.example.org/v1alpha1",
            "kind": "XProject",
            "spec": {
                "adminGroups": ["platform", "sre"],
                "adminUsers": ["a@example.com", "b@example.com"],
                "viewerUsers": ["a@example.com", "c@example.com"]
            },
            "status": {"adminUsers": ["d@example.com"]}
        })
    }

    fn only_condition(rsp: &RunFunctionResponse) -> (ConditionStatus, &str, Option<&str>, Target) {
        assert_eq!(rsp.conditions.len(), 1, "{:?}", rsp.conditions);
        let c = &rsp.conditions[0];
        assert_eq!(c.kind, "FunctionSuccess");
        (c.status, c.reason.as_str(), c.message.as_deref(), c.target)
    }

    #[tokio::test]
    async fn fetch_user_writes_members_into_desired() {
        let provider = Arc::new(FakeProvider::with_groups(&[
            ("platform", &["a@example.com", "b@example.com"]),
            ("sre", &["b@example.com", "c@example.com"]),
        ]));
        let rsp = function(&provider)
            .run_function(&request(fetch_user_input(), observed_composite()))
            .await;

        assert!(!rsp.is_fatal(), "{:?}", rsp.results);
        assert_eq!(rsp.meta.tag, "step-1");
        assert_eq!(rsp.meta.ttl, 60);
        assert_eq!(
            rsp.desired.composite.resource,
            json!({
                "apiVersion": "platform.example.org/v1alpha1",
                "kind": "XProject",
                "spec": {"status": {"adminUsers": [
                    "a@example.com", "b@example.com", "b@example.com", "c@example.com"
                ]}}
            })
        );
        assert_eq!(
            only_condition(&rsp),
            (ConditionStatus::True, "Success", None, Target::CompositeAndClaim)
        );
    }

    #[tokio::test]
    async fn unknown_group_is_fatal() {
        let provider = Arc::new(FakeProvider::with_groups(&[("platform", &["a@example.com"])]));
        let rsp = function(&provider)
            .run_function(&request(fetch_user_input(), observed_composite()))
            .await;

        assert!(rsp.is_fatal());
        assert!(rsp.results[0].message.contains("group sre not exists"), "{}", rsp.results[0].message);
        assert_eq!(
            only_condition(&rsp),
            (
                ConditionStatus::False,
                "InternalError",
                Some("Failed to get list user"),
                Target::Composite
            )
        );
        assert_eq!(rsp.desired.composite.resource, json!({}));
    }

    #[tokio::test]
    async fn missing_group_field_is_fatal() {
        let provider = Arc::new(FakeProvider::default());
        let rsp = function(&provider)
            .run_function(&request(fetch_user_input(), json!({"spec": {}})))
            .await;

        assert!(rsp.is_fatal());
        let (status, _, message, _) = only_condition(&rsp);
        assert_eq!(status, ConditionStatus::False);
        assert_eq!(message, Some("Failed to get group list from composite field"));
        assert_eq!(provider.auth_calls(), 0);
    }

    #[tokio::test]
    async fn dedupe_users_merges_observed_into_desired() {
        let provider = Arc::new(FakeProvider::default());
        let input = json!({
            "functionType": "DedupeUsers",
            "groupsPriority": [
                {"fromPathsList": ["spec.viewerUsers"], "toPath": "spec.viewerUsers"},
                {"fromPathsList": ["spec.adminUsers", "status.adminUsers"], "toPath": "spec.adminUsers"}
            ]
        });
        let rsp = function(&provider)
            .run_function(&request(input, observed_composite()))
            .await;

        assert!(rsp.results.is_empty(), "{:?}", rsp.results);
        assert_eq!(
            rsp.desired.composite.resource,
            json!({
                "apiVersion": "platform.example.org/v1alpha1",
                "kind": "XProject",
                "spec": {
                    "adminUsers": ["a@example.com", "b@example.com", "d@example.com"],
                    "viewerUsers": ["c@example.com"]
                }
            })
        );
        assert_eq!(only_condition(&rsp).0, ConditionStatus::True);
        assert_eq!(provider.auth_calls(), 0);
    }

    #[tokio::test]
    async fn dedupe_users_reports_missing_paths_as_warnings() {
        let provider = Arc::new(FakeProvider::default());
        let input = json!({
            "functionType": "DedupeUsers",
            "groupsPriority": [
                {"fromPathsList": ["spec.editorUsers"], "toPath": "spec.editorUsers"},
                {"fromPathsList": ["spec.adminUsers"], "toPath": "spec.adminUsers"}
            ]
        });
        let rsp = function(&provider)
            .run_function(&request(input, observed_composite()))
            .await;

        assert!(!rsp.is_fatal());
        assert_eq!(rsp.results.len(), 1);
        assert_eq!(rsp.results[0].severity, Severity::Warning);
        assert!(rsp.results[0].message.contains("spec.editorUsers"));
        assert_eq!(
            rsp.desired.composite.resource["spec"]["editorUsers"],
            json!([])
        );
        assert_eq!(only_condition(&rsp).0, ConditionStatus::True);
    }

    #[tokio::test]
    async fn dedupe_users_without_rules_is_fatal() {
        let provider = Arc::new(FakeProvider::default());
        let input = json!({"functionType": "DedupeUsers", "groupsPriority": []});
        let rsp = function(&provider)
            .run_function(&request(input, observed_composite()))
            .await;

        assert!(rsp.is_fatal());
        assert_eq!(only_condition(&rsp).2, Some("Failed to dedupe users"));
    }

    #[tokio::test]
    async fn undecodable_input_is_fatal_for_composite_and_claim() {
        let provider = Arc::new(FakeProvider::default());
        let rsp = function(&provider)
            .run_function(&request(json!({"functionType": "Unknown"}), observed_composite()))
            .await;

        assert!(rsp.is_fatal());
        assert!(rsp.results[0].message.starts_with("cannot get Function input"));
        assert_eq!(
            only_condition(&rsp),
            (
                ConditionStatus::False,
                "InternalError",
                Some("Something went wrong."),
                Target::CompositeAndClaim
            )
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_hits_the_request_deadline() {
        let mut fake = FakeProvider::with_groups(&[("platform", &["a"]), ("sre", &["b"])]);
        fake.delay = Some(Duration::from_secs(10));
        let provider = Arc::new(fake);
        let function = Function::with_options(default_client(&provider), 60, Some(Duration::from_secs(5)));

        let rsp = function
            .run_function(&request(fetch_user_input(), observed_composite()))
            .await;

        assert!(rsp.is_fatal());
        assert!(rsp.results[0].message.contains("timed out"), "{}", rsp.results[0].message);
    }
}
