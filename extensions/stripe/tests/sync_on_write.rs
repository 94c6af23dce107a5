use async_trait::async_trait;
use paysync_core::prelude::*;
use paysync_runtime::HookChain;
use paysync_stripe::prelude::*;
use paysync_stripe::{BillingError, TEST_EXTERNAL_ID};
use serde_json::{Map, Value, json};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct RecordingClient {
    calls: Arc<Mutex<Vec<(ResourceKind, Map<String, Value>)>>>,
    fail_with: Option<String>,
}

impl RecordingClient {
    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<(ResourceKind, Map<String, Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BillingClient for RecordingClient {
    async fn create(
        &self,
        kind: ResourceKind,
        params: Map<String, Value>,
    ) -> Result<CreatedResource, BillingError> {
        let count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((kind, params));
            calls.len()
        };

        match &self.fail_with {
            Some(message) => Err(BillingError::Api {
                status: 400,
                message: message.clone(),
                kind: Some("invalid_request_error".into()),
                code: None,
            }),
            None => Ok(CreatedResource {
                id: format!("cus_{count:04}"),
                object: Some("customer".into()),
            }),
        }
    }
}

fn config() -> SyncConfig {
    SyncConfig::new(vec![
        SyncRule::new("customers", ResourceKind::Customers)
            .field("name", "name")
            .field("contactEmail", "email"),
        SyncRule::new("products", ResourceKind::Products).field("title", "name"),
    ])
    .unwrap()
}

fn hook_with(client: &RecordingClient) -> SyncOnWrite {
    SyncOnWrite::new(SyncResources::new(config(), client.clone()))
}

fn write(collection: &str, operation: Operation, record: Value) -> PendingWrite {
    PendingWrite::new(
        collection,
        operation,
        PendingRecord::try_from(record).unwrap(),
    )
}

#[tokio::test]
async fn test_environment_stubs_id_without_calling_out() {
    let client = RecordingClient::default();
    let hook = hook_with(&client);

    for (collection, operation) in [
        ("customers", Operation::Create),
        ("customers", Operation::Update),
        ("orders", Operation::Create),
    ] {
        let record = hook
            .evaluate(
                write(collection, operation, json!({ "name": "Ada", "stripeID": "cus_real" })),
                Environment::Test,
            )
            .await;

        assert_eq!(record.external_id(), Some(TEST_EXTERNAL_ID));
        assert!(!record.contains(paysync_core::SKIP_SYNC_FIELD));
    }
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn unconfigured_collection_only_resets_flag() {
    let client = RecordingClient::default();
    let hook = hook_with(&client);

    let record = hook
        .evaluate(
            write("orders", Operation::Create, json!({ "total": 12, "skipSync": true })),
            Environment::Production,
        )
        .await;

    assert_eq!(
        Value::Object(record.into_inner()),
        json!({ "total": 12, "skipSync": false })
    );
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn create_success_links_record_and_suppresses_resync() {
    let client = RecordingClient::default();
    let hook = hook_with(&client);

    let record = hook
        .evaluate(
            write(
                "customers",
                Operation::Create,
                json!({ "name": "Ada", "contactEmail": "ada@example.com" }),
            ),
            Environment::Production,
        )
        .await;

    assert_eq!(record.external_id(), Some("cus_0001"));
    assert!(record.skip_sync());
    assert_eq!(client.calls().len(), 1);
}

#[tokio::test]
async fn create_always_calls_out_even_when_linked() {
    let client = RecordingClient::default();
    let hook = hook_with(&client);

    let record = hook
        .evaluate(
            write("customers", Operation::Create, json!({ "name": "Ada", "stripeID": "cus_old" })),
            Environment::Production,
        )
        .await;

    assert_eq!(client.calls().len(), 1);
    assert_eq!(record.external_id(), Some("cus_0001"));
}

#[tokio::test]
async fn create_failure_leaves_record_unlinked() {
    let client = RecordingClient::failing("Invalid email address");
    let hook = hook_with(&client);

    let record = hook
        .evaluate(
            write("customers", Operation::Create, json!({ "name": "Ada", "contactEmail": "nope" })),
            Environment::Production,
        )
        .await;

    assert!(!record.has_external_id());
    assert!(!record.skip_sync());
    assert_eq!(record.get("name"), Some(&json!("Ada")));
    assert_eq!(client.calls().len(), 1);
}

#[tokio::test]
async fn update_of_linked_record_does_not_call_out() {
    let client = RecordingClient::default();
    let hook = hook_with(&client);

    let record = hook
        .evaluate(
            write("customers", Operation::Update, json!({ "name": "Ada", "stripeID": "cus_9" }))
                .with_id("64f0c1"),
            Environment::Production,
        )
        .await;

    assert!(client.calls().is_empty());
    assert_eq!(
        Value::Object(record.into_inner()),
        json!({ "name": "Ada", "stripeID": "cus_9", "skipSync": false })
    );
}

#[tokio::test]
async fn update_keeps_a_non_string_id() {
    let client = RecordingClient::default();
    let hook = hook_with(&client);

    let record = hook
        .evaluate(
            write("customers", Operation::Update, json!({ "name": "Ada", "stripeID": 12345 })),
            Environment::Production,
        )
        .await;

    assert!(client.calls().is_empty());
    assert_eq!(record.get("stripeID"), Some(&json!(12345)));
    assert!(!record.skip_sync());
}

#[tokio::test]
async fn update_of_unlinked_record_backfills_id() {
    let client = RecordingClient::default();
    let hook = hook_with(&client);

    for missing in [
        json!({ "name": "Ada" }),
        json!({ "name": "Ada", "stripeID": "" }),
        json!({ "name": "Ada", "stripeID": null }),
    ] {
        let record = hook
            .evaluate(write("customers", Operation::Update, missing), Environment::Production)
            .await;

        assert!(record.has_external_id());
        assert!(record.skip_sync());
    }
    assert_eq!(client.calls().len(), 3);
}

#[tokio::test]
async fn payload_contains_exactly_the_mapped_fields() {
    let client = RecordingClient::default();
    let hook = hook_with(&client);

    hook.evaluate(
        write(
            "customers",
            Operation::Create,
            json!({
                "name": "Ada",
                "contactEmail": "ada@example.com",
                "passwordHash": "$argon2id$...",
                "roles": ["admin"]
            }),
        ),
        Environment::Production,
    )
    .await;
    hook.evaluate(
        write("products", Operation::Create, json!({ "title": "Pro plan", "sku": "PRO" })),
        Environment::Production,
    )
    .await;

    let calls = client.calls();
    assert_eq!(calls[0].0, ResourceKind::Customers);
    assert_eq!(
        Value::Object(calls[0].1.clone()),
        json!({ "name": "Ada", "email": "ada@example.com" })
    );
    assert_eq!(calls[1].0, ResourceKind::Products);
    assert_eq!(Value::Object(calls[1].1.clone()), json!({ "name": "Pro plan" }));
}

struct RequireName;

#[async_trait]
impl Hook<PendingWrite, PendingWrite> for RequireName {
    type Error = Infallible;

    async fn run(&self, mut input: PendingWrite, _bus: &mut Bus) -> Outcome<PendingWrite, Infallible> {
        if !input.record.contains("name") {
            input.record.insert("name", json!("(unnamed)"));
        }
        Outcome::next(input)
    }
}

#[tokio::test]
async fn runs_inside_a_host_hook_chain() {
    let client = RecordingClient::default();
    let chain = HookChain::new("beforeValidate")
        .then(RequireName)
        .then(Traced::new(hook_with(&client), "stripe-sync"));

    assert_eq!(chain.hooks(), ["RequireName", "stripe-sync"]);

    let mut bus = Bus::with_environment(Environment::Production);
    let out = chain
        .execute(write("customers", Operation::Create, json!({})), &mut bus)
        .await
        .into_result()
        .unwrap();

    assert_eq!(out.record.external_id(), Some("cus_0001"));
    assert_eq!(
        Value::Object(client.calls()[0].1.clone()),
        json!({ "name": "(unnamed)" })
    );

    let mut test_bus = Bus::with_environment(Environment::Test);
    let out = chain
        .execute(write("customers", Operation::Create, json!({})), &mut test_bus)
        .await
        .into_result()
        .unwrap();
    assert_eq!(out.record.external_id(), Some(TEST_EXTERNAL_ID));
    assert_eq!(client.calls().len(), 1);
}
