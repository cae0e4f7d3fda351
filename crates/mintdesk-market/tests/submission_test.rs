//! Order submission against a mock marketplace.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ethers::types::transaction::eip712::Eip712;
use ethers::types::{Address, H256, Signature, U256};
use mintdesk_batch::{ApprovalPhase, BatchRunner, PhaseError, UnitPhase, WorkItem, WorkUnit, Workflow};
use mintdesk_chain::SigningContext;
use mintdesk_config::{ExchangeDomain, Network};
use mintdesk_market::{
  MAKE_ORDER_PATH, MakerOrderTypedData, MarketClient, OrderSubmissionPhase, OrderTemplate,
  exchange_domain, parse_price,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const EXCHANGE: &str = "0x59728544B08AB483533076417FbBB2fD0B17CE3a";
const API_KEY: &str = "test-api-key";

fn signing() -> SigningContext {
  SigningContext::create(Network::Test, DEV_KEY).unwrap()
}

fn template(signer: Address) -> OrderTemplate {
  OrderTemplate::new(
    signer,
    Address::repeat_byte(0x42),
    parse_price("0.05").unwrap(),
    Address::repeat_byte(0x51),
    Address::repeat_byte(0x52),
    1_700_000_000,
  )
}

fn phase(server: &MockServer) -> OrderSubmissionPhase {
  let signing = signing();
  let template = template(signing.address());
  let domain = exchange_domain(
    &ExchangeDomain::default(),
    Network::Test,
    EXCHANGE.parse().unwrap(),
  );
  let client = MarketClient::new(&server.uri(), API_KEY).unwrap();
  OrderSubmissionPhase::new(signing, client, template, domain)
}

fn unit(key: &str) -> WorkUnit {
  WorkUnit {
    ordinal: 0,
    item_index: 0,
    repetition: 0,
    repetitions: 1,
    key: key.to_string(),
  }
}

#[tokio::test]
async fn test_submits_signed_order() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path(MAKE_ORDER_PATH))
    .and(header("x-api-key", API_KEY))
    .and(header("content-type", "application/json; charset=utf-8"))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "success" })))
    .expect(1)
    .mount(&server)
    .await;

  phase(&server).execute(&unit("1234")).await.unwrap();

  let requests = server.received_requests().await.unwrap();
  let body: serde_json::Value = requests[0].body_json().unwrap();
  let order = &body["order"];
  assert_eq!(order["tokenId"], "1234");
  assert_eq!(order["price"], "50000000000000000");
  assert_eq!(order["amount"], 1);
  assert_eq!(order["isOrderAsk"], true);
  assert_eq!(order["minPercentageToAsk"], 8500);
  assert_eq!(order["startTime"], 1_700_000_000u64);
  assert_eq!(order["endTime"], 1_702_592_000u64);
  assert_eq!(order["signer"], "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

  // The signature must verify against the order that was sent.
  let signer = signing().address();
  let nonce = order["nonce"].as_u64().unwrap();
  let sent = template(signer).order(U256::from(1234), nonce);
  let domain = exchange_domain(
    &ExchangeDomain::default(),
    Network::Test,
    EXCHANGE.parse().unwrap(),
  );
  let digest = MakerOrderTypedData::new(&domain, &sent)
    .encode_eip712()
    .unwrap();
  let signature = Signature::from_str(order["sign"].as_str().unwrap()).unwrap();
  assert_eq!(signature.recover(H256::from(digest)).unwrap(), signer);
}

#[tokio::test]
async fn test_rejected_order_is_unit_failure() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(200).set_body_json(
      serde_json::json!({ "status": "fail", "message": "order already exists" }),
    ))
    .mount(&server)
    .await;

  let err = phase(&server).execute(&unit("7")).await.unwrap_err();
  assert_eq!(err, PhaseError::rejected("order already exists"));
}

#[tokio::test]
async fn test_non_json_response_is_unit_failure() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
    .mount(&server)
    .await;

  let err = phase(&server).execute(&unit("7")).await.unwrap_err();
  assert!(matches!(err, PhaseError::Rejected { .. }));
}

#[tokio::test]
async fn test_invalid_token_id_sends_nothing() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "success" })))
    .expect(0)
    .mount(&server)
    .await;

  let err = phase(&server).execute(&unit("abc")).await.unwrap_err();
  assert!(matches!(err, PhaseError::InvalidUnit { key, .. } if key == "abc"));
}

#[tokio::test]
async fn test_unreachable_market_is_transport_failure() {
  let signing = signing();
  let template = template(signing.address());
  let domain = exchange_domain(
    &ExchangeDomain::default(),
    Network::Test,
    EXCHANGE.parse().unwrap(),
  );
  let client = MarketClient::new("http://127.0.0.1:1", API_KEY).unwrap();
  let phase = OrderSubmissionPhase::new(signing, client, template, domain);

  let err = phase.execute(&unit("1")).await.unwrap_err();
  assert!(matches!(err, PhaseError::Transport { .. }));
}

struct ApprovedOnce(AtomicUsize);

#[async_trait]
impl ApprovalPhase for ApprovedOnce {
  async fn approve(&self) -> Result<(), PhaseError> {
    self.0.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}

#[tokio::test]
async fn test_listing_run_exports_rejected_token() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(body_partial_json(serde_json::json!({ "order": { "tokenId": "102" } })))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "fail" })))
    .with_priority(1)
    .mount(&server)
    .await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "success" })))
    .mount(&server)
    .await;

  let approval = Arc::new(ApprovedOnce(AtomicUsize::new(0)));
  let workflow = Workflow::listing(approval.clone(), Arc::new(phase(&server)));
  let items = vec![
    WorkItem::token("101"),
    WorkItem::token("102"),
    WorkItem::token("103"),
  ];
  let mut runner = BatchRunner::new();

  let report = runner.run(&items, &workflow).await.unwrap();

  assert_eq!(approval.0.load(Ordering::SeqCst), 1);
  assert_eq!(report.success_count, 2);
  assert_eq!(report.failure_count, 1);
  assert_eq!(report.failed_keys, vec!["102"]);
  assert_eq!(report.export_failures().unwrap(), "102,1\n");

  let sent: Vec<String> = server
    .received_requests()
    .await
    .unwrap()
    .iter()
    .map(|r| {
      let body: serde_json::Value = r.body_json().unwrap();
      body["order"]["tokenId"].as_str().unwrap().to_string()
    })
    .collect();
  assert_eq!(sent, vec!["101", "102", "103"]);
}
