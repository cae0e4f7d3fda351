//! Marketplace order API.

use ethers::types::Signature;
use mintdesk_batch::PhaseError;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::MarketError;
use crate::order::{MakerOrder, WireOrder};

/// Path of the order creation endpoint, relative to the marketplace base URL.
pub const MAKE_ORDER_PATH: &str = "/market/v1/mint/make";

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Serialize)]
struct MakeOrderRequest {
  order: WireOrder,
}

/// Client for the marketplace order-creation API.
#[derive(Clone)]
pub struct MarketClient {
  http: reqwest::Client,
  endpoint: Url,
}

impl MarketClient {
  pub fn new(base_url: &str, api_key: &str) -> Result<Self, MarketError> {
    let base = base_url.trim().trim_end_matches('/');
    let endpoint = Url::parse(&format!("{base}{MAKE_ORDER_PATH}")).map_err(|e| {
      MarketError::InvalidBaseUrl {
        url: base_url.to_string(),
        message: e.to_string(),
      }
    })?;
    if !matches!(endpoint.scheme(), "http" | "https") {
      return Err(MarketError::InvalidBaseUrl {
        url: base_url.to_string(),
        message: "expected an http or https url".to_string(),
      });
    }

    let mut headers = HeaderMap::new();
    headers.insert(
      CONTENT_TYPE,
      HeaderValue::from_static("application/json; charset=utf-8"),
    );
    let mut key = HeaderValue::from_str(api_key).map_err(|_| MarketError::InvalidApiKey)?;
    key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, key);

    let http = reqwest::Client::builder().default_headers(headers).build()?;

    Ok(Self { http, endpoint })
  }

  pub fn endpoint(&self) -> &Url {
    &self.endpoint
  }

  /// Submit a signed order and apply the success predicate to the response.
  pub async fn submit(
    &self,
    order: &MakerOrder,
    signature: &Signature,
  ) -> Result<serde_json::Value, PhaseError> {
    let body = serde_json::to_vec(&MakeOrderRequest {
      order: order.to_wire(signature),
    })
    .map_err(|e| PhaseError::transport(e.to_string()))?;

    let response = self
      .http
      .post(self.endpoint.clone())
      .body(body)
      .send()
      .await
      .map_err(|e| PhaseError::transport(e.without_url().to_string()))?;

    let status = response.status();
    let text = response
      .text()
      .await
      .map_err(|e| PhaseError::transport(e.without_url().to_string()))?;
    debug!(http_status = status.as_u16(), body = %text, "order_response");

    check_response(status.as_u16(), &text)
  }
}

impl std::fmt::Debug for MarketClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MarketClient")
      .field("endpoint", &self.endpoint.as_str())
      .finish_non_exhaustive()
  }
}

/// An order is accepted only when the body is JSON and its top-level `status`
/// is the string `success` (any case). The HTTP status code is not consulted.
pub fn check_response(http_status: u16, body: &str) -> Result<serde_json::Value, PhaseError> {
  let json: serde_json::Value = serde_json::from_str(body).map_err(|_| {
    PhaseError::rejected(format!("response is not JSON (HTTP {http_status})"))
  })?;

  let status = json.get("status").and_then(|s| s.as_str());
  if status.is_some_and(|s| s.eq_ignore_ascii_case("success")) {
    return Ok(json);
  }

  let message = ["message", "msg", "error"]
    .iter()
    .find_map(|field| json.get(*field).and_then(|v| v.as_str()))
    .map(str::to_string)
    .or_else(|| status.map(|s| format!("status '{s}'")))
    .unwrap_or_else(|| format!("no success status (HTTP {http_status})"));

  Err(PhaseError::rejected(message))
}
