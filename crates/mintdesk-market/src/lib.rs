//! Marketplace side of mintdesk listings.
//!
//! A listing run turns every token id into a signed maker order:
//!
//! ```text
//! OrderTemplate ──order(token_id, nonce)──▶ MakerOrder
//!                                              │
//!                         MakerOrderTypedData ◀┘ (EIP-712, exchange domain)
//!                                              │ SigningContext::sign_typed_data
//!                                              ▼
//!                 MarketClient::submit ──POST /market/v1/mint/make──▶ marketplace
//! ```
//!
//! [`OrderSubmissionPhase`] ties these together as a batch unit phase.

mod client;
mod error;
mod order;
mod phase;
mod price;
mod typed_data;

pub use client::{MAKE_ORDER_PATH, MarketClient, check_response};
pub use error::MarketError;
pub use order::{
  LISTING_DURATION_SECS, MIN_PERCENTAGE_TO_ASK, MakerOrder, OrderOverrides, OrderTemplate,
  WireOrder,
};
pub use phase::{OrderSubmissionPhase, unix_now};
pub use price::parse_price;
pub use typed_data::{MAKER_ORDER_TYPE, MakerOrderTypedData, exchange_domain};
