//! Mintdesk Config
//!
//! Static configuration for mintdesk runs. Nothing here is supplied per run:
//! the network enum and its chain ids are compiled in, while RPC endpoints,
//! marketplace contract addresses and the marketplace API key are read from a
//! JSON file once at startup.
//!
//! ```json
//! {
//!   "market": { "api_key": "..." },
//!   "networks": {
//!     "test": { "rpc_url": "...", "exchange": "0x...", ... },
//!     "main": { "rpc_url": "...", "exchange": "0x...", ... }
//!   }
//! }
//! ```
//!
//! Either network section may be left out; the zero address is rejected for
//! every contract field.

mod app;
mod error;
mod network;
mod standard;

pub use app::{AppConfig, MarketConfig, Networks};
pub use error::ConfigError;
pub use network::{ExchangeDomain, Network, NetworkConfig, is_address};
pub use standard::ContractStandard;
