//! Typed Rust client for the Deutsche Telekom Developer Portal SMS API
//! with pre-flight cost estimation.
//!
//! The design is layered: a domain layer of strong types holding the
//! costing core (country resolution, segment counting, pricing), a
//! transport layer for wire-format quirks, and a small client layer
//! orchestrating HTTP requests.
//!
//! Estimate what a message will cost before sending it:
//!
//! ```rust
//! use dtsms::{Message, PhoneNumber, Pricing, Sender};
//!
//! # fn main() -> Result<(), dtsms::ValidationError> {
//! let message = Message::new(
//!     Sender::new("MYBRAND")?,
//!     PhoneNumber::new("+491755555555")?,
//!     "hello world",
//! );
//! let pricing = Pricing::bundled();
//! assert!(pricing.message_gross_price(&message).is_some());
//! # Ok(())
//! # }
//! ```
//!
//! Send it and check its status:
//!
//! ```rust,no_run
//! use dtsms::{ApiKey, Message, PhoneNumber, Sender, SmsApiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SmsApiClient::new(ApiKey::new("...")?);
//!     let message = Message::new(
//!         Sender::new("+491755555555")?,
//!         PhoneNumber::new("+491755555556")?,
//!         "hello world",
//!     );
//!     let sent = client.send(&message).await?;
//!     let _current = client.status(&sent.sid).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::dashboard::{DashboardClient, DashboardClientBuilder, DashboardError};
pub use client::{SmsApiClient, SmsApiClientBuilder, SmsApiError};
pub use domain::{
    ApiKey, Currency, CurrencyError, Direction, Iso2, Message, MessageResponse, MessageStatus,
    PhoneNumber, PhoneNumberRegistrationStatus, Price, PriceComponent, PriceRecord, Pricing,
    RegisteredPhoneNumber, Sender, Sid, ValidationError, Wallet,
};
