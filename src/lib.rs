//! Blocking client for the Netbanx (Optimal Payments) REST API.
//!
//! Covers the customer vault (profiles, addresses, cards) and card payments
//! (settle-with-auth purchases). Every operation is a single HTTP round-trip:
//! the payload is built from typed inputs, the response keys are normalized to
//! lowerCamelCase, and any status outside `200..=205` becomes an
//! [`Error::Api`] whose [`ApiErrorKind`] is derived from the status code.
//!
//! ```rust,no_run
//! use netbanx_rest::{CardOptions, Config, PaymentClient};
//!
//! # fn main() -> Result<(), netbanx_rest::Error> {
//! let client = PaymentClient::new(
//!     Config::builder()
//!         .account_number("1001234567")
//!         .api_key("devcentre322")
//!         .api_secret("secret")
//!         .build(),
//! )?;
//!
//! let card = client.create_card(
//!     "profile-id",
//!     "4111111111111111",
//!     12,
//!     2030,
//!     CardOptions::builder().holder_name("John Smith").build(),
//! )?;
//!
//! let token = card["paymentToken"].as_str().unwrap_or_default();
//! let auth = client.purchase(400, token, "order-1")?;
//! println!("{}", auth["status"]);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod normalize;
pub mod requests;
pub mod transport;
pub mod types;

pub use client::PaymentClient;
pub use config::{Config, Credentials, Environment, Timeouts};
pub use errors::{ApiError, ApiErrorKind, Error, Result};
pub use requests::{AddressOptions, BillingAddress, CardOptions, NewCard, ProfileOptions};
pub use types::Document;
