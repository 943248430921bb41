//! Request payloads, one per gateway operation.
//!
//! Required inputs are plain arguments of the client methods; optional inputs
//! come in `*Options` structs. Card payloads drop absent optional fields,
//! profile and address payloads send them as `null`, like the gateway's own
//! examples do.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Card expiry, nested as `cardExpiry: { month, year }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardExpiry {
    pub month: u8,
    pub year: u16,
}

impl CardExpiry {
    pub fn new(month: u8, year: u16) -> Self {
        CardExpiry { month, year }
    }
}

/// Billing address nested inside a card.
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    #[builder(into)]
    pub country: String,
    #[builder(into)]
    pub zip: String,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A full card, as embedded in a new profile.
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    #[builder(into)]
    pub card_num: String,
    pub card_expiry: CardExpiry,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<BillingAddress>,
}

/// Optional inputs of `create_profile`.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileOptions {
    #[builder(into)]
    pub first_name: Option<String>,
    #[builder(into)]
    pub last_name: Option<String>,
    #[builder(into)]
    pub email: Option<String>,
    pub card: Option<NewCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub merchant_customer_id: String,
    pub locale: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub card: Option<NewCard>,
}

impl CreateProfileRequest {
    pub fn new(merchant_customer_id: String, locale: String, options: ProfileOptions) -> Self {
        CreateProfileRequest {
            merchant_customer_id,
            locale,
            first_name: options.first_name,
            last_name: options.last_name,
            email: options.email,
            card: options.card,
        }
    }
}

/// Optional inputs of `create_address`.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressOptions {
    #[builder(into)]
    pub nick_name: Option<String>,
    #[builder(into)]
    pub street: Option<String>,
    #[builder(into)]
    pub city: Option<String>,
    #[builder(into)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    pub nick_name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub country: String,
    pub state: Option<String>,
    pub zip: String,
}

impl CreateAddressRequest {
    pub fn new(country: String, zip: String, options: AddressOptions) -> Self {
        CreateAddressRequest {
            nick_name: options.nick_name,
            street: options.street,
            city: options.city,
            country,
            state: options.state,
            zip,
        }
    }
}

/// Optional inputs of `create_card` and `update_card`. Unset fields are left
/// out of the payload entirely.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardOptions {
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_ref_num: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_card_indicator: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    pub card_num: String,
    pub card_expiry: CardExpiry,
    #[serde(flatten)]
    pub options: CardOptions,
}

impl CreateCardRequest {
    pub fn new(card_num: String, card_expiry: CardExpiry, options: CardOptions) -> Self {
        CreateCardRequest {
            card_num,
            card_expiry,
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    pub card_expiry: CardExpiry,
    #[serde(flatten)]
    pub options: CardOptions,
}

impl UpdateCardRequest {
    pub fn new(card_expiry: CardExpiry, options: CardOptions) -> Self {
        UpdateCardRequest {
            card_expiry,
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseCard {
    pub payment_token: String,
}

/// A settle-with-auth purchase against a vaulted card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Minor units, e.g. cents.
    pub amount: u64,
    pub merchant_ref_num: String,
    pub settle_with_auth: bool,
    pub card: PurchaseCard,
}

impl PurchaseRequest {
    pub fn new(amount: u64, payment_token: String, merchant_ref_num: String) -> Self {
        PurchaseRequest {
            amount,
            merchant_ref_num,
            settle_with_auth: true,
            card: PurchaseCard { payment_token },
        }
    }
}
