//! Typed views over normalized response documents.
//!
//! The client returns plain [`Document`]s. These structs are for callers who
//! want named fields; every field is optional and anything unrecognized ends
//! up in `extra`, so no schema is enforced beyond what is read.

use serde::Deserialize;

use crate::{
    requests::CardExpiry,
    types::{Document, Record},
};

macro_rules! from_document {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TryFrom<Document> for $ty {
                type Error = serde_json::Error;

                fn try_from(document: Document) -> Result<Self, Self::Error> {
                    serde_json::from_value(document)
                }
            }
        )*
    };
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Option<String>,
    pub status: Option<String>,
    pub merchant_customer_id: Option<String>,
    pub locale: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub payment_token: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(flatten)]
    pub extra: Record<Document>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Option<String>,
    pub status: Option<String>,
    pub nick_name: Option<String>,
    pub street: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip: Option<String>,
    pub default_shipping_address_indicator: Option<bool>,
    #[serde(flatten)]
    pub extra: Record<Document>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Option<String>,
    pub status: Option<String>,
    pub nick_name: Option<String>,
    pub holder_name: Option<String>,
    pub merchant_ref_num: Option<String>,
    pub card_bin: Option<String>,
    pub last_digits: Option<String>,
    pub card_expiry: Option<CardExpiry>,
    pub card_type: Option<String>,
    pub billing_address_id: Option<String>,
    pub default_card_indicator: Option<bool>,
    pub payment_token: Option<String>,
    #[serde(flatten)]
    pub extra: Record<Document>,
}

/// The result of a purchase (a settled authorization).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub id: Option<String>,
    pub status: Option<String>,
    pub merchant_ref_num: Option<String>,
    pub amount: Option<u64>,
    pub settle_with_auth: Option<bool>,
    pub txn_time: Option<String>,
    pub currency_code: Option<String>,
    pub auth_code: Option<String>,
    pub avs_response: Option<String>,
    pub cvv_verification: Option<String>,
    pub card: Option<Document>,
    pub profile: Option<Document>,
    pub billing_details: Option<Document>,
    #[serde(flatten)]
    pub extra: Record<Document>,
}

from_document!(Profile, Address, Card, Authorization);
