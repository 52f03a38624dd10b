//! Transport layer: HTTP wire-format details (form encoding, JSON decoding).

mod dashboard;
mod message;
mod money;
mod price_list;

pub use dashboard::{
    decode_api_key_json, decode_phone_numbers_json, decode_token_json, decode_wallet_json,
    encode_token_form,
};
pub use message::{decode_message_json_response, encode_message_form};
pub use price_list::decode_price_list_json;

use crate::domain::{CurrencyError, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid timestamp in field {field}: {source}")]
    Timestamp {
        field: &'static str,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid value in response: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid currency in response: {0}")]
    Currency(#[from] CurrencyError),

    #[error("price list response is not a JSON array")]
    PriceListNotArray,
}
