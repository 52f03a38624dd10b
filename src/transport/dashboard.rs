use serde::Deserialize;
use tracing::warn;

use crate::domain::{
    ApiKey, Currency, PhoneNumber, PhoneNumberRegistrationStatus, RegisteredPhoneNumber, Wallet,
};
use crate::transport::TransportError;
use crate::transport::money::TransportDecimal;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Access token issued by the portal's OAuth password grant.
pub struct TokenGrant {
    pub access_token: String,
    /// Token lifetime in seconds, from the moment of issue.
    pub expires_in: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct TokenJsonResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct WalletJsonResponse {
    balance: TransportDecimal,
    currency: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiKeyJsonResponse {
    #[serde(rename = "rawApiKey")]
    raw_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PhoneNumberJsonResponse {
    id: String,
    number: String,
    status: String,
    #[serde(rename = "serviceId")]
    service_id: String,
}

/// Encode the OAuth password grant form for the portal's token endpoint.
pub fn encode_token_form(username: &str, password: &str) -> Vec<(String, String)> {
    vec![
        ("username".to_owned(), username.to_owned()),
        ("password".to_owned(), password.to_owned()),
        ("grant_type".to_owned(), "password".to_owned()),
    ]
}

pub fn decode_token_json(json: &str) -> Result<TokenGrant, TransportError> {
    let parsed: TokenJsonResponse = serde_json::from_str(json)?;
    Ok(TokenGrant {
        access_token: parsed.access_token,
        expires_in: parsed.expires_in,
    })
}

pub fn decode_wallet_json(json: &str) -> Result<Wallet, TransportError> {
    let parsed: WalletJsonResponse = serde_json::from_str(json)?;
    let currency = Currency::parse(&parsed.currency)?;
    Ok(Wallet::new(parsed.balance.value(), currency))
}

pub fn decode_api_key_json(json: &str) -> Result<ApiKey, TransportError> {
    let parsed: ApiKeyJsonResponse = serde_json::from_str(json)?;
    Ok(ApiKey::new(parsed.raw_api_key)?)
}

/// Decode the dashboard's registered phone number list.
///
/// Unknown status labels become `None` with a warning; a number that is no
/// valid E.164 line fails the whole decode.
pub fn decode_phone_numbers_json(json: &str) -> Result<Vec<RegisteredPhoneNumber>, TransportError> {
    let parsed: Vec<PhoneNumberJsonResponse> = serde_json::from_str(json)?;
    parsed
        .into_iter()
        .map(|entry| {
            let status = PhoneNumberRegistrationStatus::from_label(&entry.status);
            if status.is_none() {
                warn!(label = %entry.status, "unknown phone number registration status label");
            }
            Ok(RegisteredPhoneNumber {
                id: entry.id,
                number: PhoneNumber::new(entry.number)?,
                status,
                service_id: entry.service_id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn token_form_is_a_password_grant() {
        let form = encode_token_form("user@example.com", "secret");
        assert_eq!(
            form,
            vec![
                ("username".to_owned(), "user@example.com".to_owned()),
                ("password".to_owned(), "secret".to_owned()),
                ("grant_type".to_owned(), "password".to_owned()),
            ]
        );
    }

    #[test]
    fn decodes_token_response() {
        let grant =
            decode_token_json(r#"{"access_token": "abc.def", "expires_in": 3600}"#).unwrap();
        assert_eq!(grant.access_token, "abc.def");
        assert_eq!(grant.expires_in, 3600);
    }

    #[test]
    fn decodes_wallet_with_string_or_number_balance() {
        let wallet = decode_wallet_json(r#"{"balance": 9.99, "currency": "EUR"}"#).unwrap();
        assert_eq!(wallet.balance(), dec!(9.99));
        assert_eq!(wallet.currency(), Currency::Euro);

        let wallet = decode_wallet_json(r#"{"balance": "10.00", "currency": "€"}"#).unwrap();
        assert_eq!(wallet.balance(), dec!(10.00));
    }

    #[test]
    fn wallet_with_foreign_currency_is_an_error() {
        assert!(matches!(
            decode_wallet_json(r#"{"balance": 1.00, "currency": "$"}"#),
            Err(TransportError::Currency(_))
        ));
    }

    #[test]
    fn decodes_api_key_response() {
        let key = decode_api_key_json(r#"{"rawApiKey": "key-123"}"#).unwrap();
        assert_eq!(key.as_str(), "key-123");
        assert!(decode_api_key_json(r#"{"rawApiKey": "  "}"#).is_err());
    }

    #[test]
    fn decodes_phone_number_list() {
        let json = r#"[
            {"id": "a1", "number": "+491755555555", "status": "VERIFIED", "serviceId": "/service/sms/v1"},
            {"id": "a2", "number": "+491755555556", "status": "PENDING_VERIFICATION", "serviceId": "/service/sms/v1"},
            {"id": "a3", "number": "+491755555557", "status": "SUSPENDED", "serviceId": "/service/sms/v1"}
        ]"#;

        let numbers = decode_phone_numbers_json(json).unwrap();
        assert_eq!(numbers.len(), 3);
        assert_eq!(numbers[0].id, "a1");
        assert_eq!(numbers[0].number.number(), "+491755555555");
        assert_eq!(
            numbers[0].status,
            Some(PhoneNumberRegistrationStatus::Verified)
        );
        assert_eq!(
            numbers[1].status,
            Some(PhoneNumberRegistrationStatus::PendingVerification)
        );
        assert_eq!(numbers[2].status, None);
    }

    #[test]
    fn invalid_registered_number_is_an_error() {
        let json = r#"[
            {"id": "a1", "number": "not-a-number", "status": "VERIFIED", "serviceId": "/service/sms/v1"}
        ]"#;
        assert!(matches!(
            decode_phone_numbers_json(json),
            Err(TransportError::Validation(_))
        ));
    }
}
