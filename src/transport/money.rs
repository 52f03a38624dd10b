use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::Error as DeError;

/// Money-like value arriving as either JSON string or JSON number.
///
/// The raw JSON token is parsed into a [`Decimal`] directly, so `0.0751`
/// survives exactly instead of taking a detour through binary floating
/// point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TransportDecimal(Decimal);

impl TransportDecimal {
    pub(crate) fn value(self) -> Decimal {
        self.0
    }
}

impl<'de> Deserialize<'de> for TransportDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: Box<serde_json::value::RawValue> = Deserialize::deserialize(deserializer)?;
        let token = raw.get();

        let digits = match token.as_bytes().first().copied() {
            Some(b'"') => serde_json::from_str::<String>(token).map_err(D::Error::custom)?,
            Some(b'-' | b'0'..=b'9') => token.to_owned(),
            _ => {
                return Err(D::Error::custom(
                    "expected money field to be JSON string or number",
                ));
            }
        };

        let parsed = Decimal::from_str(&digits).map_err(D::Error::custom)?;
        Ok(Self(parsed))
    }
}
