use serde::Deserialize;
use serde_json::value::RawValue;
use tracing::debug;

use crate::domain::PriceRecord;
use crate::transport::TransportError;
use crate::transport::money::TransportDecimal;

#[derive(Debug, Clone, Deserialize)]
struct PriceListRow {
    #[serde(default)]
    country: Option<String>,
    #[serde(rename = "netPrice", default)]
    net_price: Option<TransportDecimal>,
    #[serde(rename = "grossPrice", default)]
    gross_price: Option<TransportDecimal>,
    #[serde(default)]
    vat: Option<TransportDecimal>,
    #[serde(default)]
    currency: Option<String>,
}

impl From<PriceListRow> for PriceRecord {
    fn from(row: PriceListRow) -> Self {
        Self {
            country: row.country,
            net_price: row.net_price.map(TransportDecimal::value),
            gross_price: row.gross_price.map(TransportDecimal::value),
            vat: row.vat.map(TransportDecimal::value),
            currency: row.currency,
        }
    }
}

/// Decode the portal's price list JSON into raw records.
///
/// The top level must be a JSON array. Individual rows are decoded
/// tolerantly: a row that is no object or carries malformed fields becomes
/// an empty record, which the pricing table build will skip.
pub fn decode_price_list_json(json: &str) -> Result<Vec<PriceRecord>, TransportError> {
    let rows: Vec<Box<RawValue>> = match serde_json::from_str(json) {
        Ok(rows) => rows,
        Err(err) => {
            if serde_json::from_str::<serde_json::Value>(json).is_ok() {
                return Err(TransportError::PriceListNotArray);
            }
            return Err(TransportError::Json(err));
        }
    };

    Ok(rows
        .into_iter()
        .map(|row| match serde_json::from_str::<PriceListRow>(row.get()) {
            Ok(row) => row.into(),
            Err(err) => {
                debug!(%err, "skipping malformed price list row");
                PriceRecord::default()
            }
        })
        .collect())
}
