use rust_decimal::Decimal;

use crate::domain::geo;
use crate::domain::segments;
use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Developer Portal API key, sent as the `X-API-Key` header.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    /// Header name used by the SMS API (`X-API-Key`).
    pub const FIELD: &'static str = "X-API-Key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Message identifier (`sid`) returned by the SMS API.
///
/// Invariant: non-empty after trimming.
pub struct Sid(String);

impl Sid {
    /// JSON field name used by the SMS API (`sid`).
    pub const FIELD: &'static str = "sid";

    /// Create a validated [`Sid`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sid.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// ISO 3166-1 alpha-2 country code, upper-cased on construction.
///
/// Invariant: exactly two ASCII letters. The pricing table and the calling
/// code tables are both keyed by this type.
pub struct Iso2([u8; 2]);

impl Iso2 {
    /// ISO2 reserved code for "unknown" destinations.
    pub const UNKNOWN: Iso2 = Iso2([b'Z', b'Z']);

    /// Create a validated, upper-cased [`Iso2`].
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let mut bytes = value.bytes();
        match (bytes.next(), bytes.next(), bytes.next()) {
            (Some(a), Some(b), None) if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Ok(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => Err(ValidationError::InvalidIso2 {
                input: value.to_owned(),
            }),
        }
    }

    /// Borrow the code as a two character string.
    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or("ZZ")
    }

    /// Whether this is the reserved "unknown" code.
    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

impl std::fmt::Display for Iso2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number in E.164 format with the billing country it belongs to.
///
/// The country calling code alone is too coarse for pricing: `+1` covers the
/// USA, Canada and a number of Caribbean islands at different price points,
/// so resolution also inspects the area code after the country code.
/// Equality is structural over number and ISO2 code.
pub struct PhoneNumber {
    number: String,
    iso2: Iso2,
}

impl PhoneNumber {
    /// Form field name used by the SMS API (`To`).
    pub const FIELD: &'static str = "To";

    /// Parse an E.164 number and resolve its billing country from the
    /// calling code tables.
    ///
    /// The input must start with `+` followed by at least six digits.
    pub fn new(number: impl Into<String>) -> Result<Self, ValidationError> {
        let number = Self::validated(number)?;
        let iso2 = geo::resolve_iso2(&number);
        Ok(Self { number, iso2 })
    }

    /// Parse an E.164 number with a caller-supplied billing country,
    /// bypassing resolution.
    pub fn with_iso2(number: impl Into<String>, iso2: &str) -> Result<Self, ValidationError> {
        let number = Self::validated(number)?;
        let iso2 = Iso2::new(iso2)?;
        Ok(Self { number, iso2 })
    }

    fn validated(number: impl Into<String>) -> Result<String, ValidationError> {
        let number = number.into();
        let trimmed = number.trim();
        if !Self::has_e164_shape(trimmed) {
            return Err(ValidationError::InvalidPhoneNumber {
                input: number.clone(),
            });
        }
        Ok(trimmed.to_owned())
    }

    /// Whether a string has the E.164 shape accepted by this crate:
    /// a leading `+` followed by six or more digits.
    pub fn has_e164_shape(value: &str) -> bool {
        match value.strip_prefix('+') {
            Some(digits) => digits.len() >= 6 && digits.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        }
    }

    /// The E.164 number including the leading `+`.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// The billing country of this number.
    pub fn iso2(&self) -> Iso2 {
        self.iso2
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Originating line of a message (`From`).
///
/// A value with E.164 shape is parsed into a [`PhoneNumber`]; anything else
/// is kept as an alphanumeric sender ID (short code or branding) and only
/// checked for being non-empty, never parsed.
pub enum Sender {
    Line(PhoneNumber),
    Alphanumeric(String),
}

impl Sender {
    /// Form field name used by the SMS API (`From`).
    pub const FIELD: &'static str = "From";

    /// Create a sender from raw input.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if PhoneNumber::has_e164_shape(trimmed) {
            return Ok(Self::Line(PhoneNumber::new(trimmed)?));
        }
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self::Alphanumeric(trimmed.to_owned()))
    }

    /// The wire representation sent in the `From` field.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Line(number) => number.number(),
            Self::Alphanumeric(id) => id,
        }
    }
}

impl From<PhoneNumber> for Sender {
    fn from(value: PhoneNumber) -> Self {
        Self::Line(value)
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// An SMS message to be sent over the API.
///
/// The recipient must be a resolvable [`PhoneNumber`]; the body may be any
/// text including the empty string (which needs zero segments).
pub struct Message {
    sender: Sender,
    recipient: PhoneNumber,
    body: String,
}

impl Message {
    /// Form field name used by the SMS API for the text (`Body`).
    pub const BODY_FIELD: &'static str = "Body";

    /// Create a message.
    pub fn new(sender: Sender, recipient: PhoneNumber, body: impl Into<String>) -> Self {
        Self {
            sender,
            recipient,
            body: body.into(),
        }
    }

    /// The originating line or sender ID.
    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    /// The destination line.
    pub fn recipient(&self) -> &PhoneNumber {
        &self.recipient
    }

    /// The message text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// How many physical SMS the body will be split into.
    pub fn number_of_segments(&self) -> u32 {
        segments::split_count(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Failure modes of [`Currency::parse`].
///
/// A recognized real-world currency symbol that the API does not sell in is
/// a different failure from input that is no currency at all; callers may
/// want to surface the former as "not yet available".
pub enum CurrencyError {
    /// A known currency symbol the API does not support yet.
    UnsupportedSymbol { symbol: String },
    /// Input that could not be identified as any currency.
    Unrecognized { input: String },
}

impl std::fmt::Display for CurrencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedSymbol { symbol } => {
                write!(f, "currency symbol is not supported by the API yet: {symbol}")
            }
            Self::Unrecognized { input } => {
                write!(f, "value could not be identified as a currency: {input}")
            }
        }
    }
}

impl std::error::Error for CurrencyError {}

// Unicode category Sc, https://www.compart.com/en/unicode/category/Sc,
// minus the euro spellings accepted above.
const KNOWN_CURRENCY_SYMBOLS: &[&str] = &[
    "$", "﹩", "＄", "¢", "￠", "£", "￡", "¤", "¥", "￥", "֏", "؋", "߾", "߿", "৲", "৳", "৻",
    "૱", "௹", "฿", "៛", "₡", "₢", "₣", "₤", "₥", "₦", "₧", "₨", "₩", "￦", "₪", "₫", "₭",
    "₮", "₯", "₰", "₱", "₲", "₳", "₴", "₵", "₶", "₷", "₸", "₹", "₺", "₻", "₼", "₽", "₾",
    "₿", "꠸", "﷼", "𑿝", "𑿞", "𑿟", "𑿠", "𞋿", "𞲰",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Currency of a price or wallet balance.
///
/// The API currently sells in euro only.
pub enum Currency {
    #[default]
    Euro,
}

impl Currency {
    /// ISO 4217 code of this currency.
    pub fn code(self) -> &'static str {
        match self {
            Self::Euro => "EUR",
        }
    }

    /// Parse a currency from a code, name, or Unicode symbol.
    ///
    /// Distinguishes a recognized-but-unsupported symbol from input that is
    /// no currency at all; see [`CurrencyError`].
    pub fn parse(label: &str) -> Result<Self, CurrencyError> {
        if matches!(label.to_uppercase().as_str(), "EUR" | "EURO" | "€" | "₠") {
            return Ok(Self::Euro);
        }
        if KNOWN_CURRENCY_SYMBOLS.contains(&label) {
            return Err(CurrencyError::UnsupportedSymbol {
                symbol: label.to_owned(),
            });
        }
        Err(CurrencyError::Unrecognized {
            input: label.to_owned(),
        })
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Delivery status of a message as reported by the SMS API.
pub enum MessageStatus {
    Accepted,
    Queued,
    Undelivered,
    Received,
    Sending,
    Sent,
    Delivered,
    Failed,
}

impl MessageStatus {
    /// Map an API status label to a known variant, if one exists.
    pub fn from_label(label: &str) -> Option<Self> {
        Some(match label.to_uppercase().as_str() {
            "ACCEPTED" => Self::Accepted,
            "QUEUED" => Self::Queued,
            "UNDELIVERED" => Self::Undelivered,
            "RECEIVED" => Self::Received,
            "SENDING" => Self::Sending,
            "SENT" => Self::Sent,
            "DELIVERED" => Self::Delivered,
            "FAILED" => Self::Failed,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Direction of a message. The API only supports sending via the REST API.
pub enum Direction {
    OutboundApi,
}

impl Direction {
    /// Map an API direction label to a known variant, if one exists.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_uppercase().as_str() {
            "OUTBOUND-API" => Some(Self::OutboundApi),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Status of a phone number registered on the portal dashboard.
///
/// The labels are not documented by the portal; both values were observed
/// on live responses.
pub enum PhoneNumberRegistrationStatus {
    Verified,
    PendingVerification,
}

impl PhoneNumberRegistrationStatus {
    /// Map a dashboard status label to a known variant, if one exists.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_uppercase().as_str() {
            "VERIFIED" => Some(Self::Verified),
            "PENDING_VERIFICATION" => Some(Self::PendingVerification),
            _ => None,
        }
    }
}

/// Decimal places carried by wallet balances.
pub const WALLET_BALANCE_DECIMALS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Prepaid wallet charged for API usage.
pub struct Wallet {
    balance: Decimal,
    currency: Currency,
}

impl Wallet {
    /// Create a wallet; the balance is rounded to two decimal places.
    pub fn new(balance: Decimal, currency: Currency) -> Self {
        Self {
            balance: balance.round_dp(WALLET_BALANCE_DECIMALS),
            currency,
        }
    }

    /// Amount of money stored in the wallet.
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Currency of the balance.
    pub fn currency(&self) -> Currency {
        self.currency
    }
}
