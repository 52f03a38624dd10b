//! Price list handling and pre-flight cost estimation.
//!
//! The vendor publishes one price row per destination country; this module
//! keys those rows by [`Iso2`] so a resolved [`Message`] recipient can be
//! priced before the API is ever called. A bundled snapshot of the price
//! list keeps estimation working offline.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::domain::geo;
use crate::domain::value::{Currency, Iso2, Message};

/// Decimal places carried by per-SMS unit prices.
pub const UNIT_PRICE_DECIMALS: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Cost of a single SMS to one destination country.
pub struct Price {
    country: String,
    net_price: Decimal,
    gross_price: Decimal,
    vat: Decimal,
    currency: Currency,
}

impl Price {
    /// Create a price row; all amounts are rounded to four decimal places.
    pub fn new(
        country: impl Into<String>,
        net_price: Decimal,
        gross_price: Decimal,
        vat: Decimal,
        currency: Currency,
    ) -> Self {
        Self {
            country: country.into(),
            net_price: net_price.round_dp(UNIT_PRICE_DECIMALS),
            gross_price: gross_price.round_dp(UNIT_PRICE_DECIMALS),
            vat: vat.round_dp(UNIT_PRICE_DECIMALS),
            currency,
        }
    }

    /// Country display name as used in the vendor price list.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Price of one SMS before tax.
    pub fn net_price(&self) -> Decimal {
        self.net_price
    }

    /// Price of one SMS after tax.
    pub fn gross_price(&self) -> Decimal {
        self.gross_price
    }

    /// Tax rate applied to the net price.
    pub fn vat(&self) -> Decimal {
        self.vat
    }

    /// Currency of the net and gross amounts.
    pub fn currency(&self) -> Currency {
        self.currency
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// One row of the price list as delivered by the portal, before any
/// validation. Every field is optional because rows with missing data are
/// skipped rather than failing the whole list.
pub struct PriceRecord {
    pub country: Option<String>,
    pub net_price: Option<Decimal>,
    pub gross_price: Option<Decimal>,
    pub vat: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which of the two unit prices an estimate should be based on.
pub enum PriceComponent {
    Net,
    Gross,
}

/// Price list keyed by destination country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pricing {
    prices: HashMap<Iso2, Price>,
}

impl Pricing {
    /// Build a pricing table from raw price list rows.
    ///
    /// Rows with an unknown country name, missing amounts, or an unusable
    /// currency are skipped with a warning; the table keeps the rest. A
    /// second warning is emitted for every country the calling code tables
    /// know but the loaded list does not price.
    pub fn new(records: impl IntoIterator<Item = PriceRecord>) -> Self {
        let mut prices = HashMap::new();
        let mut total = 0usize;

        for record in records {
            total += 1;
            let Some(iso2) = record
                .country
                .as_deref()
                .and_then(geo::iso2_for_country_name)
            else {
                warn!(country = ?record.country, "no ISO2 mapping for price list row");
                continue;
            };
            let (Some(net), Some(gross), Some(vat)) =
                (record.net_price, record.gross_price, record.vat)
            else {
                debug!(%iso2, "incomplete price list row");
                continue;
            };
            let currency = match record.currency.as_deref().map(Currency::parse) {
                Some(Ok(currency)) => currency,
                Some(Err(err)) => {
                    warn!(%iso2, %err, "price list row has unusable currency");
                    continue;
                }
                None => {
                    debug!(%iso2, "incomplete price list row");
                    continue;
                }
            };
            let country = record.country.unwrap_or_default();
            prices.insert(iso2, Price::new(country, net, gross, vat, currency));
        }

        if prices.len() != total {
            warn!(
                loaded = prices.len(),
                total, "not all price list rows could be loaded"
            );
        }
        for iso2 in geo::known_country_codes() {
            if !prices.contains_key(&iso2) {
                warn!(%iso2, "mapped country is missing from the loaded price list");
            }
        }

        Self { prices }
    }

    /// The price list snapshot bundled with this crate, for offline
    /// estimation. Taken from the portal on 2022-12-24.
    pub fn bundled() -> Self {
        let prices = DEFAULT_PRICES
            .iter()
            .filter_map(|&(country, net, gross)| {
                let iso2 = geo::iso2_for_country_name(country)?;
                Some((
                    iso2,
                    Price::new(country, net, gross, DEFAULT_VAT, Currency::Euro),
                ))
            })
            .collect();
        Self { prices }
    }

    /// Number of priced destination countries.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether no destination is priced at all.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// The price row for a destination country, if one is listed.
    pub fn price_for(&self, iso2: Iso2) -> Option<&Price> {
        let price = self.prices.get(&iso2);
        if price.is_none() {
            warn!(%iso2, "no price data for destination");
        }
        price
    }

    /// Unit price of one SMS to a destination country.
    pub fn unit_price(&self, iso2: Iso2, component: PriceComponent) -> Option<Decimal> {
        self.price_for(iso2).map(|price| match component {
            PriceComponent::Net => price.net_price(),
            PriceComponent::Gross => price.gross_price(),
        })
    }

    /// Estimated cost of sending one message: the unit price of the
    /// recipient's country times the number of SMS the body splits into.
    ///
    /// `None` means the destination is not priced; an empty body costs zero
    /// because it needs no SMS.
    pub fn message_price(&self, message: &Message, component: PriceComponent) -> Option<Decimal> {
        let unit = self.unit_price(message.recipient().iso2(), component)?;
        Some(unit * Decimal::from(message.number_of_segments()))
    }

    /// Estimated pre-tax cost of sending one message.
    pub fn message_net_price(&self, message: &Message) -> Option<Decimal> {
        self.message_price(message, PriceComponent::Net)
    }

    /// Estimated after-tax cost of sending one message.
    pub fn message_gross_price(&self, message: &Message) -> Option<Decimal> {
        self.message_price(message, PriceComponent::Gross)
    }

    /// Estimated total cost of a batch of messages.
    ///
    /// With `all_or_none` unset, messages without a priced destination are
    /// skipped and the rest are summed; set, a single unpriced message makes
    /// the whole total `None`. An empty batch costs zero either way.
    pub fn messages_price(
        &self,
        messages: &[Message],
        component: PriceComponent,
        all_or_none: bool,
    ) -> Option<Decimal> {
        let mut total = Decimal::ZERO;
        for message in messages {
            match self.message_price(message, component) {
                Some(price) => total += price,
                None if all_or_none => {
                    debug!("batch price aborted, at least one destination is not priced");
                    return None;
                }
                None => {}
            }
        }
        Some(total)
    }

    /// Estimated pre-tax total cost of a batch of messages.
    pub fn messages_net_price(&self, messages: &[Message], all_or_none: bool) -> Option<Decimal> {
        self.messages_price(messages, PriceComponent::Net, all_or_none)
    }

    /// Estimated after-tax total cost of a batch of messages.
    pub fn messages_gross_price(&self, messages: &[Message], all_or_none: bool) -> Option<Decimal> {
        self.messages_price(messages, PriceComponent::Gross, all_or_none)
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self::bundled()
    }
}

const DEFAULT_VAT: Decimal = dec!(0.19);

/// Offline snapshot of https://developer.telekom.com/api/v1/prices
/// (country, net, gross), taken on 2022-12-24. VAT was 0.19 and the
/// currency EUR for every row.
const DEFAULT_PRICES: &[(&str, Decimal, Decimal)] = &[
    ("Belarus", dec!(0.1458), dec!(0.1736)),
    ("Timor-Leste", dec!(0.0523), dec!(0.0623)),
    ("Moldova", dec!(0.0502), dec!(0.0598)),
    ("Philippines", dec!(0.1221), dec!(0.1453)),
    ("Poland", dec!(0.0343), dec!(0.0409)),
    ("Germany", dec!(0.0751), dec!(0.0894)),
    ("Thailand", dec!(0.0238), dec!(0.0284)),
    ("Gibraltar", dec!(0.0262), dec!(0.0312)),
    ("Portugal", dec!(0.0426), dec!(0.0507)),
    ("Singapore", dec!(0.0324), dec!(0.0386)),
    ("Luxembourg", dec!(0.0645), dec!(0.0768)),
    ("Ireland", dec!(0.0585), dec!(0.0697)),
    ("Brunei Darussalam", dec!(0.0471), dec!(0.0561)),
    ("Iceland", dec!(0.0532), dec!(0.0634)),
    ("New Zealand", dec!(0.0821), dec!(0.0977)),
    ("Albania", dec!(0.073), dec!(0.0869)),
    ("Malta", dec!(0.0473), dec!(0.0563)),
    ("Cyprus", dec!(0.0364), dec!(0.0434)),
    ("Papua New Guinea", dec!(0.1098), dec!(0.1307)),
    ("Georgia", dec!(0.1041), dec!(0.1239)),
    ("Armenia", dec!(0.0997), dec!(0.1187)),
    ("Bulgaria", dec!(0.0876), dec!(0.1043)),
    ("Turkey", dec!(0.0238), dec!(0.0284)),
    ("American Samoa", dec!(0.0648), dec!(0.0772)),
    ("New Caledonia", dec!(0.125), dec!(0.1488)),
    ("Slovenia", dec!(0.0752), dec!(0.0895)),
    ("Macedonia", dec!(0.0566), dec!(0.0674)),
    ("Liechtenstein", dec!(0.0299), dec!(0.0356)),
    ("Montenegro", dec!(0.0671), dec!(0.0799)),
    ("Canada", dec!(0.0058), dec!(0.007)),
    ("United States", dec!(0.0094), dec!(0.0112)),
    ("Puerto Rico", dec!(0.0575), dec!(0.0685)),
    ("Mexico", dec!(0.041), dec!(0.0488)),
    ("Jamaica", dec!(0.0972), dec!(0.1157)),
    ("French Guiana", dec!(0.132), dec!(0.1571)),
    ("Egypt", dec!(0.1399), dec!(0.1665)),
    ("Algeria", dec!(0.1325), dec!(0.1577)),
    ("Morocco", dec!(0.0748), dec!(0.0891)),
    ("Tunisia", dec!(0.1412), dec!(0.1681)),
    ("Libya", dec!(0.1307), dec!(0.1556)),
    ("Gambia", dec!(0.0889), dec!(0.1058)),
    ("Senegal", dec!(0.1437), dec!(0.1711)),
    ("Mauritania", dec!(0.092), dec!(0.1095)),
    ("Mali", dec!(0.09), dec!(0.1071)),
    ("Guinea", dec!(0.1234), dec!(0.1469)),
    ("Saint Kitts and Nevis", dec!(0.1171), dec!(0.1394)),
    ("Ivory Coast", dec!(0.8256), dec!(0.9825)),
    ("Burkina Faso", dec!(0.0941), dec!(0.112)),
    ("Niger", dec!(0.1004), dec!(0.1195)),
    ("Togo", dec!(0.0654), dec!(0.0779)),
    ("Benin", dec!(0.08), dec!(0.0952)),
    ("Mauritius", dec!(0.0864), dec!(0.1029)),
    ("Liberia", dec!(0.0648), dec!(0.0772)),
    ("Sierra Leone", dec!(0.092), dec!(0.1095)),
    ("Ghana", dec!(0.1221), dec!(0.1453)),
    ("Nigeria", dec!(0.1438), dec!(0.1712)),
    ("Chad", dec!(0.091), dec!(0.1083)),
    ("Dominica", dec!(0.0972), dec!(0.1157)),
    ("Central African Republic", dec!(0.021), dec!(0.025)),
    ("Cameroon", dec!(0.0972), dec!(0.1157)),
    ("Cuba", dec!(0.0661), dec!(0.0787)),
    ("Cape Verde", dec!(0.0843), dec!(0.1004)),
    ("Sao Tome and Principe", dec!(0.0739), dec!(0.088)),
    ("Dominican Republic", dec!(0.0695), dec!(0.0828)),
    ("Equatorial Guinea", dec!(0.0727), dec!(0.0866)),
    ("Haiti", dec!(0.0972), dec!(0.1157)),
    ("Gabon", dec!(0.7002), dec!(0.8333)),
    ("Republic of Congo", dec!(0.0904), dec!(0.1076)),
    ("Democratic Republic of Congo", dec!(0.092), dec!(0.1095)),
    ("Angola", dec!(0.0503), dec!(0.0599)),
    ("Guinea-Bissau", dec!(0.0972), dec!(0.1157)),
    ("Seychelles", dec!(0.0575), dec!(0.0685)),
    ("Rwanda", dec!(0.0904), dec!(0.1076)),
    ("Ethiopia", dec!(0.1246), dec!(0.1483)),
    ("Somalia", dec!(0.1221), dec!(0.1453)),
    ("Djibouti", dec!(0.0846), dec!(0.1007)),
    ("Kenya", dec!(0.1359), dec!(0.1618)),
    ("Tanzania", dec!(0.0904), dec!(0.1076)),
    ("Uganda", dec!(0.1145), dec!(0.1363)),
    ("Burundi", dec!(0.1401), dec!(0.1668)),
    ("Mozambique", dec!(0.045), dec!(0.0536)),
    ("Zambia", dec!(0.1221), dec!(0.1453)),
    ("Madagascar", dec!(0.1798), dec!(0.214)),
    ("Zimbabwe", dec!(0.1202), dec!(0.1431)),
    ("Namibia", dec!(0.0575), dec!(0.0685)),
    ("Malawi", dec!(0.0904), dec!(0.1076)),
    ("Botswana", dec!(0.0797), dec!(0.0949)),
    ("South Africa", dec!(0.0231), dec!(0.0275)),
    ("Azerbaijan", dec!(0.1944), dec!(0.2314)),
    ("Eritrea", dec!(0.09), dec!(0.1071)),
    ("Kazakhstan", dec!(0.132), dec!(0.1571)),
    ("South Sudan", dec!(0.068), dec!(0.081)),
    ("India", dec!(0.0468), dec!(0.0557)),
    ("Pakistan", dec!(0.1396), dec!(0.1662)),
    ("Afghanistan", dec!(0.1495), dec!(0.178)),
    ("Sri Lanka", dec!(0.1386), dec!(0.165)),
    ("Myanmar", dec!(0.1516), dec!(0.1805)),
    ("Lebanon", dec!(0.0889), dec!(0.1058)),
    ("Jordan", dec!(0.1196), dec!(0.1424)),
    ("Syrian Arab Republic", dec!(0.1463), dec!(0.1741)),
    ("Iraq", dec!(0.1118), dec!(0.1331)),
    ("Kuwait", dec!(0.1161), dec!(0.1382)),
    ("Saudi Arabia", dec!(0.0648), dec!(0.0772)),
    ("Yemen", dec!(0.1546), dec!(0.184)),
    ("Oman", dec!(0.0742), dec!(0.0883)),
    ("United Arab Emirates", dec!(0.0654), dec!(0.0779)),
    ("State of Palestine", dec!(0.2299), dec!(0.2736)),
    ("Bahrain", dec!(0.0236), dec!(0.0281)),
    ("Qatar", dec!(0.0504), dec!(0.06)),
    ("Mongolia", dec!(0.1045), dec!(0.1244)),
    ("Nepal", dec!(0.1309), dec!(0.1558)),
    ("Iran", dec!(0.1658), dec!(0.1974)),
    ("Uzbekistan", dec!(0.1798), dec!(0.214)),
    ("Tajikistan", dec!(0.166), dec!(0.1976)),
    ("Kyrgyzstan", dec!(0.138), dec!(0.1643)),
    ("Turkmenistan", dec!(0.1066), dec!(0.1269)),
    ("Japan", dec!(0.07), dec!(0.0833)),
    ("Belize", dec!(0.1221), dec!(0.1453)),
    ("Guatemala", dec!(0.1045), dec!(0.1244)),
    ("El Salvador", dec!(0.0978), dec!(0.1164)),
    ("Republic of Korea", dec!(0.0349), dec!(0.0416)),
    ("Vietnam", dec!(0.0882), dec!(0.105)),
    ("Honduras", dec!(0.0618), dec!(0.0736)),
    ("Hong Kong", dec!(0.0448), dec!(0.0534)),
    ("Nicaragua", dec!(0.068), dec!(0.081)),
    ("Macao", dec!(0.0261), dec!(0.0311)),
    ("Cambodia", dec!(0.1045), dec!(0.1244)),
    ("Costa Rica", dec!(0.035), dec!(0.0417)),
    ("Panama", dec!(0.0972), dec!(0.1157)),
    ("Greece", dec!(0.0493), dec!(0.0587)),
    ("China", dec!(0.0294), dec!(0.035)),
    ("Peru", dec!(0.0753), dec!(0.0897)),
    ("Netherlands", dec!(0.0795), dec!(0.0947)),
    ("Belgium", dec!(0.0822), dec!(0.0979)),
    ("France", dec!(0.0628), dec!(0.0748)),
    ("Argentina", dec!(0.0816), dec!(0.0972)),
    ("Taiwan", dec!(0.058), dec!(0.0691)),
    ("Brazil", dec!(0.0544), dec!(0.0648)),
    ("Bangladesh", dec!(0.1787), dec!(0.2127)),
    ("Spain", dec!(0.0689), dec!(0.082)),
    ("Hungary", dec!(0.0687), dec!(0.0818)),
    ("Bosnia and Herzegovina", dec!(0.0669), dec!(0.0797)),
    ("Chile", dec!(0.0784), dec!(0.0933)),
    ("Croatia", dec!(0.0598), dec!(0.0712)),
    ("Serbia", dec!(0.0858), dec!(0.1022)),
    ("Colombia", dec!(0.0394), dec!(0.0469)),
    ("Italy", dec!(0.0648), dec!(0.0772)),
    ("Venezuela", dec!(0.056), dec!(0.0667)),
    ("Bolivia", dec!(0.0836), dec!(0.0995)),
    ("Guyana", dec!(0.0972), dec!(0.1157)),
    ("Romania", dec!(0.0604), dec!(0.0719)),
    ("Ecuador", dec!(0.1006), dec!(0.1198)),
    ("Switzerland", dec!(0.058), dec!(0.0691)),
    ("Czech Republic", dec!(0.052), dec!(0.0619)),
    ("Slovakia", dec!(0.0598), dec!(0.0712)),
    ("Austria", dec!(0.0766), dec!(0.0912)),
    ("Paraguay", dec!(0.0166), dec!(0.0198)),
    ("United Kingdom", dec!(0.0329), dec!(0.0392)),
    ("Suriname", dec!(0.0972), dec!(0.1157)),
    ("Uruguay", dec!(0.0628), dec!(0.0748)),
    ("Denmark", dec!(0.0472), dec!(0.0562)),
    ("Sweden", dec!(0.0523), dec!(0.0623)),
    ("Norway", dec!(0.058), dec!(0.0691)),
    ("Finland", dec!(0.07), dec!(0.0833)),
    ("Malaysia", dec!(0.0748), dec!(0.0891)),
    ("Lithuania", dec!(0.0339), dec!(0.0404)),
    ("Latvia", dec!(0.059), dec!(0.0703)),
    ("Estonia", dec!(0.0747), dec!(0.0889)),
    ("Australia", dec!(0.0379), dec!(0.0452)),
    ("Russian Federation", dec!(0.3762), dec!(0.4477)),
    ("Indonesia", dec!(0.1929), dec!(0.2296)),
    ("Ukraine", dec!(0.1169), dec!(0.1392)),
];
