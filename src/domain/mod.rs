//! Domain layer: strong types and the costing core, no I/O.

pub mod geo;
mod pricing;
mod response;
pub mod segments;
mod validation;
mod value;

pub use geo::{
    CALLING_CODE_MAX_LENGTH, CALLING_CODE_MIN_LENGTH, has_no_routing, iso2_for_country_name,
    resolve_iso2,
};
pub use pricing::{Price, PriceComponent, PriceRecord, Pricing, UNIT_PRICE_DECIMALS};
pub use response::{MessageResponse, RegisteredPhoneNumber};
pub use segments::{
    GSM_MULTI_SEGMENT_LIMIT, GSM_SINGLE_SEGMENT_LIMIT, UCS2_MULTI_SEGMENT_LIMIT,
    UCS2_SINGLE_SEGMENT_LIMIT, is_gsm_char_set, split_count,
};
pub use validation::ValidationError;
pub use value::{
    ApiKey, Currency, CurrencyError, Direction, Iso2, Message, MessageStatus, PhoneNumber,
    PhoneNumberRegistrationStatus, Sender, Sid, WALLET_BALANCE_DECIMALS, Wallet,
};

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    // Full estimation path: number resolution, segment counting, pricing.
    #[test]
    fn cost_of_a_long_message_to_germany() {
        // 161 GSM characters, one over the single SMS limit.
        let body = format!("Grüße aus Bonn! {}", "a".repeat(145));
        let msg = Message::new(
            Sender::new("MYBRAND").unwrap(),
            PhoneNumber::new("+491755555555").unwrap(),
            body,
        );

        assert_eq!(msg.recipient().iso2(), Iso2::new("DE").unwrap());
        assert_eq!(msg.number_of_segments(), 2);

        let pricing = Pricing::bundled();
        assert_eq!(pricing.message_net_price(&msg), Some(dec!(0.1502)));
        assert_eq!(pricing.message_gross_price(&msg), Some(dec!(0.1788)));
    }

    #[test]
    fn unroutable_destination_resolves_but_is_not_priced() {
        let anguilla = PhoneNumber::new("+12645550123").unwrap();
        assert_eq!(anguilla.iso2(), Iso2::new("AI").unwrap());
        assert!(has_no_routing(anguilla.iso2()));
        assert!(
            Pricing::bundled()
                .price_for(anguilla.iso2())
                .is_none()
        );
    }
}
