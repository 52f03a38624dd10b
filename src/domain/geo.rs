//! Country lookup tables interlinking the key domains of the API: calling
//! code prefixes of phone numbers, country display names of the vendor
//! price list, and the set of destinations without a sold route. ISO2 codes
//! tie the three together.
//!
//! All tables are built once at first use and never mutated; lookups are
//! safe from any number of threads.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::domain::value::Iso2;

/// Shortest calling code prefix carried in the table.
pub const CALLING_CODE_MIN_LENGTH: usize = 1;
/// Longest calling code prefix carried in the table. Would need to grow to 7
/// if commercial international network codes were ever routed.
pub const CALLING_CODE_MAX_LENGTH: usize = 4;

/// Calling code prefix (without `+`) to ISO2 country.
///
/// Shared calling codes are entered once with a generic default and
/// overridden by longer, more specific prefixes: `1` maps to US so the bulk
/// of NANP area codes need no entry, while Canadian and Caribbean area
/// codes are listed explicitly. Same scheme for `7` (RU generic, KZ
/// overrides).
///
/// Sources: https://www.itu.int/oth/T0202.aspx?parent=T0202,
/// https://nationalnanpa.com/area_code_maps/ac_map_static.html,
/// https://cnac.ca/area_code_maps/canadian_area_codes.htm
static CALLING_CODE_TO_ISO2: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("1", "US"),
        // Canadian area codes.
        ("1204", "CA"), ("1226", "CA"), ("1236", "CA"), ("1249", "CA"), ("1250", "CA"),
        ("1263", "CA"), ("1289", "CA"), ("1306", "CA"), ("1343", "CA"), ("1354", "CA"),
        ("1365", "CA"), ("1367", "CA"), ("1368", "CA"), ("1382", "CA"), ("1403", "CA"),
        ("1416", "CA"), ("1418", "CA"), ("1428", "CA"), ("1431", "CA"), ("1437", "CA"),
        ("1438", "CA"), ("1450", "CA"), ("1456", "CA"), ("1468", "CA"), ("1474", "CA"),
        ("1506", "CA"), ("1514", "CA"), ("1519", "CA"), ("1548", "CA"), ("1579", "CA"),
        ("1581", "CA"), ("1584", "CA"), ("1587", "CA"), ("1600", "CA"), ("1604", "CA"),
        ("1613", "CA"), ("1622", "CA"), ("1639", "CA"), ("1647", "CA"), ("1672", "CA"),
        ("1683", "CA"), ("1705", "CA"), ("1709", "CA"), ("1710", "CA"), ("1742", "CA"),
        ("1753", "CA"), ("1778", "CA"), ("1780", "CA"), ("1782", "CA"), ("1807", "CA"),
        ("1819", "CA"), ("1825", "CA"), ("1867", "CA"), ("1873", "CA"), ("1879", "CA"),
        ("1902", "CA"), ("1905", "CA"),
        // NANP countries and territories outside the US and Canada.
        ("1242", "BS"), ("1246", "BB"), ("1264", "AI"), ("1268", "AG"), ("1284", "VG"),
        ("1340", "VI"), ("1345", "KY"), ("1441", "BM"), ("1473", "GD"), ("1649", "TC"),
        ("1664", "MS"), ("1670", "MP"), ("1671", "GU"), ("1684", "AS"), ("1721", "SX"),
        ("1758", "LC"), ("1787", "PR"), ("1767", "DM"), ("1784", "VC"), ("1809", "DO"),
        ("1829", "DO"), ("1849", "DO"), ("1868", "TT"), ("1869", "KN"), ("1876", "JM"),
        ("1658", "JM"), ("1939", "PR"),
        // ITU assigned country calling codes.
        ("93", "AF"), ("355", "AL"), ("213", "DZ"), ("376", "AD"), ("244", "AO"),
        ("54", "AR"), ("374", "AM"), ("297", "AW"), ("61", "AU"), ("43", "AT"),
        ("994", "AZ"), ("973", "BH"), ("880", "BD"), ("375", "BY"), ("32", "BE"),
        ("501", "BZ"), ("229", "BJ"), ("975", "BT"), ("591", "BO"), ("387", "BA"),
        ("267", "BW"), ("55", "BR"), ("673", "BN"), ("359", "BG"), ("226", "BF"),
        ("257", "BI"), ("238", "CV"), ("855", "KH"), ("237", "CM"), ("236", "CF"),
        ("235", "TD"), ("56", "CL"), ("86", "CN"), ("57", "CO"), ("269", "KM"),
        ("242", "CG"), ("682", "CK"), ("506", "CR"), ("225", "CI"), ("385", "HR"),
        ("53", "CU"), ("357", "CY"), ("420", "CZ"), ("850", "KP"), ("243", "CD"),
        ("45", "DK"), ("253", "DJ"), ("593", "EC"), ("20", "EG"), ("503", "SV"),
        ("240", "GQ"), ("291", "ER"), ("372", "EE"), ("268", "SZ"), ("251", "ET"),
        ("500", "FK"), ("298", "FO"), ("679", "FJ"), ("358", "FI"), ("33", "FR"),
        ("262", "TF"), ("594", "GF"), ("689", "PF"), ("241", "GA"), ("220", "GM"),
        ("995", "GE"), ("49", "DE"), ("233", "GH"), ("350", "GI"), ("30", "GR"),
        ("299", "GL"), ("590", "GP"), ("502", "GT"), ("224", "GN"), ("245", "GW"),
        ("592", "GY"), ("509", "HT"), ("504", "HN"), ("852", "HK"), ("36", "HU"),
        ("354", "IS"), ("91", "IN"), ("62", "ID"), ("98", "IR"), ("964", "IQ"),
        ("353", "IE"), ("972", "IL"), ("39", "IT"), ("81", "JP"), ("962", "JO"),
        ("254", "KE"), ("686", "KI"), ("82", "KR"), ("383", "XK"), ("965", "KW"),
        ("996", "KG"), ("856", "LA"), ("371", "LV"), ("961", "LB"), ("266", "LS"),
        ("231", "LR"), ("218", "LY"), ("423", "LI"), ("370", "LT"), ("352", "LU"),
        ("853", "MO"), ("261", "MG"), ("265", "MW"), ("60", "MY"), ("960", "MV"),
        ("223", "ML"), ("356", "MT"), ("692", "MH"), ("596", "MQ"), ("222", "MR"),
        ("230", "MU"), ("52", "MX"), ("691", "FM"), ("373", "MD"), ("377", "MC"),
        ("976", "MN"), ("382", "ME"), ("212", "MA"), ("258", "MZ"), ("95", "MM"),
        ("264", "NA"), ("674", "NR"), ("977", "NP"), ("31", "NL"), ("687", "NC"),
        ("64", "NZ"), ("505", "NI"), ("227", "NE"), ("234", "NG"), ("683", "NU"),
        ("672", "NF"), ("389", "MK"), ("47", "NO"), ("968", "OM"), ("92", "PK"),
        ("680", "PW"), ("507", "PA"), ("675", "PG"), ("595", "PY"), ("51", "PE"),
        ("63", "PH"), ("48", "PL"), ("351", "PT"), ("974", "QA"), ("40", "RO"),
        ("250", "RW"), ("290", "SH"), ("247", "SH"), ("508", "PM"), ("685", "WS"),
        ("378", "SM"), ("239", "ST"), ("966", "SA"), ("221", "SN"), ("381", "RS"),
        ("248", "SC"), ("232", "SL"), ("65", "SG"), ("421", "SK"), ("386", "SI"),
        ("677", "SB"), ("252", "SO"), ("27", "ZA"), ("211", "SS"), ("34", "ES"),
        ("94", "LK"), ("249", "SD"), ("597", "SR"), ("46", "SE"), ("41", "CH"),
        ("963", "SY"), ("886", "TW"), ("992", "TJ"), ("255", "TZ"), ("66", "TH"),
        ("670", "TL"), ("228", "TG"), ("690", "TK"), ("676", "TO"), ("216", "TN"),
        ("90", "TR"), ("993", "TM"), ("688", "TV"), ("256", "UG"), ("380", "UA"),
        ("971", "AE"), ("44", "GB"), ("598", "UY"), ("998", "UZ"), ("678", "VU"),
        ("58", "VE"), ("84", "VN"), ("681", "WF"), ("967", "YE"), ("260", "ZM"),
        ("263", "ZW"),
        // Special cases.
        ("970", "PS"),
        // 7 is RU generically so only the KZ ranges need listing.
        ("7", "RU"), ("76", "KZ"), ("77", "KZ"),
        // ITU reserved DG for Diego Garcia although it belongs to the
        // British Indian Ocean Territory (IO).
        ("246", "DG"),
        // Former Netherlands Antilles split of 599.
        ("5997", "CW"), ("5994", "CW"), ("5993", "CW"),
        ("5999", "BQ"), ("5996", "BQ"),
    ])
});

/// Country display name as used in the vendor price list to ISO2 country.
///
/// Must stay injective: the price table is keyed by the ISO2 code this map
/// produces, so two names sharing a code would overwrite each other.
static COUNTRY_NAME_TO_ISO2: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Belarus", "BY"),
        ("Timor-Leste", "TL"),
        ("Moldova", "MD"),
        ("Philippines", "PH"),
        ("Poland", "PL"),
        ("Germany", "DE"),
        ("Thailand", "TH"),
        ("Gibraltar", "GI"),
        ("Portugal", "PT"),
        ("Singapore", "SG"),
        ("Luxembourg", "LU"),
        ("Ireland", "IE"),
        ("Brunei Darussalam", "BN"),
        ("Iceland", "IS"),
        ("New Zealand", "NZ"),
        ("Albania", "AL"),
        ("Malta", "MT"),
        ("Cyprus", "CY"),
        ("Papua New Guinea", "PG"),
        ("Georgia", "GE"),
        ("Armenia", "AM"),
        ("Bulgaria", "BG"),
        ("Turkey", "TR"),
        ("American Samoa", "AS"),
        ("New Caledonia", "NC"),
        ("Slovenia", "SI"),
        ("Macedonia", "MK"),
        ("Liechtenstein", "LI"),
        ("Montenegro", "ME"),
        ("Canada", "CA"),
        ("United States", "US"),
        ("Puerto Rico", "PR"),
        ("Mexico", "MX"),
        ("Jamaica", "JM"),
        ("French Guiana", "GF"),
        ("Egypt", "EG"),
        ("Algeria", "DZ"),
        ("Morocco", "MA"),
        ("Tunisia", "TN"),
        ("Libya", "LY"),
        ("Gambia", "GM"),
        ("Senegal", "SN"),
        ("Mauritania", "MR"),
        ("Mali", "ML"),
        ("Guinea", "GN"),
        ("Saint Kitts and Nevis", "KN"),
        ("Ivory Coast", "CI"),
        ("Burkina Faso", "BF"),
        ("Niger", "NE"),
        ("Togo", "TG"),
        ("Benin", "BJ"),
        ("Mauritius", "MU"),
        ("Liberia", "LR"),
        ("Sierra Leone", "SL"),
        ("Ghana", "GH"),
        ("Nigeria", "NG"),
        ("Chad", "TD"),
        ("Dominica", "DM"),
        ("Central African Republic", "CF"),
        ("Cameroon", "CM"),
        ("Cuba", "CU"),
        ("Cape Verde", "CV"),
        ("Sao Tome and Principe", "ST"),
        ("Dominican Republic", "DO"),
        ("Equatorial Guinea", "GQ"),
        ("Haiti", "HT"),
        ("Gabon", "GA"),
        ("Republic of Congo", "CG"),
        ("Democratic Republic of Congo", "CD"),
        ("Angola", "AO"),
        ("Guinea-Bissau", "GW"),
        ("Seychelles", "SC"),
        ("Rwanda", "RW"),
        ("Ethiopia", "ET"),
        ("Somalia", "SO"),
        ("Djibouti", "DJ"),
        ("Kenya", "KE"),
        ("Tanzania", "TZ"),
        ("Uganda", "UG"),
        ("Burundi", "BI"),
        ("Mozambique", "MZ"),
        ("Zambia", "ZM"),
        ("Madagascar", "MG"),
        ("Zimbabwe", "ZW"),
        ("Namibia", "NA"),
        ("Malawi", "MW"),
        ("Botswana", "BW"),
        ("South Africa", "ZA"),
        ("Azerbaijan", "AZ"),
        ("Eritrea", "ER"),
        ("Kazakhstan", "KZ"),
        ("South Sudan", "SS"),
        ("India", "IN"),
        ("Pakistan", "PK"),
        ("Afghanistan", "AF"),
        ("Sri Lanka", "LK"),
        ("Myanmar", "MM"),
        ("Lebanon", "LB"),
        ("Jordan", "JO"),
        ("Syrian Arab Republic", "SY"),
        ("Iraq", "IQ"),
        ("Kuwait", "KW"),
        ("Saudi Arabia", "SA"),
        ("Yemen", "YE"),
        ("Oman", "OM"),
        ("United Arab Emirates", "AE"),
        ("State of Palestine", "PS"),
        ("Bahrain", "BH"),
        ("Qatar", "QA"),
        ("Mongolia", "MN"),
        ("Nepal", "NP"),
        ("Iran", "IR"),
        ("Uzbekistan", "UZ"),
        ("Tajikistan", "TJ"),
        ("Kyrgyzstan", "KG"),
        ("Turkmenistan", "TM"),
        ("Japan", "JP"),
        ("Belize", "BZ"),
        ("Guatemala", "GT"),
        ("El Salvador", "SV"),
        ("Republic of Korea", "KR"),
        ("Vietnam", "VN"),
        ("Honduras", "HN"),
        ("Hong Kong", "HK"),
        ("Nicaragua", "NI"),
        ("Macao", "MO"),
        ("Cambodia", "KH"),
        ("Costa Rica", "CR"),
        ("Panama", "PA"),
        ("Greece", "GR"),
        ("China", "CN"),
        ("Peru", "PE"),
        ("Netherlands", "NL"),
        ("Belgium", "BE"),
        ("France", "FR"),
        ("Argentina", "AR"),
        ("Taiwan", "TW"),
        ("Brazil", "BR"),
        ("Bangladesh", "BD"),
        ("Spain", "ES"),
        ("Hungary", "HU"),
        ("Bosnia and Herzegovina", "BA"),
        ("Chile", "CL"),
        ("Croatia", "HR"),
        ("Serbia", "RS"),
        ("Colombia", "CO"),
        ("Italy", "IT"),
        ("Venezuela", "VE"),
        ("Bolivia", "BO"),
        ("Guyana", "GY"),
        ("Romania", "RO"),
        ("Ecuador", "EC"),
        ("Switzerland", "CH"),
        ("Czech Republic", "CZ"),
        ("Slovakia", "SK"),
        ("Austria", "AT"),
        ("Paraguay", "PY"),
        ("United Kingdom", "GB"),
        ("Suriname", "SR"),
        ("Uruguay", "UY"),
        ("Denmark", "DK"),
        ("Sweden", "SE"),
        ("Norway", "NO"),
        ("Finland", "FI"),
        ("Malaysia", "MY"),
        ("Lithuania", "LT"),
        ("Latvia", "LV"),
        ("Estonia", "EE"),
        ("Australia", "AU"),
        ("Russian Federation", "RU"),
        ("Indonesia", "ID"),
        ("Ukraine", "UA"),
    ])
});

/// Destinations the API does not route: valid numbers in these countries
/// are rejected with "No routing available for sms ...". Exactly the codes
/// reachable from the calling code table but absent from the price list.
const NO_ROUTING_ISO2: &[&str] = &[
    "MQ", "FJ", "BM", "KI",
    "SB", "SD", "LC", "GD", "TC", "TF", "MV", "TV", "PW", "CW", "FM", "GP", "SM", "LA",
    "VC", "LS", "BT", "BB", "TK", "MP", "GL", "TO", "WS", "XK", "PF", "VG", "WF", "MC",
    "AW", "KM", "DG", "TT", "BS", "NF", "SH", "BQ", "AI", "FK", "MS", "NU", "MH", "FO",
    "IL", "VU", "SX", "GU", "AG", "AD", "NR", "KP", "SZ", "CK", "PM", "KY", "VI",
];

/// Resolve the billing country of an E.164 number from its digit prefix.
///
/// Prefix lengths are tried ascending from 1 to 4 and a longer match
/// overwrites a shorter one, so shared calling codes can be entered once
/// generically and refined by rare longer prefixes. The ascending order is
/// what makes `+1264...` (AI) win over the generic `1` (US); do not replace
/// this with a first-match scan.
///
/// Returns [`Iso2::UNKNOWN`] when no prefix of any length is known.
pub fn resolve_iso2(number: &str) -> Iso2 {
    let digits = number.strip_prefix('+').unwrap_or(number);
    let mut result = Iso2::UNKNOWN;
    for len in CALLING_CODE_MIN_LENGTH..=CALLING_CODE_MAX_LENGTH {
        if digits.len() >= len && digits.is_char_boundary(len) {
            if let Some(code) = CALLING_CODE_TO_ISO2.get(&digits[..len]) {
                result = Iso2::new(code).unwrap_or(Iso2::UNKNOWN);
            }
        }
    }
    result
}

/// Look up the ISO2 code for a price list country display name.
pub fn iso2_for_country_name(name: &str) -> Option<Iso2> {
    COUNTRY_NAME_TO_ISO2
        .get(name)
        .and_then(|code| Iso2::new(code).ok())
}

/// Whether the API is known to have no route to this country.
pub fn has_no_routing(iso2: Iso2) -> bool {
    NO_ROUTING_ISO2.contains(&iso2.as_str())
}

/// All ISO2 codes the price list mapping can produce.
pub(crate) fn known_country_codes() -> impl Iterator<Item = Iso2> {
    COUNTRY_NAME_TO_ISO2
        .values()
        .filter_map(|code| Iso2::new(code).ok())
}
