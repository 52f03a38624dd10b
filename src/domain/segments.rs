//! Segment counting for message bodies.
//!
//! A body that fits the GSM 03.38 default alphabet is billed with the
//! single-byte limits (160 per SMS, 153 once split); anything else falls
//! back to the UCS-2 limits (70 / 67). The smaller continuation limits
//! account for the concatenation headers of split messages.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Characters per SMS when the body fits the GSM default alphabet.
pub const GSM_SINGLE_SEGMENT_LIMIT: usize = 160;
/// Characters per SMS of a split GSM message.
pub const GSM_MULTI_SEGMENT_LIMIT: usize = 153;
/// Character slots per SMS when the body needs UCS-2.
pub const UCS2_SINGLE_SEGMENT_LIMIT: usize = 70;
/// Character slots per SMS of a split UCS-2 message.
pub const UCS2_MULTI_SEGMENT_LIMIT: usize = 67;

/// GSM 03.38 default alphabet as the API actually accepts it.
///
/// Reference: http://www.unicode.org/Public/MAPPINGS/ETSI/GSM0338.TXT
///
/// The API deviates from GSM 03.38 for the double-mapped characters: of the
/// Greek capitals that share a glyph with a Latin letter (Α/A, Β/B, Ε/E,
/// Ζ/Z, Η/H, Ι/I, Κ/K, Μ/M, Ν/N, Ο/O, Ρ/P, Τ/T, Υ/Y, Χ/X) only the Latin
/// form is billed as GSM, and of ç/Ç only the capital is. Observed against
/// the live API; changing any of these flips segment counts.
static GSM_CHARS: Lazy<HashSet<char>> = Lazy::new(|| {
    let mut set = HashSet::new();

    set.insert('\u{0000}');
    set.extend(['\u{000A}', '\u{000C}', '\u{000D}']);

    // Printable ASCII except backtick (0x60).
    set.extend('\u{0020}'..='\u{005F}');
    set.extend('\u{0061}'..='\u{007E}');

    set.extend([
        '\u{00A0}', '\u{00A1}', '\u{00A3}', '\u{00A4}', '\u{00A5}', '\u{00A7}',
        '\u{00BF}',
        '\u{00C4}', '\u{00C5}', '\u{00C6}', '\u{00C7}',
        '\u{00C9}',
        '\u{00D1}', '\u{00D6}',
        '\u{00D8}', '\u{00DC}', '\u{00DF}',
        '\u{00E0}', '\u{00E4}', '\u{00E5}', '\u{00E6}',
        '\u{00E8}', '\u{00E9}', '\u{00EC}',
        '\u{00F1}', '\u{00F2}', '\u{00F6}',
        '\u{00F8}', '\u{00F9}', '\u{00FC}',
    ]);

    // Greek capitals without a Latin look-alike.
    set.extend([
        '\u{0393}', '\u{0394}', '\u{0398}', '\u{039B}', '\u{039E}',
        '\u{03A0}', '\u{03A3}', '\u{03A6}', '\u{03A8}', '\u{03A9}',
    ]);

    set.insert('\u{20AC}');
    set
});

/// Whether every character of the body is in the GSM alphabet as accepted
/// by the API.
pub fn is_gsm_char_set(body: &str) -> bool {
    body.chars().all(|c| GSM_CHARS.contains(&c))
}

/// Character slots a single character occupies under UCS-2: code points
/// outside the BMP (most emoji) need a surrogate pair.
fn ucs2_char_len(c: char) -> usize {
    if c as u32 > 0xFFFF { 2 } else { 1 }
}

fn ucs2_len(body: &str) -> usize {
    body.chars().map(ucs2_char_len).sum()
}

/// How many physical SMS the body will be split into.
///
/// An empty body needs no SMS at all.
pub fn split_count(body: &str) -> u32 {
    if body.is_empty() {
        return 0;
    }

    let (single_limit, multi_limit, count) = if is_gsm_char_set(body) {
        (
            GSM_SINGLE_SEGMENT_LIMIT,
            GSM_MULTI_SEGMENT_LIMIT,
            body.chars().count(),
        )
    } else {
        (
            UCS2_SINGLE_SEGMENT_LIMIT,
            UCS2_MULTI_SEGMENT_LIMIT,
            ucs2_len(body),
        )
    };

    if count <= single_limit {
        1
    } else {
        count.div_ceil(multi_limit) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_needs_no_segment() {
        assert_eq!(split_count(""), 0);
    }

    #[test]
    fn gsm_boundaries_at_160_and_161() {
        assert_eq!(split_count(&"a".repeat(159)), 1);
        assert_eq!(split_count(&"a".repeat(160)), 1);
        assert_eq!(split_count(&"a".repeat(161)), 2);
        assert_eq!(split_count(&"a".repeat(306)), 2);
        assert_eq!(split_count(&"a".repeat(307)), 3);
    }

    #[test]
    fn ucs2_boundaries_at_70_and_71() {
        assert_eq!(split_count(&"я".repeat(70)), 1);
        assert_eq!(split_count(&"я".repeat(71)), 2);
        assert_eq!(split_count(&"я".repeat(134)), 2);
        assert_eq!(split_count(&"я".repeat(135)), 3);
    }

    #[test]
    fn astral_code_points_count_twice() {
        // 36 emoji occupy 72 slots, over the 70 slot single SMS limit.
        assert_eq!(split_count(&"😀".repeat(35)), 1);
        assert_eq!(split_count(&"😀".repeat(36)), 2);
    }

    #[test]
    fn gsm_membership_of_common_characters() {
        assert!(is_gsm_char_set("Hello, world! 123 @€"));
        assert!(is_gsm_char_set("ÄÖÜ äöü ß ñ"));
        assert!(is_gsm_char_set("ΔΘΛΞΠΣΦΨΩΓ"));
        assert!(!is_gsm_char_set("`"));
        assert!(!is_gsm_char_set("😀"));
        assert!(!is_gsm_char_set("я"));
    }

    #[test]
    fn latin_look_alikes_are_gsm_greek_twins_are_not() {
        let pairs = [
            ('A', 'Α'),
            ('B', 'Β'),
            ('E', 'Ε'),
            ('H', 'Η'),
            ('I', 'Ι'),
            ('K', 'Κ'),
            ('M', 'Μ'),
            ('N', 'Ν'),
            ('O', 'Ο'),
            ('P', 'Ρ'),
            ('T', 'Τ'),
            ('X', 'Χ'),
            ('Y', 'Υ'),
            ('Z', 'Ζ'),
            ('Ç', 'ç'),
        ];
        for (gsm, non_gsm) in pairs {
            let accepted: String = std::iter::repeat_n(gsm, 75).collect();
            let rejected: String = std::iter::repeat_n(non_gsm, 75).collect();
            assert!(is_gsm_char_set(&accepted), "{gsm} should be GSM");
            assert!(!is_gsm_char_set(&rejected), "{non_gsm} should not be GSM");
            // 75 chars fit a 160 char GSM SMS but overflow 70 UCS-2 slots.
            assert_eq!(split_count(&accepted), 1, "{gsm}");
            assert_eq!(split_count(&rejected), 2, "{non_gsm}");
        }
    }

    #[test]
    fn mixed_body_falls_back_to_ucs2_limits() {
        let body = format!("Α{}", "a".repeat(70));
        assert_eq!(split_count(&body), 2);
    }
}
