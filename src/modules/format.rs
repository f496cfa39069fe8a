//! Input formatting helpers shared by the signup and profile screens.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").expect("valid regex"));

/// Hangul syllables, jamo, ASCII letters and whitespace
static NAME_DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^가-힣ㄱ-ㅎㅏ-ㅣa-zA-Z\s]").expect("valid regex"));

fn digits_only(value: &str) -> String {
    NON_DIGIT.replace_all(value, "").into_owned()
}

/// Hyphenate a phone number while it is being typed.
///
/// `"01012345678"` becomes `"010-1234-5678"`; anything past 11 digits is dropped.
pub fn format_phone_number_input(value: &str) -> String {
    let numbers = digits_only(value);
    let len = numbers.len();

    if len <= 3 {
        numbers
    } else if len <= 7 {
        format!("{}-{}", &numbers[..3], &numbers[3..])
    } else {
        format!("{}-{}-{}", &numbers[..3], &numbers[3..7], &numbers[7..len.min(11)])
    }
}

/// Format a stored 11-character number for display; other lengths pass through
pub fn format_phone_number_display(phone_number: &str) -> String {
    if phone_number.len() == 11 && phone_number.is_ascii() {
        format!(
            "{}-{}-{}",
            &phone_number[..3],
            &phone_number[3..7],
            &phone_number[7..]
        )
    } else {
        phone_number.to_string()
    }
}

pub fn remove_phone_number_hyphens(phone_number: &str) -> String {
    phone_number.replace('-', "")
}

/// Digits only, at most six
pub fn format_verification_code(value: &str) -> String {
    digits_only(value).chars().take(6).collect()
}

pub fn format_name(value: &str) -> String {
    NAME_DISALLOWED.replace_all(value, "").into_owned()
}

/// Seconds to `M:SS`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
