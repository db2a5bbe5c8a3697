//! Normalisation applied to intake form input before it is stored.

use anyhow::Context;
use serde_json::Value;
use time::{Date, OffsetDateTime, macros::format_description};

/// Form fields whose text is stored upper-cased.
pub const FIELDS_TO_CAPITALIZE: &[&str] = &[
    "firstName",
    "middleName",
    "lastName",
    "extensionName",
    "barangay",
    "idNumber",
    "occupation",
    "dependentName",
    "relationshipToDependent",
    "beneficiaryName",
    "school",
    "placeOfBirth",
];

const MAX_PHONE_DIGITS: usize = 11;

pub fn is_capitalized_field(field: &str) -> bool {
    FIELDS_TO_CAPITALIZE.contains(&field)
}

/// Upper-case `value` when `field` is on the capitalisation list; anything
/// else, including non-string values, is returned untouched.
pub fn capitalize_value(field: &str, value: Value) -> Value {
    match value {
        Value::String(text) if is_capitalized_field(field) => Value::String(text.to_uppercase()),
        other => other,
    }
}

pub fn capitalize(field: &str, value: &str) -> String {
    if is_capitalized_field(field) {
        value.to_uppercase()
    } else {
        value.to_string()
    }
}

/// Format a mobile number as `dddd-ddd-dddd`.
///
/// Non-digits are dropped and the number is cut to eleven digits before the
/// separators go back in, so the result is stable under reformatting.
pub fn format_phone_number(value: &str) -> String {
    let digits: String = value
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_PHONE_DIGITS)
        .collect();

    match digits.len() {
        0..=4 => digits,
        5..=7 => format!("{}-{}", &digits[..4], &digits[4..]),
        _ => format!("{}-{}-{}", &digits[..4], &digits[4..7], &digits[7..]),
    }
}

/// Whole years from `birth_date` to `today`, less one if this year's
/// birthday has not come yet. Birth dates in the future count as zero.
pub fn calculate_age(birth_date: Date, today: Date) -> u32 {
    let mut years = today.year() - birth_date.year();
    if (today.month() as u8, today.day()) < (birth_date.month() as u8, birth_date.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Today's date in the local time zone, falling back to UTC when the local
/// offset cannot be determined.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

pub fn parse_date(value: &str) -> anyhow::Result<Date> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .with_context(|| format!("Invalid date {:?}, expected YYYY-MM-DD", value))
}

pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    #[test]
    fn phone_number_gets_separators() {
        assert_eq!(format_phone_number("09171234567"), "0917-123-4567");
        assert_eq!(format_phone_number("abc091712"), "0917-12");
        assert_eq!(format_phone_number("0917"), "0917");
        assert_eq!(format_phone_number("0917123"), "0917-123");
        assert_eq!(format_phone_number("09171234"), "0917-123-4");
        assert_eq!(format_phone_number(""), "");
        assert_eq!(format_phone_number("091712345678999"), "0917-123-4567");
    }

    #[test]
    fn phone_number_formatting_is_idempotent() {
        for input in ["09171234567", "0917", "091712", "+63 917 123 4567 89"] {
            let once = format_phone_number(input);
            assert_eq!(format_phone_number(&once), once);
        }
    }

    #[test]
    fn only_listed_fields_are_capitalized() {
        assert_eq!(capitalize("barangay", "san miguel"), "SAN MIGUEL");
        assert_eq!(capitalize("email", "a@b.com"), "a@b.com");
        assert_eq!(
            capitalize_value("firstName", json!("juan")),
            json!("JUAN")
        );
        assert_eq!(capitalize_value("firstName", json!(42)), json!(42));
        assert_eq!(capitalize_value("course", json!("bsit")), json!("bsit"));
    }

    #[test]
    fn age_accounts_for_birthday_not_yet_reached() {
        let today = date!(2026 - 10 - 18);
        assert_eq!(calculate_age(date!(2000 - 10 - 18), today), 26);
        assert_eq!(calculate_age(date!(2000 - 10 - 19), today), 25);
        assert_eq!(calculate_age(date!(2000 - 01 - 31), today), 26);
        assert_eq!(calculate_age(date!(2000 - 12 - 01), today), 25);
        assert_eq!(calculate_age(date!(2030 - 01 - 01), today), 0);
    }

    #[test]
    fn leap_day_birthday() {
        assert_eq!(
            calculate_age(date!(2004 - 02 - 29), date!(2025 - 02 - 28)),
            20
        );
        assert_eq!(
            calculate_age(date!(2004 - 02 - 29), date!(2025 - 03 - 01)),
            21
        );
    }

    #[test]
    fn dates_round_trip_through_text() {
        let d = date!(1999 - 03 - 07);
        assert_eq!(format_date(d), "1999-03-07");
        assert_eq!(parse_date("1999-03-07").unwrap(), d);
        assert!(parse_date("03/07/1999").is_err());
    }
}
