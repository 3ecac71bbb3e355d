//! Text normalization for scraped listing fields

use chrono::{Duration, Local, NaiveDate};

/// Localized month abbreviations as printed in listing dates
const MONTHS: [(&str, &str); 12] = [
    ("янв.", "01"),
    ("февр.", "02"),
    ("марта", "03"),
    ("апр.", "04"),
    ("мая", "05"),
    ("июня", "06"),
    ("июля", "07"),
    ("авг.", "08"),
    ("сент.", "09"),
    ("окт.", "10"),
    ("нояб.", "11"),
    ("дек.", "12"),
];

/// Collapses every run of whitespace into a single space, trims the ends
/// and lowercases the result
///
/// # Example
///
/// ```
/// use classifind::item::normalize_str;
///
/// assert_eq!(normalize_str("  Горный\n\tВелосипед "), "горный велосипед");
/// ```
pub fn normalize_str(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Replaces relative day names and month abbreviations with numbers,
/// relative to the local current date
pub fn normalize_date(text: &str) -> String {
    normalize_date_on(text, Local::now().date_naive())
}

/// Replaces relative day names and month abbreviations with numbers
///
/// "Сегодня" and "Вчера" become `DD MM` of `today` and the day before.
/// Anything that is not in the substitution table is left as it is.
pub fn normalize_date_on(text: &str, today: NaiveDate) -> String {
    let yesterday = today - Duration::days(1);

    let mut out = text
        .replace("Вчера", &yesterday.format("%d %m").to_string())
        .replace("Сегодня", &today.format("%d %m").to_string());

    for (name, number) in MONTHS {
        out = out.replace(name, number);
    }

    out
}
