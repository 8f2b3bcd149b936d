//! Display helpers: money, dates, ratings, booking references.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// US dollars with thousands separators. Cents are shown only when
/// non-zero: `$1,250`, `$99.5`.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        0 => format!("{}${}", sign, grouped),
        f if f % 10 == 0 => format!("{}${}.{}", sign, grouped, f / 10),
        f => format!("{}${}.{:02}", sign, grouped, f),
    }
}

/// Long US date, e.g. `March 5, 2025`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// `YYYY-MM-DD`, the value of a date input
pub fn format_date_input(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a date input value or a full RFC 3339 timestamp
pub fn parse_date_input(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|ts| ts.with_timezone(&Utc).date_naive())
    })
}

fn ceil_days(millis: i64) -> i64 {
    (millis as f64 / MILLIS_PER_DAY).ceil() as i64
}

/// Whole days between two instants, rounded up, order-insensitive
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    ceil_days((b - a).num_milliseconds().abs())
}

/// Days from `now` until `target`, rounded up; negative once passed
pub fn days_until(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ceil_days((target - now).num_milliseconds())
}

/// Cut `text` to `max_chars` characters and append `...`
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

/// Star bar plus score, with the review count when given
pub fn format_rating(average: f64, count: Option<u32>) -> String {
    let filled = average.floor().clamp(0.0, 5.0) as usize;
    let stars = format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled));
    match count {
        Some(count) => format!("{} ({}/5) {} reviews", stars, average, count),
        None => format!("{} {}/5", stars, average),
    }
}

/// Coarse "how long ago" label
pub fn relative_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - date).num_days();
    match days {
        i64::MIN..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", days),
        7..=29 => format!("{} weeks ago", days / 7),
        30..=364 => format!("{} months ago", days / 30),
        _ => format!("{} years ago", days / 365),
    }
}

/// `TB` + epoch milliseconds + four random base-36 characters
pub fn generate_booking_ref(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("TB{}{}", now.timestamp_millis(), suffix)
}
