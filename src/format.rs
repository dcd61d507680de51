//! Display formatting for amounts and timestamps (en-IN conventions)

use chrono::{DateTime, NaiveDate, Utc};

/// Format an amount as Indian rupees with lakh/crore digit grouping,
/// e.g. `₹1,23,456.50`.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let paise = (amount.abs() * 100.0).round() as u64;
    let rupees = paise / 100;
    let fraction = paise % 100;

    let digits = rupees.to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            groups.push(&head[end - 2..end]);
            end -= 2;
        }
        groups.push(&head[..end]);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    format!("{}₹{}.{:02}", if negative { "-" } else { "" }, grouped, fraction)
}

/// `16 Oct 2026, 14:05`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d %b %Y, %H:%M").to_string()
}

/// Format a timestamp string from the endpoint; unparseable values pass through
pub fn format_date_str(value: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return format_date(&dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.format("%d %b %Y").to_string();
    }
    value.to_string()
}
