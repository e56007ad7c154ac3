use chrono::{DateTime, Utc};

/// Format a price with thousands separators: `$2,500,000`, `$1,250.50`.
/// Fractional cents are only shown when present.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "-".to_string();
    }

    let cents = (price.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    if fraction == 0 {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{:02}", sign, grouped, fraction)
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a timestamp as e.g. "Mar 01, 2024"
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Star rating with one decimal, or "no reviews".
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(r) => format!("{:.1}/5", r),
        None => "no reviews".to_string(),
    }
}
