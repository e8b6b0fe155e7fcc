//! Display formatting for metric cards (en-US conventions).

/// `1234567` → `"1,234,567"`
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// `1234.5` → `"$1,234.50"`, `-3.0` → `"-$3.00"`
pub fn format_usd(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (whole, cents) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let sign = if value < 0.0 && rounded != "0.00" { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// `4.3` → `"4.30%"`
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
