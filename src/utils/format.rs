//! Human-readable amount formatting with thousands separators.

/// Formats with two decimals, e.g. `-1,234.50`.
pub fn format_amount(value: f64) -> String {
    group_thousands(&format!("{:.2}", value))
}

/// Formats rounded to whole units, e.g. `1,235`.
pub fn format_whole(value: f64) -> String {
    group_thousands(&format!("{:.0}", value))
}

fn group_thousands(rendered: &str) -> String {
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::from(sign);
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_amount(1234.5), "1,234.50");
        assert_eq!(format_amount(-1234567.0), "-1,234,567.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(0.0), "0.00");
    }

    #[test]
    fn whole_units_round() {
        assert_eq!(format_whole(100.0), "100");
        assert_eq!(format_whole(12345.6), "12,346");
    }
}
