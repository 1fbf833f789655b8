//! Small text formatting helpers shared by command groups

/// `1234567` -> `1,234,567`
pub fn with_commas(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Float with at least one decimal place, `50` -> `50.0`
pub fn decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Decode the HTML entities CoinDesk uses for currency symbols
pub fn unescape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let decoded = tail.find(';').and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = entity.strip_prefix('#') {
        return dec.parse().ok().and_then(char::from_u32);
    }
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "pound" => Some('£'),
        "euro" => Some('€'),
        "yen" => Some('¥'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_commas() {
        assert_eq!(with_commas(0), "0");
        assert_eq!(with_commas(999), "999");
        assert_eq!(with_commas(13034431), "13,034,431");
        assert_eq!(with_commas(-1000), "-1,000");
    }

    #[test]
    fn test_decimal() {
        assert_eq!(decimal(50.0), "50.0");
        assert_eq!(decimal(4.5359237), "4.5359237");
    }

    #[test]
    fn test_unescape_html() {
        assert_eq!(unescape_html("&#36;"), "$");
        assert_eq!(unescape_html("&pound;8"), "£8");
        assert_eq!(unescape_html("&euro;"), "€");
        assert_eq!(unescape_html("R&D &unknown; &"), "R&D &unknown; &");
    }
}
