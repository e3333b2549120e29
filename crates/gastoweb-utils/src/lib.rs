//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Group an integer string with `.` every three digits (es-AR style)
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push('.');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

/// Format an amount as money, e.g. `$ 2.200,50`
pub fn format_currency(amount: Decimal, symbol: &str, decimal_places: u32) -> String {
    let rounded = amount
        .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
        .abs();
    let int_part = rounded.trunc();
    let frac = ((rounded - int_part) * Decimal::from(10u64.pow(decimal_places))).trunc();

    let mut out = String::new();
    if amount.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(symbol);
    out.push(' ');
    out.push_str(&format_number(int_part));
    if decimal_places > 0 {
        out.push(',');
        out.push_str(&format!("{:0>width$}", frac.to_string(), width = decimal_places as usize));
    }
    out
}

/// Cut `s` to at most `max` characters, marking the cut with `…`
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push('…');
    out
}

/// Escape text for use inside HTML element content or quoted attributes
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Rating as stars, clamped to 1..=5
pub fn stars(rating: i64) -> String {
    "⭐".repeat(rating.clamp(1, 5) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(150), "150");
        assert_eq!(format_number(2200), "2.200");
        assert_eq!(format_number(1234567), "1.234.567");
        assert_eq!(format_number(-1234), "-1.234");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Decimal::new(150, 0), "$", 2), "$ 150,00");
        assert_eq!(format_currency(Decimal::new(22005, 1), "$", 2), "$ 2.200,50");
        assert_eq!(format_currency(Decimal::new(1100, 0), "$", 0), "$ 1.100");
        assert_eq!(format_currency(Decimal::new(1005, 3), "$", 2), "$ 1,01");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("Tramo corto", 40), "Tramo corto");
        assert_eq!(truncate_chars("Línea 60", 3), "Lín…");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>\"a\" & 'b'"), "&lt;script&gt;&quot;a&quot; &amp; &#39;b&#39;");
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(3).chars().count(), 3);
        assert_eq!(stars(0).chars().count(), 1);
        assert_eq!(stars(9).chars().count(), 5);
    }
}
