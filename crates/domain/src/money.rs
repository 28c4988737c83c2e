//! Formatting of centavo amounts into Brazilian Real display strings.

/// Formats an amount in centavos as `R$ 1.234,56`.
pub fn format_brl(amount_minor: i64) -> String {
    let negative = amount_minor < 0;
    let absolute = amount_minor.unsigned_abs();
    let reais = absolute / 100;
    let centavos = absolute % 100;

    let mut grouped = String::new();
    let digits = reais.to_string();
    for (position, ch) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-R$ {},{:02}", grouped, centavos)
    } else {
        format!("R$ {},{:02}", grouped, centavos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_simple_amount() {
        assert_eq!(format_brl(10050), "R$ 100,50");
    }

    #[test]
    fn formats_thousands_with_dot_separator() {
        assert_eq!(format_brl(123_456), "R$ 1.234,56");
        assert_eq!(format_brl(123_456_789), "R$ 1.234.567,89");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_brl(0), "R$ 0,00");
    }

    #[test]
    fn pads_centavos_with_leading_zero() {
        assert_eq!(format_brl(105), "R$ 1,05");
    }

    #[test]
    fn formats_negative_amount() {
        assert_eq!(format_brl(-10050), "-R$ 100,50");
    }
}
