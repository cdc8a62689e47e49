//! Utility functions and helpers

use rust_decimal::Decimal;

/// Format a decimal amount with thousands separators.
/// Sign and fractional digits are preserved as-is.
pub fn format_amount(amount: &Decimal) -> String {
    let s = amount.to_string();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::new();
    let mut count = 0;
    for c in int_part.chars().rev() {
        if count == 3 {
            grouped.push(',');
            count = 0;
        }
        grouped.push(c);
        count += 1;
    }
    let int_grouped: String = grouped.chars().rev().collect();

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, int_grouped, f),
        None => format!("{}{}", sign, int_grouped),
    }
}

/// Format an amount with a currency symbol placed before or after it.
pub fn format_with_symbol(amount: &Decimal, symbol: &str, before: bool) -> String {
    if before {
        format!("{}{}", symbol, format_amount(amount))
    } else {
        format!("{} {}", format_amount(amount), symbol)
    }
}

// ==================== Tests ====================
