use std::fmt;

pub const CURRENCY_LABEL: &str = "sum";

fn format_with_commas(value: u64) -> String {
    let digits = value.to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

/// Groups thousands with commas. Fractions are kept to two places and
/// dropped when the value is whole.
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return "0".to_string();
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = format_with_commas(cents / 100);
    match cents % 100 {
        0 => format!("{}{}", sign, whole),
        fraction => format!("{}{}.{:02}", sign, whole, fraction),
    }
}

/// Like [`format_amount`] but prefixes non-negative values with `+`.
pub fn format_signed(amount: f64) -> String {
    if amount >= 0.0 {
        format!("+{}", format_amount(amount))
    } else {
        format_amount(amount)
    }
}

/// A money amount displayed with the currency label, e.g. `1,500,000 sum`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sum(pub f64);

impl fmt::Display for Sum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_amount(self.0), CURRENCY_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(1000.0), "1,000");
        assert_eq!(format_amount(1_500_000.0), "1,500,000");
    }

    #[test]
    fn keeps_fractions_and_sign() {
        assert_eq!(format_amount(1234.5), "1,234.50");
        assert_eq!(format_amount(-250_000.0), "-250,000");
        assert_eq!(format_signed(120_000.0), "+120,000");
        assert_eq!(format_signed(-5.0), "-5");
    }

    #[test]
    fn sum_display_appends_currency() {
        assert_eq!(Sum(500_000.0).to_string(), "500,000 sum");
    }
}
