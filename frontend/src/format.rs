use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

fn format_with_commas(value: &str) -> String {
    let digits = value.chars().rev().collect::<Vec<char>>();
    let mut out = Vec::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", rounded);
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}.{}", sign, symbol, format_with_commas(whole), cents)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Decimal::ZERO, "₹0.00")]
    #[case(Decimal::new(5, 1), "₹0.50")]
    #[case(Decimal::new(123450, 2), "₹1,234.50")]
    #[case(Decimal::from(1_000_000), "₹1,000,000.00")]
    #[case(Decimal::new(-99995, 3), "-₹100.00")]
    #[case(Decimal::new(1005, 3), "₹1.01")]
    fn currency(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_currency(amount, "₹"), expected);
    }

    #[test]
    fn dates_read_day_first() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_date(date), "09/03/2024");
    }
}
