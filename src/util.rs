// Number and date helpers shared by the report builders.
use crate::error::{ReportError, Result};
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse a `YYYY-MM-DD` date, rejecting anything else.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ReportError::InvalidDate(s.to_string()))
}

pub fn round2(n: f64) -> f64 {
    // Display precision for every index; keeps `-0.0` out of the output.
    let r = (n * 100.0).round() / 100.0;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Consumer counts in tables and console messages, e.g. `12,450`.
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2024-03-01 ").unwrap(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(matches!(parse_date("01/03/2024"), Err(ReportError::InvalidDate(_))));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(11.894), 11.89);
        assert_eq!(round2(70.0), 70.0);
        assert_eq!(round2(-0.001), 0.0);
        assert!(round2(-0.001).is_sign_positive());
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[2.0, 4.0]), 3.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(45.2, 2), "45.20");
        assert_eq!(format_number(-3.5, 1), "-3.5");
        assert_eq!(format_number(0.0, 0), "0");
    }

    #[test]
    fn test_format_int() {
        assert_eq!(format_int(25550u64), "25,550");
    }
}
