//! Certificate number formatting and parsing.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use super::{FiscalYear, NumberingError};

/// Prefix used when no other prefix is configured.
pub const DEFAULT_CERTIFICATE_PREFIX: &str = "RPS/CERT";

/// Minimum printed width of the sequence part. Wider values are printed in full.
const SEQUENCE_WIDTH: usize = 3;

lazy_static! {
    static ref NUMBER_TAIL: Regex =
        Regex::new(r"^(\d{2}-\d{2})/(\d{3,})$").expect("certificate number pattern is valid");
}

/// A certificate number such as `RPS/CERT/24-25/007`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CertificateNumber {
    prefix: String,
    fiscal_year: FiscalYear,
    sequence: u32,
}

impl CertificateNumber {
    pub fn new(prefix: impl Into<String>, fiscal_year: FiscalYear, sequence: u32) -> Self {
        Self {
            prefix: prefix.into(),
            fiscal_year,
            sequence,
        }
    }

    /// Parse a number issued under `prefix`.
    pub fn parse(prefix: &str, value: &str) -> Result<Self, NumberingError> {
        let invalid = || NumberingError::InvalidCertificateNumber(value.to_string());

        let tail = value
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(invalid)?;
        let captures = NUMBER_TAIL.captures(tail).ok_or_else(invalid)?;

        let fiscal_year: FiscalYear = captures[1].parse().map_err(|_| invalid())?;
        let sequence: u32 = captures[2].parse().map_err(|_| invalid())?;
        if sequence == 0 {
            return Err(invalid());
        }

        // "0007" would not format back to itself
        if captures[2].len() > SEQUENCE_WIDTH && captures[2].starts_with('0') {
            return Err(invalid());
        }

        Ok(Self::new(prefix, fiscal_year, sequence))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn fiscal_year(&self) -> FiscalYear {
        self.fiscal_year
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for CertificateNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{:0width$}",
            self.prefix,
            self.fiscal_year,
            self.sequence,
            width = SEQUENCE_WIDTH
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fy(label: &str) -> FiscalYear {
        label.parse().unwrap()
    }

    #[test]
    fn test_format_pads_to_three_digits() {
        let number = CertificateNumber::new(DEFAULT_CERTIFICATE_PREFIX, fy("24-25"), 7);
        assert_eq!(number.to_string(), "RPS/CERT/24-25/007");
    }

    #[test]
    fn test_format_keeps_wide_sequences_at_full_width() {
        let number = CertificateNumber::new(DEFAULT_CERTIFICATE_PREFIX, fy("24-25"), 1234);
        assert_eq!(number.to_string(), "RPS/CERT/24-25/1234");
    }

    #[test]
    fn test_parse_recovers_fiscal_year_and_sequence() {
        for seq in [1, 42, 999, 1000, 25_000] {
            let number = CertificateNumber::new(DEFAULT_CERTIFICATE_PREFIX, fy("23-24"), seq);
            let parsed =
                CertificateNumber::parse(DEFAULT_CERTIFICATE_PREFIX, &number.to_string()).unwrap();
            assert_eq!(parsed.fiscal_year(), fy("23-24"));
            assert_eq!(parsed.sequence(), seq);
            assert_eq!(parsed, number);
        }
    }

    #[test]
    fn test_parse_rejects_malformed_numbers() {
        for bad in [
            "RPS/CERT/24-25/07",
            "RPS/CERT/24-26/007",
            "RPS/CERT/24-25/000",
            "RPS/CERT/24-25/0007",
            "XYZ/CERT/24-25/007",
            "RPS/CERT/24-25",
            "RPS/CERT24-25/007",
        ] {
            assert!(
                CertificateNumber::parse(DEFAULT_CERTIFICATE_PREFIX, bad).is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_custom_prefix() {
        let number = CertificateNumber::new("LAB/CAL", fy("25-26"), 3);
        assert_eq!(number.to_string(), "LAB/CAL/25-26/003");
        assert!(CertificateNumber::parse("LAB/CAL", "LAB/CAL/25-26/003").is_ok());
    }
}
