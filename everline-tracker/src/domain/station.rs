//! Station code types.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A well-formed Everline station code such as `Y110`.
///
/// Codes are an uppercase `Y` followed by exactly three ASCII digits. A
/// well-formed code is not necessarily a station on the line; whether it is
/// gets decided by [`StationTable`](crate::line::StationTable) lookups.
///
/// # Examples
///
/// ```
/// use everline_tracker::domain::StationCode;
///
/// let giheung = StationCode::parse("Y110").unwrap();
/// assert_eq!(giheung.to_string(), "Y110");
/// assert_eq!(giheung.number(), 110);
///
/// // Lowercase prefix is rejected
/// assert!(StationCode::parse("y110").is_err());
///
/// // Wrong length is rejected
/// assert!(StationCode::parse("Y11").is_err());
/// assert!(StationCode::parse("Y1100").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode(u16);

impl StationCode {
    /// Build a code from its numeric part, e.g. `110` for `Y110`.
    ///
    /// # Panics
    ///
    /// Panics if `number` has more than three digits. Used for the
    /// compiled-in station table, where that is a compile-time error.
    pub const fn new(number: u16) -> Self {
        assert!(number <= 999, "station number must have at most three digits");
        Self(number)
    }

    /// Parse a station code from a string.
    ///
    /// The input must be `Y` followed by exactly three ASCII digits.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 4 {
            return Err(InvalidStationCode {
                reason: "must be exactly 4 characters",
            });
        }

        if bytes[0] != b'Y' {
            return Err(InvalidStationCode {
                reason: "must start with 'Y'",
            });
        }

        let mut number = 0u16;
        for &b in &bytes[1..] {
            if !b.is_ascii_digit() {
                return Err(InvalidStationCode {
                    reason: "must end with three ASCII digits",
                });
            }
            number = number * 10 + u16::from(b - b'0');
        }

        Ok(Self(number))
    }

    /// Parse a code, tolerating surrounding whitespace and a lowercase prefix.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStationCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the numeric part of the code.
    pub fn number(&self) -> u16 {
        self.0
    }
}

impl FromStr for StationCode {
    type Err = InvalidStationCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode(Y{:03})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Y{:03}", self.0)
    }
}

impl Serialize for StationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(StationCode::parse("Y110").is_ok());
        assert!(StationCode::parse("Y124").is_ok());
        assert!(StationCode::parse("Y000").is_ok());
        assert!(StationCode::parse("Y999").is_ok());
    }

    #[test]
    fn reject_bad_prefix() {
        assert!(StationCode::parse("y110").is_err());
        assert!(StationCode::parse("X110").is_err());
        assert!(StationCode::parse("1110").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(StationCode::parse("").is_err());
        assert!(StationCode::parse("Y").is_err());
        assert!(StationCode::parse("Y11").is_err());
        assert!(StationCode::parse("Y1100").is_err());
    }

    #[test]
    fn reject_non_digits() {
        assert!(StationCode::parse("Y1A0").is_err());
        assert!(StationCode::parse("Y 10").is_err());
        assert!(StationCode::parse("Y-10").is_err());
    }

    #[test]
    fn normalized_parse() {
        assert_eq!(
            StationCode::parse_normalized(" y117 ").unwrap(),
            StationCode::new(117)
        );
    }

    #[test]
    fn display_pads_to_three_digits() {
        assert_eq!(StationCode::new(7).to_string(), "Y007");
        assert_eq!(format!("{:?}", StationCode::new(110)), "StationCode(Y110)");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&StationCode::new(121)).unwrap();
        assert_eq!(json, "\"Y121\"");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then display returns the original
        #[test]
        fn roundtrip(s in "Y[0-9]{3}") {
            let code = StationCode::parse(&s).unwrap();
            prop_assert_eq!(code.to_string(), s);
        }

        /// Wrong-length strings are always rejected
        #[test]
        fn wrong_length_rejected(s in "Y[0-9]{0,2}|Y[0-9]{4,8}") {
            prop_assert!(StationCode::parse(&s).is_err());
        }
    }
}
