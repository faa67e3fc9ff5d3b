//! Destination list codec.
//!
//! A load-balance group's destinations may be written either as a single
//! bitmask (`0x3f`, `63`) or as a comma-separated id list (`0,1,2,3,4,5`).
//! Both normalize to the same [`DestSet`]. Numbers are decimal, or
//! hexadecimal when prefixed with `0x`.

use crate::{DestSet, HostDestId, ParseError, ParseResult};
use std::fmt;

const BITMASK_CHARSET: &str = "0123456789abcdefABCDEFx";
const LIST_CHARSET: &str = "0123456789abcdefABCDEFx,";

/// Parses a decimal or `0x`-prefixed hexadecimal number.
pub fn parse_number(text: &str) -> ParseResult<u32> {
    let (digits, radix) = match text.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (text, 10),
    };

    if digits.is_empty() {
        return Err(ParseError::invalid_format(text, "expected a number"));
    }
    if !digits.chars().all(|c| c.is_digit(radix)) {
        let reason = if radix == 16 {
            "not a hexadecimal number"
        } else {
            "not a decimal number"
        };
        return Err(ParseError::invalid_format(text, reason));
    }

    // Digits are validated, so overflow is the only remaining failure.
    u32::from_str_radix(digits, radix)
        .map_err(|_| ParseError::out_of_range("number", text, u64::from(u32::MAX)))
}

fn check_charset(text: &str, charset: &str) -> ParseResult<()> {
    if text.chars().all(|c| charset.contains(c)) {
        Ok(())
    } else {
        Err(ParseError::invalid_format(text, "unexpected character"))
    }
}

/// Parses a destination bitmask such as `0x3f` or `63`.
pub fn parse_bitmask(text: &str) -> ParseResult<DestSet> {
    check_charset(text, BITMASK_CHARSET)?;
    parse_number(text).map(DestSet::from_bits)
}

/// Parses a comma-separated destination list such as `0,1,2`.
///
/// Every id must be in 0-31. Repeated ids are harmless.
pub fn parse_list(text: &str) -> ParseResult<DestSet> {
    check_charset(text, LIST_CHARSET)?;

    let mut dests = DestSet::EMPTY;
    for token in text.split(',') {
        if token.is_empty() {
            return Err(ParseError::invalid_format(text, "empty destination ID"));
        }
        dests.insert(HostDestId::new(parse_number(token)?)?);
    }
    Ok(dests)
}

/// Display form of a destination mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskListing {
    /// The mask is zero.
    NoDestinations,
    /// Member ids in ascending order.
    Members(Vec<HostDestId>),
}

impl fmt::Display for MaskListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskListing::NoDestinations => write!(f, "No destinations defined"),
            MaskListing::Members(ids) => {
                let mut first = true;
                for id in ids {
                    if !first {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", id)?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

/// Lists the destinations set in `mask`.
pub fn format_mask(mask: DestSet) -> MaskListing {
    if mask.is_empty() {
        MaskListing::NoDestinations
    } else {
        MaskListing::Members(mask.iter_members().collect())
    }
}
