//! Hierarchical component tags.
//!
//! A tag renders as `#PPP-SSS`: three prefix digits, a dash and a suffix of
//! one or more digits, all in base 36 (`0-9A-Z`). Digits are read with the
//! least-significant digit first.
//!
//! Each increment bumps one level. Levels 1 to 3 each own one prefix position,
//! every level past that shares the suffix as a single counter. Raw tag strings
//! do not sort soundly (suffixes are unpadded); compare with [`Tag::size`].

use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::error::{DomainError, DomainResult};

pub const DIGITS: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: i64 = 36;
const PREFIX_LEVELS: u32 = 3;
/// Longest suffix whose value still fits an `i64` next to the prefix.
const MAX_SUFFIX_DIGITS: usize = 12;

fn tag_regex() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| Regex::new(r"^#([0-9A-Z]{3})-([0-9A-Z]{1,12})$").unwrap())
}

fn digit_value(c: char) -> Option<i64> {
    DIGITS.find(c).map(|pos| pos as i64)
}

/// Interprets `s` as base 36 with the least-significant digit first.
pub fn convert_to_base10(s: &str) -> DomainResult<i64> {
    let mut value: i64 = 0;
    let mut weight: i64 = 1;
    for c in s.chars() {
        let digit = digit_value(c).ok_or_else(|| DomainError::InvalidTag(s.to_string()))?;
        value = digit
            .checked_mul(weight)
            .and_then(|d| value.checked_add(d))
            .ok_or_else(|| DomainError::InvalidTag(s.to_string()))?;
        weight = weight.saturating_mul(BASE);
    }
    Ok(value)
}

/// Inverse of [`convert_to_base10`]; minimal length, zero is `"0"`.
pub fn convert_to_base36(mut value: u64) -> String {
    let digits = DIGITS.as_bytes();
    if value == 0 {
        return "0".to_string();
    }
    let mut out = String::new();
    while value > 0 {
        out.push(digits[(value % BASE as u64) as usize] as char);
        value /= BASE as u64;
    }
    out
}

fn add_to(digits: &str, quantity: i64, tag: &str) -> DomainResult<String> {
    let overflow = || DomainError::TagOverflow {
        tag: tag.to_string(),
        quantity,
    };
    let sum = convert_to_base10(digits)?
        .checked_add(quantity)
        .ok_or_else(overflow)?;
    if sum < 0 {
        return Err(overflow());
    }
    Ok(convert_to_base36(sum as u64))
}

/// Immutable tag value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    tag_string: String,
    level: u32,
}

impl Default for Tag {
    fn default() -> Self {
        Self {
            tag_string: "#000-000".to_string(),
            level: 0,
        }
    }
}

impl Tag {
    /// Parses a `#PPP-SSS` string at the given level.
    ///
    /// The suffix holds at most 12 digits.
    pub fn parse(s: &str, level: u32) -> DomainResult<Self> {
        if !tag_regex().is_match(s) {
            return Err(DomainError::InvalidTag(s.to_string()));
        }
        Ok(Self {
            tag_string: s.to_string(),
            level,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.tag_string
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn prefix(&self) -> &str {
        &self.tag_string[1..4]
    }

    pub fn suffix(&self) -> &str {
        &self.tag_string[5..]
    }

    /// Returns the next tag one level deeper.
    ///
    /// Below level 3 the prefix digit at the current level is bumped by
    /// `quantity`; from level 3 on the whole suffix is.
    pub fn increment(&self, quantity: i64) -> DomainResult<Tag> {
        let overflow = || DomainError::TagOverflow {
            tag: self.tag_string.clone(),
            quantity,
        };
        let next_level = self.level.checked_add(1).ok_or_else(overflow)?;

        if next_level > PREFIX_LEVELS {
            let suffix = add_to(self.suffix(), quantity, &self.tag_string)?;
            if suffix.len() > MAX_SUFFIX_DIGITS {
                return Err(overflow());
            }
            return Ok(Tag {
                tag_string: format!("#{}-{}", self.prefix(), suffix),
                level: next_level,
            });
        }

        let pos = self.level as usize;
        let prefix = self.prefix();
        let bumped = add_to(&prefix[pos..pos + 1], quantity, &self.tag_string)?;
        if bumped.len() != 1 {
            return Err(overflow());
        }
        let new_prefix = format!("{}{}{}", &prefix[..pos], bumped, &prefix[pos + 1..]);

        Ok(Tag {
            tag_string: format!("#{}-{}", new_prefix, self.suffix()),
            level: next_level,
        })
    }

    /// Ordering value combining suffix and reversed prefix.
    pub fn size(&self) -> i64 {
        let prefix: String = self.prefix().chars().rev().collect();
        // at most 12 suffix digits plus 3 prefix digits, both validated on construction
        convert_to_base10(self.suffix()).unwrap_or_default()
            + convert_to_base10(&prefix).unwrap_or_default()
    }

    /// Compares two tags by [`Tag::size`] alone; equal sizes are ties.
    pub fn cmp_size(&self, other: &Tag) -> Ordering {
        self.size().cmp(&other.size())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag_string)
    }
}
