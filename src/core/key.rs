//! Document identity keys and their normalized, totally ordered form.
//!
//! Identities may be integers or arbitrary text. Lookups and the sort applied
//! on save compare the *normalized* form: integers stay as they are, text is
//! turned into the integer spelled by the decimal code points of its chars
//! (`"ab"` -> `97`,`98` -> `9798`).
//!
//! The mapping is not collision-free. Integer `9798` and text `"ab"` share a
//! normalized key, and so can two strings whose digit boundaries blur
//! (`"\u{1}\u{b}"` and `"o"` both give `111`). Normalization is only ever
//! used for comparison and never written to disk, so stored `_id` values are
//! unaffected.
//!
//! Booleans are not integers here: `true` and `false` normalize as the text
//! `"true"` and `"false"`, not as `1` and `0`.
//!
//! Integral JSON numbers of any size are integer keys. They are read from the
//! number's source text (serde_json's `arbitrary_precision`), so ids beyond
//! the 64-bit range neither round through `f64` nor change on save.

use super::types::{Document, ID_FIELD};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// Identity of a document as supplied by a caller or read from `_id`.
///
/// An integer key is already in normalized form, so it is held as one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    Integer(NormalizedKey),
    Text(String),
}

impl DocumentKey {
    /// Integral JSON numbers become `Integer`, strings become `Text`
    /// verbatim, anything else becomes `Text` of its compact JSON rendering.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => {
                let text = n.to_string();
                match NormalizedKey::parse_integer(&text) {
                    Some(integer) => Self::Integer(integer),
                    None => Self::Text(text),
                }
            }
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }

    /// Identity of a stored document. A missing `_id` reads as `null`.
    pub fn of(document: &Document) -> Self {
        match document.get(ID_FIELD) {
            Some(id) => Self::from_value(id),
            None => Self::from_value(&Value::Null),
        }
    }

    pub fn normalize(&self) -> NormalizedKey {
        match self {
            Self::Integer(n) => n.clone(),
            Self::Text(s) => NormalizedKey::from_text(s),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for DocumentKey {
                fn from(n: $t) -> Self {
                    Self::Integer(NormalizedKey::from_integer(i128::from(n)))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<usize> for DocumentKey {
    fn from(n: usize) -> Self {
        // usize is at most 64 bits on every supported target
        Self::Integer(NormalizedKey::from_integer(n as i128))
    }
}

impl From<&str> for DocumentKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for DocumentKey {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for DocumentKey {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<&Value> for DocumentKey {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

impl From<Value> for DocumentKey {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

impl From<&DocumentKey> for DocumentKey {
    fn from(key: &DocumentKey) -> Self {
        key.clone()
    }
}

/// Arbitrary-precision integer produced by [`normalize`].
///
/// Stored as a sign and a decimal digit string without leading zeros, so
/// generated identities hundreds of digits long still compare exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedKey {
    negative: bool,
    digits: String,
}

impl NormalizedKey {
    pub fn from_integer(n: i128) -> Self {
        Self {
            negative: n < 0,
            digits: n.unsigned_abs().to_string(),
        }
    }

    /// Parse `-?[0-9]+` of any length. Anything else (fractions, exponents,
    /// signs other than a leading `-`) is not an integer.
    pub fn parse_integer(text: &str) -> Option<Self> {
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            return Some(Self::from_integer(0));
        }
        Some(Self {
            negative,
            digits: trimmed.to_string(),
        })
    }

    fn from_text(text: &str) -> Self {
        let mut digits = String::with_capacity(text.len() * 3);
        for c in text.chars() {
            digits.push_str(&u32::from(c).to_string());
        }

        // only U+0000 contributes a leading zero; the empty string is zero
        let trimmed = digits.trim_start_matches('0');
        let digits = if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        };

        Self { negative: false, digits }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Magnitude in decimal.
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

fn cmp_magnitude(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for NormalizedKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, false) => cmp_magnitude(&self.digits, &other.digits),
            (true, true) => cmp_magnitude(&other.digits, &self.digits),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}

impl PartialOrd for NormalizedKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "{}", self.digits)
    }
}

/// Normalize any identity into its comparable form.
pub fn normalize(key: impl Into<DocumentKey>) -> NormalizedKey {
    key.into().normalize()
}
