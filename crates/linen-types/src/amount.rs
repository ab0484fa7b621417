use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;

/// Quantity carried by a transaction, stored as the raw JSON value.
///
/// Persisted documents may contain amounts written by hand or by older
/// trackers (`"12"`, `12.0`, `null`). The raw value is preserved so a
/// load/save cycle never rewrites data, and the effective quantity is read
/// with integer-prefix parsing:
///
/// - integers are used as is
/// - finite floats are truncated toward zero
/// - strings are trimmed and their leading `[+-]?digits` prefix is parsed
/// - anything else has no value
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Value);

impl Amount {
    /// Effective integer value, if the raw value has one.
    pub fn value(&self) -> Option<i64> {
        match &self.0 {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(i)
                } else if let Some(u) = n.as_u64() {
                    i64::try_from(u).ok()
                } else {
                    n.as_f64().and_then(truncate_float)
                }
            }
            Value::String(s) => parse_int_prefix(s),
            _ => None,
        }
    }

    /// Effective value when it is strictly positive.
    ///
    /// Only positive amounts ever reach the derived balance caches.
    pub fn positive(&self) -> Option<u64> {
        self.value().filter(|v| *v > 0).map(|v| v as u64)
    }

    /// Parse typed input with the same integer-prefix rule as stored strings.
    ///
    /// Zero and negative values parse; the ledger rejects them on entry.
    pub fn parse(input: &str) -> Result<i64, TypeError> {
        parse_int_prefix(input).ok_or_else(|| TypeError::InvalidAmount(input.to_string()))
    }

    /// The raw persisted value.
    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(Value::from(value))
    }
}

impl From<Value> for Amount {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

fn truncate_float(f: f64) -> Option<i64> {
    if f.is_finite() && f.abs() < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

fn parse_int_prefix(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_amounts_are_used_directly() {
        assert_eq!(Amount::from(12u64).positive(), Some(12));
        assert_eq!(Amount::from(json!(-3)).value(), Some(-3));
        assert_eq!(Amount::from(json!(-3)).positive(), None);
        assert_eq!(Amount::from(json!(0)).positive(), None);
    }

    #[test]
    fn strings_use_integer_prefix() {
        assert_eq!(Amount::from(json!("12")).positive(), Some(12));
        assert_eq!(Amount::from(json!("  7 towels")).positive(), Some(7));
        assert_eq!(Amount::from(json!("+4")).positive(), Some(4));
        assert_eq!(Amount::from(json!("1e3")).positive(), Some(1));
        assert_eq!(Amount::from(json!("abc")).value(), None);
        assert_eq!(Amount::from(json!("")).value(), None);
        assert_eq!(Amount::from(json!("-")).value(), None);
    }

    #[test]
    fn floats_truncate_toward_zero() {
        assert_eq!(Amount::from(json!(12.9)).positive(), Some(12));
        assert_eq!(Amount::from(json!(0.5)).positive(), None);
        assert_eq!(Amount::from(json!(-0.5)).value(), Some(0));
    }

    #[test]
    fn non_numeric_values_have_no_value() {
        assert_eq!(Amount::from(Value::Null).value(), None);
        assert_eq!(Amount::from(json!(true)).value(), None);
        assert_eq!(Amount::from(json!([1])).value(), None);
        assert_eq!(Amount::from(json!({"n": 1})).value(), None);
    }

    #[test]
    fn raw_value_survives_serde() {
        let amount = Amount::from(json!("12"));
        let encoded = serde_json::to_string(&amount).unwrap();
        assert_eq!(encoded, "\"12\"");
        let decoded: Amount = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, amount);
    }

    #[test]
    fn typed_input_uses_integer_prefix() {
        assert_eq!(Amount::parse("15"), Ok(15));
        assert_eq!(Amount::parse(" 7 towels"), Ok(7));
        assert_eq!(Amount::parse("0"), Ok(0));
        assert_eq!(Amount::parse("-2"), Ok(-2));
        assert_eq!(
            Amount::parse("many"),
            Err(TypeError::InvalidAmount("many".into()))
        );
        assert!(Amount::parse("").is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn decimal_input_matches_numeric_value(n in 1u64..10_000_000) {
                prop_assert_eq!(Amount::parse(&n.to_string()), Ok(n as i64));
                prop_assert_eq!(Amount::from(json!(n.to_string())).positive(), Some(n));
                prop_assert_eq!(Amount::from(n).positive(), Some(n));
            }
        }
    }
}
