//! Raw cell text to typed values.

use std::fmt;

use kinai_model::{CellValue, DataType};
use serde::Serialize;

use crate::datetime::parse_datetime;

/// Why a coerced value is a substitute rather than the cell's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionFallback {
    /// Number cell had no leading number or it was non-finite; `0` was used.
    NumberDefaulted,
    /// Boolean cell was not `true`/`false`/`1`/`0`; `false` was used.
    BooleanDefaulted,
    /// Date cell matched no known format.
    InvalidDate,
}

impl fmt::Display for CoercionFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NumberDefaulted => "not a number, used 0",
            Self::BooleanDefaulted => "not a boolean, used false",
            Self::InvalidDate => "not a recognised date",
        };
        f.write_str(text)
    }
}

/// A coerced value and the fallback applied to produce it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: CellValue,
    pub fallback: Option<CoercionFallback>,
}

impl Coerced {
    fn exact(value: CellValue) -> Self {
        Self {
            value,
            fallback: None,
        }
    }

    fn fallback(value: CellValue, fallback: CoercionFallback) -> Self {
        Self {
            value,
            fallback: Some(fallback),
        }
    }
}

/// Converts raw cell text to a value of the given type. Never fails.
pub fn coerce(raw: &str, data_type: DataType) -> CellValue {
    coerce_with_report(raw, data_type).value
}

/// Like [`coerce`], also reporting whether a default value was substituted.
pub fn coerce_with_report(raw: &str, data_type: DataType) -> Coerced {
    match data_type {
        DataType::String => Coerced::exact(CellValue::Text(raw.to_string())),
        DataType::Number => match leading_number(raw) {
            Some(n) if n.is_finite() => Coerced::exact(CellValue::Number(n)),
            _ => Coerced::fallback(CellValue::Number(0.0), CoercionFallback::NumberDefaulted),
        },
        DataType::Boolean => {
            let lower = raw.to_lowercase();
            let value = CellValue::Boolean(lower == "true" || raw == "1");
            if matches!(lower.as_str(), "true" | "false" | "1" | "0") {
                Coerced::exact(value)
            } else {
                Coerced::fallback(value, CoercionFallback::BooleanDefaulted)
            }
        }
        DataType::Date => match parse_datetime(raw) {
            Some(dt) => Coerced::exact(CellValue::Date(Some(dt))),
            None => Coerced::fallback(CellValue::Date(None), CoercionFallback::InvalidDate),
        },
    }
}

/// Parses the longest decimal prefix of `raw` after leading whitespace:
/// `"0.5 kg"` is `0.5`, `"12abc"` is `12`. Trailing text is ignored.
fn leading_number(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut at: usize| {
        while bytes.get(at).is_some_and(u8::is_ascii_digit) {
            at += 1;
        }
        at
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}
