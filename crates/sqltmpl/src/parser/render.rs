//! Rendering of parameter values into SQL literal text.

use std::fmt::Write as _;

use crate::error::{PlaceholderKind, TemplateError, TemplateResult};
use crate::escape::Escaper;
use crate::value::Value;

/// Writes placeholder values using a borrowed [`Escaper`].
pub(crate) struct Renderer<'e, E: ?Sized> {
    escaper: &'e E,
}

impl<'e, E: Escaper + ?Sized> Renderer<'e, E> {
    pub fn new(escaper: &'e E) -> Self {
        Self { escaper }
    }

    /// Render `value` for a placeholder of the given kind.
    pub fn write(
        &self,
        out: &mut String,
        kind: PlaceholderKind,
        value: &Value,
    ) -> TemplateResult<()> {
        match kind {
            PlaceholderKind::Generic => self.write_scalar(out, kind, value),
            PlaceholderKind::Int => {
                let coerced = coerce_int(value)?;
                self.write_scalar(out, kind, &coerced)
            }
            PlaceholderKind::Float => {
                let coerced = coerce_float(value)?;
                self.write_scalar(out, kind, &coerced)
            }
            PlaceholderKind::Array => self.write_array(out, value),
            PlaceholderKind::Identifier => self.write_identifiers(out, value),
        }
    }

    /// Auto-typed scalar: `null`, quoted string, numeral, or `1`/`0`.
    fn write_scalar(
        &self,
        out: &mut String,
        kind: PlaceholderKind,
        value: &Value,
    ) -> TemplateResult<()> {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push(if *b { '1' } else { '0' }),
            Value::Int(i) => {
                let _ = write!(out, "{i}");
            }
            Value::Float(f) => {
                if !f.is_finite() {
                    return Err(TemplateError::unsupported(
                        kind,
                        "float",
                        format!("{f} has no SQL literal form"),
                    ));
                }
                let _ = write!(out, "{f}");
            }
            Value::String(s) => {
                out.push('\'');
                out.push_str(&self.escaper.escape_string(s));
                out.push('\'');
            }
            Value::List(_) | Value::Map(_) => {
                return Err(TemplateError::unsupported(
                    kind,
                    value.type_name(),
                    "expected a scalar",
                ));
            }
        }
        Ok(())
    }

    /// `?a`: `v1, v2, ...` for lists, `` `k1` = v1, ... `` for keyed maps.
    fn write_array(&self, out: &mut String, value: &Value) -> TemplateResult<()> {
        if let Some(items) = value.list_items() {
            for (i, item) in items.into_iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                self.write_scalar(out, PlaceholderKind::Array, item)?;
            }
            return Ok(());
        }

        let Value::Map(entries) = value else {
            return Err(TemplateError::unsupported(
                PlaceholderKind::Array,
                value.type_name(),
                "expected a list or a map",
            ));
        };
        for (i, (key, item)) in entries.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&self.escaper.quote_identifier(key));
            out.push_str(" = ");
            self.write_scalar(out, PlaceholderKind::Array, item)?;
        }
        Ok(())
    }

    /// `?#`: one quoted identifier, or a comma-joined list of them.
    fn write_identifiers(&self, out: &mut String, value: &Value) -> TemplateResult<()> {
        if let Value::String(name) = value {
            out.push_str(&self.escaper.quote_identifier(name));
            return Ok(());
        }

        let Some(items) = value.list_items() else {
            return Err(TemplateError::unsupported(
                PlaceholderKind::Identifier,
                value.type_name(),
                "expected a string or a list of strings",
            ));
        };
        for (i, item) in items.into_iter().enumerate() {
            let Value::String(name) = item else {
                return Err(TemplateError::unsupported(
                    PlaceholderKind::Identifier,
                    item.type_name(),
                    "identifier lists may only contain strings",
                ));
            };
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&self.escaper.quote_identifier(name));
        }
        Ok(())
    }
}

/// `?d` coercion. Null passes through; everything else becomes `Value::Int`.
///
/// Strings use their leading numeric prefix (`"12abc"` is 12, `"abc"` is 0).
pub(crate) fn coerce_int(value: &Value) -> TemplateResult<Value> {
    let kind = PlaceholderKind::Int;
    match value {
        Value::Null => Ok(Value::Null),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Float(f) => truncate(*f).map(Value::Int),
        // Strings never fail; out-of-range numbers saturate.
        Value::String(s) => {
            let i = match numeric_prefix(s) {
                Some(prefix) if prefix.integral => match prefix.text.parse::<i64>() {
                    Ok(i) => i,
                    Err(_) if prefix.text.starts_with('-') => i64::MIN,
                    Err(_) => i64::MAX,
                },
                Some(prefix) => prefix.text.parse::<f64>().map_or(0, |f| f as i64),
                None => 0,
            };
            Ok(Value::Int(i))
        }
        Value::List(_) | Value::Map(_) => Err(TemplateError::unsupported(
            kind,
            value.type_name(),
            "expected a scalar",
        )),
    }
}

/// `?f` coercion. Null passes through; everything else becomes `Value::Float`.
pub(crate) fn coerce_float(value: &Value) -> TemplateResult<Value> {
    let kind = PlaceholderKind::Float;
    match value {
        Value::Null => Ok(Value::Null),
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::String(s) => Ok(Value::Float(
            numeric_prefix(s).map_or(0.0, |prefix| prefix.text.parse().unwrap_or(0.0)),
        )),
        Value::List(_) | Value::Map(_) => Err(TemplateError::unsupported(
            kind,
            value.type_name(),
            "expected a scalar",
        )),
    }
}

/// Leading numeric part of a string, after leading whitespace.
struct NumericPrefix<'s> {
    text: &'s str,
    /// No fraction and no exponent.
    integral: bool,
}

/// `[+-]? digits [. digits]? ([eE] [+-]? digits)?` with at least one mantissa digit.
fn numeric_prefix(s: &str) -> Option<NumericPrefix<'_>> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    let mut integral = true;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if mantissa_digits > 0 || frac_end > end + 1 {
            mantissa_digits += frac_end - end - 1;
            end = frac_end;
            integral = false;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
            integral = false;
        }
    }

    Some(NumericPrefix {
        text: &s[..end],
        integral,
    })
}

// i64::MAX as f64 rounds up to 2^63, which is already out of range.
fn truncate(f: f64) -> TemplateResult<i64> {
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Ok(f.trunc() as i64)
    } else {
        Err(TemplateError::unsupported(
            PlaceholderKind::Int,
            "float",
            format!("{f} does not fit in a 64-bit integer"),
        ))
    }
}
