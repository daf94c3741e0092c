//! Lexical helpers shared by the primitive parsers.

use std::fmt::UpperExp;

use super::{XmlSchemaValOrdering, is_wsp_blank_ch};

/// Strip the leading and trailing blanks that the `collapse` whiteSpace facet
/// would remove.
///
/// Inner blanks are left in place: none of the collapsed primitives accepts
/// them, so the lexical check fails either way.
pub(crate) fn trim_collapse(value: &str) -> &str {
    value.trim_matches(is_wsp_blank_ch)
}

/// Parse exactly two ASCII digits at the head of `cur`.
#[doc(alias = "PARSE_2_DIGITS")]
pub(crate) fn parse_2_digits(cur: &mut &str) -> Option<u8> {
    let b = cur.as_bytes();
    if b.len() < 2 || !b[0].is_ascii_digit() || !b[1].is_ascii_digit() {
        return None;
    }
    *cur = &cur[2..];
    Some((b[0] - b'0') * 10 + (b[1] - b'0'))
}

/// Consume a run of ASCII digits at the head of `cur` and return it.
pub(crate) fn take_digits<'a>(cur: &mut &'a str) -> &'a str {
    let len = cur.bytes().take_while(u8::is_ascii_digit).count();
    let (digits, rest) = cur.split_at(len);
    *cur = rest;
    digits
}

/// Parse a boolean literal.
///
/// Accept `true`, `false`, `1` and `0`.
pub(crate) fn parse_boolean(value: &str) -> Option<bool> {
    match trim_collapse(value) {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Check `value` against the float/double grammar and return it trimmed.
///
/// `NaN`, `INF` and `-INF` are accepted. Otherwise the mantissa requires at
/// least one digit, and an exponent marker requires at least one digit.
pub(crate) fn check_floating(value: &str) -> Option<&str> {
    let value = trim_collapse(value);
    if matches!(value, "NaN" | "INF" | "-INF") {
        return Some(value);
    }
    let mut cur = value;
    if let Some(rest) = cur.strip_prefix(['+', '-']) {
        cur = rest;
    }
    let mut has_digits = !take_digits(&mut cur).is_empty();
    if let Some(rest) = cur.strip_prefix('.') {
        cur = rest;
        has_digits |= !take_digits(&mut cur).is_empty();
    }
    if !has_digits {
        return None;
    }
    if let Some(rest) = cur.strip_prefix(['e', 'E']) {
        cur = rest.strip_prefix(['+', '-']).unwrap_or(rest);
        if take_digits(&mut cur).is_empty() {
            return None;
        }
    }
    cur.is_empty().then_some(value)
}

/// Parse a float literal. Values out of range round to `INF`.
pub(crate) fn parse_float(value: &str) -> Option<f32> {
    match check_floating(value)? {
        "NaN" => Some(f32::NAN),
        "INF" => Some(f32::INFINITY),
        "-INF" => Some(f32::NEG_INFINITY),
        num => num.parse().ok(),
    }
}

/// Parse a double literal. Values out of range round to `INF`.
pub(crate) fn parse_double(value: &str) -> Option<f64> {
    match check_floating(value)? {
        "NaN" => Some(f64::NAN),
        "INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        num => num.parse().ok(),
    }
}

/// Compare two floating values.
///
/// `NaN` is equal to itself and greater than any other value.
#[doc(alias = "xmlSchemaCompareFloats")]
pub(crate) fn compare_floats(d1: f64, d2: f64) -> XmlSchemaValOrdering {
    match (d1.is_nan(), d2.is_nan()) {
        (true, true) => XmlSchemaValOrdering::Equal,
        (true, false) => XmlSchemaValOrdering::Greater,
        (false, true) => XmlSchemaValOrdering::Less,
        // `-0 == 0` in the value space.
        _ => d1
            .partial_cmp(&d2)
            .map_or(XmlSchemaValOrdering::Indeterminate, Into::into),
    }
}

/// Format a floating value in its canonical form, `d.dddE±n`.
///
/// The mantissa is the shortest one that reads back to the same value.
pub(crate) fn canonical_floating<F: UpperExp + Into<f64> + Copy>(value: F) -> String {
    let v: f64 = value.into();
    if v.is_nan() {
        return "NaN".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "INF" } else { "-INF" }.to_owned();
    }
    let repr = format!("{value:E}");
    match repr.split_once('E') {
        Some((mantissa, exp)) if !mantissa.contains('.') => format!("{mantissa}.0E{exp}"),
        _ => repr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_digits() {
        let mut cur = "12:30";
        assert_eq!(parse_2_digits(&mut cur), Some(12));
        assert_eq!(cur, ":30");
        let mut cur = "1:";
        assert_eq!(parse_2_digits(&mut cur), None);
        assert_eq!(cur, "1:");
    }

    #[test]
    fn booleans() {
        assert_eq!(parse_boolean("true"), Some(true));
        assert_eq!(parse_boolean(" 0\n"), Some(false));
        assert_eq!(parse_boolean("TRUE"), None);
        assert_eq!(parse_boolean("yes"), None);
        assert_eq!(parse_boolean(""), None);
    }

    #[test]
    fn floating_grammar() {
        for ok in ["1", "-1.5", "+.5", "5.", "1e10", "1.5E-3", "INF", "-INF", "NaN", " 3 "] {
            assert!(check_floating(ok).is_some(), "{ok}");
        }
        for ng in ["", ".", "+", "e5", "1e", "1e+", "+INF", "inf", "nan", "1.2.3", "1 2", "0x10"] {
            assert!(check_floating(ng).is_none(), "{ng}");
        }
        assert_eq!(parse_double("1e400"), Some(f64::INFINITY));
        assert_eq!(parse_float("-0"), Some(-0.0));
    }

    #[test]
    fn float_ordering() {
        assert_eq!(compare_floats(f64::NAN, f64::NAN), XmlSchemaValOrdering::Equal);
        assert_eq!(compare_floats(f64::NAN, f64::INFINITY), XmlSchemaValOrdering::Greater);
        assert_eq!(compare_floats(-0.0, 0.0), XmlSchemaValOrdering::Equal);
        assert_eq!(
            compare_floats(f64::NEG_INFINITY, -1e300),
            XmlSchemaValOrdering::Less
        );
    }

    #[test]
    fn canonical_forms() {
        assert_eq!(canonical_floating(1.0f64), "1.0E0");
        assert_eq!(canonical_floating(150.0f64), "1.5E2");
        assert_eq!(canonical_floating(-0.00125f64), "-1.25E-3");
        assert_eq!(canonical_floating(0.0f64), "0.0E0");
        assert_eq!(canonical_floating(0.1f32), "1.0E-1");
        assert_eq!(canonical_floating(f64::NEG_INFINITY), "-INF");
        assert_eq!(canonical_floating(f32::NAN), "NaN");
    }
}
