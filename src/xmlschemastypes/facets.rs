//! Constraining facets, as described in
//! [4.3 Constraining Facets](https://www.w3.org/TR/xmlschema-2/#rf-facets).
//!
//! This module is based on `xmlschemastypes.c` and `xmlschemas.c` in `libxml2-v2.11.8`.

// Copyright of the original code is the following.
// --------
// Summary: implementation of XML Schema Datatypes
// Description: module providing the XML Schema Datatypes implementation
//              both definition and validity checking
//
// Copy: See Copyright for the status of this software.
//
// Author: Daniel Veillard
// --------
// schemastypes.c : implementation of the XML Schema Datatypes definition and validity checking
//
// See Copyright for the status of this software.
//
// Daniel Veillard <veillard@redhat.com>

use std::{fmt::Display, rc::Rc, str::FromStr};

use anyhow::anyhow;
use regex::Regex;

use crate::error::{XmlSchemaFacetErrorKind, XmlSchemaTypeError};

use super::{
    XmlSchemaVal, XmlSchemaValOrdering, XmlSchemaValType, XmlSchemaWhitespaceValueType,
    parse::trim_collapse, unicode::xml_ucs_block_ranges, xml_schema_compare_values,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlSchemaFacetType {
    Length,
    MinLength,
    MaxLength,
    Pattern,
    Enumeration,
    WhiteSpace,
    MaxInclusive,
    MaxExclusive,
    MinInclusive,
    MinExclusive,
    TotalDigits,
    FractionDigits,
}

impl XmlSchemaFacetType {
    pub const ALL: [Self; 12] = [
        Self::Length,
        Self::MinLength,
        Self::MaxLength,
        Self::Pattern,
        Self::Enumeration,
        Self::WhiteSpace,
        Self::MaxInclusive,
        Self::MaxExclusive,
        Self::MinInclusive,
        Self::MinExclusive,
        Self::TotalDigits,
        Self::FractionDigits,
    ];

    /// The name of the facet element, e.g. `maxLength`.
    #[doc(alias = "xmlSchemaFacetTypeToString")]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Pattern => "pattern",
            Self::Enumeration => "enumeration",
            Self::WhiteSpace => "whiteSpace",
            Self::MaxInclusive => "maxInclusive",
            Self::MaxExclusive => "maxExclusive",
            Self::MinInclusive => "minInclusive",
            Self::MinExclusive => "minExclusive",
            Self::TotalDigits => "totalDigits",
            Self::FractionDigits => "fractionDigits",
        }
    }

    /// Whether this facet may restrict `base`.
    #[doc(alias = "xmlSchemaIsBuiltInTypeFacet")]
    pub fn is_applicable(&self, base: XmlSchemaValType) -> bool {
        use XmlSchemaFacetType::*;

        match base {
            XmlSchemaValType::String => matches!(
                self,
                Length | MinLength | MaxLength | Pattern | Enumeration | WhiteSpace
            ),
            XmlSchemaValType::Boolean => matches!(self, Pattern | WhiteSpace),
            XmlSchemaValType::Float
            | XmlSchemaValType::Double
            | XmlSchemaValType::Duration
            | XmlSchemaValType::DateTime => matches!(
                self,
                Pattern
                    | Enumeration
                    | WhiteSpace
                    | MaxInclusive
                    | MaxExclusive
                    | MinInclusive
                    | MinExclusive
            ),
            XmlSchemaValType::Decimal => !matches!(self, Length | MinLength | MaxLength),
        }
    }

    fn is_bound(&self) -> bool {
        matches!(
            self,
            Self::MaxInclusive | Self::MaxExclusive | Self::MinInclusive | Self::MinExclusive
        )
    }
}

impl Display for XmlSchemaFacetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for XmlSchemaFacetType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|facet| facet.name() == value)
            .ok_or_else(|| anyhow!("'{value}' is not a constraining facet"))
    }
}

impl FromStr for XmlSchemaFacetType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

// NameStartChar of XML 1.0 fifth edition, without brackets.
const NAME_START_CHARS: &str = "A-Z_:a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}\u{200C}-\u{200D}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}\u{10000}-\u{EFFFF}";
// NameChar minus NameStartChar.
const NAME_EXTRA_CHARS: &str = "\\-.0-9\u{B7}\u{300}-\u{36F}\u{203F}-\u{2040}";

/// Write the ranges of a Unicode block as a character class.
///
/// Surrogate code points are not `char`s and are left out, so a block made
/// only of surrogates matches nothing.
fn push_block_class(out: &mut String, ranges: &[(u32, u32)], negated: bool) {
    const SURROGATES: (u32, u32) = (0xD800, 0xDFFF);

    let mut class = String::new();
    for &(lo, hi) in ranges {
        let parts = [(lo, hi.min(SURROGATES.0 - 1)), (lo.max(SURROGATES.1 + 1), hi)];
        for (lo, hi) in parts.into_iter().filter(|(lo, hi)| lo <= hi) {
            class.push_str(&format!("\\x{{{lo:X}}}-\\x{{{hi:X}}}"));
        }
    }
    match (class.is_empty(), negated) {
        (false, false) => out.push_str(&format!("[{class}]")),
        (false, true) => out.push_str(&format!("[^{class}]")),
        (true, false) => out.push_str("[^\\x{0}-\\x{10FFFF}]"),
        (true, true) => out.push_str("[\\x{0}-\\x{10FFFF}]"),
    }
}

/// Translate an XML Schema regular expression into the syntax of the `regex` crate.
///
/// XML Schema expressions are implicitly anchored and have no `^` or `$`
/// metacharacters. The multi-character escapes `\i`, `\c`, `\s`, `\w` and
/// `.` are defined differently, and character class subtraction is written
/// `[a-z-[aeiou]]`.
pub fn xml_schema_translate_regexp(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("^(?:");
    // nesting depth of character classes
    let mut depth = 0usize;
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('i') => out.push_str(&format!("[{NAME_START_CHARS}]")),
                Some('I') => out.push_str(&format!("[^{NAME_START_CHARS}]")),
                Some('c') => out.push_str(&format!("[{NAME_START_CHARS}{NAME_EXTRA_CHARS}]")),
                Some('C') => out.push_str(&format!("[^{NAME_START_CHARS}{NAME_EXTRA_CHARS}]")),
                Some('s') => out.push_str("[ \\t\\n\\r]"),
                Some('S') => out.push_str("[^ \\t\\n\\r]"),
                Some('d') => out.push_str("\\p{Nd}"),
                Some('D') => out.push_str("\\P{Nd}"),
                Some('w') => out.push_str("[^\\p{P}\\p{Z}\\p{C}]"),
                Some('W') => out.push_str("[\\p{P}\\p{Z}\\p{C}]"),
                Some(esc @ ('p' | 'P')) if chars.peek() == Some(&'{') => {
                    let name = chars
                        .by_ref()
                        .skip(1)
                        .take_while(|&c| c != '}')
                        .collect::<String>();
                    match name.strip_prefix("Is").and_then(xml_ucs_block_ranges) {
                        Some(ranges) => push_block_class(&mut out, &ranges, esc == 'P'),
                        None => out.push_str(&format!("\\{esc}{{{name}}}")),
                    }
                }
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '[' => {
                depth += 1;
                out.push('[');
                if chars.next_if_eq(&'^').is_some() {
                    out.push('^');
                }
            }
            ']' if depth > 0 => {
                depth -= 1;
                out.push(']');
            }
            '-' if depth > 0 && chars.peek() == Some(&'[') => out.push_str("--"),
            '&' | '~' if depth > 0 => {
                out.push('\\');
                out.push(c);
            }
            '.' if depth == 0 => out.push_str("[^\\n\\r]"),
            '^' | '$' if depth == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push_str(")$");
    out
}

#[doc(alias = "xmlRegexpCompile")]
pub fn xml_schema_regexp_compile(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&xml_schema_translate_regexp(pattern))
}

#[derive(Debug, Clone)]
enum XmlSchemaFacetValue {
    Count(usize),
    Pattern(Regex),
    WhiteSpace(XmlSchemaWhitespaceValueType),
    // `None` until the facet is checked against its base type
    Value(Option<XmlSchemaVal>),
}

/// A constraining facet and its compiled value.
#[derive(Debug, Clone)]
pub struct XmlSchemaFacet {
    typ: XmlSchemaFacetType,
    value: Rc<str>,
    compiled: XmlSchemaFacetValue,
}

impl XmlSchemaFacet {
    /// Build a facet from the lexical form of its value.
    ///
    /// Counts, patterns and whiteSpace values are compiled here. Bounds and
    /// enumerations depend on the base type and are parsed by [`Self::check`].
    #[doc(alias = "xmlSchemaNewFacet")]
    pub fn new(typ: XmlSchemaFacetType, value: &str) -> Result<Self, XmlSchemaTypeError> {
        let compiled = match typ {
            XmlSchemaFacetType::Length
            | XmlSchemaFacetType::MinLength
            | XmlSchemaFacetType::MaxLength
            | XmlSchemaFacetType::FractionDigits => {
                XmlSchemaFacetValue::Count(parse_count(typ, value)?)
            }
            XmlSchemaFacetType::TotalDigits => match parse_count(typ, value)? {
                0 => {
                    return Err(XmlSchemaTypeError::invalid_facet(
                        typ,
                        value,
                        "expected a positive integer",
                    ));
                }
                n => XmlSchemaFacetValue::Count(n),
            },
            XmlSchemaFacetType::Pattern => match xml_schema_regexp_compile(value) {
                Ok(re) => XmlSchemaFacetValue::Pattern(re),
                Err(err) => {
                    return Err(XmlSchemaTypeError::invalid_facet(
                        typ,
                        value,
                        format!("the pattern cannot be compiled: {err}"),
                    ));
                }
            },
            XmlSchemaFacetType::WhiteSpace => match trim_collapse(value).parse() {
                Ok(ws) => XmlSchemaFacetValue::WhiteSpace(ws),
                Err(_) => {
                    return Err(XmlSchemaTypeError::invalid_facet(
                        typ,
                        value,
                        "expected 'preserve', 'replace' or 'collapse'",
                    ));
                }
            },
            XmlSchemaFacetType::Enumeration
            | XmlSchemaFacetType::MaxInclusive
            | XmlSchemaFacetType::MaxExclusive
            | XmlSchemaFacetType::MinInclusive
            | XmlSchemaFacetType::MinExclusive => XmlSchemaFacetValue::Value(None),
        };
        Ok(Self {
            typ,
            value: value.into(),
            compiled,
        })
    }

    pub fn typ(&self) -> XmlSchemaFacetType {
        self.typ
    }

    /// The lexical form the facet was built from.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value of a length or digits facet.
    #[doc(alias = "xmlSchemaGetFacetValueAsULong")]
    pub fn count(&self) -> Option<usize> {
        match self.compiled {
            XmlSchemaFacetValue::Count(n) => Some(n),
            _ => None,
        }
    }

    pub fn whitespace(&self) -> Option<XmlSchemaWhitespaceValueType> {
        match self.compiled {
            XmlSchemaFacetValue::WhiteSpace(ws) => Some(ws),
            _ => None,
        }
    }

    /// The value of a bound or enumeration facet, once checked.
    pub fn val(&self) -> Option<&XmlSchemaVal> {
        match &self.compiled {
            XmlSchemaFacetValue::Value(val) => val.as_ref(),
            _ => None,
        }
    }

    /// Check that this facet can restrict `base`, and parse its value in the
    /// value space of `base` if needed.
    #[doc(alias = "xmlSchemaCheckFacet")]
    pub fn check(&mut self, base: XmlSchemaValType) -> Result<(), XmlSchemaTypeError> {
        if !self.typ.is_applicable(base) {
            return Err(XmlSchemaTypeError::facet_error(
                self.typ,
                XmlSchemaFacetErrorKind::NotApplicable,
                &self.value,
                format!("not applicable to the type 'xs:{}'", base.name()),
            ));
        }
        match &mut self.compiled {
            XmlSchemaFacetValue::WhiteSpace(ws)
                if base != XmlSchemaValType::String
                    && *ws != XmlSchemaWhitespaceValueType::Collapse =>
            {
                Err(XmlSchemaTypeError::invalid_facet(
                    self.typ,
                    &self.value,
                    format!("the whiteSpace of 'xs:{}' is fixed to 'collapse'", base.name()),
                ))
            }
            XmlSchemaFacetValue::Value(val) => {
                let parsed = XmlSchemaVal::parse(base, &self.value).map_err(|_| {
                    XmlSchemaTypeError::invalid_facet(
                        self.typ,
                        &self.value,
                        format!("not a valid value of the type 'xs:{}'", base.name()),
                    )
                })?;
                *val = Some(parsed);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Whether `normalized` is matched by this pattern facet.
    pub fn matches(&self, normalized: &str) -> bool {
        match &self.compiled {
            XmlSchemaFacetValue::Pattern(re) => re.is_match(normalized),
            _ => false,
        }
    }

    /// Whether `value` equals this enumeration facet.
    pub fn enumerates(&self, value: &XmlSchemaVal) -> bool {
        self.val()
            .is_some_and(|val| xml_schema_compare_values(value, val) == XmlSchemaValOrdering::Equal)
    }

    /// Validate a value against this facet.
    ///
    /// `normalized` is the lexical form after whitespace normalization, and
    /// `value` its parsed value.
    #[doc(alias = "xmlSchemaValidateFacet")]
    pub fn validate(
        &self,
        base: XmlSchemaValType,
        normalized: &str,
        value: &XmlSchemaVal,
    ) -> Result<(), XmlSchemaTypeError> {
        let violation = |constraint: String| XmlSchemaTypeError::FacetViolation {
            facet: self.typ,
            value: normalized.to_owned(),
            constraint,
        };
        if !self.typ.is_applicable(base) {
            return Err(XmlSchemaTypeError::facet_error(
                self.typ,
                XmlSchemaFacetErrorKind::NotApplicable,
                &self.value,
                format!("not applicable to the type 'xs:{}'", base.name()),
            ));
        }

        match (&self.compiled, self.typ) {
            (XmlSchemaFacetValue::Count(n), XmlSchemaFacetType::Length) => {
                let len = normalized.chars().count();
                (len == *n).then_some(()).ok_or_else(|| {
                    violation(format!(
                        "has a length of '{len}'; this differs from the allowed length of '{n}'."
                    ))
                })
            }
            (XmlSchemaFacetValue::Count(n), XmlSchemaFacetType::MinLength) => {
                let len = normalized.chars().count();
                (len >= *n).then_some(()).ok_or_else(|| {
                    violation(format!(
                        "has a length of '{len}'; this underruns the allowed minimum length of '{n}'."
                    ))
                })
            }
            (XmlSchemaFacetValue::Count(n), XmlSchemaFacetType::MaxLength) => {
                let len = normalized.chars().count();
                (len <= *n).then_some(()).ok_or_else(|| {
                    violation(format!(
                        "has a length of '{len}'; this exceeds the allowed maximum length of '{n}'."
                    ))
                })
            }
            (XmlSchemaFacetValue::Count(n), XmlSchemaFacetType::TotalDigits) => {
                let XmlSchemaVal::Decimal(dec) = value else {
                    return Err(violation("is not a decimal.".to_owned()));
                };
                match dec.value() {
                    Some(d) if d.total_digits() <= *n => Ok(()),
                    _ => Err(violation(format!(
                        "has more digits than are allowed ('{n}')."
                    ))),
                }
            }
            (XmlSchemaFacetValue::Count(n), XmlSchemaFacetType::FractionDigits) => {
                let XmlSchemaVal::Decimal(dec) = value else {
                    return Err(violation("is not a decimal.".to_owned()));
                };
                match dec.value() {
                    Some(d) if d.fraction_digits() <= *n => Ok(()),
                    _ => Err(violation(format!(
                        "has more fractional digits than are allowed ('{n}')."
                    ))),
                }
            }
            (XmlSchemaFacetValue::Pattern(re), _) => {
                re.is_match(normalized).then_some(()).ok_or_else(|| {
                    violation(format!("is not accepted by the pattern '{}'.", self.value))
                })
            }
            (XmlSchemaFacetValue::WhiteSpace(_), _) => Ok(()),
            (XmlSchemaFacetValue::Value(None), _) => Err(XmlSchemaTypeError::invalid_facet(
                self.typ,
                &self.value,
                "the facet has not been checked against a base type",
            )),
            (XmlSchemaFacetValue::Value(Some(val)), XmlSchemaFacetType::Enumeration) => {
                self.enumerates(value).then_some(()).ok_or_else(|| {
                    violation(format!("is not an element of the set {{'{val}'}}."))
                })
            }
            (XmlSchemaFacetValue::Value(Some(val)), typ) if typ.is_bound() => {
                let ord = xml_schema_compare_values(value, val);
                let (ok, constraint) = match typ {
                    XmlSchemaFacetType::MinInclusive => (
                        matches!(ord, XmlSchemaValOrdering::Greater | XmlSchemaValOrdering::Equal),
                        format!("is less than the minimum value allowed ('{val}')."),
                    ),
                    XmlSchemaFacetType::MaxInclusive => (
                        matches!(ord, XmlSchemaValOrdering::Less | XmlSchemaValOrdering::Equal),
                        format!("is greater than the maximum value allowed ('{val}')."),
                    ),
                    XmlSchemaFacetType::MinExclusive => (
                        ord == XmlSchemaValOrdering::Greater,
                        format!("must be greater than '{val}'."),
                    ),
                    _ => (
                        ord == XmlSchemaValOrdering::Less,
                        format!("must be less than '{val}'."),
                    ),
                };
                ok.then_some(()).ok_or_else(|| violation(constraint))
            }
            _ => Err(XmlSchemaTypeError::invalid_facet(
                self.typ,
                &self.value,
                "the facet value does not match the facet kind",
            )),
        }
    }
}

/// Parse a `nonNegativeInteger` facet value.
fn parse_count(typ: XmlSchemaFacetType, value: &str) -> Result<usize, XmlSchemaTypeError> {
    let digits = trim_collapse(value);
    let digits = digits.strip_prefix('+').unwrap_or(digits);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(XmlSchemaTypeError::invalid_facet(
            typ,
            value,
            "expected a non-negative integer",
        ));
    }
    digits
        .parse()
        .map_err(|_| XmlSchemaTypeError::invalid_facet(typ, value, "the value is too large"))
}

/// Build the error for a value that matches none of `facets`, which are the
/// enumeration facets of one type.
pub(crate) fn xml_schema_enumeration_error(
    normalized: &str,
    facets: &[&XmlSchemaFacet],
) -> XmlSchemaTypeError {
    let set = facets
        .iter()
        .map(|facet| format!("'{}'", facet.value()))
        .collect::<Vec<_>>()
        .join(", ");
    XmlSchemaTypeError::FacetViolation {
        facet: XmlSchemaFacetType::Enumeration,
        value: normalized.to_owned(),
        constraint: format!("is not an element of the set {{{set}}}."),
    }
}

/// Build the error for a value that matches none of `facets`, which are the
/// pattern facets of one type.
pub(crate) fn xml_schema_pattern_error(
    normalized: &str,
    facets: &[&XmlSchemaFacet],
) -> XmlSchemaTypeError {
    let patterns = facets
        .iter()
        .map(|facet| facet.value())
        .collect::<Vec<_>>()
        .join("|");
    XmlSchemaTypeError::FacetViolation {
        facet: XmlSchemaFacetType::Pattern,
        value: normalized.to_owned(),
        constraint: format!("is not accepted by the pattern '{patterns}'."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked(typ: XmlSchemaFacetType, value: &str, base: XmlSchemaValType) -> XmlSchemaFacet {
        let mut facet = XmlSchemaFacet::new(typ, value).unwrap();
        facet.check(base).unwrap();
        facet
    }

    fn validate(facet: &XmlSchemaFacet, base: XmlSchemaValType, lexical: &str) -> bool {
        let value = XmlSchemaVal::parse(base, lexical).unwrap();
        facet.validate(base, lexical, &value).is_ok()
    }

    #[test]
    fn facet_names() {
        for facet in XmlSchemaFacetType::ALL {
            assert_eq!(XmlSchemaFacetType::try_from(facet.name()).unwrap(), facet);
        }
        assert!("maxlength".parse::<XmlSchemaFacetType>().is_err());
    }

    #[test]
    fn translate_regexp() {
        assert_eq!(xml_schema_translate_regexp("a|b"), "^(?:a|b)$");
        assert_eq!(xml_schema_translate_regexp("^a$"), "^(?:\\^a\\$)$");
        assert_eq!(xml_schema_translate_regexp("[a-z-[aeiou]]"), "^(?:[a-z--[aeiou]])$");
        assert_eq!(xml_schema_translate_regexp("a.b"), "^(?:a[^\\n\\r]b)$");
        assert_eq!(xml_schema_translate_regexp("[.]"), "^(?:[.])$");
    }

    #[test]
    fn patterns() {
        let re = xml_schema_regexp_compile("\\d{3}-[A-Z]{2}").unwrap();
        assert!(re.is_match("123-AB"));
        assert!(!re.is_match("x123-AB"));
        assert!(!re.is_match("123-ABC"));
        let re = xml_schema_regexp_compile("\\i\\c*").unwrap();
        assert!(re.is_match("_foo-bar.1"));
        assert!(!re.is_match("1foo"));
        let re = xml_schema_regexp_compile("[a-z-[aeiou]]+").unwrap();
        assert!(re.is_match("xyz"));
        assert!(!re.is_match("xaz"));
        let re = xml_schema_regexp_compile("\\s\\S").unwrap();
        assert!(re.is_match(" a"));
        assert!(!re.is_match("\u{A0}a"));
        let re = xml_schema_regexp_compile("a.c").unwrap();
        assert!(re.is_match("abc"));
        assert!(!re.is_match("a\nc"));
        assert!(xml_schema_regexp_compile("(ab").is_err());
    }

    #[test]
    fn block_escapes() {
        assert!(XmlSchemaFacet::new(XmlSchemaFacetType::Pattern, "\\p{IsBasicLatin}+").is_ok());
        let re = xml_schema_regexp_compile("\\p{IsBasicLatin}+").unwrap();
        assert!(re.is_match("Hello, world"));
        assert!(!re.is_match("caf\u{E9}"));
        let re = xml_schema_regexp_compile("\\P{IsGreek}\\p{IsGreek}").unwrap();
        assert!(re.is_match("a\u{3B1}"));
        assert!(!re.is_match("\u{3B1}\u{3B1}"));
        let re = xml_schema_regexp_compile("[\\p{IsGreek}a-c]+").unwrap();
        assert!(re.is_match("a\u{3B2}c"));
        assert!(!re.is_match("d"));
        let re = xml_schema_regexp_compile("\\p{IsPrivateUse}").unwrap();
        assert!(re.is_match("\u{F0000}"));
        let re = xml_schema_regexp_compile("\\p{IsHighSurrogates}?").unwrap();
        assert!(re.is_match(""));
        assert!(!re.is_match("a"));
        let re = xml_schema_regexp_compile("\\p{Lu}").unwrap();
        assert!(re.is_match("A"));
        assert!(XmlSchemaFacet::new(XmlSchemaFacetType::Pattern, "\\p{IsNoSuchBlock}").is_err());
    }

    #[test]
    fn construction_errors() {
        let err = XmlSchemaFacet::new(XmlSchemaFacetType::MaxLength, "-1").unwrap_err();
        assert!(matches!(err, XmlSchemaTypeError::InvalidFacet { .. }));
        assert!(XmlSchemaFacet::new(XmlSchemaFacetType::TotalDigits, "0").is_err());
        assert!(XmlSchemaFacet::new(XmlSchemaFacetType::FractionDigits, "0").is_ok());
        assert!(XmlSchemaFacet::new(XmlSchemaFacetType::Length, "99999999999999999999999").is_err());
        assert!(XmlSchemaFacet::new(XmlSchemaFacetType::Pattern, "[a-").is_err());
        assert!(XmlSchemaFacet::new(XmlSchemaFacetType::WhiteSpace, "trim").is_err());
        assert_eq!(
            XmlSchemaFacet::new(XmlSchemaFacetType::MinLength, " +3 ")
                .unwrap()
                .count(),
            Some(3)
        );
    }

    #[test]
    fn applicability() {
        let mut facet = XmlSchemaFacet::new(XmlSchemaFacetType::MaxLength, "3").unwrap();
        let err = facet.check(XmlSchemaValType::Decimal).unwrap_err();
        assert_eq!(
            err.code(),
            crate::error::XmlSchemaErrorCode::XmlSchemapUnknownFacetType
        );
        assert!(matches!(
            err,
            XmlSchemaTypeError::InvalidFacet {
                kind: XmlSchemaFacetErrorKind::NotApplicable,
                ..
            }
        ));
        let mut facet = XmlSchemaFacet::new(XmlSchemaFacetType::Enumeration, "true").unwrap();
        assert!(facet.check(XmlSchemaValType::Boolean).is_err());
        let mut facet = XmlSchemaFacet::new(XmlSchemaFacetType::TotalDigits, "3").unwrap();
        assert!(facet.check(XmlSchemaValType::Double).is_err());
        assert!(facet.check(XmlSchemaValType::Decimal).is_ok());
        let mut facet = XmlSchemaFacet::new(XmlSchemaFacetType::WhiteSpace, "preserve").unwrap();
        assert!(facet.check(XmlSchemaValType::String).is_ok());
        assert!(facet.check(XmlSchemaValType::Decimal).is_err());
        let mut facet = XmlSchemaFacet::new(XmlSchemaFacetType::MaxInclusive, "abc").unwrap();
        let err = facet.check(XmlSchemaValType::Decimal).unwrap_err();
        assert_eq!(
            err.code(),
            crate::error::XmlSchemaErrorCode::XmlSchemapInvalidFacetValue
        );
    }

    #[test]
    fn length_family() {
        let base = XmlSchemaValType::String;
        let len = checked(XmlSchemaFacetType::Length, "3", base);
        assert!(validate(&len, base, "abc"));
        assert!(validate(&len, base, "日本語"));
        assert!(!validate(&len, base, "ab"));
        let min = checked(XmlSchemaFacetType::MinLength, "2", base);
        assert!(validate(&min, base, "ab"));
        assert!(!validate(&min, base, "a"));
        let max = checked(XmlSchemaFacetType::MaxLength, "2", base);
        assert!(validate(&max, base, ""));
        let value = XmlSchemaVal::parse(base, "abc").unwrap();
        let err = max.validate(base, "abc", &value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "[facet 'maxLength'] The value 'abc' has a length of '3'; this exceeds the allowed maximum length of '2'."
        );
    }

    #[test]
    fn bounds() {
        let base = XmlSchemaValType::Decimal;
        let min = checked(XmlSchemaFacetType::MinInclusive, "1.5", base);
        assert!(validate(&min, base, "1.50"));
        assert!(!validate(&min, base, "1.49"));
        let max = checked(XmlSchemaFacetType::MaxExclusive, "10", base);
        assert!(validate(&max, base, "9.999"));
        assert!(!validate(&max, base, "10.0"));

        let base = XmlSchemaValType::Duration;
        let max = checked(XmlSchemaFacetType::MaxInclusive, "P30D", base);
        assert!(validate(&max, base, "P29D"));
        // P1M is indeterminate against P30D
        assert!(!validate(&max, base, "P1M"));
        let min = checked(XmlSchemaFacetType::MinExclusive, "P1460D", base);
        assert!(validate(&min, base, "P1461D"));
        // four years may hold no leap day
        assert!(!validate(&min, base, "P4Y"));

        let base = XmlSchemaValType::Double;
        let min = checked(XmlSchemaFacetType::MinExclusive, "-INF", base);
        assert!(validate(&min, base, "-1e308"));
        assert!(!validate(&min, base, "-INF"));
    }

    #[test]
    fn digits() {
        let base = XmlSchemaValType::Decimal;
        let total = checked(XmlSchemaFacetType::TotalDigits, "4", base);
        assert!(validate(&total, base, "12.34"));
        assert!(validate(&total, base, "0012.3400"));
        assert!(!validate(&total, base, "123.45"));
        let frac = checked(XmlSchemaFacetType::FractionDigits, "0", base);
        assert!(validate(&frac, base, "42.000"));
        assert!(!validate(&frac, base, "42.5"));
    }

    #[test]
    fn enumeration() {
        let base = XmlSchemaValType::Decimal;
        let facet = checked(XmlSchemaFacetType::Enumeration, "3.0", base);
        assert!(validate(&facet, base, "3"));
        assert!(validate(&facet, base, "3.0000"));
        assert!(!validate(&facet, base, "3.1"));

        let unchecked = XmlSchemaFacet::new(XmlSchemaFacetType::Enumeration, "3").unwrap();
        let value = XmlSchemaVal::parse(base, "3").unwrap();
        assert!(matches!(
            unchecked.validate(base, "3", &value),
            Err(XmlSchemaTypeError::InvalidFacet { .. })
        ));
    }
}
