//! Provide methods and data structures for XML Schemas primitive datatypes.
//!
//! The types follow [XML Schema Part 2: Datatypes](https://www.w3.org/TR/xmlschema-2).
//! Only the primitives `string`, `boolean`, `float`, `double`, `decimal`,
//! `duration` and `dateTime` are provided. `time`, `date`, the `g*` types,
//! `hexBinary`, `base64Binary`, `anyURI`, `QName`, `NOTATION` and every
//! derived type are not implemented.
//!
//! This module is based on `libxml/xmlschemastypes.h`, `xmlschemastypes.c` and so on in `libxml2-v2.11.8`.
//! Please refer to original libxml2 documents also.

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

pub mod date;
pub mod decimal;
pub mod duration;
pub mod facets;
pub(crate) mod parse;
pub mod primitives;
pub(crate) mod unicode;

use std::{borrow::Cow, cmp::Ordering, fmt::Display, iter::once, str::FromStr};

use anyhow::anyhow;

use crate::error::XmlSchemaTypeError;

use primitives::{
    XmlSchemaBoolean, XmlSchemaDateTime, XmlSchemaDecimal, XmlSchemaDouble, XmlSchemaDuration,
    XmlSchemaFloat, XmlSchemaString,
};

/// The built-in primitive datatypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlSchemaValType {
    String,
    Boolean,
    Decimal,
    Float,
    Double,
    Duration,
    DateTime,
}

impl XmlSchemaValType {
    pub const ALL: [Self; 7] = [
        Self::String,
        Self::Boolean,
        Self::Decimal,
        Self::Float,
        Self::Double,
        Self::Duration,
        Self::DateTime,
    ];

    /// The local name of this type in the XML Schema namespace.
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Double => "double",
            Self::Duration => "duration",
            Self::DateTime => "dateTime",
        }
    }

    /// The value of the built-in whiteSpace facet.
    ///
    /// `string` preserves whitespace, every other primitive collapses it.
    pub fn whitespace(&self) -> XmlSchemaWhitespaceValueType {
        match self {
            Self::String => XmlSchemaWhitespaceValueType::Preserve,
            _ => XmlSchemaWhitespaceValueType::Collapse,
        }
    }
}

impl Display for XmlSchemaValType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<&str> for XmlSchemaValType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let local = value
            .strip_prefix("xs:")
            .or_else(|| value.strip_prefix("xsd:"))
            .unwrap_or(value);
        Self::ALL
            .into_iter()
            .find(|typ| typ.name() == local)
            .ok_or_else(|| anyhow!("'{value}' is not a supported XML Schema primitive type"))
    }
}

impl FromStr for XmlSchemaValType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlSchemaWhitespaceValueType {
    Preserve,
    Replace,
    Collapse,
}

impl XmlSchemaWhitespaceValueType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Preserve => "preserve",
            Self::Replace => "replace",
            Self::Collapse => "collapse",
        }
    }
}

impl FromStr for XmlSchemaWhitespaceValueType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preserve" => Ok(Self::Preserve),
            "replace" => Ok(Self::Replace),
            "collapse" => Ok(Self::Collapse),
            _ => Err(anyhow!("'{s}' is not a valid whiteSpace value")),
        }
    }
}

#[doc(alias = "IS_WSP_REPLACE_CH")]
fn is_wsp_replace_ch(c: char) -> bool {
    matches!(c, '\x09' | '\x0A' | '\x0D')
}

#[doc(alias = "IS_WSP_BLANK_CH")]
pub(crate) fn is_wsp_blank_ch(c: char) -> bool {
    matches!(c, '\x20' | '\x09' | '\x0A' | '\x0D')
}

/// Removes and normalize white spaces in the string
///
/// Returns the new string or `None` if no change was required.
#[doc(alias = "xmlSchemaCollapseString")]
pub fn xml_schema_collapse_string(value: &str) -> Option<Cow<'_, str>> {
    let start = value.trim_start_matches(is_wsp_blank_ch);
    let Some(col) = start
        .chars()
        .zip(start.chars().skip(1).chain(once('\0')))
        .position(|(f, s)| (f == ' ' && is_wsp_blank_ch(s)) || is_wsp_replace_ch(f))
    else {
        let res = start.trim_end_matches(is_wsp_blank_ch);
        return (res.len() != value.len()).then_some(Cow::Borrowed(res));
    };
    // `position` counts chars, slicing needs a byte offset.
    let col = start
        .char_indices()
        .nth(col)
        .map_or(start.len(), |(i, _)| i);
    let mut buf = String::with_capacity(start.len());
    buf.push_str(&start[..col]);
    let res = start[col..]
        .split(is_wsp_blank_ch)
        .filter(|s| !s.is_empty())
        .fold(buf, |mut buf, s| {
            if !buf.is_empty() {
                buf.push(' ');
            }
            buf.push_str(s);
            buf
        });
    Some(Cow::Owned(res))
}

/// Replaces 0xd, 0x9 and 0xa with a space.
///
/// Returns the new string or `None` if no change was required.
#[doc(alias = "xmlSchemaWhiteSpaceReplace")]
pub fn xml_schema_white_space_replace(value: &str) -> Option<String> {
    if !value.contains(['\x0D', '\x09', '\x0A']) {
        return None;
    }
    Some(value.replace(['\x0D', '\x09', '\x0A'], " "))
}

/// Apply a whiteSpace facet value to `value`.
pub fn xml_schema_normalize(value: &str, ws: XmlSchemaWhitespaceValueType) -> Cow<'_, str> {
    match ws {
        XmlSchemaWhitespaceValueType::Preserve => Cow::Borrowed(value),
        XmlSchemaWhitespaceValueType::Replace => {
            xml_schema_white_space_replace(value).map_or(Cow::Borrowed(value), Cow::Owned)
        }
        XmlSchemaWhitespaceValueType::Collapse => {
            xml_schema_collapse_string(value).unwrap_or(Cow::Borrowed(value))
        }
    }
}

/// A value of one of the primitive types.
#[derive(Debug, Clone)]
pub enum XmlSchemaVal {
    String(XmlSchemaString),
    Boolean(XmlSchemaBoolean),
    Decimal(XmlSchemaDecimal),
    Float(XmlSchemaFloat),
    Double(XmlSchemaDouble),
    Duration(XmlSchemaDuration),
    DateTime(XmlSchemaDateTime),
}

impl XmlSchemaVal {
    /// Parse `value` in the lexical space of `typ`.
    #[doc(alias = "xmlSchemaValPredefTypeNode")]
    pub fn parse(typ: XmlSchemaValType, value: &str) -> Result<Self, XmlSchemaTypeError> {
        Ok(match typ {
            XmlSchemaValType::String => Self::String(XmlSchemaString::parse(value)?),
            XmlSchemaValType::Boolean => Self::Boolean(XmlSchemaBoolean::parse(value)?),
            XmlSchemaValType::Decimal => Self::Decimal(XmlSchemaDecimal::parse(value)?),
            XmlSchemaValType::Float => Self::Float(XmlSchemaFloat::parse(value)?),
            XmlSchemaValType::Double => Self::Double(XmlSchemaDouble::parse(value)?),
            XmlSchemaValType::Duration => Self::Duration(XmlSchemaDuration::parse(value)?),
            XmlSchemaValType::DateTime => Self::DateTime(XmlSchemaDateTime::parse(value)?),
        })
    }

    #[doc(alias = "xmlSchemaGetValType")]
    pub fn typ(&self) -> XmlSchemaValType {
        match self {
            Self::String(_) => XmlSchemaValType::String,
            Self::Boolean(_) => XmlSchemaValType::Boolean,
            Self::Decimal(_) => XmlSchemaValType::Decimal,
            Self::Float(_) => XmlSchemaValType::Float,
            Self::Double(_) => XmlSchemaValType::Double,
            Self::Duration(_) => XmlSchemaValType::Duration,
            Self::DateTime(_) => XmlSchemaValType::DateTime,
        }
    }

    /// Get the canonical lexical representation of this value.
    ///
    /// Returns `None` if the value was built with an unchecked constructor
    /// and is not in the lexical space of its type.
    #[doc(alias = "xmlSchemaGetCanonValue")]
    pub fn canonical(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.as_str().to_owned()),
            Self::Boolean(b) => Some(b.to_string()),
            Self::Decimal(d) => d.canonical(),
            Self::Float(f) => Some(f.canonical()),
            Self::Double(d) => Some(d.canonical()),
            Self::Duration(d) => d.canonical(),
            Self::DateTime(d) => d.canonical(),
        }
    }
}

impl Display for XmlSchemaVal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(v) => v.fmt(f),
            Self::Boolean(v) => v.fmt(f),
            Self::Decimal(v) => v.fmt(f),
            Self::Float(v) => v.fmt(f),
            Self::Double(v) => v.fmt(f),
            Self::Duration(v) => v.fmt(f),
            Self::DateTime(v) => v.fmt(f),
        }
    }
}

impl PartialEq for XmlSchemaVal {
    fn eq(&self, other: &Self) -> bool {
        xml_schema_compare_values(self, other) == XmlSchemaValOrdering::Equal
    }
}

/// Check that `value` is in the lexical space of `typ`, and compute its value.
#[doc(alias = "xmlSchemaValidatePredefinedType")]
pub fn xml_schema_validate_predefined_type(
    typ: XmlSchemaValType,
    value: &str,
) -> Result<XmlSchemaVal, XmlSchemaTypeError> {
    XmlSchemaVal::parse(typ, value)
}

/// The result of comparing two values in their value space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlSchemaValOrdering {
    Less,
    Equal,
    Greater,
    /// Both values share a value space, but it is only partially ordered and
    /// the relation between them cannot be determined.
    Indeterminate,
    /// The values do not share a value space.
    Incomparable,
}

impl XmlSchemaValOrdering {
    pub fn as_ordering(&self) -> Option<Ordering> {
        match self {
            Self::Less => Some(Ordering::Less),
            Self::Equal => Some(Ordering::Equal),
            Self::Greater => Some(Ordering::Greater),
            Self::Indeterminate | Self::Incomparable => None,
        }
    }
}

impl From<Ordering> for XmlSchemaValOrdering {
    fn from(value: Ordering) -> Self {
        match value {
            Ordering::Less => Self::Less,
            Ordering::Equal => Self::Equal,
            Ordering::Greater => Self::Greater,
        }
    }
}

/// Compare 2 values.
///
/// `float` and `double` share a value space for comparison purposes, as in
/// `xmlSchemaCompareFloats`. Any other pair of different types is
/// `Incomparable`.
#[doc(alias = "xmlSchemaCompareValues")]
pub fn xml_schema_compare_values(x: &XmlSchemaVal, y: &XmlSchemaVal) -> XmlSchemaValOrdering {
    match (x, y) {
        (XmlSchemaVal::String(x), XmlSchemaVal::String(y)) => x.as_str().cmp(y.as_str()).into(),
        (XmlSchemaVal::Boolean(x), XmlSchemaVal::Boolean(y)) => x.get().cmp(&y.get()).into(),
        (XmlSchemaVal::Decimal(x), XmlSchemaVal::Decimal(y)) => x.compare(y),
        (XmlSchemaVal::Float(x), XmlSchemaVal::Float(y)) => {
            parse::compare_floats(x.get() as f64, y.get() as f64)
        }
        (XmlSchemaVal::Float(x), XmlSchemaVal::Double(y)) => {
            parse::compare_floats(x.get() as f64, y.get())
        }
        (XmlSchemaVal::Double(x), XmlSchemaVal::Float(y)) => {
            parse::compare_floats(x.get(), y.get() as f64)
        }
        (XmlSchemaVal::Double(x), XmlSchemaVal::Double(y)) => {
            parse::compare_floats(x.get(), y.get())
        }
        (XmlSchemaVal::Duration(x), XmlSchemaVal::Duration(y)) => x.compare(y),
        (XmlSchemaVal::DateTime(x), XmlSchemaVal::DateTime(y)) => x.compare(y),
        _ => XmlSchemaValOrdering::Incomparable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_string() {
        assert_eq!(xml_schema_collapse_string("abc"), None);
        assert_eq!(xml_schema_collapse_string("a b c"), None);
        assert_eq!(
            xml_schema_collapse_string("  a  b\tc \n").as_deref(),
            Some("a b c")
        );
        assert_eq!(xml_schema_collapse_string(" abc").as_deref(), Some("abc"));
        assert_eq!(xml_schema_collapse_string("\u{e9}\u{e9}\t\u{e9}").as_deref(), Some("\u{e9}\u{e9} \u{e9}"));
        assert_eq!(xml_schema_collapse_string(" \t ").as_deref(), Some(""));
    }

    #[test]
    fn white_space_replace() {
        assert_eq!(xml_schema_white_space_replace("a b"), None);
        assert_eq!(
            xml_schema_white_space_replace("a\tb\r\nc").as_deref(),
            Some("a b  c")
        );
    }

    #[test]
    fn normalize_by_facet_value() {
        let input = " a\t b ";
        assert_eq!(
            xml_schema_normalize(input, XmlSchemaWhitespaceValueType::Preserve),
            input
        );
        assert_eq!(
            xml_schema_normalize(input, XmlSchemaWhitespaceValueType::Replace),
            " a  b "
        );
        assert_eq!(
            xml_schema_normalize(input, XmlSchemaWhitespaceValueType::Collapse),
            "a b"
        );
    }

    #[test]
    fn type_names() {
        for typ in XmlSchemaValType::ALL {
            assert_eq!(typ.name().parse::<XmlSchemaValType>().unwrap(), typ);
        }
        assert_eq!(
            XmlSchemaValType::try_from("xs:dateTime").unwrap(),
            XmlSchemaValType::DateTime
        );
        assert!(XmlSchemaValType::try_from("integer").is_err());
        assert!(XmlSchemaValType::try_from("QName").is_err());
    }

    #[test]
    fn compare_across_types() {
        let f = XmlSchemaVal::parse(XmlSchemaValType::Float, "1.5").unwrap();
        let d = XmlSchemaVal::parse(XmlSchemaValType::Double, "1.5").unwrap();
        let s = XmlSchemaVal::parse(XmlSchemaValType::String, "1.5").unwrap();
        let dec = XmlSchemaVal::parse(XmlSchemaValType::Decimal, "1.5").unwrap();
        assert_eq!(xml_schema_compare_values(&f, &d), XmlSchemaValOrdering::Equal);
        assert_eq!(
            xml_schema_compare_values(&f, &s),
            XmlSchemaValOrdering::Incomparable
        );
        assert_eq!(
            xml_schema_compare_values(&dec, &d),
            XmlSchemaValOrdering::Incomparable
        );
        assert_ne!(dec, d);
    }

    #[test]
    fn compare_strings_and_booleans() {
        let a = XmlSchemaVal::parse(XmlSchemaValType::String, "abc").unwrap();
        let b = XmlSchemaVal::parse(XmlSchemaValType::String, "abd").unwrap();
        assert_eq!(xml_schema_compare_values(&a, &b), XmlSchemaValOrdering::Less);
        let t = XmlSchemaVal::parse(XmlSchemaValType::Boolean, "1").unwrap();
        let f = XmlSchemaVal::parse(XmlSchemaValType::Boolean, "false").unwrap();
        assert_eq!(xml_schema_compare_values(&t, &f), XmlSchemaValOrdering::Greater);
        let t2 = XmlSchemaVal::parse(XmlSchemaValType::Boolean, " true ").unwrap();
        assert_eq!(t, t2);
    }

    #[test]
    fn validate_predefined_type() {
        let val = xml_schema_validate_predefined_type(XmlSchemaValType::Decimal, " 3.0000 ")
            .unwrap();
        assert_eq!(val.typ(), XmlSchemaValType::Decimal);
        assert_eq!(val.canonical().as_deref(), Some("3.0"));
        let err = xml_schema_validate_predefined_type(XmlSchemaValType::Decimal, "3.0.0")
            .unwrap_err();
        assert!(matches!(
            err,
            XmlSchemaTypeError::Lexical {
                typ: XmlSchemaValType::Decimal,
                ..
            }
        ));
    }
}
