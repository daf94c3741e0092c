//! Named value types for the primitive datatypes.
//!
//! Every type has a total constructor `new`, which performs no check, and a
//! fallible `parse`, which only returns values in the lexical space of the
//! type.

use std::{fmt::Display, rc::Rc, str::FromStr};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, TimeDelta, TimeZone, Timelike};

use crate::error::XmlSchemaTypeError;

use super::{
    XmlSchemaValOrdering, XmlSchemaValType,
    date::XmlSchemaValDate,
    decimal::XmlSchemaValDecimal,
    duration::XmlSchemaValDuration,
    parse::{
        canonical_floating, compare_floats, parse_boolean, parse_double, parse_float, trim_collapse,
    },
};

/// The format used by `from_calendar`.
pub const XML_SCHEMA_CALENDAR_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Implement [3.2.1 string](https://www.w3.org/TR/xmlschema-2/#string)
/// of [XML Schema Part 2: Datatypes](https://www.w3.org/TR/xmlschema-2)
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct XmlSchemaString(Rc<str>);

/// Check the `Char` production of XML 1.0.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\x09' | '\x0A' | '\x0D' | '\x20'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

impl XmlSchemaString {
    pub fn new(data: &str) -> Self {
        Self(data.into())
    }

    /// Accept any sequence of XML characters.
    pub fn parse(data: &str) -> Result<Self, XmlSchemaTypeError> {
        if !data.chars().all(is_xml_char) {
            return Err(XmlSchemaTypeError::lexical(XmlSchemaValType::String, data));
        }
        Ok(Self::new(data))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The length in characters, as checked by the length facets.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for XmlSchemaString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for XmlSchemaString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for XmlSchemaString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for XmlSchemaString {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl FromStr for XmlSchemaString {
    type Err = XmlSchemaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Implement [3.2.2 boolean](https://www.w3.org/TR/xmlschema-2/#boolean)
/// of [XML Schema Part 2: Datatypes](https://www.w3.org/TR/xmlschema-2)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct XmlSchemaBoolean(bool);

impl XmlSchemaBoolean {
    pub fn new(value: bool) -> Self {
        Self(value)
    }

    pub fn parse(data: &str) -> Result<Self, XmlSchemaTypeError> {
        parse_boolean(data)
            .map(Self)
            .ok_or_else(|| XmlSchemaTypeError::lexical(XmlSchemaValType::Boolean, data))
    }

    pub fn get(&self) -> bool {
        self.0
    }
}

impl Display for XmlSchemaBoolean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.0 { "true" } else { "false" })
    }
}

impl From<bool> for XmlSchemaBoolean {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<XmlSchemaBoolean> for bool {
    fn from(value: XmlSchemaBoolean) -> Self {
        value.0
    }
}

impl FromStr for XmlSchemaBoolean {
    type Err = XmlSchemaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

macro_rules! impl_xml_schema_floating {
    ( $( #[$attr:meta] )* $name:ident, $native:ty, $parse:ident, $typ:ident ) => {
        $( #[$attr] )*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name($native);

        impl $name {
            /// Wrap `value`, keeping its bit pattern.
            pub fn new(value: $native) -> Self {
                Self(value)
            }

            pub fn parse(data: &str) -> Result<Self, XmlSchemaTypeError> {
                $parse(data)
                    .map(Self)
                    .ok_or_else(|| XmlSchemaTypeError::lexical(XmlSchemaValType::$typ, data))
            }

            pub fn get(&self) -> $native {
                self.0
            }

            pub fn canonical(&self) -> String {
                canonical_floating(self.0)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.0.is_nan() {
                    f.write_str("NaN")
                } else if self.0.is_infinite() {
                    f.write_str(if self.0 > 0.0 { "INF" } else { "-INF" })
                } else {
                    write!(f, "{}", self.0)
                }
            }
        }

        impl From<$native> for $name {
            fn from(value: $native) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $native {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = XmlSchemaTypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        /// `NaN` equals itself, and `0` equals `-0`.
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                compare_floats(self.0 as f64, other.0 as f64) == XmlSchemaValOrdering::Equal
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                compare_floats(self.0 as f64, other.0 as f64).as_ordering()
            }
        }
    };
}

impl_xml_schema_floating!(
    /// Implement [3.2.4 float](https://www.w3.org/TR/xmlschema-2/#float)
    /// of [XML Schema Part 2: Datatypes](https://www.w3.org/TR/xmlschema-2)
    XmlSchemaFloat,
    f32,
    parse_float,
    Float
);
impl_xml_schema_floating!(
    /// Implement [3.2.5 double](https://www.w3.org/TR/xmlschema-2/#double)
    /// of [XML Schema Part 2: Datatypes](https://www.w3.org/TR/xmlschema-2)
    XmlSchemaDouble,
    f64,
    parse_double,
    Double
);

/// Compare the parsed values of two text-backed values.
///
/// Identical text is always `Equal`, even when it is not in the lexical space.
fn compare_text_values<T>(
    (xtext, xval): (&str, Option<&T>),
    (ytext, yval): (&str, Option<&T>),
    compare: impl FnOnce(&T, &T) -> XmlSchemaValOrdering,
) -> XmlSchemaValOrdering {
    match (xval, yval) {
        (Some(x), Some(y)) => compare(x, y),
        _ if xtext == ytext => XmlSchemaValOrdering::Equal,
        _ => XmlSchemaValOrdering::Incomparable,
    }
}

macro_rules! impl_xml_schema_text_value {
    ( $name:ident, $val:ty, $typ:ident ) => {
        impl $name {
            /// Wrap `data` without checking it.
            ///
            /// The value is still computed when `data` happens to be in the
            /// lexical space, so that comparisons work.
            pub fn new(data: &str) -> Self {
                Self {
                    text: data.into(),
                    value: <$val>::parse(data),
                }
            }

            pub fn parse(data: &str) -> Result<Self, XmlSchemaTypeError> {
                let value = <$val>::parse(data)
                    .ok_or_else(|| XmlSchemaTypeError::lexical(XmlSchemaValType::$typ, data))?;
                Ok(Self {
                    text: trim_collapse(data).into(),
                    value: Some(value),
                })
            }

            pub fn as_str(&self) -> &str {
                &self.text
            }

            /// The parsed value, if the text is in the lexical space.
            pub fn value(&self) -> Option<&$val> {
                self.value.as_ref()
            }

            pub fn compare(&self, other: &Self) -> XmlSchemaValOrdering {
                compare_text_values(
                    (&*self.text, self.value.as_ref()),
                    (&*other.text, other.value.as_ref()),
                    <$val>::compare,
                )
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.text
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.text)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = XmlSchemaTypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.compare(other) == XmlSchemaValOrdering::Equal
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                self.compare(other).as_ordering()
            }
        }
    };
}

/// Implement [3.2.3 decimal](https://www.w3.org/TR/xmlschema-2/#decimal)
/// of [XML Schema Part 2: Datatypes](https://www.w3.org/TR/xmlschema-2)
///
/// The text is kept as given. Equality and ordering use the numeric value,
/// so `3.0` equals `3.0000`.
#[derive(Debug, Clone)]
pub struct XmlSchemaDecimal {
    text: Rc<str>,
    value: Option<XmlSchemaValDecimal>,
}

impl_xml_schema_text_value!(XmlSchemaDecimal, XmlSchemaValDecimal, Decimal);

impl XmlSchemaDecimal {
    pub fn canonical(&self) -> Option<String> {
        self.value.as_ref().map(XmlSchemaValDecimal::canonical)
    }
}

impl From<i64> for XmlSchemaDecimal {
    fn from(value: i64) -> Self {
        Self::new(&value.to_string())
    }
}

impl From<u64> for XmlSchemaDecimal {
    fn from(value: u64) -> Self {
        Self::new(&value.to_string())
    }
}

/// Implement [3.2.6 duration](https://www.w3.org/TR/xmlschema-2/#duration)
/// of [XML Schema Part 2: Datatypes](https://www.w3.org/TR/xmlschema-2)
#[derive(Debug, Clone)]
pub struct XmlSchemaDuration {
    text: Rc<str>,
    value: Option<XmlSchemaValDuration>,
}

impl_xml_schema_text_value!(XmlSchemaDuration, XmlSchemaValDuration, Duration);

impl XmlSchemaDuration {
    /// Render a calendar value with `%Y-%m-%dT%H:%M:%S%z`.
    ///
    /// The result is not a `PnYnMnDTnHnMnS` literal, so it carries no
    /// duration value.
    pub fn from_calendar<Tz: TimeZone>(cal: &DateTime<Tz>) -> Self
    where
        Tz::Offset: Display,
    {
        Self {
            text: cal.format(XML_SCHEMA_CALENDAR_FORMAT).to_string().into(),
            value: None,
        }
    }

    pub fn canonical(&self) -> Option<String> {
        self.value.as_ref().map(XmlSchemaValDuration::canonical)
    }
}

/// Implement [3.2.7 dateTime](https://www.w3.org/TR/xmlschema-2/#dateTime)
/// of [XML Schema Part 2: Datatypes](https://www.w3.org/TR/xmlschema-2)
#[derive(Debug, Clone)]
pub struct XmlSchemaDateTime {
    text: Rc<str>,
    value: Option<XmlSchemaValDate>,
}

impl_xml_schema_text_value!(XmlSchemaDateTime, XmlSchemaValDate, DateTime);

impl XmlSchemaDateTime {
    /// Render a calendar value with `%Y-%m-%dT%H:%M:%S%z`, e.g.
    /// `2023-01-05T14:30:00-0500`.
    ///
    /// The zone has no colon, so the text is not re-validated, but the value
    /// is taken from `cal` and compares like any parsed dateTime.
    pub fn from_calendar<Tz: TimeZone>(cal: &DateTime<Tz>) -> Self
    where
        Tz::Offset: Display,
    {
        Self {
            text: cal.format(XML_SCHEMA_CALENDAR_FORMAT).to_string().into(),
            value: date_from_calendar(cal),
        }
    }

    /// Convert to a calendar value. Only values with a zone can be converted.
    pub fn to_calendar(&self) -> Option<DateTime<FixedOffset>> {
        let dt = self.value.as_ref().filter(|dt| dt.tz_flag)?;
        let astro = if dt.year < 0 { dt.year + 1 } else { dt.year };
        let date = NaiveDate::from_ymd_opt(i32::try_from(astro).ok()?, dt.mon.into(), dt.day.into())?;
        let secs = i64::from(dt.hour) * 3600 + i64::from(dt.min) * 60 + dt.sec.trunc() as i64;
        let nanos = (dt.sec.fract() * 1e9).round() as i64;
        let naive = date
            .and_hms_opt(0, 0, 0)?
            .checked_add_signed(TimeDelta::seconds(secs))?
            .checked_add_signed(TimeDelta::nanoseconds(nanos))?;
        let offset = FixedOffset::east_opt(i32::from(dt.tzo) * 60)?;
        naive.and_local_timezone(offset).single()
    }

    pub fn canonical(&self) -> Option<String> {
        self.value.as_ref()?.canonical()
    }
}

fn date_from_calendar<Tz: TimeZone>(cal: &DateTime<Tz>) -> Option<XmlSchemaValDate> {
    let offset = cal.offset().fix().local_minus_utc();
    if offset % 60 != 0 || cal.nanosecond() >= 1_000_000_000 {
        return None;
    }
    let tzo = i16::try_from(offset / 60).ok().filter(|tzo| (-840..=840).contains(tzo))?;
    let astro = i64::from(cal.year());
    Some(XmlSchemaValDate {
        year: if astro <= 0 { astro - 1 } else { astro },
        mon: cal.month() as u8,
        day: cal.day() as u8,
        hour: cal.hour() as u8,
        min: cal.minute() as u8,
        sec: f64::from(cal.second()) + f64::from(cal.nanosecond()) / 1e9,
        tz_flag: true,
        tzo,
    })
}
