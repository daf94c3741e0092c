//! Implement [3.2.3 decimal](https://www.w3.org/TR/xmlschema-2/#decimal)
//! of [XML Schema Part 2: Datatypes](https://www.w3.org/TR/xmlschema-2).
//!
//! The value is kept as a digit string, so precision is not limited to the
//! 24 digits that a fixed-width representation would allow.

use std::cmp::Ordering;

use super::{
    XmlSchemaValOrdering,
    parse::{take_digits, trim_collapse},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct XmlSchemaValDecimal {
    negative: bool,
    // integral digits, without leading zeros
    integ: Box<str>,
    // fractional digits, without trailing zeros
    fract: Box<str>,
}

impl XmlSchemaValDecimal {
    /// Parse `[+-]?(d+(.d*)?|.d+)` after collapsing whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let mut cur = trim_collapse(value);
        let mut negative = false;
        if let Some(rest) = cur.strip_prefix('-') {
            negative = true;
            cur = rest;
        } else if let Some(rest) = cur.strip_prefix('+') {
            cur = rest;
        }
        let integ = take_digits(&mut cur);
        let mut fract = "";
        if let Some(rest) = cur.strip_prefix('.') {
            cur = rest;
            fract = take_digits(&mut cur);
        }
        if !cur.is_empty() || (integ.is_empty() && fract.is_empty()) {
            return None;
        }
        let integ = integ.trim_start_matches('0');
        let fract = fract.trim_end_matches('0');
        Some(Self {
            negative: negative && !(integ.is_empty() && fract.is_empty()),
            integ: integ.into(),
            fract: fract.into(),
        })
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// The number of significant digits, as checked by the totalDigits facet.
    pub fn total_digits(&self) -> usize {
        (self.integ.len() + self.fract.len()).max(1)
    }

    /// The number of fractional digits, as checked by the fractionDigits facet.
    pub fn fraction_digits(&self) -> usize {
        self.fract.len()
    }

    #[doc(alias = "xmlSchemaCompareDecimals")]
    pub fn compare(&self, other: &Self) -> XmlSchemaValOrdering {
        let order = match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (negative, _) => {
                let abs = self
                    .integ
                    .len()
                    .cmp(&other.integ.len())
                    .then_with(|| self.integ.cmp(&other.integ))
                    .then_with(|| self.fract.cmp(&other.fract));
                if negative { abs.reverse() } else { abs }
            }
        };
        order.into()
    }

    /// The canonical representation: a mandatory decimal point, no redundant
    /// zeros and no `+` sign.
    pub fn canonical(&self) -> String {
        format!(
            "{}{}.{}",
            if self.negative { "-" } else { "" },
            if self.integ.is_empty() { "0" } else { &self.integ },
            if self.fract.is_empty() { "0" } else { &self.fract },
        )
    }
}
