//! Implement [3.2.6 duration](https://www.w3.org/TR/xmlschema-2/#duration)
//! of [XML Schema Part 2: Datatypes](https://www.w3.org/TR/xmlschema-2).
//!
//! This module is based on `xmlschemastypes.c` in `libxml2-v2.11.8`.

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

use std::{cmp::Ordering, fmt::Write as _};

use super::{
    XmlSchemaValOrdering,
    date::days_from_date,
    parse::{take_digits, trim_collapse},
};

pub(crate) const SECS_PER_MIN: i64 = 60;
pub(crate) const MINS_PER_HOUR: i64 = 60;
pub(crate) const HOURS_PER_DAY: i64 = 24;
pub(crate) const SECS_PER_HOUR: i64 = MINS_PER_HOUR * SECS_PER_MIN;
pub(crate) const SECS_PER_DAY: i64 = HOURS_PER_DAY * SECS_PER_HOUR;
pub(crate) const MINS_PER_DAY: i64 = HOURS_PER_DAY * MINS_PER_HOUR;

// 400 Gregorian years.
const MONTHS_PER_CYCLE: i128 = 4800;
const DAYS_PER_CYCLE: i128 = 146097;
const REFERENCE_DATES: [(i128, u8); 4] = [(1696, 9), (1697, 2), (1903, 3), (1903, 7)];

/// The number of days from the first day of `mon` in `year` to the first day
/// `months` months later. Negative `months` count backwards.
fn days_in_months(year: i128, mon: u8, months: i128) -> i128 {
    let cycles = months.div_euclid(MONTHS_PER_CYCLE);
    let end = i128::from(mon) - 1 + months.rem_euclid(MONTHS_PER_CYCLE);
    let (end_year, end_mon) = (year + end / 12, (end % 12) as u8 + 1);
    cycles * DAYS_PER_CYCLE + days_from_date(end_year, end_mon, 1) - days_from_date(year, mon, 1)
}

/// The sign of `day` days plus `sec` seconds, where `|sec|` is less than a day.
fn sign_of(day: i128, sec: f64) -> XmlSchemaValOrdering {
    match day.cmp(&0) {
        Ordering::Equal => sec
            .partial_cmp(&0.0)
            .map_or(XmlSchemaValOrdering::Indeterminate, Into::into),
        ord => ord.into(),
    }
}

/// A duration split in the two independent parts of its value space.
///
/// Years and months are folded into `mon`. Hours, minutes and seconds are
/// folded into `sec`, and whole days carried out of `sec` into `day`.
/// All three fields share the same sign.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct XmlSchemaValDuration {
    pub(crate) mon: i64,
    pub(crate) day: i64,
    pub(crate) sec: f64,
}

impl XmlSchemaValDuration {
    /// Parse `-?PnYnMnDTnHnMnS` after collapsing whitespace.
    #[doc(alias = "xmlSchemaValidateDuration")]
    pub fn parse(value: &str) -> Option<Self> {
        const DESIG: &[u8] = b"YMDHMS";

        let mut cur = trim_collapse(value);
        let isneg = if let Some(rest) = cur.strip_prefix('-') {
            cur = rest;
            true
        } else {
            false
        };
        cur = cur.strip_prefix('P')?;
        if cur.is_empty() {
            return None;
        }

        let mut dur = Self::default();
        let mut seq = 0;
        let mut secs: i64 = 0;
        let mut sec_frac = 0.0;
        while !cur.is_empty() {
            // input string should be empty or invalid date/time item
            if seq >= DESIG.len() {
                return None;
            }
            // T designator must be present for time items
            if let Some(rest) = cur.strip_prefix('T') {
                if seq > 3 {
                    return None;
                }
                cur = rest;
                seq = 3;
            } else if seq == 3 {
                return None;
            }

            let integ = take_digits(&mut cur);
            let mut frac = None;
            if let Some(rest) = cur.strip_prefix('.') {
                cur = rest;
                frac = Some(take_digits(&mut cur));
            }
            let has_digits = !integ.is_empty() || frac.is_some_and(|f| !f.is_empty());

            let desig = *cur.as_bytes().first()?;
            while desig != DESIG[seq] {
                seq += 1;
                // No T designator or invalid char.
                if seq == 3 || seq == DESIG.len() {
                    return None;
                }
            }
            cur = &cur[1..];

            if !has_digits || (frac.is_some() && seq != 5) {
                return None;
            }
            let num: i64 = if integ.is_empty() {
                0
            } else {
                integ.parse().ok()?
            };

            match seq {
                0 => dur.mon = num.checked_mul(12)?,
                1 => dur.mon = dur.mon.checked_add(num)?,
                2 => dur.day = num,
                3 => {
                    dur.day = dur.day.checked_add(num / HOURS_PER_DAY)?;
                    secs = (num % HOURS_PER_DAY) * SECS_PER_HOUR;
                }
                4 => {
                    dur.day = dur.day.checked_add(num / MINS_PER_DAY)?;
                    secs += (num % MINS_PER_DAY) * SECS_PER_MIN;
                }
                5 => {
                    dur.day = dur.day.checked_add(num / SECS_PER_DAY)?;
                    secs += num % SECS_PER_DAY;
                    if let Some(frac) = frac.filter(|f| !f.is_empty()) {
                        sec_frac = format!("0.{frac}").parse().ok()?;
                    }
                }
                _ => return None,
            }
            seq += 1;
        }

        dur.day = dur.day.checked_add(secs / SECS_PER_DAY)?;
        dur.sec = (secs % SECS_PER_DAY) as f64 + sec_frac;
        if isneg {
            dur.mon = -dur.mon;
            dur.day = -dur.day;
            dur.sec = -dur.sec;
        }
        Some(dur)
    }

    /// Years and months, in months.
    pub fn months(&self) -> i64 {
        self.mon
    }

    pub fn days(&self) -> i64 {
        self.day
    }

    /// Hours, minutes and seconds below one day, in seconds.
    pub fn seconds(&self) -> f64 {
        self.sec
    }

    pub fn is_negative(&self) -> bool {
        self.mon < 0 || self.day < 0 || self.sec < 0.0
    }

    /// Compare two durations.
    ///
    /// Both durations are added to the four reference dateTimes of XML Schema
    /// Part 2, Appendix E. The result is `Indeterminate` unless all four
    /// agree, so `P1M` and `P30D` are `Indeterminate`.
    #[doc(alias = "xmlSchemaCompareDurations")]
    pub fn compare(&self, other: &Self) -> XmlSchemaValOrdering {
        // months
        let mon = i128::from(self.mon) - i128::from(other.mon);
        // seconds
        let mut sec = self.sec - other.sec;
        let carry = (sec / SECS_PER_DAY as f64).trunc();
        sec -= carry * SECS_PER_DAY as f64;
        // days
        let day = i128::from(self.day) - i128::from(other.day) + carry as i128;

        // easy test
        if mon == 0 {
            return sign_of(day, sec);
        }

        let ords = REFERENCE_DATES.map(|(year, start)| {
            let x = days_in_months(year, start, self.mon.into());
            let y = days_in_months(year, start, other.mon.into());
            sign_of(x - y + day, sec)
        });
        if ords.iter().all(|ord| *ord == ords[0]) {
            ords[0]
        } else {
            XmlSchemaValOrdering::Indeterminate
        }
    }

    /// The canonical representation.
    ///
    /// Zero components are omitted and the zero duration is `PT0S`.
    pub fn canonical(&self) -> String {
        let neg = self.is_negative();
        let mon = self.mon.unsigned_abs();
        let day = self.day.unsigned_abs();
        let sec = self.sec.abs();
        let whole = sec.trunc() as u64;
        let (hours, mins) = (whole / 3600, whole % 3600 / 60);
        let secs = sec - (hours * 3600 + mins * 60) as f64;

        let mut buf = String::from(if neg { "-P" } else { "P" });
        if mon / 12 != 0 {
            write!(buf, "{}Y", mon / 12).ok();
        }
        if mon % 12 != 0 {
            write!(buf, "{}M", mon % 12).ok();
        }
        if day != 0 {
            write!(buf, "{day}D").ok();
        }
        if sec != 0.0 {
            buf.push('T');
            if hours != 0 {
                write!(buf, "{hours}H").ok();
            }
            if mins != 0 {
                write!(buf, "{mins}M").ok();
            }
            if secs != 0.0 {
                write!(buf, "{secs}S").ok();
            }
        }
        if buf.ends_with('P') {
            buf.truncate(buf.len() - if neg { 2 } else { 1 });
            buf.push_str("PT0S");
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dur(s: &str) -> XmlSchemaValDuration {
        XmlSchemaValDuration::parse(s).unwrap()
    }

    #[test]
    fn lexical_space() {
        for ok in ["P1Y", "P1Y2M3DT4H5M6S", "-P3D", "PT0.5S", "PT1.S", "P0D", " PT36H "] {
            assert!(XmlSchemaValDuration::parse(ok).is_some(), "{ok}");
        }
        for ng in [
            "", "P", "-P", "PT", "P1YT", "1Y", "P1S", "P1H", "PT1D", "P1.5Y", "PT1.5M", "P1M1Y",
            "P-1Y", "+P1Y", "P1Y2", "PT.S", "P 1Y",
        ] {
            assert!(XmlSchemaValDuration::parse(ng).is_none(), "{ng}");
        }
    }

    #[test]
    fn folding() {
        let d = dur("P1Y2M3DT25H1.5S");
        assert_eq!(d.mon, 14);
        assert_eq!(d.day, 4);
        assert_eq!(d.sec, 3601.5);
        let d = dur("-PT90M");
        assert_eq!((d.mon, d.day, d.sec), (0, 0, -5400.0));
        assert_eq!(dur("PT0.3S").sec, 0.3);
    }

    #[test]
    fn ordering() {
        assert_eq!(dur("P1D").compare(&dur("PT24H")), XmlSchemaValOrdering::Equal);
        assert_eq!(dur("P1Y").compare(&dur("P12M")), XmlSchemaValOrdering::Equal);
        assert_eq!(dur("P1M").compare(&dur("P30D")), XmlSchemaValOrdering::Indeterminate);
        assert_eq!(dur("P1M").compare(&dur("P27D")), XmlSchemaValOrdering::Greater);
        assert_eq!(dur("P1M").compare(&dur("P32D")), XmlSchemaValOrdering::Less);
        assert_eq!(dur("P32D").compare(&dur("P1M")), XmlSchemaValOrdering::Greater);
        assert_eq!(dur("P1Y").compare(&dur("P365D")), XmlSchemaValOrdering::Indeterminate);
        assert_eq!(dur("P1Y").compare(&dur("P367D")), XmlSchemaValOrdering::Less);
        assert_eq!(dur("P1Y").compare(&dur("P364D")), XmlSchemaValOrdering::Greater);
        assert_eq!(dur("-P1D").compare(&dur("PT1S")), XmlSchemaValOrdering::Less);
        assert_eq!(dur("PT1.5S").compare(&dur("PT1S")), XmlSchemaValOrdering::Greater);
        // 1697 to 1700 has no leap day.
        assert_eq!(dur("P4Y").compare(&dur("P1460D")), XmlSchemaValOrdering::Indeterminate);
        assert_eq!(dur("P1460D").compare(&dur("P4Y")), XmlSchemaValOrdering::Indeterminate);
        assert_eq!(dur("P7Y").compare(&dur("P2555D")), XmlSchemaValOrdering::Indeterminate);
        assert_eq!(dur("P4Y").compare(&dur("P1459D")), XmlSchemaValOrdering::Greater);
        assert_eq!(dur("P4Y").compare(&dur("P1462D")), XmlSchemaValOrdering::Less);
        assert_eq!(dur("P400Y").compare(&dur("P146097D")), XmlSchemaValOrdering::Equal);
        assert_eq!(dur("-P400Y").compare(&dur("-P146097D")), XmlSchemaValOrdering::Equal);
        assert_eq!(dur("P1Y1D").compare(&dur("P1Y")), XmlSchemaValOrdering::Greater);
    }

    #[test]
    fn ordering_at_extremes() {
        let max_years = (i64::MAX / 12).to_string();
        let pos = dur(&format!("P{max_years}Y"));
        let neg = dur(&format!("-P{max_years}Y"));
        assert_eq!(pos.compare(&neg), XmlSchemaValOrdering::Greater);
        assert_eq!(neg.compare(&pos), XmlSchemaValOrdering::Less);

        let pos = dur(&format!("P{}D", i64::MAX));
        let neg = dur(&format!("-P{}D", i64::MAX));
        assert_eq!(pos.compare(&neg), XmlSchemaValOrdering::Greater);
        assert_eq!(neg.compare(&pos), XmlSchemaValOrdering::Less);

        let mixed = dur(&format!("P{max_years}YT1S"));
        assert_eq!(mixed.compare(&neg), XmlSchemaValOrdering::Greater);
    }

    #[test]
    fn canonical() {
        assert_eq!(dur("P0D").canonical(), "PT0S");
        assert_eq!(dur("P14M").canonical(), "P1Y2M");
        assert_eq!(dur("PT36H").canonical(), "P1DT12H");
        assert_eq!(dur("-PT90.5S").canonical(), "-PT1M30.5S");
        assert_eq!(dur("P1Y2M3DT4H5M6S").canonical(), "P1Y2M3DT4H5M6S");
        assert_eq!(dur("-P0Y").canonical(), "PT0S");
    }
}
