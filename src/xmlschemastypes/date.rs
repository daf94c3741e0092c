//! Implement [3.2.7 dateTime](https://www.w3.org/TR/xmlschema-2/#dateTime)
//! of [XML Schema Part 2: Datatypes](https://www.w3.org/TR/xmlschema-2).
//!
//! Years follow the proleptic Gregorian calendar without a year zero:
//! `-0001` immediately precedes `0001` and is a leap year.
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
    duration::{SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MIN},
    parse::{parse_2_digits, take_digits, trim_collapse},
};

const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const DAYS_IN_MONTH_LEAP: [u8; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const DAY_IN_YEAR_BY_MONTH: [i128; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
const DAY_IN_LEAP_YEAR_BY_MONTH: [i128; 12] =
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

// The largest `f64` below 60.
const MAX_SECOND: f64 = f64::from_bits(60f64.to_bits() - 1);

// 14 hours, the widest zone offset.
const MAX_TZO_SECS: i128 = 14 * SECS_PER_HOUR as i128;

/// A dateTime value. Only [`XmlSchemaValDate::parse`] and calendar
/// conversions build one, so every value is a valid date and time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XmlSchemaValDate {
    pub(crate) year: i64,
    pub(crate) mon: u8,
    pub(crate) day: u8,
    pub(crate) hour: u8,
    pub(crate) min: u8,
    pub(crate) sec: f64,
    // is tzo explicitly set?
    pub(crate) tz_flag: bool,
    // -840 <= tzo <= 840
    pub(crate) tzo: i16,
}

/// `year` as an astronomical year number, where 1 BCE is year 0.
fn astronomical(year: i64) -> i128 {
    if year < 0 {
        year as i128 + 1
    } else {
        year as i128
    }
}

fn is_leap(astro: i128) -> bool {
    (astro.rem_euclid(4) == 0 && astro.rem_euclid(100) != 0) || astro.rem_euclid(400) == 0
}

#[doc(alias = "MAX_DAYINMONTH")]
fn max_day_in_month(year: i64, mon: u8) -> u8 {
    if is_leap(astronomical(year)) {
        DAYS_IN_MONTH_LEAP[mon as usize - 1]
    } else {
        DAYS_IN_MONTH[mon as usize - 1]
    }
}

/// Days from 0001-01-01 to the first day of the astronomical year `astro`.
fn days_before_year(astro: i128) -> i128 {
    let y = astro - 1;
    365 * y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400)
}

/// Days from 0001-01-01 to `day` of `mon` in the astronomical year `astro`.
pub(crate) fn days_from_date(astro: i128, mon: u8, day: u8) -> i128 {
    let table = if is_leap(astro) {
        &DAY_IN_LEAP_YEAR_BY_MONTH
    } else {
        &DAY_IN_YEAR_BY_MONTH
    };
    days_before_year(astro) + table[mon as usize - 1] + day as i128 - 1
}

/// Split a day number relative to 0001-01-01 into year, month and day.
fn days_to_date(days: i128) -> Option<(i64, u8, u8)> {
    let mut astro = (days * 400).div_euclid(146097) + 1;
    while days_before_year(astro) > days {
        astro -= 1;
    }
    while days_before_year(astro + 1) <= days {
        astro += 1;
    }
    let yday = days - days_before_year(astro);
    let table = if is_leap(astro) {
        &DAY_IN_LEAP_YEAR_BY_MONTH
    } else {
        &DAY_IN_YEAR_BY_MONTH
    };
    let mon = table.iter().rposition(|&start| start <= yday)?;
    let day = yday - table[mon] + 1;
    let year = if astro <= 0 { astro - 1 } else { astro };
    Some((i64::try_from(year).ok()?, mon as u8 + 1, day as u8))
}

fn parse_time_zone(cur: &mut &str) -> Option<(bool, i16)> {
    match cur.as_bytes().first().copied() {
        None => Some((false, 0)),
        Some(b'Z') => {
            *cur = &cur[1..];
            Some((true, 0))
        }
        Some(sign @ (b'+' | b'-')) => {
            *cur = &cur[1..];
            let hour = parse_2_digits(cur).filter(|h| *h <= 23)?;
            *cur = cur.strip_prefix(':')?;
            let min = parse_2_digits(cur).filter(|m| *m <= 59)?;
            let tzo = hour as i16 * 60 + min as i16;
            if tzo > 840 {
                return None;
            }
            Some((true, if sign == b'-' { -tzo } else { tzo }))
        }
        _ => None,
    }
}

impl XmlSchemaValDate {
    /// Parse `-?yyyy-mm-ddThh:mm:ss(.s+)?(Z|(+|-)hh:mm)?` after collapsing
    /// whitespace.
    #[doc(alias = "xmlSchemaValidateDates")]
    pub fn parse(value: &str) -> Option<Self> {
        let mut cur = trim_collapse(value);
        let negative = if let Some(rest) = cur.strip_prefix('-') {
            cur = rest;
            true
        } else {
            false
        };
        let digits = take_digits(&mut cur);
        if digits.len() < 4 || (digits.len() > 4 && digits.starts_with('0')) {
            return None;
        }
        let year: i64 = digits.parse().ok()?;
        if year == 0 {
            return None;
        }
        let year = if negative { -year } else { year };

        cur = cur.strip_prefix('-')?;
        let mon = parse_2_digits(&mut cur)?;
        cur = cur.strip_prefix('-')?;
        let day = parse_2_digits(&mut cur)?;
        cur = cur.strip_prefix('T')?;
        let hour = parse_2_digits(&mut cur)?;
        cur = cur.strip_prefix(':')?;
        let min = parse_2_digits(&mut cur)?;
        cur = cur.strip_prefix(':')?;
        let start = cur;
        let whole = parse_2_digits(&mut cur)?;
        if let Some(rest) = cur.strip_prefix('.') {
            cur = rest;
            if take_digits(&mut cur).is_empty() {
                return None;
            }
        }
        let mut sec: f64 = start[..start.len() - cur.len()].parse().ok()?;
        // A long fraction may round up to the next whole second.
        if whole <= 59 {
            sec = sec.min(MAX_SECOND);
        }
        let (tz_flag, tzo) = parse_time_zone(&mut cur)?;
        if !cur.is_empty() {
            return None;
        }

        let dt = Self {
            year,
            mon,
            day,
            hour,
            min,
            sec,
            tz_flag,
            tzo,
        };
        dt.is_valid().then_some(dt)
    }

    /// The year. There is no year 0, and `-1` is 1 BCE.
    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.mon
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.min
    }

    pub fn second(&self) -> f64 {
        self.sec
    }

    /// The zone offset in minutes, or `None` for a value without a zone.
    pub fn timezone_offset(&self) -> Option<i16> {
        self.tz_flag.then_some(self.tzo)
    }

    #[doc(alias = "VALID_DATETIME")]
    fn is_valid(&self) -> bool {
        let valid_date = self.year != 0
            && (1..=12).contains(&self.mon)
            && self.day >= 1
            && self.day <= max_day_in_month(self.year, self.mon);
        let valid_time = (self.hour <= 23 && self.min <= 59 && self.sec < 60.0)
            || (self.hour == 24 && self.min == 0 && self.sec == 0.0);
        valid_date && valid_time && (-840..=840).contains(&self.tzo)
    }

    /// Seconds since 0001-01-01T00:00:00 on the local clock, ignoring the zone.
    #[doc(alias = "_xmlSchemaDateCastYMToDays")]
    fn local_seconds(&self) -> i128 {
        let days = days_from_date(astronomical(self.year), self.mon, self.day);
        days * SECS_PER_DAY as i128
            + self.hour as i128 * SECS_PER_HOUR as i128
            + self.min as i128 * SECS_PER_MIN as i128
            + self.sec.trunc() as i128
    }

    /// Seconds since 0001-01-01T00:00:00Z. A value without a zone is read as UTC.
    fn utc_seconds(&self) -> i128 {
        self.local_seconds() - self.tzo as i128 * SECS_PER_MIN as i128
    }

    fn cmp_instants(x: i128, xfrac: f64, y: i128, yfrac: f64) -> XmlSchemaValOrdering {
        match x.cmp(&y) {
            Ordering::Equal => xfrac
                .partial_cmp(&yfrac)
                .map_or(XmlSchemaValOrdering::Indeterminate, Into::into),
            ord => ord.into(),
        }
    }

    /// Compare two dateTime values.
    ///
    /// When only one value has a zone, the other may lie anywhere from
    /// `-14:00` to `+14:00`, and overlapping ranges are `Indeterminate`.
    #[doc(alias = "xmlSchemaCompareDates")]
    pub fn compare(&self, other: &Self) -> XmlSchemaValOrdering {
        let (xs, xf) = (self.utc_seconds(), self.sec.fract());
        let (ys, yf) = (other.utc_seconds(), other.sec.fract());
        if self.tz_flag == other.tz_flag {
            return Self::cmp_instants(xs, xf, ys, yf);
        }
        if self.tz_flag {
            if Self::cmp_instants(xs, xf, ys - MAX_TZO_SECS, yf) == XmlSchemaValOrdering::Less {
                XmlSchemaValOrdering::Less
            } else if Self::cmp_instants(xs, xf, ys + MAX_TZO_SECS, yf)
                == XmlSchemaValOrdering::Greater
            {
                XmlSchemaValOrdering::Greater
            } else {
                XmlSchemaValOrdering::Indeterminate
            }
        } else {
            match other.compare(self) {
                XmlSchemaValOrdering::Less => XmlSchemaValOrdering::Greater,
                XmlSchemaValOrdering::Greater => XmlSchemaValOrdering::Less,
                ord => ord,
            }
        }
    }

    /// Normalize to UTC when a zone is present, and turn `24:00:00` into
    /// midnight of the next day.
    #[doc(alias = "xmlSchemaDateNormalize")]
    pub fn normalize(&self) -> Option<Self> {
        let secs = self.utc_seconds();
        let (year, mon, day) = days_to_date(secs.div_euclid(SECS_PER_DAY as i128))?;
        let in_day = secs.rem_euclid(SECS_PER_DAY as i128) as i64;
        Some(Self {
            year,
            mon,
            day,
            hour: (in_day / SECS_PER_HOUR) as u8,
            min: (in_day % SECS_PER_HOUR / SECS_PER_MIN) as u8,
            sec: (in_day % SECS_PER_MIN) as f64 + self.sec.fract(),
            tz_flag: self.tz_flag,
            tzo: 0,
        })
    }

    /// The canonical representation, in UTC with a `Z` when a zone is present.
    pub fn canonical(&self) -> Option<String> {
        let dt = self.normalize()?;
        let mut buf = String::new();
        if dt.year < 0 {
            buf.push('-');
        }
        write!(
            buf,
            "{:04}-{:02}-{:02}T{:02}:{:02}:",
            dt.year.unsigned_abs(),
            dt.mon,
            dt.day,
            dt.hour,
            dt.min
        )
        .ok()?;
        if dt.sec < 10.0 {
            buf.push('0');
        }
        write!(buf, "{}", dt.sec).ok()?;
        if dt.tz_flag {
            buf.push('Z');
        }
        Some(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> XmlSchemaValDate {
        XmlSchemaValDate::parse(s).unwrap()
    }

    #[test]
    fn lexical_space() {
        for ok in [
            "2023-01-05T14:30:00",
            "2023-01-05T14:30:00Z",
            "2023-01-05T14:30:00-05:00",
            "2023-01-05T14:30:00.125+14:00",
            "-0044-03-15T12:00:00",
            "12345-01-01T00:00:00",
            "2000-02-29T00:00:00",
            "-0001-02-29T00:00:00",
            "1999-12-31T24:00:00",
            " 2001-10-26T21:32:52 ",
        ] {
            assert!(XmlSchemaValDate::parse(ok).is_some(), "{ok}");
        }
        for ng in [
            "",
            "2023-01-05",
            "2023-01-05T14:30",
            "23-01-05T14:30:00",
            "02023-01-05T14:30:00",
            "0000-01-01T00:00:00",
            "2023-13-01T00:00:00",
            "2023-00-01T00:00:00",
            "2023-02-29T00:00:00",
            "1900-02-29T00:00:00",
            "2023-04-31T00:00:00",
            "2023-01-05T25:00:00",
            "2023-01-05T24:00:01",
            "2023-01-05T23:60:00",
            "2023-01-05T23:59:60",
            "2023-01-05T14:30:00.",
            "2023-01-05T14:30:00-0500",
            "2023-01-05T14:30:00+14:01",
            "2023-01-05T14:30:00z",
            "+2023-01-05T14:30:00",
            "2023-1-05T14:30:00",
            "2023-01-05 14:30:00",
        ] {
            assert!(XmlSchemaValDate::parse(ng).is_none(), "{ng}");
        }
    }

    #[test]
    fn long_second_fraction() {
        let d = dt("2023-01-05T14:30:59.99999999999999999");
        assert!(d.second() < 60.0);
        assert_eq!(d.minute(), 30);
        assert_eq!(
            d.compare(&dt("2023-01-05T14:31:00")),
            XmlSchemaValOrdering::Less
        );
        let canon = d.canonical().unwrap();
        assert_eq!(dt(&canon), d);
        assert!(XmlSchemaValDate::parse("2023-01-05T14:30:60.0000000000000001").is_none());
    }

    #[test]
    fn accessors() {
        let d = dt("-0044-03-15T12:05:30.5-05:30");
        assert_eq!((d.year(), d.month(), d.day()), (-44, 3, 15));
        assert_eq!((d.hour(), d.minute(), d.second()), (12, 5, 30.5));
        assert_eq!(d.timezone_offset(), Some(-330));
        assert_eq!(dt("2000-01-01T00:00:00").timezone_offset(), None);
    }

    #[test]
    fn ordering_with_zones() {
        assert_eq!(
            dt("2023-01-05T14:30:00-05:00").compare(&dt("2023-01-05T19:30:00Z")),
            XmlSchemaValOrdering::Equal
        );
        assert_eq!(
            dt("2000-01-01T00:00:00+01:00").compare(&dt("1999-12-31T23:30:00Z")),
            XmlSchemaValOrdering::Less
        );
        assert_eq!(
            dt("1999-12-31T24:00:00Z").compare(&dt("2000-01-01T00:00:00Z")),
            XmlSchemaValOrdering::Equal
        );
        assert_eq!(
            dt("2000-01-01T00:00:00.5").compare(&dt("2000-01-01T00:00:00.25")),
            XmlSchemaValOrdering::Greater
        );
        assert_eq!(
            dt("-0001-12-31T00:00:00").compare(&dt("0001-01-01T00:00:00")),
            XmlSchemaValOrdering::Less
        );
    }

    #[test]
    fn ordering_without_zone() {
        let zoned = dt("2000-01-15T12:00:00Z");
        assert_eq!(
            zoned.compare(&dt("2000-01-16T12:00:00")),
            XmlSchemaValOrdering::Less
        );
        assert_eq!(
            zoned.compare(&dt("2000-01-14T12:00:00")),
            XmlSchemaValOrdering::Greater
        );
        assert_eq!(
            zoned.compare(&dt("2000-01-15T20:00:00")),
            XmlSchemaValOrdering::Indeterminate
        );
        assert_eq!(
            dt("2000-01-15T20:00:00").compare(&zoned),
            XmlSchemaValOrdering::Indeterminate
        );
        assert_eq!(
            dt("2000-01-16T12:00:00").compare(&zoned),
            XmlSchemaValOrdering::Greater
        );
    }

    #[test]
    fn calendar_round_trip() {
        for days in [-800_000i128, -366, -365, -1, 0, 1, 59, 730_119, 738_889] {
            let (year, mon, day) = days_to_date(days).unwrap();
            let d = XmlSchemaValDate {
                year,
                mon,
                day,
                hour: 0,
                min: 0,
                sec: 0.0,
                tz_flag: false,
                tzo: 0,
            };
            assert!(d.is_valid(), "{days}");
            assert_eq!(d.local_seconds(), days * SECS_PER_DAY as i128, "{days}");
        }
        assert_eq!(days_to_date(0), Some((1, 1, 1)));
        assert_eq!(days_to_date(-1), Some((-1, 12, 31)));
    }

    #[test]
    fn canonical() {
        assert_eq!(
            dt("2023-01-05T14:30:00-05:00").canonical().as_deref(),
            Some("2023-01-05T19:30:00Z")
        );
        assert_eq!(
            dt("2000-01-01T00:30:00+01:00").canonical().as_deref(),
            Some("1999-12-31T23:30:00Z")
        );
        assert_eq!(
            dt("1999-12-31T24:00:00").canonical().as_deref(),
            Some("2000-01-01T00:00:00")
        );
        assert_eq!(
            dt("2001-10-26T21:32:05.50").canonical().as_deref(),
            Some("2001-10-26T21:32:05.5")
        );
        assert_eq!(
            dt("-0044-03-15T12:00:00").canonical().as_deref(),
            Some("-0044-03-15T12:00:00")
        );
    }
}
