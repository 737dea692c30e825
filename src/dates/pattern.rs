//! Format patterns: the small template language used to read (and write) date cells.
//!
//! Two families are supported:
//! - strftime-style templates containing `%` directives (`%Y-%m-%d`, `%b-%y`, `%d %b %Y`…)
//! - named spreadsheet layouts (`mmmYY`, `monthYear`, `yearMonth`, `monthSlashYear`,
//!   `yearOnly`, `auto`)

use super::fallback;
use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Two-digit years above this value land in the 1900s, the rest in the 2000s.
/// Applies to the named `mmmYY` layout only.
pub const TWO_DIGIT_YEAR_PIVOT: u32 = 50;

/// POSIX `%y` convention (69..=99 → 1900s) used by every strftime template.
pub const POSIX_TWO_DIGIT_YEAR_PIVOT: u32 = 68;

/// Digits accepted after an explicit sign in `%Y` (chrono's year range fits in six).
const MAX_SIGNED_YEAR_DIGITS: usize = 6;

/// Year assumed by templates that carry no year field.
const DEFAULT_YEAR: i32 = 1900;

pub(crate) const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Expand a two-digit year around `pivot`.
pub fn expand_two_digit_year(yy: u32, pivot: u32) -> i32 {
    if yy > pivot {
        1900 + yy as i32
    } else {
        2000 + yy as i32
    }
}

/// 1-based month for a full name or a three-letter abbreviation (ASCII case-insensitive).
pub(crate) fn month_from_name(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| {
            m.eq_ignore_ascii_case(name) || (name.len() == 3 && m[..3].eq_ignore_ascii_case(name))
        })
        .map(|i| i as u32 + 1)
}

fn month_abbr(month: u32) -> &'static str {
    &MONTH_NAMES[(month as usize - 1) % 12][..3]
}

fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month as usize - 1) % 12]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Year4,
    Year2,
    Month,
    MonthAbbr,
    MonthName,
    Day,
    DayOfYear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Literal(char),
    /// One or more whitespace characters.
    Space,
    Field(Directive),
}

/// A compiled strftime-style template.
///
/// `%Y` writes four zero-padded digits for years 0..=9999 and a signed,
/// longer form (`+10000`, `-0044`) outside that range; both are read back.
/// Templates that put another number right after `%Y` (`%Y%m%d`) only
/// round-trip within 0..=9999.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strftime {
    source: String,
    items: Vec<Item>,
}

impl Strftime {
    pub fn new(source: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidPattern {
            pattern: source.to_string(),
            reason,
        };
        let mut items = Vec::new();
        let mut chars = source.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '%' => {
                    // d3-style padding modifiers carry no meaning when reading.
                    chars.next_if(|&m| matches!(m, '-' | '_' | '0'));
                    let d = chars
                        .next()
                        .ok_or_else(|| invalid("dangling `%` at end of pattern".into()))?;
                    items.push(match d {
                        'Y' => Item::Field(Directive::Year4),
                        'y' => Item::Field(Directive::Year2),
                        'm' => Item::Field(Directive::Month),
                        'b' | 'h' => Item::Field(Directive::MonthAbbr),
                        'B' => Item::Field(Directive::MonthName),
                        'd' | 'e' => Item::Field(Directive::Day),
                        'j' => Item::Field(Directive::DayOfYear),
                        '%' => Item::Literal('%'),
                        other => return Err(invalid(format!("unsupported directive `%{other}`"))),
                    });
                }
                c if c.is_whitespace() => {
                    if items.last() != Some(&Item::Space) {
                        items.push(Item::Space);
                    }
                }
                c => items.push(Item::Literal(c)),
            }
        }
        if items.is_empty() {
            return Err(invalid("empty pattern".into()));
        }

        Ok(Self {
            source: source.to_string(),
            items,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Read a date; the whole input must be consumed.
    pub fn parse(&self, input: &str) -> Option<NaiveDate> {
        let mut rest = input;
        let mut year = None;
        let mut month = None;
        let mut day = None;
        let mut ordinal = None;

        for item in &self.items {
            match item {
                Item::Space => {
                    let trimmed = rest.trim_start();
                    if trimmed.len() == rest.len() {
                        return None;
                    }
                    rest = trimmed;
                }
                Item::Literal(expected) => {
                    let c = rest.chars().next()?;
                    if !c.eq_ignore_ascii_case(expected) {
                        return None;
                    }
                    rest = &rest[c.len_utf8()..];
                }
                Item::Field(d) => {
                    rest = match d {
                        Directive::Year4 => {
                            let (value, tail) = take_year(rest)?;
                            year = Some(value);
                            tail
                        }
                        Directive::Year2 => {
                            let (yy, tail) = take_digits(rest, 1, 2)?;
                            year = Some(expand_two_digit_year(yy, POSIX_TWO_DIGIT_YEAR_PIVOT));
                            tail
                        }
                        Directive::Month | Directive::MonthAbbr | Directive::MonthName => {
                            let (value, tail) = match d {
                                Directive::Month => take_digits(rest, 1, 2)?,
                                other => take_month(rest, *other == Directive::MonthAbbr)?,
                            };
                            month = Some(value);
                            tail
                        }
                        Directive::Day => {
                            let (value, tail) = take_digits(rest, 1, 2)?;
                            day = Some(value);
                            tail
                        }
                        Directive::DayOfYear => {
                            let (value, tail) = take_digits(rest, 1, 3)?;
                            ordinal = Some(value);
                            tail
                        }
                    };
                }
            }
        }
        if !rest.is_empty() {
            return None;
        }

        let year = year.unwrap_or(DEFAULT_YEAR);
        match ordinal {
            Some(o) => NaiveDate::from_yo_opt(year, o),
            None => NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1)),
        }
    }

    pub fn format(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        for item in &self.items {
            match item {
                Item::Literal(c) => out.push(*c),
                Item::Space => out.push(' '),
                Item::Field(d) => match d {
                    Directive::Year4 => {
                        let y = date.year();
                        if (0..=9999).contains(&y) {
                            out.push_str(&format!("{y:04}"));
                        } else {
                            out.push_str(&format!("{y:+05}"));
                        }
                    }
                    Directive::Year2 => {
                        out.push_str(&format!("{:02}", date.year().rem_euclid(100)))
                    }
                    Directive::Month => out.push_str(&format!("{:02}", date.month())),
                    Directive::MonthAbbr => out.push_str(month_abbr(date.month())),
                    Directive::MonthName => out.push_str(month_name(date.month())),
                    Directive::Day => out.push_str(&format!("{:02}", date.day())),
                    Directive::DayOfYear => out.push_str(&format!("{:03}", date.ordinal())),
                },
            }
        }
        out
    }
}

fn take_digits(s: &str, min: usize, max: usize) -> Option<(u32, &str)> {
    let len = s.bytes().take(max).take_while(u8::is_ascii_digit).count();
    if len < min {
        return None;
    }
    let value = s[..len].parse().ok()?;
    Some((value, &s[len..]))
}

/// `%Y`: 1–4 bare digits, or a sign followed by up to six digits.
fn take_year(s: &str) -> Option<(i32, &str)> {
    let (negative, digits) = match s.as_bytes().first()? {
        b'+' => (false, &s[1..]),
        b'-' => (true, &s[1..]),
        _ => {
            let (value, tail) = take_digits(s, 1, 4)?;
            return Some((value as i32, tail));
        }
    };
    let (value, tail) = take_digits(digits, 1, MAX_SIGNED_YEAR_DIGITS)?;
    let value = value as i32;
    Some((if negative { -value } else { value }, tail))
}

fn take_month(s: &str, abbreviated: bool) -> Option<(u32, &str)> {
    MONTH_NAMES.iter().enumerate().find_map(|(i, name)| {
        let name = if abbreviated { &name[..3] } else { name };
        let head = s.get(..name.len())?;
        head.eq_ignore_ascii_case(name)
            .then(|| (i as u32 + 1, &s[name.len()..]))
    })
}

static MMM_YY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{3})-?(\d{2})$").expect("valid regex"));
static MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)\s+(\d{4})$").expect("valid regex"));
static YEAR_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})[-/](\d{1,2})$").expect("valid regex"));
static MONTH_SLASH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{4})$").expect("valid regex"));
static YEAR_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})$").expect("valid regex"));

/// How date components are encoded in a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FormatPattern {
    /// strftime-style template, e.g. `%Y-%m-%d`.
    Strftime(Strftime),
    /// `Jan-20`, `Jan20` (two-digit year, pivot at [`TWO_DIGIT_YEAR_PIVOT`]).
    MmmYy,
    /// `January 2020`, `Jan 2020`.
    MonthYear,
    /// `2020-01`, `2020/1`.
    YearMonth,
    /// `01/2020`.
    MonthSlashYear,
    /// `2020`.
    YearOnly,
    /// Generic free-form parse.
    Auto,
}

impl FormatPattern {
    pub fn strftime(source: &str) -> Result<Self> {
        Strftime::new(source).map(FormatPattern::Strftime)
    }

    /// Try to read `input`. Month-less/day-less layouts yield the first of the month/year.
    pub fn parse(&self, input: &str) -> Option<NaiveDate> {
        match self {
            FormatPattern::Strftime(s) => s.parse(input),
            FormatPattern::MmmYy => {
                let caps = MMM_YY.captures(input)?;
                let month = month_from_name(&caps[1])?;
                let yy: u32 = caps[2].parse().ok()?;
                NaiveDate::from_ymd_opt(expand_two_digit_year(yy, TWO_DIGIT_YEAR_PIVOT), month, 1)
            }
            FormatPattern::MonthYear => {
                let caps = MONTH_YEAR.captures(input)?;
                let month = month_from_name(&caps[1])?;
                NaiveDate::from_ymd_opt(caps[2].parse().ok()?, month, 1)
            }
            FormatPattern::YearMonth => {
                let caps = YEAR_MONTH.captures(input)?;
                NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, 1)
            }
            FormatPattern::MonthSlashYear => {
                let caps = MONTH_SLASH_YEAR.captures(input)?;
                NaiveDate::from_ymd_opt(caps[2].parse().ok()?, caps[1].parse().ok()?, 1)
            }
            FormatPattern::YearOnly => {
                let caps = YEAR_ONLY.captures(input)?;
                NaiveDate::from_ymd_opt(caps[1].parse().ok()?, 1, 1)
            }
            FormatPattern::Auto => fallback::parse_free_form(input),
        }
    }

    /// Render `date` so that [`FormatPattern::parse`] reads it back.
    pub fn format(&self, date: NaiveDate) -> String {
        match self {
            FormatPattern::Strftime(s) => s.format(date),
            FormatPattern::MmmYy => {
                format!("{}-{:02}", month_abbr(date.month()), date.year().rem_euclid(100))
            }
            FormatPattern::MonthYear => format!("{} {:04}", month_name(date.month()), date.year()),
            FormatPattern::YearMonth => format!("{:04}-{:02}", date.year(), date.month()),
            FormatPattern::MonthSlashYear => format!("{:02}/{:04}", date.month(), date.year()),
            FormatPattern::YearOnly => format!("{:04}", date.year()),
            FormatPattern::Auto => date.format("%Y-%m-%d").to_string(),
        }
    }
}

impl FromStr for FormatPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let named = match s.trim().to_ascii_lowercase().as_str() {
            "mmmyy" => Some(FormatPattern::MmmYy),
            "monthyear" => Some(FormatPattern::MonthYear),
            "yearmonth" => Some(FormatPattern::YearMonth),
            "monthslashyear" => Some(FormatPattern::MonthSlashYear),
            "yearonly" => Some(FormatPattern::YearOnly),
            "auto" => Some(FormatPattern::Auto),
            _ => None,
        };
        match named {
            Some(p) => Ok(p),
            None if s.contains('%') => FormatPattern::strftime(s),
            None => Err(Error::InvalidPattern {
                pattern: s.to_string(),
                reason: "expected a `%` template or one of mmmYY, monthYear, yearMonth, \
                         monthSlashYear, yearOnly, auto"
                    .into(),
            }),
        }
    }
}

impl TryFrom<String> for FormatPattern {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<FormatPattern> for String {
    fn from(p: FormatPattern) -> Self {
        p.to_string()
    }
}

impl fmt::Display for FormatPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FormatPattern::Strftime(s) => s.as_str(),
            FormatPattern::MmmYy => "mmmYY",
            FormatPattern::MonthYear => "monthYear",
            FormatPattern::YearMonth => "yearMonth",
            FormatPattern::MonthSlashYear => "monthSlashYear",
            FormatPattern::YearOnly => "yearOnly",
            FormatPattern::Auto => "auto",
        };
        f.write_str(s)
    }
}

/// Parse a list of pattern strings, failing on the first invalid one.
pub fn parse_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<FormatPattern>> {
    patterns.iter().map(|p| p.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn strftime_reads_common_templates() {
        let p = FormatPattern::strftime("%d/%m/%Y").unwrap();
        assert_eq!(p.parse("05/01/2020"), Some(ymd(2020, 1, 5)));
        assert_eq!(p.parse("5/1/2020"), Some(ymd(2020, 1, 5)));
        assert_eq!(p.parse("05/01/2020x"), None);

        let p = FormatPattern::strftime("%b %d, %Y").unwrap();
        assert_eq!(p.parse("Mar 7, 2021"), Some(ymd(2021, 3, 7)));
        assert_eq!(p.parse("mar   7, 2021"), Some(ymd(2021, 3, 7)));
    }

    #[test]
    fn strftime_rejects_impossible_dates() {
        let p = FormatPattern::strftime("%Y-%m-%d").unwrap();
        assert_eq!(p.parse("2021-02-30"), None);
        assert_eq!(p.parse("2021-13-01"), None);
    }

    #[test]
    fn two_digit_year_pivots() {
        // Only the named layout pivots at 50.
        assert_eq!(FormatPattern::MmmYy.parse("Jan-55"), Some(ymd(1955, 1, 1)));
        assert_eq!(FormatPattern::MmmYy.parse("Jan-50"), Some(ymd(2050, 1, 1)));

        // Every strftime `%y` follows POSIX, month names or not.
        let named = FormatPattern::strftime("%b-%y").unwrap();
        assert_eq!(named.parse("Jan-60"), Some(ymd(2060, 1, 1)));
        assert_eq!(named.parse("Jan-68"), Some(ymd(2068, 1, 1)));
        assert_eq!(named.parse("Jan-69"), Some(ymd(1969, 1, 1)));

        let numeric = FormatPattern::strftime("%d/%m/%y").unwrap();
        assert_eq!(numeric.parse("01/01/55"), Some(ymd(2055, 1, 1)));
        assert_eq!(numeric.parse("01/01/69"), Some(ymd(1969, 1, 1)));
    }

    #[test]
    fn years_outside_four_digits_round_trip() {
        let p = FormatPattern::strftime("%Y-%m-%d").unwrap();
        for d in [ymd(10000, 3, 4), ymd(-44, 3, 15), ymd(0, 1, 1), ymd(9999, 12, 31)] {
            assert_eq!(p.parse(&p.format(d)), Some(d), "{}", p.format(d));
        }
        assert_eq!(p.format(ymd(10000, 3, 4)), "+10000-03-04");
        assert_eq!(p.format(ymd(-44, 3, 15)), "-0044-03-15");
        assert_eq!(p.parse("+2021-06-01"), Some(ymd(2021, 6, 1)));
        assert_eq!(p.parse("10000-03-04"), None);
    }

    #[test]
    fn day_of_year_and_padding_modifiers() {
        let p = FormatPattern::strftime("%Y-%j").unwrap();
        assert_eq!(p.parse("2020-060"), Some(ymd(2020, 2, 29)));
        let p = FormatPattern::strftime("%-d.%-m.%Y").unwrap();
        assert_eq!(p.parse("3.4.2019"), Some(ymd(2019, 4, 3)));
    }

    #[test]
    fn named_patterns() {
        assert_eq!(FormatPattern::MmmYy.parse("Jan20"), Some(ymd(2020, 1, 1)));
        assert_eq!(FormatPattern::MmmYy.parse("Foo-20"), None);
        assert_eq!(FormatPattern::MonthYear.parse("February 2021"), Some(ymd(2021, 2, 1)));
        assert_eq!(FormatPattern::MonthYear.parse("feb 2021"), Some(ymd(2021, 2, 1)));
        assert_eq!(FormatPattern::YearMonth.parse("2020/7"), Some(ymd(2020, 7, 1)));
        assert_eq!(FormatPattern::YearMonth.parse("2020-13"), None);
        assert_eq!(FormatPattern::MonthSlashYear.parse("07/2020"), Some(ymd(2020, 7, 1)));
        assert_eq!(FormatPattern::YearOnly.parse("1999"), Some(ymd(1999, 1, 1)));
    }

    #[test]
    fn pattern_strings_round_trip_through_display() {
        let names = [
            "mmmYY",
            "monthYear",
            "yearMonth",
            "monthSlashYear",
            "yearOnly",
            "auto",
            "%Y-%m-%d",
        ];
        for s in names {
            let p: FormatPattern = s.parse().unwrap();
            assert_eq!(p.to_string(), s);
        }
        assert!("%Q".parse::<FormatPattern>().is_err());
        assert!("%".parse::<FormatPattern>().is_err());
        assert!("dd/mm/yyyy".parse::<FormatPattern>().is_err());
    }
}
