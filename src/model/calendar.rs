//! Calendar arithmetic on local, timezone-free instants.
//!
//! Every operation is pure. Field arithmetic normalizes the way a calendar
//! does: adding one day to the 31st of a 30-day month lands in the next
//! month, month 13 is January of the following year, and so on.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use super::locale::Language;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_DAY: i64 = 86_400_000;

/// Default separator between year, month and day.
pub const DATE_SEPARATOR: char = '-';
/// Default separators between time fields (`HH:MM:SS.fff`).
pub const TIME_SEPARATORS: &[char] = &[':', '.'];

/// The calendar fields an instant can be shifted or truncated by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl TimeUnit {
    /// Coarseness rank: a unit resets every field whose rank is below it.
    fn rank(self) -> u8 {
        match self {
            TimeUnit::Millisecond => 0,
            TimeUnit::Second => 1,
            TimeUnit::Minute => 2,
            TimeUnit::Hour => 3,
            TimeUnit::Day => 4,
            TimeUnit::Month => 5,
            TimeUnit::Year => 6,
        }
    }
}

/// Broken-down fields with a zero-based month, allowed to be out of range
/// until normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fields {
    year: i64,
    month0: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
    millis: i64,
}

impl Fields {
    fn of(t: &NaiveDateTime) -> Self {
        Self {
            year: i64::from(t.year()),
            month0: i64::from(t.month0()),
            day: i64::from(t.day()),
            hour: i64::from(t.hour()),
            minute: i64::from(t.minute()),
            second: i64::from(t.second()),
            millis: i64::from((t.nanosecond() / 1_000_000).min(999)),
        }
    }

    /// Build an instant, rolling overflowing fields into the next larger
    /// one. `None` when the result leaves chrono's representable range.
    fn normalize(self) -> Option<NaiveDateTime> {
        let year = self.year.checked_add(self.month0.div_euclid(12))?;
        let month = self.month0.rem_euclid(12) as u32 + 1;
        let first = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)?;
        let date = first.checked_add_signed(TimeDelta::try_days(self.day.checked_sub(1)?)?)?;

        let time_ms = self
            .hour
            .checked_mul(60)?
            .checked_add(self.minute)?
            .checked_mul(60)?
            .checked_add(self.second)?
            .checked_mul(MS_PER_SECOND)?
            .checked_add(self.millis)?;
        date.and_time(NaiveTime::MIN)
            .checked_add_signed(TimeDelta::try_milliseconds(time_ms)?)
    }
}

/// Parse `Y-M-D[ H:M:S[.fff]]` with the default separators.
pub fn parse(text: &str) -> Option<NaiveDateTime> {
    parse_with(text, DATE_SEPARATOR, TIME_SEPARATORS)
}

/// Parse a date string with custom separators.
///
/// The date and time halves are split on the first space (or `T`). The
/// month is one-based in the text. A fourth time field is a fraction of a
/// second. Returns `None` for anything malformed.
pub fn parse_with(text: &str, date_sep: char, time_seps: &[char]) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let (date_part, time_part) = match text.split_once([' ', 'T']) {
        Some((d, t)) => (d, Some(t.trim())),
        None => (text, None),
    };

    let date_fields = date_part
        .split(date_sep)
        .map(|v| v.trim().parse::<i64>().ok())
        .collect::<Option<Vec<_>>>()?;
    let (year, month, day) = match date_fields.as_slice() {
        [y, m] => (*y, *m, 1),
        [y, m, d] => (*y, *m, *d),
        _ => return None,
    };

    let mut fields = Fields {
        year,
        month0: month - 1,
        day,
        hour: 0,
        minute: 0,
        second: 0,
        millis: 0,
    };

    if let Some(time_part) = time_part.filter(|t| !t.is_empty()) {
        let raw: Vec<&str> = time_part.split(time_seps).collect();
        if raw.len() > 4 {
            return None;
        }
        let mut numbers = [0i64; 3];
        for (slot, value) in numbers.iter_mut().zip(raw.iter()) {
            *slot = value.trim().parse().ok()?;
        }
        fields.hour = numbers[0];
        fields.minute = numbers[1];
        fields.second = numbers[2];
        if let Some(fraction) = raw.get(3) {
            let fraction: f64 = format!("0.{}", fraction.trim()).parse().ok()?;
            fields.millis = (fraction * 1000.0).trunc() as i64;
        }
    }

    fields.normalize()
}

/// Shift exactly one calendar field by `qty`, copying the rest, then
/// normalize. Saturates at chrono's range limits.
pub fn add(t: NaiveDateTime, qty: i64, unit: TimeUnit) -> NaiveDateTime {
    let mut f = Fields::of(&t);
    let slot = match unit {
        TimeUnit::Year => &mut f.year,
        TimeUnit::Month => &mut f.month0,
        TimeUnit::Day => &mut f.day,
        TimeUnit::Hour => &mut f.hour,
        TimeUnit::Minute => &mut f.minute,
        TimeUnit::Second => &mut f.second,
        TimeUnit::Millisecond => &mut f.millis,
    };
    *slot = slot.saturating_add(qty);
    f.normalize().unwrap_or(if qty < 0 {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}

/// Shift by a fractional number of hours, rounded to the millisecond.
pub fn add_hours(t: NaiveDateTime, hours: f64) -> NaiveDateTime {
    let ms = (hours * MS_PER_HOUR as f64).round();
    add(t, ms as i64, TimeUnit::Millisecond)
}

/// Truncate every field finer than `unit` to its minimum.
pub fn start_of(t: NaiveDateTime, unit: TimeUnit) -> NaiveDateTime {
    let rank = unit.rank();
    let reset = |u: TimeUnit| u.rank() <= rank;
    let f = Fields::of(&t);
    let truncated = Fields {
        year: f.year,
        month0: if reset(TimeUnit::Year) { 0 } else { f.month0 },
        day: if reset(TimeUnit::Month) { 1 } else { f.day },
        hour: if reset(TimeUnit::Day) { 0 } else { f.hour },
        minute: if reset(TimeUnit::Hour) { 0 } else { f.minute },
        second: if reset(TimeUnit::Minute) { 0 } else { f.second },
        millis: if reset(TimeUnit::Second) { 0 } else { f.millis },
    };
    truncated.normalize().unwrap_or(t)
}

/// Whole `unit`s elapsed from `b` to `a`, floored.
///
/// Months are a flat 30 days and years a flat 12 such months; this is not
/// calendar-aware. Because of the floor, `diff` of a negative span of half
/// a day in days is `-1`, not `0`.
pub fn diff(a: NaiveDateTime, b: NaiveDateTime, unit: TimeUnit) -> i64 {
    let milliseconds = (a - b).num_milliseconds() as f64;
    let seconds = milliseconds / 1000.0;
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;
    let months = days / 30.0;
    let years = months / 12.0;

    let value = match unit {
        TimeUnit::Millisecond => milliseconds,
        TimeUnit::Second => seconds,
        TimeUnit::Minute => minutes,
        TimeUnit::Hour => hours,
        TimeUnit::Day => days,
        TimeUnit::Month => months,
        TimeUnit::Year => years,
    };
    value.floor() as i64
}

/// Exact (unfloored) hours from `b` to `a`.
pub fn hours_between(a: NaiveDateTime, b: NaiveDateTime) -> f64 {
    (a - b).num_milliseconds() as f64 / MS_PER_HOUR as f64
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(t: NaiveDateTime) -> u32 {
    const DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let month0 = t.month0() as usize;
    if month0 == 1 && is_leap_year(t.year()) {
        29
    } else {
        DAYS[month0]
    }
}

/// `true` when any of hour, minute, second or millisecond is non-zero.
pub fn has_time_of_day(t: NaiveDateTime) -> bool {
    t.time() != NaiveTime::MIN
}

/// Midnight at the start of the current local day.
pub fn today() -> NaiveDateTime {
    Local::now().date_naive().and_time(NaiveTime::MIN)
}

/// `YYYY-MM-DD`, optionally followed by ` HH:mm:ss.SSS`.
pub fn to_date_string(t: NaiveDateTime, with_time: bool) -> String {
    if with_time {
        format(t, "YYYY-MM-DD HH:mm:ss.SSS", Language::En)
    } else {
        format(t, "YYYY-MM-DD", Language::En)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Year,
    MonthName,
    Month,
    PaddedDay,
    Hour,
    Minute,
    Second,
    Millis,
    Day,
}

/// Longest spelling first so `MMMM` is never read as `MM` + `MM`.
const TOKENS: [(&str, Token); 10] = [
    ("YYYY", Token::Year),
    ("MMMM", Token::MonthName),
    ("SSS", Token::Millis),
    ("MMM", Token::MonthName),
    ("MM", Token::Month),
    ("DD", Token::PaddedDay),
    ("HH", Token::Hour),
    ("mm", Token::Minute),
    ("ss", Token::Second),
    ("D", Token::Day),
];

impl Token {
    fn render(self, t: &NaiveDateTime, language: Language) -> String {
        match self {
            Token::Year => format!("{:04}", t.year()),
            Token::MonthName => language.month_name(t.month()).to_string(),
            Token::Month => format!("{:02}", t.month()),
            Token::PaddedDay => format!("{:02}", t.day()),
            Token::Hour => format!("{:02}", t.hour()),
            Token::Minute => format!("{:02}", t.minute()),
            Token::Second => format!("{:02}", t.second()),
            Token::Millis => format!("{:03}", (t.nanosecond() / 1_000_000).min(999)),
            Token::Day => t.day().to_string(),
        }
    }
}

/// Substitute date tokens in `pattern`. Text that is not a token is
/// copied through unchanged.
pub fn format(t: NaiveDateTime, pattern: &str, language: Language) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;
    'scan: while let Some(ch) = rest.chars().next() {
        for (spelling, token) in TOKENS {
            if let Some(tail) = rest.strip_prefix(spelling) {
                out.push_str(&token.render(&t, language));
                rest = tail;
                continue 'scan;
            }
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, ms)
            .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        dt(y, m, d, 0, 0, 0, 0)
    }

    #[test]
    fn test_parse_date_only() {
        assert_eq!(parse("2024-03-05"), Some(day(2024, 3, 5)));
    }

    #[test]
    fn test_parse_date_and_time_with_fraction() {
        assert_eq!(
            parse("2024-03-05 14:30:15.250"),
            Some(dt(2024, 3, 5, 14, 30, 15, 250))
        );
        assert_eq!(parse("2024-03-05 08:15"), Some(dt(2024, 3, 5, 8, 15, 0, 0)));
    }

    #[test]
    fn test_parse_custom_separators() {
        assert_eq!(
            parse_with("2024/03/05 10.20.30", '/', &['.']),
            Some(dt(2024, 3, 5, 10, 20, 30, 0))
        );
    }

    #[test]
    fn test_parse_normalizes_overflowing_fields() {
        assert_eq!(parse("2024-13-01"), Some(day(2025, 1, 1)));
        assert_eq!(parse("2024-04-31"), Some(day(2024, 5, 1)));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("not a date"), None);
        assert_eq!(parse("2024"), None);
        assert_eq!(parse("2024-xx-01"), None);
        assert_eq!(parse("2024-01-01 10:aa"), None);
        assert_eq!(parse("2024-01-01-01"), None);
    }

    #[test]
    fn test_add_rolls_day_overflow_into_next_month() {
        assert_eq!(add(day(2024, 4, 30), 1, TimeUnit::Day), day(2024, 5, 1));
        assert_eq!(add(day(2024, 1, 31), 1, TimeUnit::Month), day(2024, 3, 2));
        assert_eq!(add(day(2024, 12, 15), 1, TimeUnit::Month), day(2025, 1, 15));
        assert_eq!(add(day(2024, 1, 15), -1, TimeUnit::Month), day(2023, 12, 15));
    }

    #[test]
    fn test_add_time_units_are_exact_inverses() {
        let t = dt(2024, 2, 28, 23, 59, 59, 999);
        for unit in [
            TimeUnit::Hour,
            TimeUnit::Minute,
            TimeUnit::Second,
            TimeUnit::Millisecond,
        ] {
            for qty in [-100_000, -25, -1, 0, 1, 7, 61, 100_000] {
                assert_eq!(add(add(t, qty, unit), -qty, unit), t, "{unit:?} {qty}");
            }
        }
    }

    #[test]
    fn test_add_month_is_not_invertible_across_month_lengths() {
        let jan31 = day(2024, 1, 31);
        let back = add(add(jan31, 1, TimeUnit::Month), -1, TimeUnit::Month);
        assert_ne!(back, jan31);
        assert_eq!(back, day(2024, 2, 2));

        let mid = day(2024, 1, 15);
        assert_eq!(add(add(mid, 1, TimeUnit::Month), -1, TimeUnit::Month), mid);
        let leap = day(2024, 2, 29);
        assert_ne!(add(add(leap, 1, TimeUnit::Year), -1, TimeUnit::Year), leap);
    }

    #[test]
    fn test_add_hours_keeps_millisecond_precision() {
        let t = day(2024, 1, 1);
        assert_eq!(add_hours(t, 1.5), dt(2024, 1, 1, 1, 30, 0, 0));
        assert_eq!(add_hours(t, -0.25), dt(2023, 12, 31, 23, 45, 0, 0));
    }

    #[test]
    fn test_start_of_truncates_finer_fields() {
        let t = dt(2024, 7, 19, 13, 45, 30, 500);
        assert_eq!(start_of(t, TimeUnit::Year), day(2024, 1, 1));
        assert_eq!(start_of(t, TimeUnit::Month), day(2024, 7, 1));
        assert_eq!(start_of(t, TimeUnit::Day), day(2024, 7, 19));
        assert_eq!(start_of(t, TimeUnit::Hour), dt(2024, 7, 19, 13, 0, 0, 0));
        assert_eq!(start_of(t, TimeUnit::Minute), dt(2024, 7, 19, 13, 45, 0, 0));
        assert_eq!(start_of(t, TimeUnit::Second), dt(2024, 7, 19, 13, 45, 30, 0));
        assert_eq!(start_of(t, TimeUnit::Millisecond), t);
    }

    #[test]
    fn test_diff_floors_toward_negative_infinity() {
        let a = day(2024, 1, 3);
        let b = dt(2024, 1, 1, 12, 0, 0, 0);
        assert_eq!(diff(a, b, TimeUnit::Day), 1);
        assert_eq!(diff(a, b, TimeUnit::Hour), 36);
        assert_eq!(diff(b, a, TimeUnit::Day), -2);
        assert_eq!(diff(day(2024, 3, 1), day(2024, 1, 1), TimeUnit::Month), 2);
        assert_eq!(diff(day(2035, 1, 1), day(2024, 1, 1), TimeUnit::Year), 11);
    }

    #[test]
    fn test_days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(day(2024, 2, 10)), 29);
        assert_eq!(days_in_month(day(2023, 2, 10)), 28);
        assert_eq!(days_in_month(day(1900, 2, 1)), 28);
        assert_eq!(days_in_month(day(2000, 2, 1)), 29);
        assert_eq!(days_in_month(day(2024, 4, 1)), 30);
        assert_eq!(days_in_month(day(2024, 12, 1)), 31);
    }

    #[test]
    fn test_format_tokens() {
        let t = dt(2024, 3, 5, 9, 7, 3, 42);
        assert_eq!(format(t, "YYYY-MM-DD HH:mm:ss.SSS", Language::En), "2024-03-05 09:07:03.042");
        assert_eq!(format(t, "D MMM", Language::En), "5 March");
        assert_eq!(format(t, "MMMM YYYY", Language::Es), "Marzo 2024");
    }

    #[test]
    fn test_format_longest_token_wins() {
        let t = day(2024, 11, 2);
        assert_eq!(format(t, "MMMM", Language::En), "November");
        assert_eq!(format(t, "MM/DD", Language::En), "11/02");
        assert_eq!(format(t, "[D]", Language::En), "[2]");
    }

    #[test]
    fn test_to_date_string() {
        let t = dt(2024, 3, 5, 14, 0, 0, 0);
        assert_eq!(to_date_string(t, false), "2024-03-05");
        assert_eq!(to_date_string(t, true), "2024-03-05 14:00:00.000");
    }

    #[test]
    fn test_has_time_of_day() {
        assert!(!has_time_of_day(day(2024, 1, 1)));
        assert!(has_time_of_day(dt(2024, 1, 1, 0, 0, 0, 1)));
    }
}
