//! Two-tier text-to-time parsing.
//!
//! Tier one matches typed text against a regex compiled from the
//! locale's field layout. Tier two is a plain colon-split that covers
//! locales whose layout could not be derived and inputs the token
//! matcher rejects. Both tiers overwrite only the time part of the
//! reference date; the date part is preserved untouched.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::HourFormat;
use crate::locale::{FormatToken, LocaleTimeFormat};

/// Canonical day-period designators, accepted in every locale.
pub const AM: &str = "AM";
pub const PM: &str = "PM";

/// Shape emitted by native `<input type="time">` widgets: `HH:MM` or
/// `HH:MM:SS`.
static NATIVE_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{1,2})(?::(\d{1,2}))?$").expect("native time regex")
});

/// Parse typed text into a concrete time, overwriting the time part of
/// `reference`. `None` means neither tier accepted the input; the caller
/// clears the current selection.
pub fn parse_time(
    text: &str,
    fmt: &LocaleTimeFormat,
    reference: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(parsed) = token_parse(text, fmt, reference) {
        return Some(parsed);
    }
    debug!(input = text, "token parse rejected input, trying split parse");
    split_parse(text, fmt, reference)
}

/// Fixed-format ingestion for native time inputs (`H:M[:S]`).
pub fn parse_native(text: &str, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    let caps = NATIVE_TIME_RE.captures(text.trim())?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    let second: u32 = caps
        .get(3)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    reference.date().and_hms_opt(hour, minute, second)
}

/// Tier one: locale-layout matcher.
fn token_parse(
    text: &str,
    fmt: &LocaleTimeFormat,
    reference: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let matcher = fmt.matcher()?;
    let caps = matcher.captures(text)?;

    let mut hour: u32 = caps.name("hour")?.as_str().parse().ok()?;
    let minute: u32 = caps.name("minute")?.as_str().parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    let second: u32 = caps
        .name("second")
        .and_then(|m| m.as_str().parse().ok())
        .filter(|s| *s <= 59)
        .unwrap_or(0);

    if let Some(period) = caps.name("period").map(|m| m.as_str()) {
        let period = period.to_lowercase();
        let is_pm =
            period == fmt.pm_string().to_lowercase() || period == PM.to_lowercase();
        if is_pm && hour < 12 {
            hour += 12;
        }
    }
    reference.date().and_hms_opt(hour, minute, second)
}

/// Tier two: colon-split fallback.
fn split_parse(
    text: &str,
    fmt: &LocaleTimeFormat,
    reference: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let twelve_hour = fmt.hour_format() == HourFormat::Hour12;
    let mut text = text;
    let mut am = false;
    if twelve_hour {
        let mut parts = text.splitn(2, ' ');
        text = parts.next().unwrap_or_default();
        // AM match is case-sensitive here; any other suffix reads as PM
        let suffix = parts.next().unwrap_or_default();
        am = suffix == fmt.am_string() || suffix == AM;
    }

    let mut fields = text.split(':');
    let mut hour: u32 = fields.next()?.parse().ok()?;
    let minute: u32 = fields.next()?.parse().ok()?;
    let second: u32 = if fmt.seconds_enabled() {
        fields.next()?.parse().ok()?
    } else {
        0
    };

    if hour > 23 || (twelve_hour && !(1..=12).contains(&hour)) || minute > 59 || second > 59 {
        return None;
    }
    if twelve_hour {
        if am && hour == 12 {
            hour = 0;
        } else if !am && hour != 12 {
            hour += 12;
        }
    }
    reference.date().and_hms_opt(hour, minute, second)
}

/// Compile the tier-one matcher from a field layout. `None` disables the
/// token tier (empty layout, or a literal that breaks the pattern).
pub(crate) fn build_matcher(tokens: &[FormatToken], am: &str, pm: &str) -> Option<Regex> {
    if tokens.is_empty() {
        return None;
    }
    let mut pattern = String::new();
    for token in tokens {
        match token {
            FormatToken::Hour => pattern.push_str(r"(?P<hour>\d+)"),
            FormatToken::Minute => pattern.push_str(r"(?P<minute>\d+)"),
            FormatToken::Second => pattern.push_str(r"(?P<second>\d+)"),
            FormatToken::DayPeriod => {
                // Locale labels plus the canonical designators, either case
                let alternation = format!(
                    "(?i:{}|{}|{}|{})",
                    regex::escape(am),
                    regex::escape(pm),
                    AM,
                    PM
                );
                pattern.push_str(&format!("(?P<period>{alternation})?"));
            }
            FormatToken::Literal(lit) => {
                pattern.push_str(&regex::escape(lit).replace(' ', r"\s?"));
            }
        }
    }
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            debug!(%err, "locale matcher failed to compile, token parse disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HourFormat;
    use chrono::{NaiveDate, Timelike};

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(8, 15, 30)
            .unwrap()
    }

    fn fmt_24() -> LocaleTimeFormat {
        LocaleTimeFormat::resolve("POSIX", Some(HourFormat::Hour24), false)
    }

    fn fmt_12() -> LocaleTimeFormat {
        LocaleTimeFormat::resolve("en-US", Some(HourFormat::Hour12), false)
    }

    #[test]
    fn test_24_hour_basic() {
        let parsed = parse_time("13:45", &fmt_24(), reference()).unwrap();
        assert_eq!((parsed.hour(), parsed.minute(), parsed.second()), (13, 45, 0));
        // Date part of the reference survives
        assert_eq!(parsed.date(), reference().date());
    }

    #[test]
    fn test_12_hour_pm() {
        let parsed = parse_time("1:45 PM", &fmt_12(), reference()).unwrap();
        assert_eq!((parsed.hour(), parsed.minute()), (13, 45));
    }

    #[test]
    fn test_12_hour_lowercase_period() {
        let parsed = parse_time("1:45 pm", &fmt_12(), reference()).unwrap();
        assert_eq!(parsed.hour(), 13);
    }

    #[test]
    fn test_hour_out_of_range() {
        assert_eq!(parse_time("25:00", &fmt_24(), reference()), None);
    }

    #[test]
    fn test_garbage() {
        assert_eq!(parse_time("garbage", &fmt_24(), reference()), None);
        assert_eq!(parse_time("", &fmt_24(), reference()), None);
        assert_eq!(parse_time("   ", &fmt_24(), reference()), None);
    }

    #[test]
    fn test_minute_upper_bound_inclusive() {
        let parsed = parse_time("10:59", &fmt_24(), reference()).unwrap();
        assert_eq!((parsed.hour(), parsed.minute()), (10, 59));
        assert_eq!(parse_time("10:60", &fmt_24(), reference()), None);
    }

    #[test]
    fn test_midnight_hour_zero() {
        let parsed = parse_time("0:30", &fmt_24(), reference()).unwrap();
        assert_eq!(parsed.hour(), 0);
        // The token tier takes hour 0 at face value even in a 12-hour
        // locale; only the split tier insists on 1..=12
        let parsed = parse_time("0:30", &fmt_12(), reference()).unwrap();
        assert_eq!(parsed.hour(), 0);
        assert_eq!(split_parse("0:30", &fmt_12(), reference()), None);
    }

    #[test]
    fn test_12_am_maps_to_zero_in_split_parse() {
        // Strip the layout so the split tier handles it: AM suffix must
        // be exact there
        let parsed = parse_time("12:30 AM", &fmt_12(), reference()).unwrap();
        // Token tier leaves hour 12 alone for AM
        assert_eq!(parsed.hour(), 12);

        let parsed = split_parse("12:30 AM", &fmt_12(), reference()).unwrap();
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn test_seconds_required_when_enabled() {
        let fmt = LocaleTimeFormat::resolve("POSIX", Some(HourFormat::Hour24), true);
        let parsed = parse_time("13:45:10", &fmt, reference()).unwrap();
        assert_eq!((parsed.hour(), parsed.minute(), parsed.second()), (13, 45, 10));
        assert_eq!(split_parse("13:45", &fmt, reference()), None);
    }

    #[test]
    fn test_token_tier_tolerates_missing_space() {
        let parsed = parse_time("1:45PM", &fmt_12(), reference()).unwrap();
        assert_eq!(parsed.hour(), 13);
    }

    #[test]
    fn test_parse_native() {
        let parsed = parse_native("09:30", reference()).unwrap();
        assert_eq!((parsed.hour(), parsed.minute(), parsed.second()), (9, 30, 0));

        let parsed = parse_native("23:59:58", reference()).unwrap();
        assert_eq!(parsed.second(), 58);

        assert_eq!(parse_native("24:00", reference()), None);
        assert_eq!(parse_native("nope", reference()), None);
    }

    #[test]
    fn test_build_matcher_groups() {
        let tokens = vec![
            FormatToken::Hour,
            FormatToken::Literal(":".to_string()),
            FormatToken::Minute,
            FormatToken::Literal(" ".to_string()),
            FormatToken::DayPeriod,
        ];
        let re = build_matcher(&tokens, "AM", "PM").unwrap();
        let caps = re.captures("11:05 pm").unwrap();
        assert_eq!(&caps["hour"], "11");
        assert_eq!(&caps["minute"], "05");
        assert_eq!(&caps["period"], "pm");
    }

    #[test]
    fn test_build_matcher_empty_layout() {
        assert!(build_matcher(&[], "AM", "PM").is_none());
    }
}
