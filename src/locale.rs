//! Locale-derived time formatting metadata.
//!
//! A [`LocaleTimeFormat`] captures everything the engine needs to know
//! about how a locale writes times: the 12/24-hour cycle, the ordered
//! field layout with its separator literals, and the day-period labels.
//! The data comes from the libc-style locale database (`T_FMT`,
//! `T_FMT_AMPM`, `AM_PM`) that chrono's own localized formatting is
//! built on.

use chrono::{NaiveDateTime, Timelike};
use pure_rust_locales::{locale_match, Locale};
use regex::Regex;
use tracing::debug;

use crate::config::HourFormat;
use crate::parse;

/// Fixed sample hours used to pick the morning and evening day-period
/// labels out of the locale data.
const SAMPLE_MORNING_HOUR: u32 = 10;
const SAMPLE_EVENING_HOUR: u32 = 20;

const DEFAULT_12H_PATTERN: &str = "%I:%M:%S %p";
const DEFAULT_24H_PATTERN: &str = "%H:%M:%S";

/// One element of a locale's time-field layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatToken {
    Hour,
    Minute,
    Second,
    DayPeriod,
    Literal(String),
}

/// Formatting metadata resolved for one (locale, hour format, seconds)
/// tuple. Immutable once resolved; the picker re-resolves when the
/// locale or hour-format preference changes.
#[derive(Debug, Clone)]
pub struct LocaleTimeFormat {
    locale_tag: String,
    hour_format: HourFormat,
    enable_seconds: bool,
    am: String,
    pm: String,
    tokens: Vec<FormatToken>,
    matcher: Option<Regex>,
}

impl LocaleTimeFormat {
    /// Resolve formatting metadata for a locale tag.
    ///
    /// An explicit hour-format preference wins; otherwise the locale's
    /// own time pattern decides (12-hour iff it carries a 12-hour field
    /// or day-period field). Unknown tags fall back to POSIX.
    pub fn resolve(tag: &str, explicit: Option<HourFormat>, enable_seconds: bool) -> Self {
        let locale = lookup_locale(tag);
        let am_pm = locale_match!(locale => LC_TIME::AM_PM);
        let am = sampled_day_period(am_pm, SAMPLE_MORNING_HOUR)
            .unwrap_or_else(|| parse::AM.to_string());
        let pm = sampled_day_period(am_pm, SAMPLE_EVENING_HOUR)
            .unwrap_or_else(|| parse::PM.to_string());

        let t_fmt = locale_match!(locale => LC_TIME::T_FMT);
        let t_fmt_ampm = locale_match!(locale => LC_TIME::T_FMT_AMPM);
        let hour_format = explicit.unwrap_or(if pattern_prefers_12h(t_fmt) {
            HourFormat::Hour12
        } else {
            HourFormat::Hour24
        });

        let pattern = select_pattern(hour_format, t_fmt, t_fmt_ampm);
        let mut tokens = tokenize(&pattern).unwrap_or_else(|| {
            debug!(tag, %pattern, "unrecognized locale time pattern, using canonical layout");
            tokenize(default_pattern(hour_format)).unwrap_or_default()
        });
        if !enable_seconds {
            strip_seconds(&mut tokens);
        }
        let matcher = parse::build_matcher(&tokens, &am, &pm);

        Self {
            locale_tag: tag.to_string(),
            hour_format,
            enable_seconds,
            am,
            pm,
            tokens,
            matcher,
        }
    }

    pub fn locale_tag(&self) -> &str {
        &self.locale_tag
    }

    pub fn hour_format(&self) -> HourFormat {
        self.hour_format
    }

    pub fn seconds_enabled(&self) -> bool {
        self.enable_seconds
    }

    /// Locale morning day-period label ("AM" unless the locale says
    /// otherwise)
    pub fn am_string(&self) -> &str {
        &self.am
    }

    /// Locale evening day-period label
    pub fn pm_string(&self) -> &str {
        &self.pm
    }

    /// Both day-period labels as an (am, pm) pair
    pub fn day_period_strings(&self) -> (&str, &str) {
        (&self.am, &self.pm)
    }

    /// Ordered field layout this locale writes times in
    pub fn tokens(&self) -> &[FormatToken] {
        &self.tokens
    }

    pub(crate) fn matcher(&self) -> Option<&Regex> {
        self.matcher.as_ref()
    }

    /// Separator literal directly following `field` in the layout, if any
    pub fn literal_after(&self, field: FormatToken) -> Option<&str> {
        let pos = self.tokens.iter().position(|t| *t == field)?;
        match self.tokens.get(pos + 1) {
            Some(FormatToken::Literal(lit)) => Some(lit.as_str()),
            _ => None,
        }
    }

    /// Separator shown after the hour selector, `":"` when the locale
    /// does not say
    pub fn hour_literal(&self) -> &str {
        self.literal_after(FormatToken::Hour).unwrap_or(":")
    }

    /// Separator shown after the minute selector
    pub fn minute_literal(&self) -> &str {
        self.literal_after(FormatToken::Minute).unwrap_or(":")
    }

    /// Separator shown after the second selector, if the locale has one
    pub fn second_literal(&self) -> Option<&str> {
        self.literal_after(FormatToken::Second)
    }

    /// Render the canonical display string for a value.
    ///
    /// Deterministic: the same (value, resolved format) pair always
    /// produces the same text.
    pub fn format(&self, value: NaiveDateTime) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                FormatToken::Hour => match self.hour_format {
                    HourFormat::Hour24 => out.push_str(&pad2(value.hour())),
                    HourFormat::Hour12 => {
                        let (_, hour12) = value.hour12();
                        out.push_str(&pad2(hour12));
                    }
                },
                FormatToken::Minute => out.push_str(&pad2(value.minute())),
                FormatToken::Second => out.push_str(&pad2(value.second())),
                FormatToken::DayPeriod => {
                    out.push_str(if value.hour() >= 12 { &self.pm } else { &self.am })
                }
                FormatToken::Literal(lit) => out.push_str(lit),
            }
        }
        out
    }
}

fn pad2(value: u32) -> String {
    format!("{value:02}")
}

/// Map a locale tag onto the locale database, falling back to POSIX.
fn lookup_locale(tag: &str) -> Locale {
    let normalized = tag.trim().replace('-', "_");
    if normalized.is_empty() {
        return Locale::POSIX;
    }
    if let Ok(locale) = Locale::try_from(normalized.as_str()) {
        return locale;
    }
    // Second attempt with conventional casing (lowercase language,
    // uppercase region)
    if let Some((lang, region)) = normalized.split_once('_') {
        let recased = format!("{}_{}", lang.to_lowercase(), region.to_uppercase());
        if let Ok(locale) = Locale::try_from(recased.as_str()) {
            return locale;
        }
    }
    debug!(tag, "locale tag not in database, falling back to POSIX");
    Locale::POSIX
}

/// Pick the day-period label a time at `hour` would carry, skipping
/// locales whose data has no labels at all.
fn sampled_day_period(am_pm: &[&str], hour: u32) -> Option<String> {
    am_pm
        .get(usize::from(hour >= 12))
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
}

fn pattern_prefers_12h(pattern: &str) -> bool {
    ["%r", "%I", "%l", "%p", "%P"]
        .iter()
        .any(|field| pattern.contains(field))
}

fn default_pattern(hour_format: HourFormat) -> &'static str {
    match hour_format {
        HourFormat::Hour12 => DEFAULT_12H_PATTERN,
        HourFormat::Hour24 => DEFAULT_24H_PATTERN,
    }
}

/// Choose the strftime pattern matching the resolved hour cycle. A
/// locale pattern that lacks the right hour field entirely (asking a
/// 24-hour locale for 12-hour display, say) gives way to the canonical
/// pattern for that cycle.
fn select_pattern(hour_format: HourFormat, t_fmt: &str, t_fmt_ampm: &str) -> String {
    match hour_format {
        HourFormat::Hour12 => {
            let expanded = expand_pattern(t_fmt_ampm, t_fmt_ampm);
            if expanded.contains("%I") || expanded.contains("%l") {
                expanded
            } else {
                DEFAULT_12H_PATTERN.to_string()
            }
        }
        HourFormat::Hour24 => {
            let expanded = expand_pattern(t_fmt, t_fmt_ampm);
            if expanded.contains("%H") || expanded.contains("%k") {
                expanded
            } else {
                DEFAULT_24H_PATTERN.to_string()
            }
        }
    }
}

/// Expand the composite strftime fields (%r, %T, %R) so the tokenizer
/// only ever sees simple ones.
fn expand_pattern(pattern: &str, ampm_pattern: &str) -> String {
    let ampm = if ampm_pattern.is_empty() || ampm_pattern.contains("%r") {
        DEFAULT_12H_PATTERN
    } else {
        ampm_pattern
    };
    pattern
        .replace("%T", "%H:%M:%S")
        .replace("%R", "%H:%M")
        .replace("%r", ampm)
}

/// Break a strftime time pattern into the field layout. `None` when the
/// pattern carries a specifier this engine does not model; the caller
/// then falls back to the canonical layout.
fn tokenize(pattern: &str) -> Option<Vec<FormatToken>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        let spec = chars.next()?;
        let field = match spec {
            'H' | 'k' | 'I' | 'l' => FormatToken::Hour,
            'M' => FormatToken::Minute,
            'S' => FormatToken::Second,
            'p' | 'P' => FormatToken::DayPeriod,
            '%' => {
                literal.push('%');
                continue;
            }
            _ => return None,
        };
        if !literal.is_empty() {
            tokens.push(FormatToken::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(field);
    }
    if !literal.is_empty() {
        tokens.push(FormatToken::Literal(literal));
    }
    Some(tokens)
}

/// Drop the second field and its leading separator from a layout.
fn strip_seconds(tokens: &mut Vec<FormatToken>) {
    if let Some(pos) = tokens.iter().position(|t| *t == FormatToken::Second) {
        tokens.remove(pos);
        if pos > 0 && matches!(tokens.get(pos - 1), Some(FormatToken::Literal(_))) {
            tokens.remove(pos - 1);
        }
    }
}
