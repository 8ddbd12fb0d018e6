//! The time-value state machine.
//!
//! A [`Timepicker`] is the single authority over one selection. The
//! absolute value (`Option<NaiveDateTime>`) is the source of truth; the
//! hour/minute/second/meridiem fields are its wall-clock decomposition
//! and every mutation goes through here so they can never drift apart.
//! One instance per host component, exclusively owned, no locking.

use std::fmt;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::Serialize;
use tracing::warn;

use crate::config::{HourFormat, Meridiem, PickerConfig};
use crate::constraint::{ConstraintSet, Selection};
use crate::error::{Result, TimedialError};
use crate::locale::LocaleTimeFormat;
use crate::parse;

/// One entry of a selector option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: u32,
    pub disabled: bool,
}

/// Host-supplied display override
pub type FormatterFn = dyn Fn(NaiveDateTime, &LocaleTimeFormat) -> String;
/// Host-supplied parse override; `None` still means "clear the selection"
pub type ParserFn = dyn Fn(&str, &LocaleTimeFormat, NaiveDateTime) -> Option<NaiveDateTime>;
/// Produces the base timestamp used when no prior value exists
pub type TimeCreatorFn = dyn Fn() -> NaiveDateTime;
/// Observes published values; called only with fully consistent state
pub type ChangeObserverFn = dyn FnMut(Option<NaiveDateTime>);

/// Fixed `HH:MM:SS` rendering used by native time inputs; empty string
/// for no value.
pub fn format_hhmmss(value: Option<NaiveDateTime>) -> String {
    match value {
        Some(v) => format!("{:02}:{:02}:{:02}", v.hour(), v.minute(), v.second()),
        None => String::new(),
    }
}

pub struct Timepicker {
    config: PickerConfig,
    format: LocaleTimeFormat,
    value: Option<NaiveDateTime>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    meridiem: Meridiem,
    formatter: Option<Box<FormatterFn>>,
    parser: Option<Box<ParserFn>>,
    time_creator: Option<Box<TimeCreatorFn>>,
    observer: Option<Box<ChangeObserverFn>>,
}

impl Timepicker {
    pub fn new(config: PickerConfig) -> Self {
        let format =
            LocaleTimeFormat::resolve(&config.locale, config.hour_format, config.enable_seconds);
        Self {
            config,
            format,
            value: None,
            hour: None,
            minute: None,
            second: None,
            meridiem: Meridiem::Am,
            formatter: None,
            parser: None,
            time_creator: None,
            observer: None,
        }
    }

    /// Construct seeded from an externally bound value
    pub fn with_value(config: PickerConfig, value: Option<NaiveDateTime>) -> Self {
        let mut picker = Self::new(config);
        picker.set_from_date(value);
        picker
    }

    /// Replace the default display rendering
    pub fn with_formatter(
        mut self,
        formatter: impl Fn(NaiveDateTime, &LocaleTimeFormat) -> String + 'static,
    ) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Replace the default two-tier text parser
    pub fn with_parser(
        mut self,
        parser: impl Fn(&str, &LocaleTimeFormat, NaiveDateTime) -> Option<NaiveDateTime> + 'static,
    ) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Replace "local now" as the base timestamp for fresh selections
    pub fn with_time_creator(mut self, creator: impl Fn() -> NaiveDateTime + 'static) -> Self {
        self.time_creator = Some(Box::new(creator));
        self
    }

    /// Register a value-change observer. It fires after every published
    /// mutation, never on a partial state.
    pub fn with_observer(mut self, observer: impl FnMut(Option<NaiveDateTime>) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn locale_format(&self) -> &LocaleTimeFormat {
        &self.format
    }

    pub fn value(&self) -> Option<NaiveDateTime> {
        self.value
    }

    pub fn hour(&self) -> Option<u32> {
        self.hour
    }

    pub fn minute(&self) -> Option<u32> {
        self.minute
    }

    pub fn second(&self) -> Option<u32> {
        self.second
    }

    pub fn meridiem(&self) -> Meridiem {
        self.meridiem
    }

    /// Select an hour (24-hour value, as carried by [`hour_options`]).
    ///
    /// An unset minute or second is seeded from the configured defaults
    /// first, so picking an hour alone can already produce a value.
    ///
    /// [`hour_options`]: Self::hour_options
    pub fn set_hour(&mut self, hour: u32) {
        if self.minute.is_none() {
            if let Some(default) = self.config.default_minutes {
                self.minute = Some(default);
            }
        }
        if self.second.is_none() {
            if let Some(default) = self.config.default_seconds {
                self.second = Some(default);
            }
        }
        self.hour = Some(hour);
        self.recompute();
    }

    pub fn set_minute(&mut self, minute: u32) {
        if self.second.is_none() {
            if let Some(default) = self.config.default_seconds {
                self.second = Some(default);
            }
        }
        self.minute = Some(minute);
        self.recompute();
    }

    pub fn set_second(&mut self, second: u32) {
        self.second = Some(second);
        self.recompute();
    }

    /// Change the day period.
    ///
    /// With `reset_on_meridiem_change` set and an hour already selected
    /// the whole selection clears; the alternative of silently jumping
    /// the hour by twelve surprises users. Without the flag the hour
    /// shifts by twelve so it keeps meaning the same wall-clock slot.
    pub fn set_meridiem(&mut self, meridiem: Meridiem) {
        if meridiem == self.meridiem {
            return;
        }
        self.meridiem = meridiem;
        if self.hour.is_some() && self.config.reset_on_meridiem_change {
            self.hour = None;
            self.minute = None;
            self.second = None;
            self.publish(None);
            return;
        }
        if let Some(hour) = self.hour {
            self.hour = Some(match meridiem {
                Meridiem::Pm if hour < 12 => hour + 12,
                Meridiem::Am if hour >= 12 => hour - 12,
                _ => hour,
            });
        }
        self.recompute();
    }

    /// Reflect an externally bound value into the selection. Does not
    /// notify the observer; the host already knows this value.
    pub fn set_from_date(&mut self, value: Option<NaiveDateTime>) {
        self.sync_fields(value);
        self.value = value;
    }

    /// Ingest typed text. Unparseable input clears the selection so the
    /// field visibly reflects it rather than holding stale state.
    pub fn set_from_text(&mut self, text: &str) {
        let reference = self.value.unwrap_or_else(|| self.creation_time());
        let parsed = match &self.parser {
            Some(custom) => custom(text, &self.format, reference),
            None => parse::parse_time(text, &self.format, reference),
        };
        if parsed.is_none() {
            warn!(input = text, "time text matched neither parser tier, clearing selection");
        }
        self.sync_fields(parsed);
        self.publish(parsed);
    }

    /// Ingest a native time input value (`H:M[:S]`); empty text clears.
    pub fn set_from_native(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.sync_fields(None);
            self.publish(None);
            return;
        }
        let reference = self.value.unwrap_or_else(|| self.creation_time());
        let parsed = parse::parse_native(text, reference);
        self.sync_fields(parsed);
        self.publish(parsed);
    }

    /// Re-resolve after a 12/24-hour preference change; a selected hour
    /// re-derives the day period.
    pub fn set_hour_format(&mut self, preference: Option<HourFormat>) {
        self.config.hour_format = preference;
        self.format =
            LocaleTimeFormat::resolve(&self.config.locale, preference, self.config.enable_seconds);
        if let Some(hour) = self.hour {
            self.meridiem = Meridiem::from_hour(hour);
        }
    }

    /// Re-resolve for a new locale; with nothing selected the day period
    /// rests at the new locale's AM.
    pub fn set_locale(&mut self, tag: &str) {
        self.config.locale = tag.to_string();
        self.format = LocaleTimeFormat::resolve(
            tag,
            self.config.hour_format,
            self.config.enable_seconds,
        );
        if self.value.is_none() {
            self.meridiem = Meridiem::Am;
        }
    }

    /// Display text for the current value, `None` when nothing is
    /// selected
    pub fn display(&self) -> Option<String> {
        let value = self.value?;
        Some(match &self.formatter {
            Some(custom) => custom(value, &self.format),
            None => self.format.format(value),
        })
    }

    /// Current value in fixed `HH:MM:SS` form for native inputs
    pub fn native_value(&self) -> String {
        format_hhmmss(self.value)
    }

    /// Constraint predicates against the current selection and bounds
    pub fn constraints(&self) -> Result<ConstraintSet<'_>> {
        let increment = positive_increment("minute", self.config.increment_minutes)?;
        let minute_values = (0..60).step_by(increment as usize).collect();
        Ok(ConstraintSet::new(
            self.config.min_time,
            self.config.max_time,
            &self.config.unselectable_times,
            self.config.enable_seconds,
            minute_values,
        ))
    }

    /// Enumerate the hour selector.
    ///
    /// 24-hour mode lists 0..24 with zero-padded labels. 12-hour mode
    /// lists twelve entries labelled 1-12 whose carried values map
    /// through the selected day period (12 AM is 0, n PM is n+12 except
    /// noon), so a selection can be written straight back via
    /// [`set_hour`].
    ///
    /// [`set_hour`]: Self::set_hour
    pub fn hour_options(&self) -> Result<Vec<SelectOption>> {
        let increment = positive_increment("hour", self.config.increment_hours)?;
        let constraints = self.constraints()?;
        let selection = self.selection();
        let mut options = Vec::new();
        match self.format.hour_format() {
            HourFormat::Hour24 => {
                for hour in (0..24).step_by(increment as usize) {
                    options.push(SelectOption {
                        label: pad2(hour),
                        value: hour,
                        disabled: constraints.is_hour_disabled(hour, selection),
                    });
                }
            }
            HourFormat::Hour12 => {
                for slot in (0..12).step_by(increment as usize) {
                    let label = slot + 1;
                    let value = match self.meridiem {
                        Meridiem::Am if label == 12 => 0,
                        Meridiem::Pm if label != 12 => label + 12,
                        _ => label,
                    };
                    options.push(SelectOption {
                        label: label.to_string(),
                        value,
                        disabled: constraints.is_hour_disabled(value, selection),
                    });
                }
            }
        }
        Ok(options)
    }

    pub fn minute_options(&self) -> Result<Vec<SelectOption>> {
        let increment = positive_increment("minute", self.config.increment_minutes)?;
        let constraints = self.constraints()?;
        let selection = self.selection();
        Ok((0..60)
            .step_by(increment as usize)
            .map(|minute| SelectOption {
                label: pad2(minute),
                value: minute,
                disabled: constraints.is_minute_disabled(minute, selection),
            })
            .collect())
    }

    pub fn second_options(&self) -> Result<Vec<SelectOption>> {
        let increment = positive_increment("second", self.config.increment_seconds)?;
        let constraints = self.constraints()?;
        let selection = self.selection();
        Ok((0..60)
            .step_by(increment as usize)
            .map(|second| SelectOption {
                label: pad2(second),
                value: second,
                disabled: constraints.is_second_disabled(second, selection),
            })
            .collect())
    }

    /// The two day-period labels, in (AM, PM) order, in the locale's own
    /// words
    pub fn meridiem_options(&self) -> [&str; 2] {
        [self.format.am_string(), self.format.pm_string()]
    }

    fn selection(&self) -> Selection {
        Selection {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
        }
    }

    /// Decompose a value into the selection fields (or clear them).
    fn sync_fields(&mut self, value: Option<NaiveDateTime>) {
        match value {
            Some(v) => {
                self.hour = Some(v.hour());
                self.minute = Some(v.minute());
                self.second = Some(v.second());
                self.meridiem = Meridiem::from_hour(v.hour());
            }
            None => {
                self.hour = None;
                self.minute = None;
                self.second = None;
                self.meridiem = Meridiem::Am;
            }
        }
    }

    /// Rebuild the absolute value from the selection fields when they
    /// are complete. The prior value donates its date part; a fresh
    /// selection starts from the creation time with subseconds zeroed.
    fn recompute(&mut self) {
        let (Some(hour), Some(minute)) = (self.hour, self.minute) else {
            return;
        };
        let second = if self.config.enable_seconds {
            self.second.unwrap_or(0)
        } else {
            0
        };
        let base = self.value.unwrap_or_else(|| self.creation_time());
        if let Some(next) = base.date().and_hms_opt(hour, minute, second) {
            self.publish(Some(next));
        }
    }

    /// Store and notify. Callers must have the derived fields consistent
    /// before this runs; the observer never sees a partial state.
    fn publish(&mut self, value: Option<NaiveDateTime>) {
        self.value = value;
        if let Some(observer) = self.observer.as_mut() {
            observer(value);
        }
    }

    fn creation_time(&self) -> NaiveDateTime {
        let now = match &self.time_creator {
            Some(creator) => creator(),
            None => Local::now().naive_local(),
        };
        now.with_nanosecond(0).unwrap_or(now)
    }
}

impl fmt::Debug for Timepicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timepicker")
            .field("value", &self.value)
            .field("hour", &self.hour)
            .field("minute", &self.minute)
            .field("second", &self.second)
            .field("meridiem", &self.meridiem)
            .field("locale", &self.format.locale_tag())
            .finish_non_exhaustive()
    }
}

fn pad2(value: u32) -> String {
    format!("{value:02}")
}

fn positive_increment(unit: &str, value: u32) -> Result<u32> {
    if value < 1 {
        return Err(TimedialError::increment(unit));
    }
    Ok(value)
}
