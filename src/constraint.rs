//! Selectability predicates for populating selector option lists.
//!
//! Every predicate is conservative: one violated condition disables the
//! candidate, and with no bounds configured nothing is ever disabled.
//! Bound timestamps are compared component-wise, so only their
//! hour/minute/second parts matter.

use chrono::{NaiveDateTime, Timelike};

/// The partial selection the predicates are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
}

/// Bounds plus the enumerable minute list, ready to answer "is this
/// candidate selectable".
#[derive(Debug, Clone)]
pub struct ConstraintSet<'a> {
    min_time: Option<NaiveDateTime>,
    max_time: Option<NaiveDateTime>,
    unselectable: &'a [NaiveDateTime],
    enable_seconds: bool,
    minute_values: Vec<u32>,
}

impl<'a> ConstraintSet<'a> {
    pub fn new(
        min_time: Option<NaiveDateTime>,
        max_time: Option<NaiveDateTime>,
        unselectable: &'a [NaiveDateTime],
        enable_seconds: bool,
        minute_values: Vec<u32>,
    ) -> Self {
        Self {
            min_time,
            max_time,
            unselectable,
            enable_seconds,
            minute_values,
        }
    }

    /// An hour is disabled below the min hour, above the max hour, when
    /// every enumerable minute inside it is disabled, or when it forms an
    /// unselectable time with the currently selected minute (and second).
    pub fn is_hour_disabled(&self, hour: u32, selection: Selection) -> bool {
        let mut disabled = false;
        if let Some(min) = self.min_time {
            let no_minutes_available = self
                .minute_values
                .iter()
                .all(|&minute| self.is_minute_disabled_for_hour(hour, minute));
            disabled = hour < min.hour() || no_minutes_available;
        }
        if let Some(max) = self.max_time {
            if !disabled {
                disabled = hour > max.hour();
            }
        }
        if !self.unselectable.is_empty() && !disabled {
            let matches_selection = self.unselectable.iter().any(|time| {
                if self.enable_seconds && selection.second.is_some() {
                    time.hour() == hour
                        && Some(time.minute()) == selection.minute
                        && Some(time.second()) == selection.second
                } else if selection.minute.is_some() {
                    time.hour() == hour && Some(time.minute()) == selection.minute
                } else {
                    false
                }
            });
            if matches_selection {
                disabled = true;
            } else {
                // No minute picked yet: the hour is only out when every
                // one of its minutes is individually unselectable
                disabled = self.minute_values.iter().all(|&minute| {
                    self.unselectable
                        .iter()
                        .any(|time| time.hour() == hour && time.minute() == minute)
                });
            }
        }
        disabled
    }

    /// Min/max boundary check for a (hour, minute) pair, independent of
    /// the current selection.
    pub fn is_minute_disabled_for_hour(&self, hour: u32, minute: u32) -> bool {
        let mut disabled = false;
        if let Some(min) = self.min_time {
            disabled = hour == min.hour() && minute < min.minute();
        }
        if let Some(max) = self.max_time {
            if !disabled {
                disabled = hour == max.hour() && minute > max.minute();
            }
        }
        disabled
    }

    /// A minute needs an hour selected first; it is disabled when that
    /// hour is, when it crosses a min/max boundary, or when the exact
    /// time is unselectable.
    pub fn is_minute_disabled(&self, minute: u32, selection: Selection) -> bool {
        let Some(hour) = selection.hour else {
            return false;
        };
        let mut disabled = if self.is_hour_disabled(hour, selection) {
            true
        } else {
            self.is_minute_disabled_for_hour(hour, minute)
        };
        if !disabled {
            disabled = self.unselectable.iter().any(|time| {
                if self.enable_seconds && selection.second.is_some() {
                    time.hour() == hour
                        && time.minute() == minute
                        && Some(time.second()) == selection.second
                } else {
                    time.hour() == hour && time.minute() == minute
                }
            });
        }
        disabled
    }

    /// A second needs hour and minute selected first; chains through the
    /// minute predicate, then exact-boundary min/max checks, then exact
    /// unselectable membership.
    pub fn is_second_disabled(&self, second: u32, selection: Selection) -> bool {
        let (Some(hour), Some(minute)) = (selection.hour, selection.minute) else {
            return false;
        };
        let mut disabled = self.is_minute_disabled(minute, selection);
        if !disabled {
            if let Some(min) = self.min_time {
                disabled =
                    hour == min.hour() && minute == min.minute() && second < min.second();
            }
            if let Some(max) = self.max_time {
                if !disabled {
                    disabled =
                        hour == max.hour() && minute == max.minute() && second > max.second();
                }
            }
        }
        if !disabled {
            disabled = self.unselectable.iter().any(|time| {
                time.hour() == hour && time.minute() == minute && time.second() == second
            });
        }
        disabled
    }
}
