//! Typed picker configuration.
//!
//! The host constructs one of these and hands it to [`Timepicker::new`];
//! every recognized option is an explicit field rather than a dynamic
//! lookup, so misconfigurations show up in the type system.
//!
//! [`Timepicker::new`]: crate::picker::Timepicker::new

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Explicit hour-format preference. When absent the locale's natural
/// preference decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HourFormat {
    #[serde(rename = "12")]
    Hour12,
    #[serde(rename = "24")]
    Hour24,
}

/// AM/PM designator. Only meaningful in 12-hour mode; an empty selection
/// carries `Am` as its resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Meridiem {
    #[default]
    Am,
    Pm,
}

impl Meridiem {
    /// Designator a given 24-hour value falls under
    pub fn from_hour(hour: u32) -> Self {
        if hour >= 12 {
            Meridiem::Pm
        } else {
            Meridiem::Am
        }
    }

    /// The other designator
    pub fn toggled(self) -> Self {
        match self {
            Meridiem::Am => Meridiem::Pm,
            Meridiem::Pm => Meridiem::Am,
        }
    }
}

/// Options recognized by the picker engine.
///
/// Bound timestamps (`min_time`, `max_time`, `unselectable_times`) are
/// compared component-wise: only their hour/minute/second parts are
/// significant, the date part is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// BCP-47-ish locale tag ("en-US", "fr_FR", ...). Unresolvable tags
    /// fall back to the POSIX locale.
    pub locale: String,
    /// Explicit 12/24-hour override; `None` defers to the locale.
    pub hour_format: Option<HourFormat>,
    pub increment_hours: u32,
    pub increment_minutes: u32,
    pub increment_seconds: u32,
    /// Whether the seconds field exists at all.
    pub enable_seconds: bool,
    /// Seed for the minute field when an hour is picked first.
    pub default_minutes: Option<u32>,
    /// Seed for the second field when an hour or minute is picked first.
    pub default_seconds: Option<u32>,
    /// Clear the whole selection on a meridiem change instead of shifting
    /// the hour by twelve.
    pub reset_on_meridiem_change: bool,
    pub min_time: Option<NaiveDateTime>,
    pub max_time: Option<NaiveDateTime>,
    pub unselectable_times: Vec<NaiveDateTime>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            locale: "POSIX".to_string(),
            hour_format: None,
            increment_hours: 1,
            increment_minutes: 1,
            increment_seconds: 1,
            enable_seconds: false,
            default_minutes: None,
            default_seconds: None,
            reset_on_meridiem_change: false,
            min_time: None,
            max_time: None,
            unselectable_times: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PickerConfig::default();
        assert_eq!(config.increment_hours, 1);
        assert_eq!(config.increment_minutes, 1);
        assert_eq!(config.increment_seconds, 1);
        assert!(!config.enable_seconds);
        assert!(config.hour_format.is_none());
        assert!(config.unselectable_times.is_empty());
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: PickerConfig =
            serde_json::from_str(r#"{"locale": "en-US", "increment_minutes": 15}"#).unwrap();
        assert_eq!(config.locale, "en-US");
        assert_eq!(config.increment_minutes, 15);
        assert_eq!(config.increment_hours, 1);
        assert!(!config.reset_on_meridiem_change);
    }

    #[test]
    fn test_hour_format_wire_names() {
        let config: PickerConfig = serde_json::from_str(r#"{"hour_format": "12"}"#).unwrap();
        assert_eq!(config.hour_format, Some(HourFormat::Hour12));

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""hour_format":"12""#));
    }

    #[test]
    fn test_meridiem_helpers() {
        assert_eq!(Meridiem::from_hour(0), Meridiem::Am);
        assert_eq!(Meridiem::from_hour(11), Meridiem::Am);
        assert_eq!(Meridiem::from_hour(12), Meridiem::Pm);
        assert_eq!(Meridiem::from_hour(23), Meridiem::Pm);
        assert_eq!(Meridiem::Am.toggled(), Meridiem::Pm);
        assert_eq!(Meridiem::Pm.toggled().toggled(), Meridiem::Pm);
    }
}
