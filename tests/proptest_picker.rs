use chrono::{NaiveDate, NaiveDateTime, Timelike};
use proptest::prelude::*;
use timedial::{parse_time, HourFormat, LocaleTimeFormat, Meridiem, PickerConfig, Timepicker};

fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(hour, minute, second)
        .unwrap()
}

fn arb_time() -> impl Strategy<Value = (u32, u32, u32)> {
    (0u32..24, 0u32..60, 0u32..60)
}

proptest! {
    /// Property: decomposing a value into fields always reproduces its
    /// wall-clock time exactly
    #[test]
    fn prop_set_from_date_round_trips((hour, minute, second) in arb_time()) {
        let mut picker = Timepicker::new(PickerConfig {
            enable_seconds: true,
            ..PickerConfig::default()
        });
        picker.set_from_date(Some(at(hour, minute, second)));

        prop_assert_eq!(picker.hour(), Some(hour));
        prop_assert_eq!(picker.minute(), Some(minute));
        prop_assert_eq!(picker.second(), Some(second));
        prop_assert_eq!(picker.meridiem(), Meridiem::from_hour(hour));
    }

    /// Property: rebuilding a value from its own fields is the identity
    /// (with subseconds zeroed)
    #[test]
    fn prop_field_rebuild_is_identity((hour, minute, second) in arb_time()) {
        let value = at(hour, minute, second);
        let mut picker = Timepicker::new(PickerConfig {
            hour_format: Some(HourFormat::Hour24),
            enable_seconds: true,
            ..PickerConfig::default()
        })
        .with_time_creator(move || value);

        picker.set_hour(hour);
        picker.set_minute(minute);
        picker.set_second(second);
        prop_assert_eq!(picker.value(), Some(value));
    }

    /// Property: a meridiem toggle pair is the identity for every hour
    #[test]
    fn prop_meridiem_double_toggle_is_identity((hour, minute, second) in arb_time()) {
        let mut picker = Timepicker::new(PickerConfig {
            locale: "en-US".to_string(),
            hour_format: Some(HourFormat::Hour12),
            enable_seconds: true,
            ..PickerConfig::default()
        });
        picker.set_from_date(Some(at(hour, minute, second)));
        let meridiem = picker.meridiem();

        picker.set_meridiem(meridiem.toggled());
        picker.set_meridiem(meridiem);
        prop_assert_eq!(picker.hour(), Some(hour));
        prop_assert_eq!(picker.minute(), Some(minute));
    }

    /// Property: the parser never panics, whatever the input text
    #[test]
    fn prop_parse_never_panics(text in ".*") {
        let fmt = LocaleTimeFormat::resolve("en-US", None, false);
        let _ = parse_time(&text, &fmt, at(0, 0, 0));

        let fmt = LocaleTimeFormat::resolve("POSIX", Some(HourFormat::Hour24), true);
        let _ = parse_time(&text, &fmt, at(0, 0, 0));
    }

    /// Property: in 24-hour mode, format then parse is the identity
    #[test]
    fn prop_format_parse_round_trip_24h((hour, minute, second) in arb_time()) {
        let fmt = LocaleTimeFormat::resolve("POSIX", Some(HourFormat::Hour24), true);
        let value = at(hour, minute, second);
        let parsed = parse_time(&fmt.format(value), &fmt, at(0, 0, 0));
        prop_assert_eq!(parsed, Some(value));
    }

    /// Property: parsed output always lands inside valid field ranges
    #[test]
    fn prop_parsed_fields_in_range(text in "[0-9]{1,3}:[0-9]{1,3}") {
        let fmt = LocaleTimeFormat::resolve("POSIX", Some(HourFormat::Hour24), false);
        if let Some(parsed) = parse_time(&text, &fmt, at(0, 0, 0)) {
            prop_assert!(parsed.hour() < 24);
            prop_assert!(parsed.minute() < 60);
            prop_assert_eq!(parsed.second(), 0);
        }
    }
}
