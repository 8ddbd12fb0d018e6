pub mod config;
pub mod constraint;
pub mod error;
pub mod locale;
pub mod parse;
pub mod picker;

pub use config::{HourFormat, Meridiem, PickerConfig};
pub use constraint::{ConstraintSet, Selection};
pub use error::{Result, TimedialError};
pub use locale::{FormatToken, LocaleTimeFormat};
pub use parse::{parse_native, parse_time};
pub use picker::{format_hhmmss, SelectOption, Timepicker};
