//! ArkUI TextClock
//!
//! A text component showing the current time in a configurable format and zone,
//! refreshed by a single self-rescheduling timer posted through an
//! [`arkui_core::TaskExecutor`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use arkui_core::ManualTaskExecutor;
//! use arkui_text_clock::{FixedClock, TextClock, TextClockOptions};
//! use chrono::{TimeZone, Utc};
//!
//! let executor = Arc::new(ManualTaskExecutor::new());
//! let clock = FixedClock::utc(Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 59).unwrap());
//! let text_clock = TextClock::new(
//!     TextClockOptions::default().with_format("HH:mm:ss"),
//!     executor.clone(),
//!     Arc::new(clock.clone()),
//! );
//! assert_eq!(text_clock.text(), "08:30:59");
//!
//! clock.advance(Duration::from_secs(1));
//! executor.advance(Duration::from_secs(1));
//! assert_eq!(text_clock.text(), "08:31:00");
//! ```

pub mod clock;
pub mod controller;
pub mod error;
pub mod format;
pub mod text_clock;
pub mod zone;

pub use clock::{Clock, FixedClock, SystemClock};
pub use controller::TextClockController;
pub use error::TextClockError;
pub use format::{FormatToken, RefreshInterval, TimeFormat, DEFAULT_FORMAT_12H, DEFAULT_FORMAT_24H};
pub use text_clock::{TextClock, TextClockConfiguration, TextClockOptions};
pub use zone::{resolve_hours_west, HoursWest, HOURS_WEST_MAX, HOURS_WEST_MIN};
