//! The TextClock component
//!
//! A TextClock shows the current time through a [`TimeFormat`] and keeps itself current
//! with one self-rescheduling timer. Each tick reads the wall clock fresh, renders, and
//! arms the next tick for the following minute, second or fraction boundary.
//!
//! Refresh only runs while the clock is started, set visible and inside the visible
//! area. Every (re)arm bumps a generation counter; a timer callback whose generation no
//! longer matches does nothing, so at most one timer is ever live.

use std::sync::{Arc, Weak};
use std::time::Duration;

use arkui_core::{TaskExecutor, TaskType};
use chrono::{DateTime, FixedOffset, Utc};
use parking_lot::Mutex;

use crate::clock::Clock;
use crate::controller::TextClockController;
use crate::format::TimeFormat;
use crate::zone::{resolve_hours_west, HoursWest};

const TIMER_TASK_NAME: &str = "ArkUITextClockUpdateTimeText";

/// Construction options
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextClockOptions {
    /// Format pattern; empty or field-less patterns use the default
    pub format: String,
    /// Zone as hours west of UTC; `None` or invalid means local time
    pub hours_west: Option<f64>,
    pub is_24_hour: bool,
    /// Widget (form) rendering: seconds are dropped and refresh is per minute
    pub is_form: bool,
}

impl TextClockOptions {
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_hours_west(mut self, hours_west: f64) -> Self {
        self.hours_west = Some(hours_west);
        self
    }

    pub fn with_24_hour(mut self, is_24_hour: bool) -> Self {
        self.is_24_hour = is_24_hour;
        self
    }

    pub fn with_form(mut self, is_form: bool) -> Self {
        self.is_form = is_form;
        self
    }
}

/// State handed to a content modifier on every refresh
#[derive(Clone, Debug, PartialEq)]
pub struct TextClockConfiguration {
    pub started: bool,
    /// Effective zone in hours west of UTC
    pub time_zone_offset: f64,
    /// Current UTC time in seconds
    pub time_value: i64,
}

type DateChangeCallback = Arc<dyn Fn(i64) + Send + Sync>;
type ContentModifier = Arc<dyn Fn(&TextClockConfiguration) + Send + Sync>;

struct ClockState {
    options: TextClockOptions,
    format: TimeFormat,
    zone: Option<HoursWest>,

    started: bool,
    set_visible: bool,
    in_visible_area: bool,

    text: String,
    generation: u64,
    timer_armed: bool,

    on_date_change: Option<DateChangeCallback>,
    content_modifier: Option<ContentModifier>,
}

impl ClockState {
    fn new(options: TextClockOptions) -> Self {
        let mut state = Self {
            format: TimeFormat::default_for(options.is_24_hour),
            zone: None,
            options,
            started: true,
            set_visible: true,
            in_visible_area: true,
            text: String::new(),
            generation: 0,
            timer_armed: false,
            on_date_change: None,
            content_modifier: None,
        };
        state.reparse();
        state
    }

    fn reparse(&mut self) {
        let format = TimeFormat::parse_or_default(&self.options.format, self.options.is_24_hour);
        self.format = if self.options.is_form {
            format.without_seconds()
        } else {
            format
        };
        self.zone = resolve_hours_west(self.options.hours_west);
    }

    fn is_running(&self) -> bool {
        self.started && self.set_visible && self.in_visible_area
    }

    fn offset(&self, clock: &dyn Clock) -> FixedOffset {
        match self.zone {
            Some(zone) => zone.to_offset(),
            None => clock.local_offset(),
        }
    }

    fn configuration(&self, clock: &dyn Clock, now: DateTime<Utc>) -> TextClockConfiguration {
        let time_zone_offset = match self.zone {
            Some(zone) => zone.hours(),
            None => -f64::from(clock.local_offset().local_minus_utc()) / 3600.0,
        };
        TextClockConfiguration {
            started: self.started,
            time_zone_offset,
            time_value: now.timestamp(),
        }
    }

    /// Invalidate any armed timer
    fn disarm(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.timer_armed = false;
    }
}

/// Callbacks collected under the lock and invoked after it is released
#[derive(Default)]
struct Notify {
    date_change: Option<(DateChangeCallback, i64)>,
    modifier: Option<(ContentModifier, TextClockConfiguration)>,
    timer: Option<(u64, Duration)>,
}

pub(crate) struct ClockInner {
    state: Mutex<ClockState>,
    executor: Arc<dyn TaskExecutor>,
    clock: Arc<dyn Clock>,
}

impl ClockInner {
    /// Refresh now. With `expected`, only if that timer generation is still current.
    fn refresh(self: &Arc<Self>, expected: Option<u64>) {
        let notify = {
            let mut state = self.state.lock();
            if expected.is_some_and(|generation| generation != state.generation) {
                tracing::trace!("stale text clock timer ignored");
                return;
            }
            state.disarm();
            if !state.is_running() {
                return;
            }

            let now = self.clock.now_utc();
            let local = now.with_timezone(&state.offset(self.clock.as_ref()));
            let text = state.format.render(&local);
            let mut notify = Notify::default();
            if text != state.text {
                state.text = text;
                if let Some(callback) = &state.on_date_change {
                    notify.date_change = Some((callback.clone(), now.timestamp()));
                }
            }
            if let Some(modifier) = &state.content_modifier {
                notify.modifier = Some((modifier.clone(), state.configuration(self.clock.as_ref(), now)));
            }

            let interval = state.format.refresh_interval();
            let delay = interval.delay_from(now.timestamp_millis());
            state.timer_armed = true;
            notify.timer = Some((state.generation, Duration::from_millis(delay.unsigned_abs())));
            notify
        };
        self.dispatch(notify);
    }

    fn dispatch(self: &Arc<Self>, notify: Notify) {
        if let Some((generation, delay)) = notify.timer {
            tracing::trace!("text clock next refresh in {:?}", delay);
            let weak: Weak<Self> = Arc::downgrade(self);
            self.executor.post_delayed(
                TaskType::Ui,
                TIMER_TASK_NAME,
                delay,
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.refresh(Some(generation));
                    }
                }),
            );
        }
        if let Some((callback, seconds)) = notify.date_change {
            callback(seconds);
        }
        if let Some((modifier, configuration)) = notify.modifier {
            modifier(&configuration);
        }
    }

    /// Apply a state change, then refresh if running or stop the timer if not
    fn update(self: &Arc<Self>, change: impl FnOnce(&mut ClockState)) {
        let idle_notify = {
            let mut state = self.state.lock();
            change(&mut state);
            if state.is_running() {
                None
            } else {
                state.disarm();
                // A modifier still sees the stopped state.
                let modifier = state.content_modifier.clone().map(|modifier| {
                    let now = self.clock.now_utc();
                    (modifier, state.configuration(self.clock.as_ref(), now))
                });
                Some(Notify {
                    modifier,
                    ..Notify::default()
                })
            }
        };
        match idle_notify {
            None => self.refresh(None),
            Some(notify) => self.dispatch(notify),
        }
    }

    pub(crate) fn start(self: &Arc<Self>) {
        tracing::debug!("text clock started");
        self.update(|state| state.started = true);
    }

    pub(crate) fn stop(self: &Arc<Self>) {
        tracing::debug!("text clock stopped");
        self.update(|state| state.started = false);
    }
}

/// A clock text component
///
/// Dropping the component cancels its timer; pending callbacks hold only a weak handle.
pub struct TextClock {
    inner: Arc<ClockInner>,
}

impl TextClock {
    /// Create the component and render the first frame
    pub fn new(
        options: TextClockOptions,
        executor: Arc<dyn TaskExecutor>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let inner = Arc::new(ClockInner {
            state: Mutex::new(ClockState::new(options)),
            executor,
            clock,
        });
        inner.refresh(None);
        Self { inner }
    }

    pub fn controller(&self) -> TextClockController {
        TextClockController::new(Arc::downgrade(&self.inner))
    }

    /// Text as of the last refresh
    pub fn text(&self) -> String {
        self.inner.state.lock().text.clone()
    }

    pub fn format(&self) -> TimeFormat {
        self.inner.state.lock().format.clone()
    }

    /// Validated zone, or `None` for local time
    pub fn hours_west(&self) -> Option<f64> {
        self.inner.state.lock().zone.map(|zone| zone.hours())
    }

    pub fn is_started(&self) -> bool {
        self.inner.state.lock().started
    }

    /// Whether a refresh timer is currently armed
    pub fn is_timer_armed(&self) -> bool {
        self.inner.state.lock().timer_armed
    }

    pub fn start(&self) {
        self.inner.start();
    }

    pub fn stop(&self) {
        self.inner.stop();
    }

    pub fn set_format(&self, format: impl Into<String>) {
        let format = format.into();
        self.inner.update(|state| {
            state.options.format = format;
            state.reparse();
        });
    }

    pub fn set_hours_west(&self, hours_west: Option<f64>) {
        self.inner.update(|state| {
            state.options.hours_west = hours_west;
            state.reparse();
        });
    }

    pub fn set_24_hour(&self, is_24_hour: bool) {
        self.inner.update(|state| {
            state.options.is_24_hour = is_24_hour;
            state.reparse();
        });
    }

    /// Visibility set by the application
    pub fn set_visible(&self, visible: bool) {
        self.inner.update(|state| state.set_visible = visible);
    }

    /// Visibility reported by the pipeline
    pub fn set_in_visible_area(&self, visible: bool) {
        self.inner.update(|state| state.in_visible_area = visible);
    }

    /// Called with the UTC time in seconds whenever the shown text changes
    pub fn on_date_change(&self, callback: impl Fn(i64) + Send + Sync + 'static) {
        self.inner.state.lock().on_date_change = Some(Arc::new(callback));
    }

    /// Replace text output with a builder fed on every refresh
    pub fn set_content_modifier(
        &self,
        modifier: Option<Box<dyn Fn(&TextClockConfiguration) + Send + Sync>>,
    ) {
        self.inner.state.lock().content_modifier = modifier.map(Arc::from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use arkui_core::ManualTaskExecutor;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn setup(options: TextClockOptions) -> (TextClock, Arc<ManualTaskExecutor>, FixedClock) {
        let executor = Arc::new(ManualTaskExecutor::new());
        let clock = FixedClock::utc(Utc.with_ymd_and_hms(2024, 3, 9, 15, 4, 5).unwrap());
        let text_clock = TextClock::new(options, executor.clone(), Arc::new(clock.clone()));
        (text_clock, executor, clock)
    }

    #[test]
    fn renders_on_creation_and_arms_one_timer() {
        let (clock, executor, _) = setup(TextClockOptions::default().with_format("HH:mm:ss"));
        assert_eq!(clock.text(), "15:04:05");
        assert!(clock.is_timer_armed());
        assert_eq!(executor.pending_delayed(), 1);
        assert_eq!(executor.next_delay(), Some(Duration::from_millis(1000)));
    }

    #[test]
    fn stale_timers_do_nothing() {
        let (clock, executor, _) = setup(TextClockOptions::default().with_format("HH:mm:ss"));
        // Re-arming leaves the old timer queued but invalidated.
        clock.set_format("HH:mm");
        assert_eq!(executor.pending_delayed(), 2);
        assert_eq!(clock.text(), "15:04");

        executor.advance(Duration::from_millis(1000));
        assert_eq!(executor.pending_delayed(), 1);
        assert!(clock.is_timer_armed());
    }

    #[test]
    fn invalid_zone_falls_back_to_local() {
        let (clock, _, _) = setup(TextClockOptions::default().with_hours_west(40.0));
        assert_eq!(clock.hours_west(), None);
        clock.set_hours_west(Some(-8.0));
        assert_eq!(clock.hours_west(), Some(-8.0));
    }
}
