//! Timed relay pulse emulating a momentary button press.
//!
//! The relay output is wired in parallel with a physical power button, so
//! "pressing" means holding the line at its active level for a fixed
//! interval and releasing it again. The indicator line mirrors the relay
//! for the whole interval.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

/// Requested press length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    Short,
    Long,
}

/// Press durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressTimings {
    pub short_ms: u32,
    pub long_ms: u32,
}

impl PressTimings {
    pub const fn duration_ms(&self, press: Press) -> u32 {
        match press {
            Press::Short => self.short_ms,
            Press::Long => self.long_ms,
        }
    }
}

impl Default for PressTimings {
    fn default() -> Self {
        Self {
            short_ms: 500,
            long_ms: 5000,
        }
    }
}

const fn inverse(state: PinState) -> PinState {
    match state {
        PinState::Low => PinState::High,
        PinState::High => PinState::Low,
    }
}

/// One output line plus its configured active level.
///
/// Construction drives the line to its inactive level, which is the safe
/// idle state. The lines are write-only actuators without read-back, so
/// pin driver errors are discarded.
pub struct SwitchLine<P: OutputPin> {
    pin: P,
    active: PinState,
}

impl<P: OutputPin> SwitchLine<P> {
    pub fn new(mut pin: P, active: PinState) -> Self {
        let _ = pin.set_state(inverse(active));
        Self { pin, active }
    }

    fn activate(&mut self) {
        let _ = self.pin.set_state(self.active);
    }

    fn deactivate(&mut self) {
        let _ = self.pin.set_state(inverse(self.active));
    }
}

/// Drives the relay line through a timed on/off sequence.
///
/// Only one physical relay exists, so the pulser is an exclusive resource;
/// callers serialize access to it (the firmware keeps it behind a mutex).
pub struct ButtonPulser<R: OutputPin, I: OutputPin, D: DelayNs> {
    relay: SwitchLine<R>,
    indicator: SwitchLine<I>,
    timings: PressTimings,
    delay: D,
}

impl<R: OutputPin, I: OutputPin, D: DelayNs> ButtonPulser<R, I, D> {
    pub fn new(
        relay: SwitchLine<R>,
        indicator: SwitchLine<I>,
        timings: PressTimings,
        delay: D,
    ) -> Self {
        Self {
            relay,
            indicator,
            timings,
            delay,
        }
    }

    /// Hold the relay (and indicator) active for the configured duration,
    /// then release both.
    ///
    /// The wait yields to the executor instead of spinning. The active
    /// interval is held by a scope guard, so both lines return to their
    /// inactive level on every exit path, including cancellation of the
    /// returned future.
    pub async fn press(&mut self, press: Press) {
        let duration_ms = self.timings.duration_ms(press);
        let _held = Held::engage(&mut self.relay, &mut self.indicator);
        self.delay.delay_ms(duration_ms).await;
    }
}

/// Scope guard for the active interval of a pulse.
struct Held<'a, R: OutputPin, I: OutputPin> {
    relay: &'a mut SwitchLine<R>,
    indicator: &'a mut SwitchLine<I>,
}

impl<'a, R: OutputPin, I: OutputPin> Held<'a, R, I> {
    fn engage(relay: &'a mut SwitchLine<R>, indicator: &'a mut SwitchLine<I>) -> Self {
        relay.activate();
        indicator.activate();
        Self { relay, indicator }
    }
}

impl<R: OutputPin, I: OutputPin> Drop for Held<'_, R, I> {
    fn drop(&mut self) {
        self.relay.deactivate();
        self.indicator.deactivate();
    }
}
