use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use embedded_hal::digital::PinState;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::peripherals::{GPIO12, GPIO14};
use webswitch_core::{ButtonPulser, PressTimings, SwitchLine};

use crate::{config, mk_static};

pub(crate) type Switch = ButtonPulser<Output<'static>, Output<'static>, Delay>;

/// The single physical relay, guarded so pulses can never overlap even if
/// more than one server worker is ever spawned.
pub type SharedSwitch = Mutex<CriticalSectionRawMutex, Switch>;

/// Bind the relay and indicator pins and drive them to their idle levels.
///
/// The relay is wired active-low: the released level keeps the switch
/// circuit open, exactly like the physical button it sits next to. The
/// indicator LED is active-high.
pub fn init_switch(relay: GPIO12<'static>, indicator: GPIO14<'static>) -> &'static SharedSwitch {
    let relay = SwitchLine::new(
        Output::new(relay, Level::High, OutputConfig::default()),
        PinState::Low,
    );
    let indicator = SwitchLine::new(
        Output::new(indicator, Level::Low, OutputConfig::default()),
        PinState::High,
    );
    let timings = PressTimings {
        short_ms: config::BUTTON.short_press_ms,
        long_ms: config::BUTTON.long_press_ms,
    };
    mk_static!(
        SharedSwitch,
        Mutex::new(ButtonPulser::new(relay, indicator, timings, Delay))
    )
}
