//! Platform-independent core of the web switch firmware.
//!
//! Holds the relay pulse sequencing and the mDNS wire codec. Nothing in
//! this crate touches ESP hardware; it only speaks `embedded-hal` traits,
//! so all of it runs (and is tested) on the host.

#![no_std]

pub mod dns;
pub mod pulse;

pub use pulse::{ButtonPulser, Press, PressTimings, SwitchLine};
