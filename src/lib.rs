#![no_std]

//! Register-space protocol engine for addressable-LED bus slaves.
//!
//! The firmware core of a small RGBW strip controller exposed as a 7-bit
//! bus peripheral: register 0 is the command channel, registers
//! 1..=led_count map onto frame-buffer bytes, and three reserved high
//! addresses emulate the host update tool's bootloader handshake. Bus
//! callbacks stay time-bounded and defer slow work (strip commits, storage
//! writes, resets) to a cooperative service loop via a signal set.
//!
//! Hardware is abstracted behind the [`StripDriver`], [`PowerSwitch`] and
//! [`DeviceControl`] traits plus `embedded-storage` for the persisted
//! configuration, so the whole engine runs (and is tested) on the host.

pub mod color;
pub mod command;
pub mod config;
pub mod engine;
pub mod frame;
pub mod registers;
pub mod signals;

pub use color::{Pixel, PixelLayout, Rgbw};
pub use command::Command;
pub use config::{DEFAULT_BUS_ADDRESS, DEFAULT_PIXEL_TYPE, DeviceConfig};
pub use engine::{POWER_SETTLE_DELAY, PollResult, ServiceLoop, SlaveEngine};
pub use frame::FrameBuffer;
pub use signals::{Signal, SignalSet};

pub use embassy_time::{Duration, Instant};

/// Abstract LED strip driver.
///
/// Implement this trait to support different strip hardware. Committing is
/// timing-critical signalling that takes tens of microseconds per LED,
/// which is why the engine only calls it from the service loop.
pub trait StripDriver {
    /// Send the pixels to the physical strip.
    fn commit(&mut self, pixels: &[Pixel]);

    /// Fill `pixels` with the driver's built-in multi-color pattern.
    fn pattern(&mut self, pixels: &mut [Pixel]);
}

/// Strip power-enable output.
pub trait PowerSwitch {
    /// Drive the power-enable line (the wiring may be active-low; the
    /// implementation hides polarity).
    fn set_power(&mut self, on: bool);
}

/// Watchdog, reset and diagnostic primitives.
pub trait DeviceControl {
    /// Re-arm the liveness watchdog; called on every service iteration.
    fn feed_watchdog(&mut self);

    /// Free memory, clamped to one byte, for the reset diagnostic.
    fn free_memory(&mut self) -> u8;

    /// Arm a short watchdog timeout and stop servicing it, forcing a full
    /// device restart. Never returns on hardware; test doubles may record
    /// the call and return.
    fn restart(&mut self);

    /// Jump into the bootloader entry point. Never returns on hardware.
    fn enter_bootloader(&mut self);
}
