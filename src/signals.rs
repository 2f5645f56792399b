//! Deferred signal set shared between the bus callback and the main loop.
//!
//! Bus callbacks run in interrupt context and must return in microseconds;
//! anything slower is raised here as a signal and serviced later by the
//! cooperative loop. Each kind has at most one pending instance: raising an
//! already-raised signal coalesces. Thread/interrupt safe via critical
//! sections, like [`critical_section::Mutex`]-backed channels.

use core::cell::Cell;

use critical_section::Mutex;

/// One kind of deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Commit the frame buffer to the strip.
    Render,
    /// Run the strip driver's built-in pattern into the frame buffer.
    Rainbow,
    /// Fill the buffer from a stored source index (read at service time).
    CopyAll,
    /// Write the persisted configuration, then force a restart.
    Persist,
    /// Enable strip power, then render after the settle delay.
    PowerOn,
    /// Disable strip power.
    PowerOff,
    /// Stage the free-memory diagnostic byte for the next read.
    ReportRam,
    /// Force a device restart via the watchdog.
    Restart,
    /// Jump into the bootloader entry point.
    EnterBootloader,
}

impl Signal {
    const fn mask(self) -> u16 {
        1 << self as u16
    }
}

/// Pending-signal bitmask, single producer (bus callback) and single
/// consumer (service loop).
pub struct SignalSet {
    bits: Mutex<Cell<u16>>,
}

impl SignalSet {
    /// Create an empty signal set.
    pub const fn new() -> Self {
        Self {
            bits: Mutex::new(Cell::new(0)),
        }
    }

    /// Create a set with one signal already raised.
    pub const fn starting_with(signal: Signal) -> Self {
        Self {
            bits: Mutex::new(Cell::new(signal.mask())),
        }
    }

    /// Raise a signal. Coalesces with an already-pending instance.
    pub fn raise(&self, signal: Signal) {
        critical_section::with(|cs| {
            let bits = self.bits.borrow(cs);
            bits.set(bits.get() | signal.mask());
        });
    }

    /// Take a pending signal, clearing it. Returns whether it was raised.
    pub fn take(&self, signal: Signal) -> bool {
        critical_section::with(|cs| {
            let bits = self.bits.borrow(cs);
            let raised = bits.get() & signal.mask() != 0;
            bits.set(bits.get() & !signal.mask());
            raised
        })
    }

    /// Check a signal without clearing it.
    pub fn is_raised(&self, signal: Signal) -> bool {
        critical_section::with(|cs| self.bits.borrow(cs).get() & signal.mask() != 0)
    }

    /// Whether any signal is pending.
    pub fn any(&self) -> bool {
        critical_section::with(|cs| self.bits.borrow(cs).get() != 0)
    }
}

impl Default for SignalSet {
    fn default() -> Self {
        Self::new()
    }
}
