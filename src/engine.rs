//! The register-space protocol engine and its deferred service loop.
//!
//! [`SlaveEngine`] holds all state shared between the two execution
//! contexts: the interrupt-context bus callbacks ([`SlaveEngine::on_receive`]
//! and [`SlaveEngine::on_request`]) and the cooperative main loop
//! ([`ServiceLoop::poll`]). Callbacks are time-bounded: they mutate the
//! frame buffer and cursor directly and raise [`Signal`]s for anything
//! slower (strip commits, storage writes, power switching, resets).
//!
//! The service loop owns the hardware collaborators, feeds the watchdog on
//! every iteration and drains pending signals, each exactly once per
//! occurrence.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::{Duration, Instant};
use embedded_storage::Storage;
use heapless::Deque;

use crate::color::PixelLayout;
use crate::command::Command;
use crate::config::DeviceConfig;
use crate::frame::FrameBuffer;
use crate::registers::{self, BOOT_ACK, BOOT_IDENTITY, REG_FIRST_LED, RX_LIMIT, RegisterTarget};
use crate::signals::{Signal, SignalSet};
use crate::{DeviceControl, Pixel, PowerSwitch, StripDriver};

/// Delay between enabling strip power and the next render, letting the
/// supply rail settle before the strip is driven.
pub const POWER_SETTLE_DELAY: Duration = Duration::from_millis(10);

/// Staged-response queue depth (identity sequence or one diagnostic byte).
const TX_STAGE_DEPTH: usize = 4;

/// State owned by the bus side: frame buffer, configuration mirror,
/// read cursor and staged response bytes.
#[derive(Debug)]
struct DeviceState<const MAX_LEDS: usize> {
    frame: FrameBuffer<MAX_LEDS>,
    config: DeviceConfig,
    /// Byte position of the next read, within the active span.
    read_pos: usize,
    /// Source index for a pending copy-all, read at service time.
    copy_from: u8,
    /// Bytes staged ahead of frame-buffer reads (handshake and diagnostics).
    staged: Deque<u8, TX_STAGE_DEPTH>,
}

/// The bus-facing protocol engine.
///
/// All entry points take `&self`; state lives behind a critical-section
/// mutex so a `static` engine can be shared between the bus interrupt and
/// the main loop.
pub struct SlaveEngine<const MAX_LEDS: usize> {
    state: Mutex<RefCell<DeviceState<MAX_LEDS>>>,
    signals: SignalSet,
}

impl<const MAX_LEDS: usize> SlaveEngine<MAX_LEDS> {
    /// Create an engine from the boot-time configuration.
    ///
    /// The frame buffer starts filled with the configured default color and
    /// the render signal is pre-raised, so the first service pass commits
    /// the boot frame.
    pub const fn new(config: DeviceConfig) -> Self {
        let layout = PixelLayout::from_type_word(config.pixel_type);
        let frame = FrameBuffer::new(layout, config.led_count, config.default_color);
        let mut config = config;
        config.led_count = frame.led_count();
        Self {
            state: Mutex::new(RefCell::new(DeviceState {
                frame,
                config,
                read_pos: 0,
                copy_from: u8::MAX,
                staged: Deque::new(),
            })),
            signals: SignalSet::starting_with(Signal::Render),
        }
    }

    /// Bus receive callback: one transaction's address byte plus payload.
    ///
    /// Interrupt context; must stay time-bounded. Malformed transactions
    /// are dropped silently with no state change.
    pub fn on_receive(&self, data: &[u8]) {
        if data.is_empty() || data.len() > RX_LIMIT {
            return;
        }
        let Some((&address, payload)) = data.split_first() else {
            return;
        };
        critical_section::with(|cs| {
            let state = &mut *self.state.borrow(cs).borrow_mut();
            if payload.is_empty() {
                // Address-only write: the master is setting up a read.
                self.prepare_read(state, address);
                return;
            }
            match registers::decode(address) {
                RegisterTarget::Command => self.dispatch(state, payload),
                RegisterTarget::Led(register) => Self::write_led_bytes(state, register, payload),
                // Reserved handshake registers are read-only.
                _ => {}
            }
        });
    }

    /// Bus request callback: produce the next response byte.
    ///
    /// Staged handshake/diagnostic bytes take precedence over the frame
    /// buffer; the cursor wraps back to register 1 past the last LED.
    pub fn on_request(&self) -> u8 {
        critical_section::with(|cs| {
            let state = &mut *self.state.borrow(cs).borrow_mut();
            if let Some(byte) = state.staged.pop_front() {
                return byte;
            }
            let span = state.frame.byte_len();
            if span == 0 {
                return 0;
            }
            let byte = state.frame.read_byte(state.read_pos);
            state.read_pos = (state.read_pos + 1) % span;
            byte
        })
    }

    /// Pending deferred signals.
    pub fn signals(&self) -> &SignalSet {
        &self.signals
    }

    /// Copy of the in-memory configuration mirror.
    pub fn config(&self) -> DeviceConfig {
        critical_section::with(|cs| self.state.borrow(cs).borrow().config)
    }

    /// The pixel at `index`, or `None` beyond the configured count.
    pub fn pixel(&self, index: u8) -> Option<Pixel> {
        critical_section::with(|cs| self.state.borrow(cs).borrow().frame.pixel(index))
    }

    /// Copy of the current frame buffer.
    pub fn frame_snapshot(&self) -> FrameBuffer<MAX_LEDS> {
        critical_section::with(|cs| self.state.borrow(cs).borrow().frame)
    }

    /// Stage a response byte ahead of frame-buffer reads.
    fn stage_response(&self, byte: u8) {
        critical_section::with(|cs| {
            let state = &mut *self.state.borrow(cs).borrow_mut();
            let _ = state.staged.push_back(byte);
        });
    }

    /// Fill the buffer from the stored source index, reading the pixel now.
    ///
    /// An index beyond the configured count drops the operation.
    fn service_copy_all(&self) {
        critical_section::with(|cs| {
            let state = &mut *self.state.borrow(cs).borrow_mut();
            if let Some(color) = state.frame.pixel(state.copy_from) {
                state.frame.fill(color);
            }
        });
    }

    /// Run the strip driver's built-in pattern into the frame buffer.
    ///
    /// The fill is bounded work; it runs under the lock so concurrent
    /// register writes are not lost wholesale.
    fn run_pattern<S: StripDriver>(&self, strip: &mut S) {
        critical_section::with(|cs| {
            let state = &mut *self.state.borrow(cs).borrow_mut();
            strip.pattern(state.frame.pixels_mut());
        });
    }

    /// Handle an address-only write: set the read cursor, or stage the
    /// bootloader handshake response for a reserved address.
    fn prepare_read(&self, state: &mut DeviceState<MAX_LEDS>, address: u8) {
        state.staged.clear();
        match registers::decode(address) {
            RegisterTarget::BootIdentify => {
                for byte in BOOT_IDENTITY {
                    let _ = state.staged.push_back(byte);
                }
            }
            RegisterTarget::BootEnter => {
                let _ = state.staged.push_back(BOOT_ACK);
                self.signals.raise(Signal::EnterBootloader);
            }
            RegisterTarget::BootReset => {
                let _ = state.staged.push_back(BOOT_ACK);
                self.signals.raise(Signal::Restart);
            }
            target => {
                // Out-of-range addresses (including the command channel)
                // clamp to register 1 so reads never index out of bounds.
                let register = match target {
                    RegisterTarget::Led(led) if led <= state.frame.led_count() => led,
                    _ => REG_FIRST_LED,
                };
                let bpp = state.frame.layout().bytes_per_pixel() as usize;
                state.read_pos = (register as usize - 1) * bpp;
            }
        }
    }

    /// Write payload bytes into the frame buffer starting at `register`,
    /// auto-incrementing with wraparound back to register 1.
    ///
    /// A starting register beyond the configured count drops the whole
    /// write.
    fn write_led_bytes(state: &mut DeviceState<MAX_LEDS>, register: u8, payload: &[u8]) {
        if register < REG_FIRST_LED || register > state.frame.led_count() {
            return;
        }
        let bpp = state.frame.layout().bytes_per_pixel() as usize;
        let span = state.frame.byte_len();
        let mut pos = (register as usize - 1) * bpp;
        for &byte in payload {
            state.frame.write_byte(pos, byte);
            pos = (pos + 1) % span;
        }
    }

    /// Validate and execute one command-channel payload.
    fn dispatch(&self, state: &mut DeviceState<MAX_LEDS>, payload: &[u8]) {
        let Some(command) = Command::parse(payload) else {
            return;
        };
        match command {
            Command::Show => self.signals.raise(Signal::Render),
            Command::Clear => state.frame.clear(),
            Command::ClearShow => {
                state.frame.clear();
                self.signals.raise(Signal::Render);
            }
            Command::CopyAll { from } => {
                state.copy_from = from;
                self.signals.raise(Signal::CopyAll);
            }
            Command::SetLedCount(count) => {
                state.config.led_count = state.frame.set_led_count(count);
                Self::rebound_cursor(state);
                self.signals.raise(Signal::Persist);
            }
            Command::SetPixelType(word) => {
                state.config.pixel_type = word;
                state.frame.set_layout(PixelLayout::from_type_word(word));
                Self::rebound_cursor(state);
                self.signals.raise(Signal::Persist);
            }
            Command::SetBusAddress(address) => {
                state.config.bus_address = address;
                self.signals.raise(Signal::Persist);
            }
            Command::SetDefaultFromIndex(index) => {
                if let Some(color) = state.frame.pixel(index) {
                    state.config.default_color = color;
                    self.signals.raise(Signal::Persist);
                }
            }
            Command::SetPixel { index, color } => {
                let _ = state.frame.set_pixel(index, color);
            }
            Command::SetAll(color) => state.frame.fill(color),
            Command::SetDefault(color) => {
                state.config.default_color = color;
                self.signals.raise(Signal::Persist);
            }
            Command::Power { on } => {
                let signal = if on { Signal::PowerOn } else { Signal::PowerOff };
                self.signals.raise(signal);
            }
            Command::Rainbow => {
                self.signals.raise(Signal::Rainbow);
                self.signals.raise(Signal::Render);
            }
            Command::Reset => {
                self.signals.raise(Signal::ReportRam);
                self.signals.raise(Signal::Restart);
            }
        }
    }

    /// Keep the read cursor inside the active span after the LED count or
    /// pixel width changed.
    fn rebound_cursor(state: &mut DeviceState<MAX_LEDS>) {
        let span = state.frame.byte_len();
        if span == 0 {
            state.read_pos = 0;
        } else {
            state.read_pos %= span;
        }
    }
}

/// Timing hint returned by [`ServiceLoop::poll`].
#[derive(Debug, Clone, Copy)]
pub struct PollResult {
    /// When the loop should poll again even without bus activity (a render
    /// is waiting out the power settle delay), or `None` to idle.
    pub next_deadline: Option<Instant>,
}

/// The cooperative main loop: owns the hardware collaborators and services
/// deferred signals.
pub struct ServiceLoop<'a, S, P, C, N, const MAX_LEDS: usize> {
    engine: &'a SlaveEngine<MAX_LEDS>,
    strip: S,
    power: P,
    control: C,
    storage: N,
    /// Renders are held back until this instant after a power-on.
    render_not_before: Instant,
}

impl<'a, S, P, C, N, const MAX_LEDS: usize> ServiceLoop<'a, S, P, C, N, MAX_LEDS>
where
    S: StripDriver,
    P: PowerSwitch,
    C: DeviceControl,
    N: Storage,
{
    /// Create a service loop around an engine and its collaborators.
    pub fn new(engine: &'a SlaveEngine<MAX_LEDS>, strip: S, power: P, control: C, storage: N) -> Self {
        Self {
            engine,
            strip,
            power,
            control,
            storage,
            render_not_before: Instant::from_millis(0),
        }
    }

    /// Service pending signals, each exactly once per occurrence.
    ///
    /// Feeds the watchdog first: a loop that stops calling `poll` within
    /// the watchdog timeout restarts the device, which is the system's
    /// sole recovery path for stuck states.
    pub fn poll(&mut self, now: Instant) -> PollResult {
        self.control.feed_watchdog();
        let signals = self.engine.signals();

        if signals.take(Signal::EnterBootloader) {
            self.control.enter_bootloader();
        }
        if signals.take(Signal::ReportRam) {
            let byte = self.control.free_memory();
            self.engine.stage_response(byte);
        }
        if signals.take(Signal::Restart) {
            // Does not return on hardware.
            self.control.restart();
            return PollResult { next_deadline: None };
        }

        if signals.take(Signal::PowerOff) {
            self.power.set_power(false);
        }
        if signals.take(Signal::PowerOn) {
            self.power.set_power(true);
            self.render_not_before = now + POWER_SETTLE_DELAY;
            signals.raise(Signal::Render);
        }

        if signals.take(Signal::CopyAll) {
            self.engine.service_copy_all();
        }
        if signals.take(Signal::Rainbow) {
            self.engine.run_pattern(&mut self.strip);
        }

        if signals.is_raised(Signal::Render) && now >= self.render_not_before {
            let _ = signals.take(Signal::Render);
            // Committing to the strip takes tens of microseconds per LED;
            // it runs on a snapshot, outside the critical section.
            let frame = self.engine.frame_snapshot();
            self.strip.commit(frame.pixels());
        }

        if signals.take(Signal::Persist) {
            let config = self.engine.config();
            match config.store(&mut self.storage) {
                // Write durability is only guaranteed by a clean restart.
                Ok(()) => self.control.restart(),
                Err(_) => {
                    #[cfg(feature = "esp32-log")]
                    esp_println::println!("config: store failed, keeping previous record");
                }
            }
        }

        let next_deadline = if signals.is_raised(Signal::Render) && now < self.render_not_before {
            Some(self.render_not_before)
        } else {
            None
        };
        PollResult { next_deadline }
    }
}
