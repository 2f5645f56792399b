//! Register address space decoding.
//!
//! Address 0 is the write-only command channel. Addresses 1..=led_count map
//! onto frame-buffer bytes, `bytes_per_pixel` bytes per register. Three
//! reserved high addresses emulate the host update tool's bootloader
//! handshake; their values and response bytes are fixed by that protocol
//! and must not change.

/// Command channel register.
pub const REG_COMMAND: u8 = 0x00;
/// First LED register.
pub const REG_FIRST_LED: u8 = 0x01;

/// Bootloader handshake: device identity query.
pub const REG_BOOT_IDENTIFY: u8 = 0xFD;
/// Bootloader handshake: jump to the bootloader entry point.
pub const REG_BOOT_ENTER: u8 = 0xFE;
/// Bootloader handshake: watchdog-forced device reset.
pub const REG_BOOT_RESET: u8 = 0xFF;

/// Identity byte sequence returned for [`REG_BOOT_IDENTIFY`] reads
/// (the MCU's device signature, as the update tool expects it).
pub const BOOT_IDENTITY: [u8; 3] = [0x1E, 0x93, 0x0B];
/// Acknowledge byte staged after a reset or bootloader-enter request.
pub const BOOT_ACK: u8 = 0x06;

/// Largest accepted receive transaction, in bytes (address + payload).
pub const RX_LIMIT: usize = 16;

/// What a bus address resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterTarget {
    /// The write-only command channel.
    Command,
    /// An LED register (1-based, not yet range-checked against the
    /// configured LED count).
    Led(u8),
    /// Bootloader identity query.
    BootIdentify,
    /// Bootloader entry request.
    BootEnter,
    /// Device reset request.
    BootReset,
}

/// Decode a raw bus address.
pub const fn decode(address: u8) -> RegisterTarget {
    match address {
        REG_COMMAND => RegisterTarget::Command,
        REG_BOOT_IDENTIFY => RegisterTarget::BootIdentify,
        REG_BOOT_ENTER => RegisterTarget::BootEnter,
        REG_BOOT_RESET => RegisterTarget::BootReset,
        led => RegisterTarget::Led(led),
    }
}
