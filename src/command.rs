//! Command channel parsing.
//!
//! Register 0 is the write-only command channel: the first payload byte is
//! the command code, followed by a fixed number of argument bytes. Unknown
//! codes and payloads shorter than the command's arity are dropped whole;
//! trailing extra bytes are ignored.

use crate::color::Pixel;

/// Request a frame render.
pub const CMD_SHOW: u8 = 1;
/// Zero all pixels.
pub const CMD_CLEAR: u8 = 2;
/// Fill every pixel with the color at the given index.
pub const CMD_COPY_ALL_IDX: u8 = 3;
/// Update the logical LED count.
pub const CMD_LED_COUNT: u8 = 4;
/// Update the pixel type word (hi, lo).
pub const CMD_LED_TYPE: u8 = 5;
/// Update the device's own bus address.
pub const CMD_SET_BUS_ADDRESS: u8 = 6;
/// Copy the color at the given index into the default color.
pub const CMD_SET_INIT_COLOR_IDX: u8 = 7;
/// Set one pixel: index, r, g, b, w.
pub const CMD_SET_LED_COLOR: u8 = 8;
/// Fill the whole buffer: r, g, b, w.
pub const CMD_SET_ALL_COLOR: u8 = 9;
/// Store the default color directly: r, g, b, w.
pub const CMD_SET_INIT_COLOR: u8 = 10;
/// Drive the power-enable line: on/off.
pub const CMD_POWER_CTL: u8 = 11;
/// Report free memory, then force a restart.
pub const CMD_RESET: u8 = 12;
/// Zero all pixels, then request a render.
pub const CMD_CLEAR_SHOW: u8 = 13;
/// Run the strip driver's built-in pattern, then request a render.
pub const CMD_RAINBOW: u8 = 14;

/// A validated command received on the command channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Request a frame render (deferred).
    Show,
    /// Zero all pixels (immediate).
    Clear,
    /// Clear, then request a render (deferred).
    ClearShow,
    /// Fill every pixel with the color at `from` (deferred, reads the
    /// buffer at service time).
    CopyAll { from: u8 },
    /// Update the logical LED count, clamped to capacity.
    SetLedCount(u8),
    /// Update the pixel type word.
    SetPixelType(u16),
    /// Update the device's own bus address.
    SetBusAddress(u8),
    /// Copy the current color at `index` into the default color.
    SetDefaultFromIndex(u8),
    /// Write one pixel immediately.
    SetPixel { index: u8, color: Pixel },
    /// Fill the whole buffer immediately.
    SetAll(Pixel),
    /// Store the default color directly.
    SetDefault(Pixel),
    /// Drive the power-enable line.
    Power { on: bool },
    /// Run the built-in pattern generator, then request a render.
    Rainbow,
    /// Report free memory as one response byte, then force a restart.
    Reset,
}

impl Command {
    /// Required argument byte count for `code`, or `None` if unknown.
    pub const fn arg_len(code: u8) -> Option<u8> {
        match code {
            CMD_SHOW | CMD_CLEAR | CMD_RESET | CMD_CLEAR_SHOW | CMD_RAINBOW => Some(0),
            CMD_COPY_ALL_IDX
            | CMD_LED_COUNT
            | CMD_SET_BUS_ADDRESS
            | CMD_SET_INIT_COLOR_IDX
            | CMD_POWER_CTL => Some(1),
            CMD_LED_TYPE => Some(2),
            CMD_SET_ALL_COLOR | CMD_SET_INIT_COLOR => Some(4),
            CMD_SET_LED_COLOR => Some(5),
            _ => None,
        }
    }

    /// Parse a command-channel payload (code followed by argument bytes).
    ///
    /// Returns `None` for unknown codes or insufficient arguments; the
    /// caller must then drop the transaction without side effects.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        let (&code, args) = payload.split_first()?;
        let arity = Self::arg_len(code)? as usize;
        if args.len() < arity {
            return None;
        }

        let command = match code {
            CMD_SHOW => Self::Show,
            CMD_CLEAR => Self::Clear,
            CMD_CLEAR_SHOW => Self::ClearShow,
            CMD_RAINBOW => Self::Rainbow,
            CMD_RESET => Self::Reset,
            CMD_COPY_ALL_IDX => Self::CopyAll { from: args[0] },
            CMD_LED_COUNT => Self::SetLedCount(args[0]),
            CMD_SET_BUS_ADDRESS => Self::SetBusAddress(args[0]),
            CMD_SET_INIT_COLOR_IDX => Self::SetDefaultFromIndex(args[0]),
            CMD_LED_TYPE => Self::SetPixelType(u16::from_be_bytes([args[0], args[1]])),
            CMD_SET_ALL_COLOR => Self::SetAll(Pixel::new(args[0], args[1], args[2], args[3])),
            CMD_SET_INIT_COLOR => Self::SetDefault(Pixel::new(args[0], args[1], args[2], args[3])),
            CMD_SET_LED_COLOR => Self::SetPixel {
                index: args[0],
                color: Pixel::new(args[1], args[2], args[3], args[4]),
            },
            CMD_POWER_CTL => Self::Power { on: args[0] != 0 },
            _ => return None,
        };
        Some(command)
    }
}
