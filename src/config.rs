//! Persisted device configuration.
//!
//! A 9-byte versioned record in non-volatile storage: a magic byte followed
//! by the bus address, pixel type word, LED count and default color. The
//! magic byte is the only consistency check the storage layer offers, so no
//! field is trusted before it matches. The record is loaded once at boot and
//! rewritten in full by the service loop; a forced restart follows every
//! successful write.

use embedded_storage::{ReadStorage, Storage};

use crate::color::Pixel;

/// Magic byte marking a valid configuration record.
pub const CONFIG_MAGIC: u8 = 42;
/// Serialized record length.
pub const CONFIG_LEN: usize = 9;

/// Compiled-in default bus address.
pub const DEFAULT_BUS_ADDRESS: u8 = 0x20;
/// Compiled-in default pixel type word: G,R,B,W order at 800 kHz.
pub const DEFAULT_PIXEL_TYPE: u16 = 0x00D2;

/// Device settings persisted across power cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Own 7-bit bus address.
    pub bus_address: u8,
    /// Pixel type word (byte order and signalling rate selector).
    pub pixel_type: u16,
    /// Logical LED count.
    pub led_count: u8,
    /// Color applied to the whole strip at boot.
    pub default_color: Pixel,
}

impl DeviceConfig {
    /// Compiled-in defaults, used when no valid record exists.
    ///
    /// `led_count` is the strip capacity of the running firmware.
    pub const fn defaults(led_count: u8) -> Self {
        Self {
            bus_address: DEFAULT_BUS_ADDRESS,
            pixel_type: DEFAULT_PIXEL_TYPE,
            led_count,
            default_color: Pixel::OFF,
        }
    }

    /// Serialize the record, magic byte first.
    pub const fn to_bytes(&self) -> [u8; CONFIG_LEN] {
        let [type_hi, type_lo] = self.pixel_type.to_be_bytes();
        [
            CONFIG_MAGIC,
            self.bus_address,
            type_hi,
            type_lo,
            self.led_count,
            self.default_color.r,
            self.default_color.g,
            self.default_color.b,
            self.default_color.w,
        ]
    }

    /// Deserialize a record, or `None` if the magic byte does not match.
    pub const fn from_bytes(bytes: &[u8; CONFIG_LEN]) -> Option<Self> {
        if bytes[0] != CONFIG_MAGIC {
            return None;
        }
        Some(Self {
            bus_address: bytes[1],
            pixel_type: u16::from_be_bytes([bytes[2], bytes[3]]),
            led_count: bytes[4],
            default_color: Pixel::new(bytes[5], bytes[6], bytes[7], bytes[8]),
        })
    }

    /// Load the record from the start of `storage`.
    ///
    /// Falls back to [`Self::defaults`] on a read error or magic mismatch.
    pub fn load<S: ReadStorage>(storage: &mut S, fallback_led_count: u8) -> Self {
        let mut bytes = [0u8; CONFIG_LEN];
        if storage.read(0, &mut bytes).is_err() {
            return Self::defaults(fallback_led_count);
        }
        match Self::from_bytes(&bytes) {
            Some(config) => config,
            None => {
                #[cfg(feature = "esp32-log")]
                esp_println::println!("config: no valid record, using defaults");
                Self::defaults(fallback_led_count)
            }
        }
    }

    /// Write the full record to the start of `storage`.
    pub fn store<S: Storage>(&self, storage: &mut S) -> Result<(), S::Error> {
        storage.write(0, &self.to_bytes())
    }
}
