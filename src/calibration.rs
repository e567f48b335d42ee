//! Calibration words and the raw-to-physical compensation pipeline.
//!
//! Every BME280 leaves the factory with a unique set of compensation words
//! burned into NVM: 3 temperature words, 9 pressure words and 6 humidity
//! words, scattered over two register blocks with mixed widths and
//! signedness. [`CalibrationData`] assembles them once at driver
//! construction and then turns raw ADC counts into physical values using
//! the floating-point compensation formulas from the datasheet.
//!
//! Temperature compensation produces [`TFine`], a fine-resolution
//! intermediate that both the pressure and humidity formulas consume.
//! It is threaded through the call sequence explicitly, so the coupling
//! between the three channels is visible in the signatures instead of
//! hiding in driver state.

use crate::bus::Bus;
use crate::error::Bme280Error;
use crate::register::{CalibHumidity, CalibTempPress};

/// Fine-resolution temperature state produced by
/// [`CalibrationData::compensate_temperature`] and consumed by the pressure
/// and humidity compensation.
///
/// `TFine::default()` is the "uncompensated" state (0.0). Feeding it into
/// pressure or humidity compensation is well defined but yields physically
/// meaningless output, so a full sample always computes temperature first.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TFine(f64);

/// A compensated pressure or humidity value.
///
/// The datasheet formulas contain division-by-zero guards; when a guard
/// trips, the channel is not computable from this sample. The Bosch
/// reference code returns a numeric `0` in that case, which is
/// indistinguishable from a real reading. This driver keeps the two cases
/// apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reading {
    /// A compensated value in the channel's physical unit.
    Value(f64),
    /// The degenerate guard in the compensation formula tripped; the
    /// channel cannot be computed from this sample. Not an error.
    Unavailable,
}

impl Reading {
    pub fn value(self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Unavailable => None,
        }
    }

    /// Collapses [`Reading::Unavailable`] to `0.0`, matching the sentinel
    /// convention of the Bosch reference code.
    pub fn value_or_zero(self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

/// The per-device compensation words, read once from NVM.
///
/// Word indices follow the datasheet naming: `dig_t[0]` is dig_T1,
/// `dig_p[8]` is dig_P9, `dig_h[5]` is dig_H6.
pub struct CalibrationData {
    dig_t: [i32; 3],
    dig_p: [i32; 9],
    dig_h: [i32; 6],
}

impl CalibrationData {
    /// Reads both calibration blocks from the device and assembles the words.
    ///
    /// Fails with the bus error if either block read fails; no partial
    /// table is ever produced.
    pub fn new<B: Bus>(bus: &mut B) -> Result<Self, Bme280Error<B::Error>> {
        let tp = bus.read::<CalibTempPress>()?;
        let hum = bus.read::<CalibHumidity>()?;

        Ok(Self::from_blocks(&tp, &hum))
    }

    /// Assembles the calibration words from the 26-byte block at 0x88 and
    /// the 7-byte block at 0xE1.
    ///
    /// All 16-bit words are little-endian. dig_T1 and dig_P1 are unsigned,
    /// the remaining 16-bit words are two's-complement signed. The humidity
    /// words are irregular: dig_H1 and dig_H3 are unsigned bytes, dig_H4 and
    /// dig_H5 are signed 12-bit values sharing the nibbles of 0xE5, and
    /// dig_H6 is a signed byte. Byte 24 of the first block (0xA0) is a spare.
    pub(crate) fn from_blocks(tp: &[u8; 26], hum: &[u8; 7]) -> Self {
        let dig_t = [
            u16::from_le_bytes([tp[0], tp[1]]) as i32,
            i16::from_le_bytes([tp[2], tp[3]]) as i32,
            i16::from_le_bytes([tp[4], tp[5]]) as i32,
        ];

        let dig_p = [
            u16::from_le_bytes([tp[6], tp[7]]) as i32,
            i16::from_le_bytes([tp[8], tp[9]]) as i32,
            i16::from_le_bytes([tp[10], tp[11]]) as i32,
            i16::from_le_bytes([tp[12], tp[13]]) as i32,
            i16::from_le_bytes([tp[14], tp[15]]) as i32,
            i16::from_le_bytes([tp[16], tp[17]]) as i32,
            i16::from_le_bytes([tp[18], tp[19]]) as i32,
            i16::from_le_bytes([tp[20], tp[21]]) as i32,
            i16::from_le_bytes([tp[22], tp[23]]) as i32,
        ];

        let dig_h = [
            tp[25] as i32,
            i16::from_le_bytes([hum[0], hum[1]]) as i32,
            hum[2] as i32,
            // dig_H4: 0xE4 holds bits 11:4, the low nibble of 0xE5 bits 3:0
            ((hum[3] as i8 as i32) << 4) | (hum[4] & 0x0F) as i32,
            // dig_H5: 0xE6 holds bits 11:4, the high nibble of 0xE5 bits 3:0
            ((hum[5] as i8 as i32) << 4) | (hum[4] >> 4) as i32,
            hum[6] as i8 as i32,
        ];

        Self { dig_t, dig_p, dig_h }
    }

    /// Compensates a raw 20-bit temperature count into °C.
    ///
    /// Also returns the [`TFine`] state for this sample, which must be fed
    /// into [`Self::compensate_pressure`] and [`Self::compensate_humidity`].
    pub fn compensate_temperature(&self, adc_t: u32) -> (f64, TFine) {
        let adc_t = adc_t as f64;

        let v1 = (adc_t / 16384.0 - self.dig_t[0] as f64 / 1024.0) * self.dig_t[1] as f64;
        let v2 = adc_t / 131072.0 - self.dig_t[0] as f64 / 8192.0;
        let v2 = v2 * v2 * self.dig_t[2] as f64;
        let t_fine = v1 + v2;

        (t_fine / 5120.0, TFine(t_fine))
    }

    /// Compensates a raw 20-bit pressure count into hPa using the `t_fine`
    /// state of the current sample.
    ///
    /// Returns [`Reading::Unavailable`] when the datasheet's
    /// division-by-zero guard trips.
    pub fn compensate_pressure(&self, t_fine: TFine, adc_p: u32) -> Reading {
        let v1 = t_fine.0 / 2.0 - 64000.0;
        let v2 = (v1 / 4.0) * (v1 / 4.0) / 2048.0 * self.dig_p[5] as f64;
        let v2 = v2 + v1 * self.dig_p[4] as f64 * 2.0;
        let v2 = v2 / 4.0 + self.dig_p[3] as f64 * 65536.0;
        let v1 = (self.dig_p[2] as f64 * ((v1 / 4.0) * (v1 / 4.0) / 8192.0) / 8.0
            + self.dig_p[1] as f64 * v1 / 2.0)
            / 262144.0;
        let v1 = (32768.0 + v1) * self.dig_p[0] as f64 / 32768.0;

        if v1 == 0.0 {
            return Reading::Unavailable;
        }

        let pressure = (1048576.0 - adc_p as f64 - v2 / 4096.0) * 3125.0;
        let pressure = if pressure < 2147483648.0 {
            pressure * 2.0 / v1
        } else {
            pressure / v1 * 2.0
        };

        let v1 = self.dig_p[8] as f64 * ((pressure / 8.0) * (pressure / 8.0) / 8192.0) / 4096.0;
        let v2 = pressure / 4.0 * self.dig_p[7] as f64 / 8192.0;

        Reading::Value((pressure + (v1 + v2 + self.dig_p[6] as f64) / 16.0) / 100.0)
    }

    /// Compensates a raw 16-bit humidity count into %RH using the `t_fine`
    /// state of the current sample.
    ///
    /// The output is saturated to [0.0, 100.0]; the polynomial overshoots
    /// near the domain edges. Returns [`Reading::Unavailable`] when the
    /// degenerate `var_h == 0` guard trips.
    pub fn compensate_humidity(&self, t_fine: TFine, adc_h: u16) -> Reading {
        let var_h = t_fine.0 - 76800.0;

        if var_h == 0.0 {
            return Reading::Unavailable;
        }

        let var_h = (adc_h as f64
            - (self.dig_h[3] as f64 * 64.0 + self.dig_h[4] as f64 / 16384.0 * var_h))
            * (self.dig_h[1] as f64 / 65536.0
                * (1.0
                    + self.dig_h[5] as f64 / 67108864.0
                        * var_h
                        * (1.0 + self.dig_h[2] as f64 / 67108864.0 * var_h)));
        let var_h = var_h * (1.0 - self.dig_h[0] as f64 * var_h / 524288.0);

        Reading::Value(var_h.clamp(0.0, 100.0))
    }
}
