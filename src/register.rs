//! Register map of the BME280.
//!
//! Each register (or fixed-size register block) is represented by a marker
//! struct implementing [`Readable`] and/or [`Writable`]. The address and
//! transfer length are associated constants, so the bus layer can derive the
//! whole transaction from the marker type alone.

/// Base trait carrying the register address.
pub trait Reg {
    const ADDR: u8;
}

/// A register (block) that can be read and decoded into a typed value.
pub trait Readable: Reg {
    type Out;
    const N: usize = 1;
    fn decode(b: &[u8]) -> Self::Out;
}

/// A register that can be encoded from a typed value and written.
pub trait Writable: Reg {
    type In;
    const N: usize = 1;
    fn encode(v: &Self::In, out: &mut [u8]);
}

/// Marker struct for the CTRL_HUM (0xF2) register
///
/// - **Length:** 1 byte
/// - **Access:** Write
///
/// Holds the humidity oversampling setting. Per the datasheet, a write to
/// CTRL_HUM only becomes effective after the next write to CTRL_MEAS.
pub struct CtrlHum;
impl Reg for CtrlHum { const ADDR: u8 = 0xF2; }

impl Writable for CtrlHum {
    type In = Oversampling;

    fn encode(v: &Self::In, out: &mut [u8]) {
        let osrs_h: u8 = (*v).into();
        out[0] = osrs_h & 0b111;
    }
}

/// Marker struct for the CTRL_MEAS (0xF4) register
///
/// - **Length:** 1 byte
/// - **Access:** Write
///
/// Combines temperature oversampling, pressure oversampling and the power
/// mode into one control byte.
pub struct CtrlMeas;
impl Reg for CtrlMeas { const ADDR: u8 = 0xF4; }

pub struct CtrlMeasCfg {
    pub osrs_t: Oversampling,
    pub osrs_p: Oversampling,
    pub mode: PowerMode,
}

impl Writable for CtrlMeas {
    type In = CtrlMeasCfg;

    fn encode(v: &Self::In, out: &mut [u8]) {
        let osrs_t: u8 = v.osrs_t.into();
        let osrs_p: u8 = v.osrs_p.into();
        let mode: u8 = v.mode.into();
        out[0] = (osrs_t << 5) | (osrs_p << 2) | mode;
    }
}

/// Marker struct for the CONFIG (0xF5) register
///
/// - **Length:** 1 byte
/// - **Access:** Write
///
/// Combines the normal-mode standby time, the IIR filter coefficient and the
/// 3-wire SPI enable bit.
pub struct Config;
impl Reg for Config { const ADDR: u8 = 0xF5; }

pub struct ConfigFields {
    pub t_sb: StandbyTime,
    pub filter: Filter,
    pub spi3w_en: bool,
}

impl Writable for Config {
    type In = ConfigFields;

    fn encode(v: &Self::In, out: &mut [u8]) {
        let t_sb: u8 = v.t_sb.into();
        let filter: u8 = v.filter.into();
        out[0] = (t_sb << 5) | (filter << 2) | (v.spi3w_en as u8);
    }
}

/// Marker struct for the first calibration block, calib00..calib25
/// (0x88 - 0xA1).
///
/// - **Length:** 26 bytes
/// - **Access:** Read-only
///
/// Contains the temperature and pressure compensation words plus dig_H1 in
/// the last byte. Decoding into calibration words is done by
/// [`crate::CalibrationData`], which consumes this block together with
/// [`CalibHumidity`].
pub struct CalibTempPress;
impl Reg for CalibTempPress { const ADDR: u8 = 0x88; }

impl Readable for CalibTempPress {
    type Out = [u8; 26];
    const N: usize = 26;

    fn decode(b: &[u8]) -> Self::Out {
        let mut out = [0u8; 26];
        out.copy_from_slice(b);
        out
    }
}

/// Marker struct for the second calibration block, calib26..calib32
/// (0xE1 - 0xE7).
///
/// - **Length:** 7 bytes
/// - **Access:** Read-only
///
/// Contains the remaining humidity compensation words dig_H2..dig_H6.
pub struct CalibHumidity;
impl Reg for CalibHumidity { const ADDR: u8 = 0xE1; }

impl Readable for CalibHumidity {
    type Out = [u8; 7];
    const N: usize = 7;

    fn decode(b: &[u8]) -> Self::Out {
        let mut out = [0u8; 7];
        out.copy_from_slice(b);
        out
    }
}

/// Marker struct for the measurement data registers PRESS_MSB..HUM_LSB
/// (0xF7 - 0xFE).
///
/// The BME280 auto-increments on multiple reads, so reading 8 bytes from
/// 0xF7 captures pressure, temperature and humidity in one burst read as
/// recommended by the datasheet. This returns the raw uncompensated ADC
/// counts; for calibrated values use [`crate::Bme280::sample`].
///
/// - **Length:** 8 bytes
/// - **Access:** Read-only
pub struct Measurement;
impl Reg for Measurement { const ADDR: u8 = 0xF7; }

/// Raw ADC counts from one 8-byte burst read of the data registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawSample {
    pressure: u32,
    temperature: u32,
    humidity: u16,
}

impl RawSample {
    pub fn new(pressure: u32, temperature: u32, humidity: u16) -> Self {
        Self { pressure, temperature, humidity }
    }

    /// Raw 20-bit pressure count from PRESS_MSB/LSB/XLSB
    pub fn pressure(&self) -> u32 { self.pressure }

    /// Raw 20-bit temperature count from TEMP_MSB/LSB/XLSB
    pub fn temperature(&self) -> u32 { self.temperature }

    /// Raw 16-bit humidity count from HUM_MSB/LSB
    pub fn humidity(&self) -> u16 { self.humidity }
}

impl Readable for Measurement {
    type Out = RawSample;
    const N: usize = 8;

    fn decode(b: &[u8]) -> Self::Out {
        // Pressure and temperature are 20-bit values: MSB, LSB and the upper
        // nibble of XLSB. Humidity is a plain big-endian 16-bit value.
        RawSample {
            pressure: (b[0] as u32) << 12 | (b[1] as u32) << 4 | (b[2] as u32) >> 4,
            temperature: (b[3] as u32) << 12 | (b[4] as u32) << 4 | (b[5] as u32) >> 4,
            humidity: (b[6] as u16) << 8 | b[7] as u16,
        }
    }
}

/// Oversampling settings for the osrs_h, osrs_t and osrs_p register fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Oversampling {
    /// Measurement skipped, output is 0x80000 / 0x8000
    Skip,
    X1,
    X2,
    X4,
    X8,
    X16,
}

impl Into<u8> for Oversampling {
    fn into(self) -> u8 {
        match self {
            Oversampling::Skip => 0b000,
            Oversampling::X1 => 0b001,
            Oversampling::X2 => 0b010,
            Oversampling::X4 => 0b011,
            Oversampling::X8 => 0b100,
            Oversampling::X16 => 0b101,
        }
    }
}

/// Describes the different power modes that can be set in the CTRL_MEAS register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    /// Sleep mode. This is the default mode after power on reset.
    Sleep,
    /// Forced mode. A single measurement is performed after which the device returns to Sleep mode.
    Forced,
    /// Normal mode. Measurements are performed continuously, separated by the standby time.
    Normal,
}

impl Into<u8> for PowerMode {
    fn into(self) -> u8 {
        match self {
            PowerMode::Sleep => 0b00,
            PowerMode::Forced => 0b01,
            PowerMode::Normal => 0b11,
        }
    }
}

/// Inactive (standby) duration between measurements in normal mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StandbyTime {
    Ms0_5,
    Ms62_5,
    Ms125,
    Ms250,
    Ms500,
    Ms1000,
    Ms10,
    Ms20,
}

impl Into<u8> for StandbyTime {
    fn into(self) -> u8 {
        match self {
            StandbyTime::Ms0_5 => 0b000,
            StandbyTime::Ms62_5 => 0b001,
            StandbyTime::Ms125 => 0b010,
            StandbyTime::Ms250 => 0b011,
            StandbyTime::Ms500 => 0b100,
            StandbyTime::Ms1000 => 0b101,
            StandbyTime::Ms10 => 0b110,
            StandbyTime::Ms20 => 0b111,
        }
    }
}

/// IIR filter coefficient for the CONFIG register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    Off,
    X2,
    X4,
    X8,
    X16,
}

impl Into<u8> for Filter {
    fn into(self) -> u8 {
        match self {
            Filter::Off => 0b000,
            Filter::X2 => 0b001,
            Filter::X4 => 0b010,
            Filter::X8 => 0b011,
            Filter::X16 => 0b100,
        }
    }
}
