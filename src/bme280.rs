use crate::bus::{Bus, I2c};
use crate::calibration::{CalibrationData, Reading};
use crate::config::Configuration;
use crate::error::Bme280Error;
use crate::register::{Config, ConfigFields, CtrlHum, CtrlMeas, CtrlMeasCfg, Measurement, RawSample};

/// Default I2C address of the BME280 (SDO pulled low).
pub const DEFAULT_ADDRESS: u8 = 0x76;

/// Type alias for a Bme280 driver communicating over I2C
type Bme280I2c<T> = Bme280<I2c<T>>;

/// Type alias used to simplify return types throughout the driver
pub type Bme280Result<T, BusError> = Result<T, Bme280Error<BusError>>;

/// Main BME280 driver struct.
///
/// Constructing the driver configures the device and loads the calibration
/// table; the driver cannot exist half-initialized. One [`Bme280::sample`]
/// call performs one 8-byte burst read and compensates all three channels.
///
/// The driver is synchronous and not safe for concurrent sampling from
/// multiple threads without external serialization: a sample cycle must
/// complete before the next one begins.
pub struct Bme280<B> {
    bus: B,
    calibration: CalibrationData,
}

/// One compensated sample of all three channels.
///
/// Temperature is always computable; pressure and humidity carry a
/// [`Reading`] because their compensation formulas have degenerate guards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Barometric pressure in hPa
    pub pressure: Reading,
    /// Temperature in °C
    pub temperature: f64,
    /// Relative humidity in %RH
    pub humidity: Reading,
}

impl<T> Bme280I2c<T>
where
    T: embedded_hal::i2c::I2c,
{
    /// Constructs a new driver instance communicating over I2C.
    ///
    /// This writes the configuration to the three control registers and
    /// reads the calibration blocks. Any bus failure aborts construction
    /// with [`Bme280Error::Bus`].
    pub fn new_i2c(
        i2c: T,
        address: u8,
        config: Configuration,
    ) -> Bme280Result<Self, <I2c<T> as Bus>::Error> {
        Self::new(I2c::new(i2c, address), config)
    }

    /// Consumes the driver and returns the I2C peripheral.
    pub fn release(self) -> T {
        self.bus.release()
    }
}

impl<B> Bme280<B>
where
    B: Bus,
{
    pub(crate) fn new(mut bus: B, config: Configuration) -> Bme280Result<Self, B::Error> {
        // CTRL_HUM must be written before CTRL_MEAS; the humidity
        // oversampling only latches on a CTRL_MEAS write (datasheet 5.4.3).
        bus.write::<CtrlHum>(&config.humidity_oversampling)?;
        bus.write::<CtrlMeas>(&CtrlMeasCfg {
            osrs_t: config.temperature_oversampling,
            osrs_p: config.pressure_oversampling,
            mode: config.mode,
        })?;
        bus.write::<Config>(&ConfigFields {
            t_sb: config.standby_time,
            filter: config.filter,
            spi3w_en: config.spi3w_enable,
        })?;

        let calibration = CalibrationData::new(&mut bus)?;

        Ok(Bme280 { bus, calibration })
    }

    /// Burst-reads all three channels and returns compensated values.
    ///
    /// Temperature is compensated first; its `t_fine` state feeds the
    /// pressure and humidity compensation for the same raw snapshot.
    pub fn sample(&mut self) -> Bme280Result<Sample, B::Error> {
        let raw = self.bus.read::<Measurement>()?;

        let (temperature, t_fine) = self.calibration.compensate_temperature(raw.temperature());
        let pressure = self.calibration.compensate_pressure(t_fine, raw.pressure());
        let humidity = self.calibration.compensate_humidity(t_fine, raw.humidity());

        Ok(Sample {
            pressure,
            temperature,
            humidity,
        })
    }

    /// Burst-reads the data registers without compensating.
    ///
    /// Useful together with the public compensation functions on
    /// [`CalibrationData`] when raw counts need to be recorded as well.
    pub fn read_raw(&mut self) -> Bme280Result<RawSample, B::Error> {
        self.bus.read::<Measurement>()
    }

    /// Returns the calibration table loaded at construction.
    pub fn calibration(&self) -> &CalibrationData {
        &self.calibration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::{CalibHumidity, CalibTempPress};
    use crate::testing::FakeBus;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    // Datasheet example calibration, encoded as the two raw register blocks.
    const CALIB_TP: [u8; 26] = [
        0x70, 0x6B, 0x43, 0x67, 0x18, 0xFC, 0x7D, 0x8E, 0x43, 0xD6, 0xD0, 0x0B, 0x27,
        0x0B, 0x8C, 0x00, 0xF9, 0xFF, 0x8C, 0x3C, 0xF8, 0xC6, 0x70, 0x17, 0x00, 0x4B,
    ];
    const CALIB_HUM: [u8; 7] = [0x7A, 0x01, 0x00, 0x01, 0xF5, 0x01, 0x00];

    // adc_P = 415148, adc_T = 519888, adc_H = 25456
    const DATA: [u8; 8] = [0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x63, 0x70];

    fn fake_bus() -> FakeBus<4> {
        let mut bus = FakeBus::new();
        bus.with_response::<CalibTempPress>(&CALIB_TP);
        bus.with_response::<CalibHumidity>(&CALIB_HUM);
        bus.with_response::<Measurement>(&DATA);
        bus
    }

    #[test]
    fn construction_writes_control_registers_in_order() {
        let device = Bme280::new(fake_bus(), Configuration::default()).unwrap();

        // ctrl_hum, then ctrl_meas, then config
        assert_eq!(
            &[(0xF2, 0x01), (0xF4, 0x27), (0xF5, 0xA0)],
            device.bus.written()
        );
    }

    #[test]
    fn sample_compensates_all_three_channels() {
        let mut device = Bme280::new(fake_bus(), Configuration::default()).unwrap();

        let sample = device.sample().unwrap();

        assert!((sample.temperature - 25.0824779).abs() < 1e-6);
        let pressure = sample.pressure.value().unwrap();
        assert!((pressure - 1006.5326677).abs() < 1e-6);
        // adc_H = 25456 overshoots the polynomial; output saturates
        assert_eq!(Reading::Value(100.0), sample.humidity);
    }

    #[test]
    fn sample_is_repeatable() {
        let mut device = Bme280::new(fake_bus(), Configuration::default()).unwrap();

        assert_eq!(device.sample().unwrap(), device.sample().unwrap());
    }

    #[test]
    fn read_raw_returns_undecorated_counts() {
        let mut device = Bme280::new(fake_bus(), Configuration::default()).unwrap();

        let raw = device.read_raw().unwrap();

        assert_eq!(415148, raw.pressure());
        assert_eq!(519888, raw.temperature());
        assert_eq!(25456, raw.humidity());
    }

    #[test]
    fn construction_fails_on_bus_error() {
        let result = Bme280::new(FakeBus::<4>::failing(), Configuration::default());

        assert!(matches!(result, Err(Bme280Error::Bus(()))));
    }

    #[test]
    fn full_cycle_over_mocked_i2c() {
        let expectations = [
            I2cTransaction::write(DEFAULT_ADDRESS, vec![0xF2, 0x01]),
            I2cTransaction::write(DEFAULT_ADDRESS, vec![0xF4, 0x27]),
            I2cTransaction::write(DEFAULT_ADDRESS, vec![0xF5, 0xA0]),
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x88], CALIB_TP.to_vec()),
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0xE1], CALIB_HUM.to_vec()),
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0xF7], DATA.to_vec()),
        ];
        let i2c = I2cMock::new(&expectations);

        let mut device =
            Bme280::new_i2c(i2c, DEFAULT_ADDRESS, Configuration::default()).unwrap();
        let sample = device.sample().unwrap();

        assert!((sample.temperature - 25.0824779).abs() < 1e-6);

        device.release().done();
    }

    #[test]
    fn sample_fails_on_bus_error() {
        let expectations = [
            I2cTransaction::write(DEFAULT_ADDRESS, vec![0xF2, 0x01]),
            I2cTransaction::write(DEFAULT_ADDRESS, vec![0xF4, 0x27]),
            I2cTransaction::write(DEFAULT_ADDRESS, vec![0xF5, 0xA0]),
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x88], CALIB_TP.to_vec()),
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0xE1], CALIB_HUM.to_vec()),
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0xF7], vec![0u8; 8])
                .with_error(embedded_hal::i2c::ErrorKind::Other),
        ];
        let i2c = I2cMock::new(&expectations);

        let mut device =
            Bme280::new_i2c(i2c, DEFAULT_ADDRESS, Configuration::default()).unwrap();

        assert!(matches!(device.sample(), Err(Bme280Error::Bus(_))));
        device.release().done();
    }
}
