//! Platform-agnostic driver for the Bosch BME280 combined pressure,
//! temperature and relative-humidity sensor.
//!
//! The driver speaks to the sensor over the blocking [`embedded_hal::i2c::I2c`]
//! trait, loads the per-device factory calibration once at construction and
//! exposes a single [`Bme280::sample`] operation that burst-reads all three
//! channels and returns compensated values in hPa, °C and %RH.
#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod config;
pub mod register;
mod bme280;
mod calibration;
mod error;

#[cfg(test)]
mod testing;

pub use bme280::{Bme280, Bme280Result, Sample, DEFAULT_ADDRESS};
pub use calibration::{CalibrationData, Reading, TFine};
pub use config::Configuration;
pub use error::Bme280Error;
