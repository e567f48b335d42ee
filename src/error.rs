//! Errors that can occur when using the BME280 device.
//!
//! The error type is generic over the underlying bus error type, so whatever
//! the I2C implementation reports is carried through unchanged.

/// This represents all possible errors that can occur when using the BME280 device.
///
/// The driver performs no retries and has no fallback data source: every
/// operation either fully succeeds or fails with the transport error that
/// stopped it.
#[derive(Debug)]
pub enum Bme280Error<BusError> {
    /// An error has occurred in the underlying I2C driver
    Bus(BusError),
}
