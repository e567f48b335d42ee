//! Bus abstraction used by the driver.
//!
//! The driver only needs two primitives against a fixed device address:
//! read a register block and write a single control register. [`Bus`] captures
//! that contract; [`I2c`] implements it on top of the blocking
//! [`embedded_hal::i2c::I2c`] trait.

use crate::error::Bme280Error;
use crate::register::{Readable, Writable};

/// Length of the largest register block transferred in one transaction
/// (the 26-byte calibration block at 0x88).
pub const MAX_REG_BYTES: usize = 26;

/// Register-level transport consumed by the driver.
///
/// Implementations must block until the transfer completes or fails. Any
/// transport failure is surfaced as [`Bme280Error::Bus`] and never retried
/// by the driver.
pub trait Bus {
    type Error;

    /// Reads the register block described by the marker type `R` and decodes it.
    fn read<R: Readable>(&mut self) -> Result<R::Out, Bme280Error<Self::Error>>;

    /// Encodes `v` and writes it to the register described by the marker type `W`.
    fn write<W: Writable>(&mut self, v: &W::In) -> Result<(), Bme280Error<Self::Error>>;
}

/// [`Bus`] implementation over a blocking I2C peripheral.
pub struct I2c<T> {
    i2c: T,
    address: u8,
}

impl<T> I2c<T>
where
    T: embedded_hal::i2c::I2c,
{
    pub(crate) fn new(i2c: T, address: u8) -> Self {
        Self { i2c, address }
    }

    pub(crate) fn release(self) -> T {
        self.i2c
    }
}

impl<T> Bus for I2c<T>
where
    T: embedded_hal::i2c::I2c,
{
    type Error = T::Error;

    fn read<R: Readable>(&mut self) -> Result<R::Out, Bme280Error<Self::Error>> {
        let mut buf = [0u8; MAX_REG_BYTES];
        self.i2c
            .write_read(self.address, &[R::ADDR], &mut buf[..R::N])
            .map_err(Bme280Error::Bus)?;

        Ok(R::decode(&buf[..R::N]))
    }

    fn write<W: Writable>(&mut self, v: &W::In) -> Result<(), Bme280Error<Self::Error>> {
        let mut buf = [0u8; MAX_REG_BYTES + 1];
        buf[0] = W::ADDR;
        W::encode(v, &mut buf[1..1 + W::N]);

        self.i2c
            .write(self.address, &buf[..1 + W::N])
            .map_err(Bme280Error::Bus)
    }
}
