//! Register-level fake bus for driver tests.

use crate::bus::{Bus, MAX_REG_BYTES};
use crate::error::Bme280Error;
use crate::register::{Readable, Writable};
use heapless::{LinearMap, Vec};

/// A [`Bus`] double that serves canned register responses and records every
/// register write, keyed by `(address, length)` like a real transaction.
pub struct FakeBus<const N: usize> {
    regs: LinearMap<(u8, usize), ([u8; MAX_REG_BYTES], usize), N>,
    writes: Vec<(u8, u8), 8>,
    fail: bool,
}

impl<const N: usize> FakeBus<N> {
    pub fn new() -> Self {
        FakeBus {
            regs: LinearMap::new(),
            writes: Vec::new(),
            fail: false,
        }
    }

    /// A bus on which every transaction fails.
    pub fn failing() -> Self {
        let mut bus = Self::new();
        bus.fail = true;
        bus
    }

    pub fn with_response<R: Readable>(&mut self, data: &[u8]) {
        let mut bytes = [0u8; MAX_REG_BYTES];
        bytes[..data.len()].copy_from_slice(data);
        self.regs
            .insert((R::ADDR, R::N), (bytes, data.len()))
            .unwrap();
    }

    /// Register writes observed so far, as `(address, value)` pairs in order.
    pub fn written(&self) -> &[(u8, u8)] {
        &self.writes
    }
}

impl<const N: usize> Bus for FakeBus<N> {
    type Error = ();

    fn read<R: Readable>(&mut self) -> Result<R::Out, Bme280Error<Self::Error>> {
        if self.fail {
            return Err(Bme280Error::Bus(()));
        }

        match self.regs.get(&(R::ADDR, R::N)) {
            Some((bytes, len)) if *len == R::N => Ok(R::decode(&bytes[..R::N])),
            _ => panic!("no mocked value for register 0x{:02x} and length {}", R::ADDR, R::N),
        }
    }

    fn write<W: Writable>(&mut self, v: &W::In) -> Result<(), Bme280Error<Self::Error>> {
        if self.fail {
            return Err(Bme280Error::Bus(()));
        }

        let mut buf = [0u8; MAX_REG_BYTES];
        W::encode(v, &mut buf[..W::N]);
        self.writes.push((W::ADDR, buf[0])).unwrap();

        Ok(())
    }
}
