//! I2C adapter
//!
//! Exposes an `embedded-hal` I2C master as an [`I2cBus`] with a bus
//! identity, so a connector can advertise which adapter carries its DDC.

use dpbridge_hal::{BusId, I2cBus};
use embedded_hal::i2c::{I2c, SevenBitAddress};

pub struct I2cAdapter<I> {
    id: BusId,
    bus: I,
}

impl<I: I2c<SevenBitAddress>> I2cAdapter<I> {
    pub fn new(id: BusId, bus: I) -> Self {
        Self { id, bus }
    }

    pub fn release(self) -> I {
        self.bus
    }
}

impl<I: I2c<SevenBitAddress>> I2cBus for I2cAdapter<I> {
    type Error = I::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.bus.write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.bus.read(address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.bus.write_read(address, write_data, read_buf)
    }

    fn bus_id(&self) -> BusId {
        self.id
    }
}
