//! I2C bus abstractions
//!
//! The display data channel (DDC) used for EDID reads is a plain I2C
//! bus. Bridges expose which bus carries their DDC through [`BusId`].

/// Identity of an I2C adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusId(pub u8);

/// I2C master carrying a DDC channel
///
/// Addresses are 7-bit. Transfers block until the target acknowledged
/// or the adapter gave up.
pub trait I2cBus {
    type Error;

    /// Send `data` to the target at `address`
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Fill `buf` from the target at `address`
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Send `write_data`, then read into `read_buf` after a repeated start
    ///
    /// EDID reads use this with the block offset as `write_data`.
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Adapter this bus is
    fn bus_id(&self) -> BusId;
}
