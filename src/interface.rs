use embedded_hal::spi::{Operation, SpiDevice};

use crate::mod_params::RadioError::{self, BusFailure};
use crate::mod_traits::RegisterBus;
use crate::sx127x::Register;

/// [`RegisterBus`] over an `embedded-hal` SPI device.
///
/// SX127x frames are the register address with the top bit set for writes (cleared
/// for reads) followed by the data byte, all within one chip select.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI>
where
    SPI: SpiDevice<u8>,
{
    /// Wrap an SPI device that owns the radio's chip select
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Give back the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> RegisterBus for SpiInterface<SPI>
where
    SPI: SpiDevice<u8>,
{
    fn read_register(&mut self, register: Register) -> Result<u8, RadioError> {
        let write_buffer = [register.read_addr()];
        let mut read_buffer = [0x00u8];
        let mut ops = [Operation::Write(&write_buffer), Operation::Read(&mut read_buffer)];
        self.spi.transaction(&mut ops).map_err(|_| BusFailure)?;
        trace!("read: {=u8:02x} -> {=u8:02x}", register.addr(), read_buffer[0]);
        Ok(read_buffer[0])
    }

    fn write_register(&mut self, register: Register, value: u8) -> Result<(), RadioError> {
        let write_buffer = [register.write_addr(), value];
        self.spi.write(&write_buffer).map_err(|_| BusFailure)?;
        trace!("write: {=u8:02x} <- {=u8:02x}", register.addr(), value);
        Ok(())
    }
}
