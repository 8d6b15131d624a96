use crate::mod_params::RadioError;
use crate::sx127x::Register;

/// Register level access to an SX127x chip.
///
/// Implemented by [`SpiInterface`](crate::interface::SpiInterface) for boards wired
/// through `embedded-hal` SPI, and by test doubles. Each call is a complete, blocking
/// bus transaction. Failures are reported as [`RadioError::BusFailure`] and are not
/// retried by the configurators.
pub trait RegisterBus {
    /// Read a full register
    fn read_register(&mut self, register: Register) -> Result<u8, RadioError>;

    /// Write a full register
    fn write_register(&mut self, register: Register, value: u8) -> Result<(), RadioError>;

    /// Read bits `[high_bit:low_bit]` of a register, right aligned
    fn read_field(&mut self, register: Register, high_bit: u8, low_bit: u8) -> Result<u8, RadioError> {
        let mask = field_mask(high_bit, low_bit);
        let value = self.read_register(register)?;
        Ok((value & mask) >> low_bit)
    }

    /// Write a right aligned `value` into bits `[high_bit:low_bit]` of a register,
    /// keeping the remaining bits as read from the chip.
    ///
    /// Bits of `value` that do not fit the field are dropped.
    fn write_field(&mut self, register: Register, value: u8, high_bit: u8, low_bit: u8) -> Result<(), RadioError> {
        self.write_bits(register, value << low_bit, field_mask(high_bit, low_bit))
    }

    /// Replace the bits selected by `mask` with the bits of `value` at the same
    /// positions, in a single read-modify-write.
    fn write_bits(&mut self, register: Register, value: u8, mask: u8) -> Result<(), RadioError> {
        let current = self.read_register(register)?;
        self.write_register(register, (current & !mask) | (value & mask))
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    fn read_register(&mut self, register: Register) -> Result<u8, RadioError> {
        T::read_register(self, register)
    }

    fn write_register(&mut self, register: Register, value: u8) -> Result<(), RadioError> {
        T::write_register(self, register, value)
    }
}

// Mask covering bits high..=low, both within 0..=7
pub(crate) fn field_mask(high_bit: u8, low_bit: u8) -> u8 {
    debug_assert!(high_bit <= 7 && low_bit <= high_bit);
    let width = high_bit - low_bit + 1;
    (((1u16 << width) - 1) << low_bit) as u8
}
