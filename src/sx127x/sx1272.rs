use crate::mod_params::{Bandwidth, RadioError};
use crate::mod_traits::RegisterBus;
use crate::sx127x::radio_kind_params::{ModemEncoding, PacketFormat, PaDac, Register, Sx127xVariant};
use crate::sx127x::Sx127x;

/// Sx1272 implements the Sx127xVariant trait
pub struct Sx1272;

impl Sx127xVariant for Sx1272 {
    const MIN_FREQUENCY_HZ: u32 = 860_000_000;
    const MAX_FREQUENCY_HZ: u32 = 1_020_000_000;

    fn bandwidth_value(bw: Bandwidth) -> Result<u8, RadioError> {
        match bw {
            Bandwidth::_125KHz => Ok(0x00),
            Bandwidth::_250KHz => Ok(0x01),
            Bandwidth::_500KHz => Ok(0x02),
            _ => Err(RadioError::InvalidBandwidth),
        }
    }

    fn modem_config_2_bit_2(_format: PacketFormat) -> bool {
        // AgcAutoOn off, LNA gain is taken from RegLna
        false
    }

    fn set_pa_dac<BUS: RegisterBus>(radio: &mut Sx127x<BUS>) -> Result<(), RadioError> {
        // RegPaDac - 0x5a (SX1272)
        // [7:3] - Reserved (0x10 as default)
        // [2:0] - PaDac: 0x04 default, 0x07 - enable +20 dBm on PA_BOOST
        let pa_dac = PaDac::for_output(radio.tx_boost());
        radio.write_field(Register::RegPaDacSX1272, pa_dac.value(), 2, 0)
    }

    fn set_modem_config<BUS: RegisterBus>(
        radio: &mut Sx127x<BUS>,
        encoding: &ModemEncoding,
        format: PacketFormat,
        low_data_rate_optimize: bool,
    ) -> Result<(), RadioError> {
        // RegModemConfig1 - 0x1d
        // [7:6] - Bw
        // [5:3] - CodingRate
        // [2] - ImplicitHeaderModeOn
        // [1] - RxPayloadCrcOn
        // [0] - LowDataRateOptimize
        let hdr = format.implicit_header as u8;
        let crc = format.crc_on as u8;
        let val = (encoding.bandwidth << 6)
            | (encoding.coding_rate << 3)
            | (hdr << 2)
            | (crc << 1)
            | low_data_rate_optimize as u8;
        radio.write_register(Register::RegModemConfig1, val)
    }

    fn explicit_header<BUS: RegisterBus>(radio: &mut Sx127x<BUS>) -> Result<bool, RadioError> {
        Ok(radio.read_field(Register::RegModemConfig1, 2, 2)? == 0)
    }
}
