use crate::mod_params::{bandwidth_in_hz, Bandwidth, RadioError};
use crate::mod_traits::RegisterBus;
use crate::sx127x::radio_kind_params::{ModemEncoding, PacketFormat, PaDac, Register, Sx127xVariant};
use crate::sx127x::Sx127x;

// Errata 2.1 sub-bands for the 500 kHz sensitivity fix (Hz, inclusive)
const HIGH_BAND_HZ: (u32, u32) = (862_000_000, 1_020_000_000);
const LOW_BAND_HZ: (u32, u32) = (410_000_000, 525_000_000);

/// Sx1276 implements the Sx127xVariant trait
///
/// Also covers the SX1277, SX1278 and SX1279, which share its register map.
pub struct Sx1276;

impl Sx127xVariant for Sx1276 {
    const MIN_FREQUENCY_HZ: u32 = 137_000_000;
    const MAX_FREQUENCY_HZ: u32 = 1_020_000_000;

    fn bandwidth_value(bw: Bandwidth) -> Result<u8, RadioError> {
        match bw {
            Bandwidth::_7KHz => Ok(0x00),
            Bandwidth::_10KHz => Ok(0x01),
            Bandwidth::_15KHz => Ok(0x02),
            Bandwidth::_20KHz => Ok(0x03),
            Bandwidth::_31KHz => Ok(0x04),
            Bandwidth::_41KHz => Ok(0x05),
            Bandwidth::_62KHz => Ok(0x06),
            Bandwidth::_125KHz => Ok(0x07),
            Bandwidth::_250KHz => Ok(0x08),
            Bandwidth::_500KHz => Ok(0x09),
        }
    }

    fn modem_config_2_bit_2(format: PacketFormat) -> bool {
        // RxPayloadCrcOn
        format.crc_on
    }

    fn automatic_if(bandwidth: Bandwidth) -> Option<bool> {
        // Errata 2.3: the fixed IF replaces the automatic one below 500 kHz
        Some(if_frequency(bandwidth).is_none())
    }

    fn carrier_frequency(bandwidth: Bandwidth, frequency_in_hz: u32) -> u32 {
        match if_frequency(bandwidth) {
            Some((_, true)) => {
                let shifted = frequency_in_hz + bandwidth_in_hz(bandwidth);
                warn!("carrier {} shifted to {} for spurious reception errata", frequency_in_hz, shifted);
                shifted
            }
            _ => frequency_in_hz,
        }
    }

    fn set_pa_dac<BUS: RegisterBus>(radio: &mut Sx127x<BUS>) -> Result<(), RadioError> {
        let pa_dac = PaDac::for_output(radio.tx_boost());
        radio.write_field(Register::RegPaDacSX1276, pa_dac.value(), 2, 0)
    }

    fn set_modem_config<BUS: RegisterBus>(
        radio: &mut Sx127x<BUS>,
        encoding: &ModemEncoding,
        format: PacketFormat,
        low_data_rate_optimize: bool,
    ) -> Result<(), RadioError> {
        // RegModemConfig1 - 0x1d
        // [7:4] - Bw
        // [3:1] - CodingRate
        // [0] - ImplicitHeaderModeOn
        let hdr = format.implicit_header as u8;
        let config_1 = (encoding.bandwidth << 4) | (encoding.coding_rate << 1) | hdr;
        radio.write_register(Register::RegModemConfig1, config_1)?;

        // RegModemConfig3 - 0x26
        // [3] - LowDataRateOptimize
        // [2] - AgcAutoOn, off
        radio.write_field(Register::RegModemConfig3, (low_data_rate_optimize as u8) << 1, 3, 2)
    }

    fn apply_frequency_errata<BUS: RegisterBus>(
        radio: &mut Sx127x<BUS>,
        bandwidth: Bandwidth,
        frequency_in_hz: u32,
    ) -> Result<(), RadioError> {
        // Errata 2.1: sensitivity optimization with a 500 kHz bandwidth
        if bandwidth == Bandwidth::_500KHz {
            if let Some((opt1, opt2)) = high_bw_optimization(frequency_in_hz) {
                radio.write_register(Register::RegHighBwOptimize1, opt1)?;
                radio.write_register(Register::RegHighBwOptimize2, opt2)?;
            }
        }

        // Errata 2.3: receiver spurious reception of a LoRa signal
        if let Some((if_freq, _)) = if_frequency(bandwidth) {
            radio.write_register(Register::RegIfFreq1, if_freq)?;
            radio.write_register(Register::RegIfFreq2, 0x00)?;
        }
        Ok(())
    }

    fn explicit_header<BUS: RegisterBus>(radio: &mut Sx127x<BUS>) -> Result<bool, RadioError> {
        Ok(radio.read_field(Register::RegModemConfig1, 0, 0)? == 0)
    }
}

/// Values for registers 0x36 and 0x3a at 500 kHz, or `None` outside both sub-bands
fn high_bw_optimization(frequency_in_hz: u32) -> Option<(u8, u8)> {
    if (HIGH_BAND_HZ.0..=HIGH_BAND_HZ.1).contains(&frequency_in_hz) {
        Some((0x02, 0x64))
    } else if (LOW_BAND_HZ.0..=LOW_BAND_HZ.1).contains(&frequency_in_hz) {
        Some((0x03, 0x65))
    } else {
        None
    }
}

/// RegIfFreq1 value and whether the carrier is raised by the bandwidth.
/// `None` at 500 kHz, where the automatic IF is used instead.
fn if_frequency(bandwidth: Bandwidth) -> Option<(u8, bool)> {
    match bandwidth {
        Bandwidth::_7KHz => Some((0x48, true)),
        Bandwidth::_10KHz
        | Bandwidth::_15KHz
        | Bandwidth::_20KHz
        | Bandwidth::_31KHz
        | Bandwidth::_41KHz => Some((0x44, true)),
        Bandwidth::_62KHz | Bandwidth::_125KHz | Bandwidth::_250KHz => Some((0x40, false)),
        Bandwidth::_500KHz => None,
    }
}
