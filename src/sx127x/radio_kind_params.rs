use crate::mod_params::*;
use crate::mod_traits::RegisterBus;
use crate::sx127x::Sx127x;

/// Chip specific part of the configuration sequence.
///
/// Implementations carry the legal value tables, bit layouts and silicon errata
/// of one chip family. They are driven by [`Configurator`](crate::sx127x::Configurator)
/// and only ever receive parameters that passed [`Sx127xVariant::validate`].
pub trait Sx127xVariant {
    /// Lowest supported carrier (Hz)
    const MIN_FREQUENCY_HZ: u32;
    /// Highest supported carrier (Hz)
    const MAX_FREQUENCY_HZ: u32;

    /// Bandwidth register encoding, `InvalidBandwidth` when the chip lacks it
    fn bandwidth_value(bw: Bandwidth) -> Result<u8, RadioError>;

    /// Coding rate register encoding, `InvalidCodingRate` when the chip lacks it
    fn coding_rate_value(coding_rate: CodingRate) -> Result<u8, RadioError> {
        coding_rate_value(coding_rate)
    }

    /// Check the whole tuple and encode it. Never touches the bus.
    fn validate(params: &RadioParameters) -> Result<ModemEncoding, RadioError> {
        let bandwidth = Self::bandwidth_value(params.bandwidth)?;
        let spreading_factor = spreading_factor_value(params.spreading_factor)?;
        let coding_rate = Self::coding_rate_value(params.coding_rate)?;
        if !(Self::MIN_FREQUENCY_HZ..=Self::MAX_FREQUENCY_HZ).contains(&params.frequency_in_hz) {
            return Err(RadioError::InvalidFrequency);
        }
        Ok(ModemEncoding {
            bandwidth,
            spreading_factor,
            coding_rate,
        })
    }

    /// `RegModemConfig2[2]`, which the shared sequence writes together with the
    /// spreading factor: AgcAutoOn on the SX1272, RxPayloadCrcOn on the SX1276
    fn modem_config_2_bit_2(format: PacketFormat) -> bool;

    /// `RegDetectOptimize[7]` (AutomaticIFOn) for `bandwidth`, `None` leaves it alone
    fn automatic_if(_bandwidth: Bandwidth) -> Option<bool> {
        None
    }

    /// Carrier to program into the synthesizer for a requested frequency
    fn carrier_frequency(_bandwidth: Bandwidth, frequency_in_hz: u32) -> u32 {
        frequency_in_hz
    }

    /// Fixed output power DAC setting
    fn set_pa_dac<BUS: RegisterBus>(radio: &mut Sx127x<BUS>) -> Result<(), RadioError>;

    /// Bandwidth, coding rate, header mode, CRC and low data rate optimization
    fn set_modem_config<BUS: RegisterBus>(
        radio: &mut Sx127x<BUS>,
        encoding: &ModemEncoding,
        format: PacketFormat,
        low_data_rate_optimize: bool,
    ) -> Result<(), RadioError>;

    /// Frequency dependent errata registers for `bandwidth`
    fn apply_frequency_errata<BUS: RegisterBus>(
        _radio: &mut Sx127x<BUS>,
        _bandwidth: Bandwidth,
        _frequency_in_hz: u32,
    ) -> Result<(), RadioError> {
        Ok(())
    }

    /// Whether the chip is currently set up for explicit header packets
    fn explicit_header<BUS: RegisterBus>(radio: &mut Sx127x<BUS>) -> Result<bool, RadioError>;
}

/// Variant bits living in registers written by the shared sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct SharedFields {
    /// `RegModemConfig2[2]`
    pub modem_config_2_bit_2: bool,
    /// `RegDetectOptimize[7]`, untouched when `None`
    pub automatic_if: Option<bool>,
}

/// Device encodings of the modulation parameters, as handed to the shared write sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct ModemEncoding {
    /// Variant specific bandwidth code
    pub bandwidth: u8,
    /// Spreading factor field value (6..=12)
    pub spreading_factor: u8,
    /// Coding rate field value (1..=4 for 4/5..4/8)
    pub coding_rate: u8,
}

/// Header mode and payload CRC setting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct PacketFormat {
    /// No header is sent, payload length and coding rate are fixed on both ends
    pub implicit_header: bool,
    /// Payload CRC generated on transmit and checked on receive
    pub crc_on: bool,
}

impl PacketFormat {
    /// SF6 only works with implicit header, and this layer turns the CRC off along with it.
    /// Every other spreading factor uses explicit header with CRC.
    pub fn for_spreading_factor(spreading_factor: SpreadingFactor) -> Self {
        match spreading_factor {
            SpreadingFactor::_6 => Self {
                implicit_header: true,
                crc_on: false,
            },
            _ => Self {
                implicit_header: false,
                crc_on: true,
            },
        }
    }
}

/// Internal sx127x LoRa modes (signified by most significant bit flag)
#[derive(Clone, Copy)]
pub(crate) enum LoRaMode {
    Sleep = 0x00,
    Standby = 0x01,
}

impl LoRaMode {
    /// Mode value, including LoRa flag
    pub fn value(self) -> u8 {
        (self as u8) | 0x80u8
    }
}

/// SX127x register map, limited to the registers touched by the configuration sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Register {
    RegOpMode = 0x01,
    RegFrfMsb = 0x06,
    RegFrfMid = 0x07,
    RegFrfLsb = 0x08,
    RegPaConfig = 0x09,
    RegOcp = 0x0b,
    RegLna = 0x0c,
    RegModemConfig1 = 0x1d,
    RegModemConfig2 = 0x1e,
    RegPreambleMsb = 0x20,
    RegPreambleLsb = 0x21,
    RegHopPeriod = 0x24,
    RegModemConfig3 = 0x26,
    RegIfFreq1 = 0x2f,
    RegIfFreq2 = 0x30,
    RegDetectionOptimize = 0x31,
    RegHighBwOptimize1 = 0x36,
    RegDetectionThreshold = 0x37,
    RegSyncWord = 0x39,
    RegHighBwOptimize2 = 0x3a,
    RegPaDacSX1276 = 0x4d,
    RegPaDacSX1272 = 0x5a,
}

impl Register {
    /// Register address
    pub fn addr(self) -> u8 {
        self as u8
    }
    /// Address byte for an SPI read
    pub fn read_addr(self) -> u8 {
        (self as u8) & 0x7f
    }
    /// Address byte for an SPI write
    pub fn write_addr(self) -> u8 {
        (self as u8) | 0x80
    }
}

#[derive(Clone, Copy)]
pub(crate) enum LnaGain {
    G1 = 0x20, // maximum gain (default)
}

impl LnaGain {
    pub fn boosted_value(self) -> u8 {
        (self as u8) | 0x03u8
    }
}

/// PA DAC field [2:0]
#[derive(Clone, Copy)]
pub(crate) enum PaDac {
    _20DbmOn = 0x07,
    _20DbmOff = 0x04,
}

impl PaDac {
    pub fn value(self) -> u8 {
        self as u8
    }

    /// High power DAC only makes sense on the PA_BOOST pin
    pub fn for_output(tx_boost: bool) -> Self {
        if tx_boost {
            PaDac::_20DbmOn
        } else {
            PaDac::_20DbmOff
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) enum PaConfig {
    PaBoost = 0x80,
    MaxPower7NoPaBoost = 0x70,
}

impl PaConfig {
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// OutputPower field at its maximum
pub(crate) const OUTPUT_POWER_MAX: u8 = 0x0f;

#[derive(Clone, Copy)]
pub(crate) enum OcpTrim {
    _100Ma = 0x0b,
}

impl OcpTrim {
    pub fn value(self) -> u8 {
        (self as u8) | 0x20u8 // value plus OCP on flag
    }
}

pub(crate) fn spreading_factor_value(spreading_factor: SpreadingFactor) -> Result<u8, RadioError> {
    match spreading_factor {
        SpreadingFactor::_5 => Err(RadioError::InvalidSpreadingFactor),
        SpreadingFactor::_6 => Ok(0x06),
        SpreadingFactor::_7 => Ok(0x07),
        SpreadingFactor::_8 => Ok(0x08),
        SpreadingFactor::_9 => Ok(0x09),
        SpreadingFactor::_10 => Ok(0x0A),
        SpreadingFactor::_11 => Ok(0x0B),
        SpreadingFactor::_12 => Ok(0x0C),
    }
}

pub(crate) fn coding_rate_value(coding_rate: CodingRate) -> Result<u8, RadioError> {
    match coding_rate {
        CodingRate::_4_5 => Ok(0x01),
        CodingRate::_4_6 => Ok(0x02),
        CodingRate::_4_7 => Ok(0x03),
        CodingRate::_4_8 => Ok(0x04),
    }
}
