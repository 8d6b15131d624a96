pub use lora_modulation::{Bandwidth, CodingRate, SpreadingFactor};

/// LoRaWAN public network sync word
pub const SYNC_WORD_PUBLIC: u8 = 0x34;
/// Sync word used by private networks (chip default)
pub const SYNC_WORD_PRIVATE: u8 = 0x12;

/// Errors reported while validating or applying a radio configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum RadioError {
    /// Bandwidth is not one of the values supported by the chip variant
    InvalidBandwidth,
    /// Spreading factor outside of SF6..SF12
    InvalidSpreadingFactor,
    /// Coding rate not supported by the chip variant
    InvalidCodingRate,
    /// Carrier frequency outside of the chip variant's RF range
    InvalidFrequency,
    /// The register bus reported a failure; writes issued before it are not undone
    BusFailure,
}

impl RadioError {
    /// Whether the error was raised by parameter validation, before any register was touched
    pub fn is_validation(self) -> bool {
        !matches!(self, RadioError::BusFailure)
    }
}

/// The modem configuration held by a configurator.
///
/// A configurator only ever holds a value that passed validation and was written
/// to the chip, apart from the value it was constructed with.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct RadioParameters {
    /// Channel bandwidth
    pub bandwidth: Bandwidth,
    /// Spreading factor, SF6..SF12
    pub spreading_factor: SpreadingFactor,
    /// Forward error correction rate
    pub coding_rate: CodingRate,
    /// Carrier frequency (Hz)
    pub frequency_in_hz: u32,
    /// Network sync word
    pub sync_word: u8,
}

impl RadioParameters {
    /// Build a parameter set from plain engineering values: bandwidth in Hz,
    /// spreading factor, coding rate denominator (4/x), frequency in Hz and sync word.
    ///
    /// Only the enumerated fields are checked here, the frequency range depends on
    /// the chip variant and is checked when the parameters are applied.
    pub fn from_raw(
        bandwidth_in_hz: u32,
        spreading_factor: u8,
        coding_rate_denominator: u8,
        frequency_in_hz: u32,
        sync_word: u8,
    ) -> Result<Self, RadioError> {
        Ok(Self {
            bandwidth: bandwidth_from_hz(bandwidth_in_hz)?,
            spreading_factor: spreading_factor_from_value(spreading_factor)?,
            coding_rate: coding_rate_from_denominator(coding_rate_denominator)?,
            frequency_in_hz,
            sync_word,
        })
    }

    /// Symbol duration for these parameters, see [`symbol_duration_us`]
    pub fn symbol_duration_us(&self) -> u32 {
        symbol_duration_us(self.bandwidth, self.spreading_factor)
    }
}

/// Map a bandwidth in Hz onto the LoRa bandwidth table.
///
/// Fractional table entries are accepted at the value the datasheet rounds them to
/// (7.8 kHz -> 7800, 41.7 kHz -> 41700).
pub fn bandwidth_from_hz(bandwidth_in_hz: u32) -> Result<Bandwidth, RadioError> {
    match bandwidth_in_hz {
        7_800 => Ok(Bandwidth::_7KHz),
        10_400 => Ok(Bandwidth::_10KHz),
        15_600 => Ok(Bandwidth::_15KHz),
        20_800 => Ok(Bandwidth::_20KHz),
        31_250 => Ok(Bandwidth::_31KHz),
        41_700 => Ok(Bandwidth::_41KHz),
        62_500 => Ok(Bandwidth::_62KHz),
        125_000 => Ok(Bandwidth::_125KHz),
        250_000 => Ok(Bandwidth::_250KHz),
        500_000 => Ok(Bandwidth::_500KHz),
        _ => Err(RadioError::InvalidBandwidth),
    }
}

/// Bandwidth in Hz as listed in the datasheet table.
///
/// Unlike `u32::from(Bandwidth)` this keeps the fractional kHz entries at the
/// rounding used by [`bandwidth_from_hz`], so the two functions round trip.
pub fn bandwidth_in_hz(bandwidth: Bandwidth) -> u32 {
    match bandwidth {
        Bandwidth::_7KHz => 7_800,
        Bandwidth::_10KHz => 10_400,
        Bandwidth::_15KHz => 15_600,
        Bandwidth::_20KHz => 20_800,
        Bandwidth::_31KHz => 31_250,
        Bandwidth::_41KHz => 41_700,
        Bandwidth::_62KHz => 62_500,
        Bandwidth::_125KHz => 125_000,
        Bandwidth::_250KHz => 250_000,
        Bandwidth::_500KHz => 500_000,
    }
}

/// Spreading factor from its numeric value (6..=12 on SX127x)
pub fn spreading_factor_from_value(spreading_factor: u8) -> Result<SpreadingFactor, RadioError> {
    match spreading_factor {
        6 => Ok(SpreadingFactor::_6),
        7 => Ok(SpreadingFactor::_7),
        8 => Ok(SpreadingFactor::_8),
        9 => Ok(SpreadingFactor::_9),
        10 => Ok(SpreadingFactor::_10),
        11 => Ok(SpreadingFactor::_11),
        12 => Ok(SpreadingFactor::_12),
        _ => Err(RadioError::InvalidSpreadingFactor),
    }
}

/// Coding rate 4/x from its denominator x
pub fn coding_rate_from_denominator(denominator: u8) -> Result<CodingRate, RadioError> {
    match denominator {
        5 => Ok(CodingRate::_4_5),
        6 => Ok(CodingRate::_4_6),
        7 => Ok(CodingRate::_4_7),
        8 => Ok(CodingRate::_4_8),
        _ => Err(RadioError::InvalidCodingRate),
    }
}

/// Symbol length at or above which low data rate optimization is required (Section 4.1.1.6)
pub const LOW_DATA_RATE_OPTIMIZE_THRESHOLD_US: u32 = 16_000;

/// Symbol duration 2^SF / BW in microseconds.
///
/// SF5 is not a valid SX127x setting but still yields its duration, validation
/// happens elsewhere.
pub fn symbol_duration_us(bandwidth: Bandwidth, spreading_factor: SpreadingFactor) -> u32 {
    let chips: u64 = 1 << sf_exponent(spreading_factor);
    ((chips * 1_000_000) / bandwidth_in_hz(bandwidth) as u64) as u32
}

/// Whether the symbol duration calls for the low data rate optimization bit
pub fn low_data_rate_optimize(bandwidth: Bandwidth, spreading_factor: SpreadingFactor) -> bool {
    symbol_duration_us(bandwidth, spreading_factor) >= LOW_DATA_RATE_OPTIMIZE_THRESHOLD_US
}

fn sf_exponent(spreading_factor: SpreadingFactor) -> u32 {
    match spreading_factor {
        SpreadingFactor::_5 => 5,
        SpreadingFactor::_6 => 6,
        SpreadingFactor::_7 => 7,
        SpreadingFactor::_8 => 8,
        SpreadingFactor::_9 => 9,
        SpreadingFactor::_10 => 10,
        SpreadingFactor::_11 => 11,
        SpreadingFactor::_12 => 12,
    }
}
