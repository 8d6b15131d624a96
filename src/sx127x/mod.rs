mod radio_kind_params;
mod sx1272;
pub use sx1272::Sx1272;
mod sx1276;
pub use sx1276::Sx1276;

pub use radio_kind_params::{ModemEncoding, PacketFormat, Register, SharedFields, Sx127xVariant};
use radio_kind_params::*;

use crate::mod_params::*;
use crate::mod_traits::RegisterBus;

// Frequency synthesizer: FXOSC (32 MHz) / 2^19 per PLL step
const FXOSC_HZ: u64 = 32_000_000;
const FRF_SHIFT: u32 = 19;

// Default preamble, in symbols
const PREAMBLE_LENGTH: u16 = 8;

fn freq_to_pll_step(freq_in_hz: u32) -> u32 {
    (((freq_in_hz as u64) << FRF_SHIFT) / FXOSC_HZ) as u32
}

fn pll_step_to_freq(pll_step: u32) -> u32 {
    ((pll_step as u64 * FXOSC_HZ) >> FRF_SHIFT) as u32
}

/// Board level settings for SX127x based boards
pub struct Config<C: Sx127xVariant> {
    /// LoRa chip used on specific board
    pub chip: C,
    /// Whether to use PA_BOOST for transmit instead of RFO (sx1272) or RFO_LF/HF (sx1276).
    /// NB! Depends on board layout.
    pub tx_boost: bool,
}

/// Register writes shared by every SX127x variant.
///
/// Holds the bus and trusts its callers: nothing here validates ranges.
pub struct Sx127x<BUS> {
    bus: BUS,
    tx_boost: bool,
}

impl<BUS> Sx127x<BUS>
where
    BUS: RegisterBus,
{
    /// Wrap a register bus. `tx_boost` selects the PA_BOOST output pin.
    pub fn new(bus: BUS, tx_boost: bool) -> Self {
        Self { bus, tx_boost }
    }

    /// Give back the register bus
    pub fn release(self) -> BUS {
        self.bus
    }

    pub(crate) fn tx_boost(&self) -> bool {
        self.tx_boost
    }

    pub(crate) fn write_register(&mut self, register: Register, value: u8) -> Result<(), RadioError> {
        self.bus.write_register(register, value)
    }

    pub(crate) fn read_register(&mut self, register: Register) -> Result<u8, RadioError> {
        self.bus.read_register(register)
    }

    pub(crate) fn write_field(
        &mut self,
        register: Register,
        value: u8,
        high_bit: u8,
        low_bit: u8,
    ) -> Result<(), RadioError> {
        self.bus.write_field(register, value, high_bit, low_bit)
    }

    pub(crate) fn read_field(&mut self, register: Register, high_bit: u8, low_bit: u8) -> Result<u8, RadioError> {
        self.bus.read_field(register, high_bit, low_bit)
    }

    /// Issue the configuration writes common to all variants, leaving the chip in
    /// LoRa sleep.
    ///
    /// `encoding` must hold values already accepted by the variant, `frequency_in_hz`
    /// is programmed as given (errata offsets included). Every register touched here
    /// gets a single write.
    pub fn apply_common(
        &mut self,
        encoding: ModemEncoding,
        shared: SharedFields,
        frequency_in_hz: u32,
        sync_word: u8,
    ) -> Result<(), RadioError> {
        debug!(
            "common: sf = {}, bw = {}, cr = {}, sync word = {=u8:#x}",
            encoding.spreading_factor, encoding.bandwidth, encoding.coding_rate, sync_word
        );
        // The LoRa register bank is only selected, and writable, from sleep
        self.set_mode(LoRaMode::Sleep)?;

        self.set_channel(frequency_in_hz)?;

        let pa_config = if self.tx_boost {
            PaConfig::PaBoost.value() | OUTPUT_POWER_MAX
        } else {
            PaConfig::MaxPower7NoPaBoost.value() | OUTPUT_POWER_MAX
        };
        self.write_register(Register::RegPaConfig, pa_config)?;
        self.write_register(Register::RegOcp, OcpTrim::_100Ma.value())?;
        self.write_register(Register::RegLna, LnaGain::G1.boosted_value())?;

        // No frequency hopping
        self.write_register(Register::RegHopPeriod, 0x00)?;

        // RegModemConfig2
        // [7:4] - SpreadingFactor
        // [3] - TxContinuousMode (0: single packet)
        // [2] - variant bit
        let config_2 = (encoding.spreading_factor << 2) | (shared.modem_config_2_bit_2 as u8);
        self.write_field(Register::RegModemConfig2, config_2, 7, 2)?;

        // LoRa detection optimize [2:0] (0x31) and detection threshold (0x37)
        let (opt, thr) = match encoding.spreading_factor {
            0x06 => (0x05, 0x0c),
            _ => (0x03, 0x0a),
        };
        let (mut value, mut mask) = (opt, 0x07);
        if let Some(automatic_if) = shared.automatic_if {
            value |= (automatic_if as u8) << 7;
            mask |= 0x80;
        }
        self.bus.write_bits(Register::RegDetectionOptimize, value, mask)?;
        self.write_register(Register::RegDetectionThreshold, thr)?;

        self.write_register(Register::RegSyncWord, sync_word)?;

        self.write_register(Register::RegPreambleMsb, (PREAMBLE_LENGTH >> 8) as u8)?;
        self.write_register(Register::RegPreambleLsb, (PREAMBLE_LENGTH & 0x00ff) as u8)
    }

    pub(crate) fn set_mode(&mut self, mode: LoRaMode) -> Result<(), RadioError> {
        self.write_register(Register::RegOpMode, mode.value())
    }

    /// Program the synthesizer for a carrier frequency
    pub fn set_channel(&mut self, frequency_in_hz: u32) -> Result<(), RadioError> {
        debug!("channel = {}", frequency_in_hz);
        let frf = freq_to_pll_step(frequency_in_hz);
        self.write_register(Register::RegFrfMsb, ((frf & 0x00FF0000) >> 16) as u8)?;
        self.write_register(Register::RegFrfMid, ((frf & 0x0000FF00) >> 8) as u8)?;
        self.write_register(Register::RegFrfLsb, (frf & 0x000000FF) as u8)
    }

    /// Carrier frequency currently programmed into the synthesizer, in Hz
    pub fn frequency_in_hz(&mut self) -> Result<u32, RadioError> {
        let msb = self.read_register(Register::RegFrfMsb)? as u32;
        let mid = self.read_register(Register::RegFrfMid)? as u32;
        let lsb = self.read_register(Register::RegFrfLsb)? as u32;
        Ok(pll_step_to_freq((msb << 16) | (mid << 8) | lsb))
    }
}

/// Validates and applies LoRa modem parameters for one SX127x variant.
///
/// The held [`RadioParameters`] are only replaced once a full configuration
/// sequence went through. A rejected or failed call leaves them as they were,
/// though register writes issued before a bus failure stay on the chip.
pub struct Configurator<BUS, C: Sx127xVariant> {
    radio: Sx127x<BUS>,
    config: Config<C>,
    params: RadioParameters,
}

impl<BUS, C> Configurator<BUS, C>
where
    BUS: RegisterBus,
    C: Sx127xVariant,
{
    /// Create a configurator holding `initial` without touching the chip
    pub fn new(bus: BUS, config: Config<C>, initial: RadioParameters) -> Self {
        let radio = Sx127x::new(bus, config.tx_boost);
        Self {
            radio,
            config,
            params: initial,
        }
    }

    /// Create a configurator and apply `initial` to the chip right away
    pub fn init(bus: BUS, config: Config<C>, initial: RadioParameters) -> Result<Self, RadioError> {
        let mut configurator = Self::new(bus, config, initial);
        configurator.configure(initial)?;
        Ok(configurator)
    }

    /// Give back the register bus
    pub fn release(self) -> BUS {
        self.radio.release()
    }

    /// Board settings
    pub fn config(&self) -> &Config<C> {
        &self.config
    }

    /// Currently held parameters
    pub fn params(&self) -> &RadioParameters {
        &self.params
    }

    /// Currently held bandwidth
    pub fn bandwidth(&self) -> Bandwidth {
        self.params.bandwidth
    }

    /// Currently held spreading factor
    pub fn spreading_factor(&self) -> SpreadingFactor {
        self.params.spreading_factor
    }

    /// Currently held coding rate
    pub fn coding_rate(&self) -> CodingRate {
        self.params.coding_rate
    }

    /// Currently held carrier frequency (Hz), before any errata offset
    pub fn frequency_in_hz(&self) -> u32 {
        self.params.frequency_in_hz
    }

    /// Currently held sync word
    pub fn sync_word(&self) -> u8 {
        self.params.sync_word
    }

    /// Validate the complete parameter tuple, write it to the chip and hold it.
    ///
    /// Validation errors are returned before the first register access. Every
    /// register write happens in LoRa sleep, and each register is written once,
    /// so repeating a call repeats the same writes. The chip is left in standby.
    pub fn configure(&mut self, params: RadioParameters) -> Result<(), RadioError> {
        let encoding = C::validate(&params).inspect_err(|e| {
            warn!("rejected {}: {}", params, e);
        })?;

        let format = PacketFormat::for_spreading_factor(params.spreading_factor);
        // Derived from the requested tuple, not the held one
        let ldro = low_data_rate_optimize(params.bandwidth, params.spreading_factor);
        debug!(
            "symbol duration = {} us, ldro = {}",
            symbol_duration_us(params.bandwidth, params.spreading_factor),
            ldro
        );

        let shared = SharedFields {
            modem_config_2_bit_2: C::modem_config_2_bit_2(format),
            automatic_if: C::automatic_if(params.bandwidth),
        };
        let carrier = C::carrier_frequency(params.bandwidth, params.frequency_in_hz);
        self.radio.apply_common(encoding, shared, carrier, params.sync_word)?;

        C::set_pa_dac(&mut self.radio)?;
        C::set_modem_config(&mut self.radio, &encoding, format, ldro)?;
        C::apply_frequency_errata(&mut self.radio, params.bandwidth, params.frequency_in_hz)?;

        self.radio.set_mode(LoRaMode::Standby)?;

        self.params = params;
        Ok(())
    }

    /// Change the bandwidth, keeping the other held parameters
    pub fn set_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<(), RadioError> {
        self.configure(RadioParameters {
            bandwidth,
            ..self.params
        })
    }

    /// Change the spreading factor, keeping the other held parameters
    pub fn set_spreading_factor(&mut self, spreading_factor: SpreadingFactor) -> Result<(), RadioError> {
        self.configure(RadioParameters {
            spreading_factor,
            ..self.params
        })
    }

    /// Change the coding rate, keeping the other held parameters
    pub fn set_coding_rate(&mut self, coding_rate: CodingRate) -> Result<(), RadioError> {
        self.configure(RadioParameters {
            coding_rate,
            ..self.params
        })
    }

    /// Change the carrier frequency, keeping the other held parameters
    pub fn set_frequency(&mut self, frequency_in_hz: u32) -> Result<(), RadioError> {
        self.configure(RadioParameters {
            frequency_in_hz,
            ..self.params
        })
    }

    /// Change the sync word, keeping the other held parameters
    pub fn set_sync_word(&mut self, sync_word: u8) -> Result<(), RadioError> {
        self.configure(RadioParameters {
            sync_word,
            ..self.params
        })
    }

    /// Read back whether the chip is in explicit header mode
    pub fn explicit_header(&mut self) -> Result<bool, RadioError> {
        C::explicit_header(&mut self.radio)
    }

    /// Read back the carrier programmed into the chip, errata offsets included
    pub fn programmed_frequency_in_hz(&mut self) -> Result<u32, RadioError> {
        self.radio.frequency_in_hz()
    }

    #[cfg(test)]
    pub(crate) fn bus(&mut self) -> &mut BUS {
        &mut self.radio.bus
    }
}
