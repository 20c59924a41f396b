//! SAI configuration
//!
//! The master clock is produced by the fractional divider of the SAI: `MCLK = input * FRACT /
//! DIVIDE`. The bit clock is then divided from MCLK, and the frame layout is derived from the
//! channel count and the sample width given here.

use crate::Error;

/// Master clock divider input assumed by [`MCLK_TABLE`] (system clock at 96 MHz)
pub const MCLK_INPUT_HZ: u32 = 96_000_000;

/// Bit clock divider, `BCLK = MCLK / ((BCLK_DIV + 1) * 2)`
pub const BCLK_DIV: u32 = 1;

/// `MSEL` value selecting the master clock as bit clock source
pub const BCLK_SOURCE_MCLK: u32 = 1;

/// `SYNC` value for asynchronous mode
pub const SYNC_ASYNCHRONOUS: u32 = 0;

/// Allowed values of the MCLK fraction
const FRACT_RANGE: core::ops::RangeInclusive<u16> = 1..=256;
/// Allowed values of the MCLK divide
const DIVIDE_RANGE: core::ops::RangeInclusive<u16> = 1..=4096;

/// Fractional divider producing the master clock, `output = input * fract / divide`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MclkDivider {
    fract: u16,
    divide: u16,
}

/// Supported sample rates and the divider giving `256 * sample_rate` from [`MCLK_INPUT_HZ`]
pub const MCLK_TABLE: &[(u32, MclkDivider)] = &[
    // 96 MHz * 16 / 125 = 12.288 MHz
    (
        48_000,
        MclkDivider {
            fract: 16,
            divide: 125,
        },
    ),
];

impl MclkDivider {
    /// Creates a divider from a pre-computed fraction and divide value
    ///
    /// The hardware requires `fract <= divide`.
    ///
    /// # Panics
    ///
    /// This function panics if `fract` is outside `[1, 256]`, `divide` is outside `[1, 4096]`,
    /// or `fract` is greater than `divide`.
    pub fn new(fract: u16, divide: u16) -> Self {
        if !FRACT_RANGE.contains(&fract) || !DIVIDE_RANGE.contains(&divide) || fract > divide {
            panic!(
                "MCLK divider {}/{} outside allowed range (fract 1..=256, divide 1..=4096, fract <= divide)",
                fract, divide
            );
        }
        MclkDivider { fract, divide }
    }

    /// Looks up the divider for a sample rate in [`MCLK_TABLE`]
    pub fn for_sample_rate(sample_rate: u32) -> Result<Self, Error> {
        MCLK_TABLE
            .iter()
            .find(|(rate, _)| *rate == sample_rate)
            .map(|(_, divider)| *divider)
            .ok_or(Error::UnsupportedSampleRate(sample_rate))
    }

    pub fn fract(&self) -> u16 {
        self.fract
    }

    pub fn divide(&self) -> u16 {
        self.divide
    }

    /// Master clock frequency produced from an input clock of `input_hz`
    pub fn output_hz(&self, input_hz: u32) -> u32 {
        (u64::from(input_hz) * u64::from(self.fract) / u64::from(self.divide)) as u32
    }
}

/// Bit clock frequency generated from a master clock of `mclk_hz`
pub fn bit_clock_hz(mclk_hz: u32) -> u32 {
    mclk_hz / ((BCLK_DIV + 1) * 2)
}

/// How the master clock divider is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Look up the divider for this sample rate in [`MCLK_TABLE`] when the driver starts
    SampleRate(u32),
    /// Use this divider as is
    Divider(MclkDivider),
}

/// Configuration of the master clock and of the receive frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SaiConfig {
    pub(crate) clock: ClockSource,
    /// Bits per sample word
    pub(crate) bits: u8,
    /// Words per frame
    pub(crate) channels: u8,
}

impl SaiConfig {
    /// Creates a configuration for a sample rate
    ///
    /// The rate is checked against [`MCLK_TABLE`] by [`Sai::begin`](crate::Sai::begin), which
    /// fails with [`Error::UnsupportedSampleRate`] for rates that are not listed.
    ///
    /// `bits` must be in `[1, 32]` and `channels` in `[1, 16]`; larger values are truncated to
    /// the register fields.
    pub fn with_sample_rate(sample_rate: u32, bits: u8, channels: u8) -> Self {
        SaiConfig {
            clock: ClockSource::SampleRate(sample_rate),
            bits,
            channels,
        }
    }

    /// Creates a configuration with a manually specified master clock divider
    pub fn with_divider(divider: MclkDivider, bits: u8, channels: u8) -> Self {
        SaiConfig {
            clock: ClockSource::Divider(divider),
            bits,
            channels,
        }
    }

    pub fn clock(&self) -> ClockSource {
        self.clock
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_48k_is_in_the_table() {
        let divider = MclkDivider::for_sample_rate(48_000).unwrap();
        assert_eq!(divider.fract(), 16);
        assert_eq!(divider.divide(), 125);
        for rate in [8_000, 44_100, 96_000, 0] {
            assert_eq!(
                MclkDivider::for_sample_rate(rate),
                Err(Error::UnsupportedSampleRate(rate))
            );
        }
    }

    #[test]
    fn clock_chain_for_48k() {
        let divider = MclkDivider::for_sample_rate(48_000).unwrap();
        let mclk = divider.output_hz(MCLK_INPUT_HZ);
        assert_eq!(mclk, 12_288_000);
        assert_eq!(mclk, 256 * 48_000);
        assert_eq!(bit_clock_hz(mclk), 3_072_000);
        // 64 bit clocks per frame, room for two 32-bit words
        assert_eq!(bit_clock_hz(mclk) / 48_000, 64);
    }

    #[test]
    fn manual_divider() {
        let divider = MclkDivider::new(1, 2);
        assert_eq!(divider.output_hz(24_000_000), 12_000_000);
        let config = SaiConfig::with_divider(divider, 24, 2);
        assert_eq!(config.clock(), ClockSource::Divider(divider));
        assert_eq!(config.bits(), 24);
        assert_eq!(config.channels(), 2);
    }

    #[test]
    #[should_panic]
    fn divider_fract_above_divide() {
        MclkDivider::new(126, 125);
    }

    #[test]
    #[should_panic]
    fn divider_zero_divide() {
        MclkDivider::new(0, 0);
    }
}
