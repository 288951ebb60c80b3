//! ADC noise source for the seed
//!
//! Wraps the STM32F1 ADC1 as an [`AnalogSampler`] over a fixed set of
//! floating input pins. Channel numbers index into that set.
//!
//! The embassy driver runs a conversion to completion in one call, so the
//! hardware wait happens in `start_conversion` and is cut off after
//! [`CONVERSION_TIMEOUT`]. A converter that never signals end of conversion
//! fails the harvest instead of hanging boot.

use embassy_futures::block_on;
use embassy_stm32::adc::{Adc, AnyAdcChannel};
use embassy_stm32::peripherals::ADC1;
use embassy_time::{with_timeout, Duration};
use petri_hal::AnalogSampler;

/// Number of noise inputs wired up (PA0..PA3)
pub const NOISE_CHANNELS: usize = 4;

/// Upper bound on one conversion (a few microseconds when healthy)
pub const CONVERSION_TIMEOUT: Duration = Duration::from_millis(10);

/// Sampler errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SamplerError {
    /// Channel is not one of the wired inputs
    UnknownChannel(u8),
    /// Conversion did not finish within [`CONVERSION_TIMEOUT`]
    Timeout(u8),
}

/// ADC1 over the floating noise inputs
pub struct NoiseSampler<'d> {
    adc: Adc<'d, ADC1>,
    inputs: [AnyAdcChannel<ADC1>; NOISE_CHANNELS],
    result: Option<u16>,
}

impl<'d> NoiseSampler<'d> {
    /// Create a sampler over `inputs`, where input `n` is channel `n`
    pub fn new(adc: Adc<'d, ADC1>, inputs: [AnyAdcChannel<ADC1>; NOISE_CHANNELS]) -> Self {
        Self {
            adc,
            inputs,
            result: None,
        }
    }
}

impl AnalogSampler for NoiseSampler<'_> {
    type Error = SamplerError;

    fn start_conversion(&mut self, channel: u8) -> Result<(), SamplerError> {
        let input = self
            .inputs
            .get_mut(channel as usize)
            .ok_or(SamplerError::UnknownChannel(channel))?;

        let sample = block_on(with_timeout(CONVERSION_TIMEOUT, self.adc.read(input)))
            .map_err(|_| SamplerError::Timeout(channel))?;
        self.result = Some(sample);
        Ok(())
    }

    fn is_conversion_done(&mut self) -> bool {
        self.result.is_some()
    }

    fn read_conversion(&mut self) -> u16 {
        self.result.take().unwrap_or(0)
    }
}
