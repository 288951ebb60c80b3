//! Random seed harvesting
//!
//! Unconnected ADC inputs pick up enough noise to make a usable seed for the
//! initial generation. Each configured channel contributes one sample,
//! shifted in a byte at a time.
//!
//! The ready flag is polled a bounded number of times. A converter that
//! never finishes yields [`SeedError::NotReady`] rather than hanging boot.

use petri_hal::AnalogSampler;

/// Errors that can occur while harvesting a seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeedError<E> {
    /// No channels were given
    NoChannels,
    /// Conversion did not finish within the poll budget
    NotReady {
        /// Channel that timed out
        channel: u8,
    },
    /// The sampler reported an error
    Sampler(E),
}

/// Sample one channel, polling the ready flag at most `max_polls` times
pub fn sample_channel<A: AnalogSampler>(
    sampler: &mut A,
    channel: u8,
    max_polls: u32,
) -> Result<u16, SeedError<A::Error>> {
    sampler
        .start_conversion(channel)
        .map_err(SeedError::Sampler)?;

    for _ in 0..max_polls {
        if sampler.is_conversion_done() {
            return Ok(sampler.read_conversion());
        }
    }

    Err(SeedError::NotReady { channel })
}

/// Build a 32-bit seed from one sample per channel
///
/// Channels are sampled in order; for each one the seed is shifted left by
/// a byte and the sample is mixed in with XOR.
pub fn harvest_seed<A: AnalogSampler>(
    sampler: &mut A,
    channels: &[u8],
    max_polls: u32,
) -> Result<u32, SeedError<A::Error>> {
    if channels.is_empty() {
        return Err(SeedError::NoChannels);
    }

    let mut seed = 0u32;
    for &channel in channels {
        let sample = sample_channel(sampler, channel, max_polls)?;
        seed = (seed << 8) ^ u32::from(sample);
    }

    Ok(seed)
}
