//! Analog sampling abstractions
//!
//! Conversions are split into start / poll / read so the caller owns the
//! wait. Nothing here blocks on the hardware ready flag; see
//! `petri_core::seed` for the bounded polling loop built on top.

/// Single ADC with selectable input channel
pub trait AnalogSampler {
    /// Error type for sampler operations
    type Error;

    /// Select `channel` and start a single conversion
    fn start_conversion(&mut self, channel: u8) -> Result<(), Self::Error>;

    /// Check the end-of-conversion flag
    fn is_conversion_done(&mut self) -> bool;

    /// Read the result of the finished conversion
    fn read_conversion(&mut self) -> u16;
}

impl<T: AnalogSampler + ?Sized> AnalogSampler for &mut T {
    type Error = T::Error;

    fn start_conversion(&mut self, channel: u8) -> Result<(), Self::Error> {
        (**self).start_conversion(channel)
    }

    fn is_conversion_done(&mut self) -> bool {
        (**self).is_conversion_done()
    }

    fn read_conversion(&mut self) -> u16 {
        (**self).read_conversion()
    }
}
