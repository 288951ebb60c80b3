//! I2C bus abstractions
//!
//! The display driver only ever pushes bytes at a device, so the bus
//! capability is a single write operation.

/// I2C bus master
///
/// Sends a complete transaction to a peripheral. Implementations block until
/// the transfer has finished.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, data)
    }
}

/// Adapter exposing a blocking `embedded-hal` I2C peripheral as an [`I2cBus`]
#[derive(Debug)]
pub struct HalI2c<I> {
    inner: I,
}

impl<I> HalI2c<I> {
    /// Wrap an `embedded-hal` I2C peripheral
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    /// Return the wrapped peripheral
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: embedded_hal::i2c::I2c> I2cBus for HalI2c<I> {
    type Error = I::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write(address, data)
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::FAST
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

    #[derive(Default)]
    struct MockPeripheral {
        writes: usize,
        last_address: u8,
        last_len: usize,
    }

    impl ErrorType for MockPeripheral {
        type Error = ErrorKind;
    }

    impl I2c for MockPeripheral {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes += 1;
                    self.last_address = address;
                    self.last_len = bytes.len();
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_hal_adapter_forwards_writes() {
        let mut bus = HalI2c::new(MockPeripheral::default());
        bus.write(0x3C, &[0x00, 0xAF]).unwrap();

        let inner = bus.into_inner();
        assert_eq!(inner.writes, 1);
        assert_eq!(inner.last_address, 0x3C);
        assert_eq!(inner.last_len, 2);
    }

    #[test]
    fn test_default_is_fast_mode() {
        assert_eq!(I2cConfig::default().frequency, 400_000);
        assert_eq!(I2cConfig::STANDARD.frequency, 100_000);
    }
}
