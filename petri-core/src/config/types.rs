//! Configuration type definitions

use heapless::Vec;
use petri_hal::I2cConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of ADC channels mixed into the seed
pub const MAX_SEED_CHANNELS: usize = 8;

/// Default SH1106 I2C address
pub const DEFAULT_DISPLAY_ADDRESS: u8 = 0x3C;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// I2C address does not fit in 7 bits
    InvalidAddress(u8),
    /// I2C frequency is zero
    InvalidFrequency,
    /// Seed channel list is empty
    NoSeedChannels,
    /// Seed poll budget is zero
    ZeroPollBudget,
}

/// Display bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayHwConfig {
    /// 7-bit I2C address of the display
    pub i2c_address: u8,
    /// I2C clock in Hz
    pub i2c_frequency: u32,
}

impl Default for DisplayHwConfig {
    fn default() -> Self {
        Self {
            i2c_address: DEFAULT_DISPLAY_ADDRESS,
            i2c_frequency: I2cConfig::FAST.frequency,
        }
    }
}

impl DisplayHwConfig {
    /// Bus settings for the HAL
    pub fn i2c_config(&self) -> I2cConfig {
        I2cConfig {
            frequency: self.i2c_frequency,
        }
    }
}

/// Seed harvesting configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeedConfig {
    /// ADC channels sampled for noise, in order
    pub channels: Vec<u8, MAX_SEED_CHANNELS>,
    /// Ready-flag polls allowed per conversion
    pub max_polls: u32,
    /// Seed used when harvesting fails
    pub fallback_seed: u32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let mut channels = Vec::new();
        for channel in 0..4 {
            // Capacity is 8
            let _ = channels.push(channel);
        }

        Self {
            channels,
            max_polls: 10_000,
            fallback_seed: 0x5EED_1106,
        }
    }
}

/// Generation counter overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OverlayConfig {
    /// Draw the generation number over the grid
    pub show_generation: bool,
    /// Left edge of the counter in pixels
    pub x: u8,
    /// Top edge of the counter in pixels
    pub y: u8,
}

/// Complete firmware configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PetriConfig {
    /// Display bus
    pub display: DisplayHwConfig,
    /// Seed harvesting
    pub seed: SeedConfig,
    /// Overlay
    pub overlay: OverlayConfig,
}

impl PetriConfig {
    /// Check values the hardware cannot accept
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.i2c_address > 0x7F {
            return Err(ConfigError::InvalidAddress(self.display.i2c_address));
        }
        if self.display.i2c_frequency == 0 {
            return Err(ConfigError::InvalidFrequency);
        }
        if self.seed.channels.is_empty() {
            return Err(ConfigError::NoSeedChannels);
        }
        if self.seed.max_polls == 0 {
            return Err(ConfigError::ZeroPollBudget);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PetriConfig::default();
        assert_eq!(config.display.i2c_address, 0x3C);
        assert_eq!(config.display.i2c_config(), I2cConfig::FAST);
        assert_eq!(config.seed.channels.as_slice(), &[0, 1, 2, 3]);
        assert!(!config.overlay.show_generation);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_8bit_address() {
        let mut config = PetriConfig::default();
        config.display.i2c_address = 0x78;
        assert_eq!(config.validate(), Ok(()));

        config.display.i2c_address = 0x80;
        assert_eq!(config.validate(), Err(ConfigError::InvalidAddress(0x80)));
    }

    #[test]
    fn test_validate_seed() {
        let mut config = PetriConfig::default();
        config.seed.max_polls = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPollBudget));

        config.seed.channels.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoSeedChannels));
    }

    #[test]
    fn test_validate_frequency() {
        let mut config = PetriConfig::default();
        config.display.i2c_frequency = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidFrequency));
    }
}
