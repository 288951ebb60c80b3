//! Petri Hardware Abstraction Layer
//!
//! This crate defines the two narrow hardware capabilities the rest of the
//! workspace depends on. Chip-specific code (the firmware crate) implements
//! them, and host tests substitute recording mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  petri-firmware (STM32F103 binary)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ petri-drivers │       │  petri-core   │
//! │   (SH1106)    │       │ (life, seed)  │
//! └───────────────┘       └───────────────┘
//!         │                       │
//!         └───────────┬───────────┘
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  petri-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - Byte transport to an addressed device
//! - [`adc::AnalogSampler`] - Single-channel analog conversions

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use adc::AnalogSampler;
pub use i2c::{HalI2c, I2cBus, I2cConfig};
