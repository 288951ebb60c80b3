//! Board-agnostic core logic for the Petri firmware
//!
//! This crate contains everything that does not touch a peripheral directly:
//!
//! - Page-organized monochrome framebuffer
//! - Game of Life engine
//! - Grid-to-pixel render bridge and digit overlay
//! - Seed harvesting from an analog sampler
//! - Configuration types and the `petri.toml` parser
//! - Display traits shared with the driver crate

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod framebuffer;
pub mod life;
pub mod render;
pub mod seed;
pub mod text;
pub mod traits;

pub use framebuffer::{PixelSurface, SurfaceError, TaggedPage};
pub use life::{Grid, GridError, Life};
pub use traits::{MonochromeDisplay, PixelSink};
