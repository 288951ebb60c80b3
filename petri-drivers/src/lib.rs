//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in petri-core on top of the petri-hal bus traits:
//!
//! - Displays (SH1106 over I2C)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
