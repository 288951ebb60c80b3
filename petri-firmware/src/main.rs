//! Petri Firmware
//!
//! Conway's Game of Life on a 128x64 SH1106 OLED, for STM32F103 (blue pill)
//! boards. The initial generation is seeded from ADC noise on floating pins;
//! after that the board renders, flushes and advances forever.
//!
//! Wiring:
//! - I2C1: PB6 = SCL, PB7 = SDA (display)
//! - PA0..PA3: leave unconnected (seed noise)

#![no_std]
#![no_main]

mod sampler;

use cortex_m_rt::entry;
use defmt::*;
use embassy_stm32::adc::{Adc, AdcChannel};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::time::Hertz;
use embassy_time::{block_for, Duration};
use {defmt_rtt as _, panic_probe as _};

use petri_core::config::{parse_config, PetriConfig};
use petri_core::life::Life;
use petri_core::render::render_grid;
use petri_core::seed::harvest_seed;
use petri_core::text::draw_number;
use petri_drivers::display::sh1106::{self, Sh1106, Sh1106Config};
use petri_hal::HalI2c;

use crate::sampler::NoiseSampler;

/// Embedded configuration (compiled into firmware)
/// Edit petri.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../petri.toml");

/// Game grid matches the panel
const GRID_WIDTH: usize = 128;
const GRID_HEIGHT: usize = 64;

const _: () = assert!(GRID_WIDTH <= sh1106::WIDTH, "display width too small");
const _: () = assert!(GRID_HEIGHT <= sh1106::HEIGHT, "display height too small");

/// Time for the OLED supply to settle before the first command
const DISPLAY_POWER_UP: Duration = Duration::from_millis(100);

/// Bus timeout per I2C transfer
const I2C_TIMEOUT: Duration = Duration::from_millis(100);

/// Log population every this many generations
const STATS_INTERVAL: u32 = 1000;

#[entry]
fn main() -> ! {
    info!("Petri firmware starting...");

    let p = embassy_stm32::init(clock_config());
    let config = load_config();

    // Seed from ADC noise
    let mut sampler = NoiseSampler::new(
        Adc::new(p.ADC1),
        [
            p.PA0.degrade_adc(),
            p.PA1.degrade_adc(),
            p.PA2.degrade_adc(),
            p.PA3.degrade_adc(),
        ],
    );
    let seed = match harvest_seed(&mut sampler, &config.seed.channels, config.seed.max_polls) {
        Ok(seed) => {
            info!("Seed {=u32:#010x}", seed);
            seed
        }
        Err(e) => {
            warn!("Seed harvest failed: {:?}, using fallback", e);
            config.seed.fallback_seed
        }
    };
    drop(sampler);

    // Setup I2C for OLED (PB6=SCL, PB7=SDA)
    let bus_config = config.display.i2c_config();
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = Hertz(bus_config.frequency);
    i2c_config.timeout = I2C_TIMEOUT;
    let i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, i2c_config);

    block_for(DISPLAY_POWER_UP);
    let mut display = Sh1106::new(
        HalI2c::new(i2c),
        Sh1106Config {
            address: config.display.i2c_address,
        },
    );
    if display.transport_errors() > 0 {
        error!(
            "Display at {=u8:#x} did not acknowledge initialization",
            display.address()
        );
    } else {
        info!("OLED initialized");
    }

    let mut life = Life::<GRID_WIDTH, GRID_HEIGHT>::from_seed(seed);
    let overlay = config.overlay;

    loop {
        render_grid(life.grid(), &mut display);
        if overlay.show_generation {
            draw_number(
                &mut display,
                life.generation(),
                usize::from(overlay.x),
                usize::from(overlay.y),
            );
        }
        display.refresh();
        life.advance();

        if life.generation() % STATS_INTERVAL == 0 {
            debug!(
                "Generation {}: population {}, bus errors {}",
                life.generation(),
                life.grid().population(),
                display.transport_errors()
            );
        }
    }
}

/// 72 MHz system clock from the 8 MHz crystal
fn clock_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();
    config.rcc.hse = Some(Hse {
        freq: Hertz(8_000_000),
        mode: HseMode::Oscillator,
    });
    config.rcc.pll = Some(Pll {
        src: PllSource::HSE,
        prediv: PllPreDiv::DIV1,
        mul: PllMul::MUL9,
    });
    config.rcc.sys = Sysclk::PLL1_P;
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV2;
    config.rcc.apb2_pre = APBPrescaler::DIV1;
    config.rcc.adc_pre = ADCPrescaler::DIV6;
    config
}

/// Parse the embedded configuration, falling back to defaults
fn load_config() -> PetriConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded petri.toml");
            config
        }
        Err(e) => {
            warn!("petri.toml rejected ({:?}), using defaults", e);
            PetriConfig::default()
        }
    }
}
