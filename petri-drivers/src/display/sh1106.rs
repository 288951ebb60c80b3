//! SH1106 OLED display driver
//!
//! Driver for 128x64 SH1106-based OLED displays via I2C. The SH1106 is close
//! to the SSD1306 but has 132 columns of RAM for a 128 column panel, so every
//! page write starts at column 2. A module showing garbage in its first two
//! columns under an SSD1306 driver is usually an SH1106.
//!
//! # I2C framing
//!
//! Every transaction starts with a control byte telling the controller how
//! to interpret the rest:
//!
//! ```text
//! command frame: [0x00, cmd, cmd, ...]
//! data frame:    [0x40, page byte 0, ..., page byte 127]
//! ```
//!
//! Data frames are sent straight out of the framebuffer. The surface keeps
//! one spare byte in front of the pixel data, so the byte before any page
//! can be borrowed for the `0x40` tag and restored after the write (see
//! [`PixelSurface::tag_page`]). No per-page copy is needed.
//!
//! # Errors
//!
//! The panel has no way to report back, so bus errors are not returned.
//! They are counted in [`Sh1106::transport_errors`] and logged.

use petri_core::framebuffer::{buffer_len, PixelSurface};
use petri_core::traits::{MonochromeDisplay, PixelSink};
use petri_hal::I2cBus;

/// Default I2C address (0x3D with the address jumper moved)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Display dimensions
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;

/// Framebuffer length for the full panel
pub const BUFFER_LEN: usize = buffer_len(WIDTH, HEIGHT);

/// The page address command has room for pages 0..=7
const MAX_PAGES: usize = 8;

/// Control byte: the rest of the frame is commands
const COMMAND_TAG: u8 = 0x00;

/// Control byte: the rest of the frame is display RAM data
const DATA_TAG: u8 = 0x40;

/// First visible RAM column
const COLUMN_OFFSET: u8 = 2;

/// SH1106 commands
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const ENTIRE_DISPLAY_RESUME: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Power-on configuration, sent as a single command frame
#[rustfmt::skip]
const INIT_SEQUENCE: [u8; 20] = [
    COMMAND_TAG,
    cmd::DISPLAY_OFF,
    cmd::SET_MUX_RATIO, 0x3F,       // 1/64 duty
    cmd::SET_DISPLAY_OFFSET, 0x00,  // No offset
    cmd::SET_START_LINE,            // Start line 0
    cmd::SET_SEG_REMAP,             // Flip horizontally
    cmd::SET_COM_SCAN_DEC,          // Flip vertically
    cmd::SET_COM_PINS, 0x12,        // Alternative COM config
    cmd::SET_CONTRAST, 0x7F,
    cmd::ENTIRE_DISPLAY_RESUME,     // Show RAM contents
    cmd::SET_NORMAL,
    cmd::SET_CLOCK_DIV, 0x80,       // Default oscillator
    cmd::SET_CHARGE_PUMP, 0x14,     // Enable charge pump
    cmd::DISPLAY_ON,
];

/// SH1106 driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sh1106Config {
    /// 7-bit I2C address
    pub address: u8,
}

impl Default for Sh1106Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
        }
    }
}

/// Errors that can occur when setting up the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// Surface has more pages than the controller can address
    TooManyPages(usize),
}

/// SH1106 OLED driver
pub struct Sh1106<I2C, B = [u8; BUFFER_LEN]> {
    i2c: I2C,
    address: u8,
    /// Frame buffer (1 bit per pixel, organized as pages)
    surface: PixelSurface<B>,
    transport_errors: u32,
}

impl<I2C: I2cBus> Sh1106<I2C> {
    /// Create a driver for the full 128x64 panel and initialize the display
    ///
    /// Sends the configuration sequence, then a blank frame.
    pub fn new(i2c: I2C, config: Sh1106Config) -> Self {
        let surface = PixelSurface::zeroed::<WIDTH, HEIGHT>();
        Self::init(i2c, config, surface)
    }
}

impl<I2C, B> Sh1106<I2C, B>
where
    I2C: I2cBus,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a driver over a caller-provided surface and initialize the display
    ///
    /// The surface is validated before anything is sent.
    pub fn with_surface(
        i2c: I2C,
        config: Sh1106Config,
        surface: PixelSurface<B>,
    ) -> Result<Self, DriverError> {
        if surface.pages() > MAX_PAGES {
            return Err(DriverError::TooManyPages(surface.pages()));
        }
        Ok(Self::init(i2c, config, surface))
    }

    fn init(i2c: I2C, config: Sh1106Config, surface: PixelSurface<B>) -> Self {
        let mut display = Self {
            i2c,
            address: config.address,
            surface,
            transport_errors: 0,
        };

        display.send(&INIT_SEQUENCE);
        display.clear();
        display.refresh();
        display
    }

    /// Clear the frame buffer
    pub fn clear(&mut self) {
        self.surface.clear();
    }

    /// Set or clear a pixel in the frame buffer
    ///
    /// Coordinates outside the panel are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        self.surface.set_pixel(x, y, on);
    }

    /// Flush the frame buffer to the display
    ///
    /// For each page: select the page and reset the column pointer, then
    /// send the page data.
    pub fn refresh(&mut self) {
        let Self {
            i2c,
            address,
            surface,
            transport_errors,
        } = self;

        for page in 0..surface.pages() {
            let select = [
                COMMAND_TAG,
                cmd::SET_PAGE_ADDR + page as u8,
                cmd::SET_LOW_COLUMN | COLUMN_OFFSET,
                cmd::SET_HIGH_COLUMN,
            ];
            transmit(i2c, *address, transport_errors, &select);

            if let Some(frame) = surface.tag_page(page, DATA_TAG) {
                transmit(i2c, *address, transport_errors, &frame);
            }
        }
    }

    /// Set display contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) {
        self.send(&[COMMAND_TAG, cmd::SET_CONTRAST, contrast]);
    }

    /// Turn display on/off
    pub fn set_display_on(&mut self, on: bool) {
        let command = if on {
            cmd::DISPLAY_ON
        } else {
            cmd::DISPLAY_OFF
        };
        self.send(&[COMMAND_TAG, command]);
    }

    /// Invert display colors
    pub fn set_inverted(&mut self, inverted: bool) {
        let command = if inverted {
            cmd::SET_INVERSE
        } else {
            cmd::SET_NORMAL
        };
        self.send(&[COMMAND_TAG, command]);
    }

    /// The frame buffer
    pub fn surface(&self) -> &PixelSurface<B> {
        &self.surface
    }

    /// I2C address in use
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Number of bus writes that failed since construction
    pub fn transport_errors(&self) -> u32 {
        self.transport_errors
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn send(&mut self, frame: &[u8]) {
        transmit(
            &mut self.i2c,
            self.address,
            &mut self.transport_errors,
            frame,
        );
    }
}

/// Write one frame, counting (not returning) failures
fn transmit<I2C: I2cBus>(i2c: &mut I2C, address: u8, errors: &mut u32, frame: &[u8]) {
    if i2c.write(address, frame).is_err() {
        *errors = errors.wrapping_add(1);
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "SH1106 write of {} bytes to {=u8:#x} failed",
            frame.len(),
            address
        );
    }
}

impl<I2C, B> PixelSink for Sh1106<I2C, B>
where
    I2C: I2cBus,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        Sh1106::set_pixel(self, x, y, on);
    }
}

impl<I2C, B> MonochromeDisplay for Sh1106<I2C, B>
where
    I2C: I2cBus,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn clear(&mut self) {
        Sh1106::clear(self);
    }

    fn refresh(&mut self) {
        Sh1106::refresh(self);
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.surface.width(), self.surface.height())
    }
}
