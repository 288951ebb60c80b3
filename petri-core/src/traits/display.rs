//! Display traits for monochrome pixel displays

/// Anything that accepts individual pixel writes
///
/// Implementations must silently ignore coordinates outside their area;
/// callers rely on that to draw partially off-screen content.
pub trait PixelSink {
    /// Set (`true`) or clear (`false`) the pixel at `(x, y)`
    fn set_pixel(&mut self, x: usize, y: usize, on: bool);
}

/// A buffered monochrome display
///
/// Pixel writes land in a local framebuffer; [`refresh`](Self::refresh)
/// pushes the whole buffer to the panel.
pub trait MonochromeDisplay: PixelSink {
    /// Turn every pixel in the framebuffer off
    fn clear(&mut self);

    /// Transmit the framebuffer to the panel
    fn refresh(&mut self);

    /// Display size in pixels as `(width, height)`
    fn dimensions(&self) -> (usize, usize);
}

impl<T: PixelSink + ?Sized> PixelSink for &mut T {
    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        (**self).set_pixel(x, y, on);
    }
}
