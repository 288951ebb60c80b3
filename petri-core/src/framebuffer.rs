//! Page-organized monochrome framebuffer
//!
//! Pixels are packed the way SH1106/SSD1306-class controllers store them:
//! the surface is cut into horizontal pages of 8 rows, each page holds one
//! byte per column and bit `n` of that byte is row `n` of the page.
//!
//! ```text
//! byte 0        reserved slot (tag slot for page 0)
//! bytes 1..=W   page 0, columns 0..W
//! bytes W+1..   page 1, columns 0..W
//! ...
//! ```
//!
//! The leading reserved byte lets a page be transmitted straight out of the
//! buffer: the byte just before the page data is borrowed as the frame tag
//! and put back afterwards (see [`PixelSurface::tag_page`]).

use core::ops::Deref;

use crate::traits::PixelSink;

/// Rows per page
pub const PAGE_HEIGHT: usize = 8;

/// Offset of the first pixel byte in the buffer
pub const DATA_START: usize = 1;

/// Buffer length required for a `width` x `height` surface
pub const fn buffer_len(width: usize, height: usize) -> usize {
    DATA_START + width * (height / PAGE_HEIGHT)
}

/// Errors that can occur when building a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceError {
    /// Zero dimension or height not a multiple of the page height
    InvalidGeometry,
    /// Buffer length does not match the geometry
    BufferSize {
        /// Required length
        expected: usize,
        /// Provided length
        actual: usize,
    },
}

/// Bit-packed monochrome pixel surface
///
/// Generic over its storage so the firmware can keep a fixed array while
/// tests can use whatever is convenient.
#[derive(Debug, Clone)]
pub struct PixelSurface<B> {
    width: usize,
    height: usize,
    buffer: B,
}

/// Compile-time geometry check for array-backed surfaces
struct Geometry<const W: usize, const H: usize, const N: usize>;

impl<const W: usize, const H: usize, const N: usize> Geometry<W, H, N> {
    const VALID: () = assert!(
        W > 0 && H > 0 && H % PAGE_HEIGHT == 0 && N == buffer_len(W, H),
        "surface geometry does not match buffer length"
    );
}

impl<const N: usize> PixelSurface<[u8; N]> {
    /// Create a blank surface backed by an array
    pub fn blank(width: usize, height: usize) -> Result<Self, SurfaceError> {
        Self::new(width, height, [0; N])
    }

    /// Create a blank `W` x `H` surface, geometry checked at compile time
    pub fn zeroed<const W: usize, const H: usize>() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Geometry::<W, H, N>::VALID;
        Self {
            width: W,
            height: H,
            buffer: [0; N],
        }
    }
}

impl<B> PixelSurface<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap `buffer` as a `width` x `height` surface
    ///
    /// The buffer must be exactly [`buffer_len`] bytes long. Its current
    /// contents are kept.
    pub fn new(width: usize, height: usize, buffer: B) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 || height % PAGE_HEIGHT != 0 {
            return Err(SurfaceError::InvalidGeometry);
        }

        let expected = buffer_len(width, height);
        let actual = buffer.as_ref().len();
        if actual != expected {
            return Err(SurfaceError::BufferSize { expected, actual });
        }

        Ok(Self {
            width,
            height,
            buffer,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pages
    pub fn pages(&self) -> usize {
        self.height / PAGE_HEIGHT
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.buffer.as_mut().fill(0x00);
    }

    /// Set or clear a single pixel
    ///
    /// Coordinates outside the surface are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        let Some((pos, mask)) = self.locate(x, y) else {
            return;
        };

        let byte = &mut self.buffer.as_mut()[pos];
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    /// Read a single pixel, `None` outside the surface
    pub fn pixel(&self, x: usize, y: usize) -> Option<bool> {
        self.locate(x, y)
            .map(|(pos, mask)| self.buffer.as_ref()[pos] & mask != 0)
    }

    /// Pixel bytes of one page (one byte per column)
    pub fn page(&self, page: usize) -> Option<&[u8]> {
        if page >= self.pages() {
            return None;
        }
        let start = DATA_START + page * self.width;
        Some(&self.buffer.as_ref()[start..start + self.width])
    }

    /// Whole backing buffer, reserved slot included
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    /// Borrow page `page` as a ready-to-send frame
    ///
    /// The returned span is the `width + 1` bytes starting at `page * width`:
    /// the byte before the page data, then the page data. That first byte is
    /// overwritten with `tag` and restored when the guard is dropped. For
    /// page 0 it is the reserved slot; for later pages it is the last column
    /// of the previous page, so the restore is what keeps that pixel intact.
    pub fn tag_page(&mut self, page: usize, tag: u8) -> Option<TaggedPage<'_>> {
        if page >= self.pages() {
            return None;
        }

        let start = page * self.width;
        let span = &mut self.buffer.as_mut()[start..start + self.width + 1];
        let saved = span[0];
        span[0] = tag;

        Some(TaggedPage { span, saved })
    }

    /// Buffer position and bit mask of a pixel
    fn locate(&self, x: usize, y: usize) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let page = y / PAGE_HEIGHT;
        let bit = y % PAGE_HEIGHT;
        Some((page * self.width + x + DATA_START, 1 << bit))
    }
}

impl<B> PixelSink for PixelSurface<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        PixelSurface::set_pixel(self, x, y, on);
    }
}

/// A page span with its leading byte temporarily replaced by a frame tag
///
/// Dereferences to the full span (tag first). Dropping the guard writes the
/// original byte back.
#[derive(Debug)]
pub struct TaggedPage<'a> {
    span: &'a mut [u8],
    saved: u8,
}

impl Deref for TaggedPage<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.span
    }
}

impl Drop for TaggedPage<'_> {
    fn drop(&mut self) {
        self.span[0] = self.saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WIDTH: usize = 128;
    const HEIGHT: usize = 64;
    const LEN: usize = buffer_len(WIDTH, HEIGHT);

    fn surface() -> PixelSurface<[u8; LEN]> {
        PixelSurface::blank(WIDTH, HEIGHT).unwrap()
    }

    /// Surface filled with a recognizable non-zero pattern
    fn patterned() -> PixelSurface<[u8; LEN]> {
        let mut buffer = [0u8; LEN];
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte = (i as u8).wrapping_mul(37) ^ 0x5A;
        }
        PixelSurface::new(WIDTH, HEIGHT, buffer).unwrap()
    }

    #[test]
    fn test_buffer_len() {
        assert_eq!(buffer_len(128, 64), 1025);
        assert_eq!(buffer_len(8, 8), 9);
    }

    #[test]
    fn test_zeroed_matches_blank() {
        let s = PixelSurface::<[u8; LEN]>::zeroed::<WIDTH, HEIGHT>();
        assert_eq!((s.width(), s.height(), s.pages()), (128, 64, 8));
        assert_eq!(s.as_bytes(), surface().as_bytes());
    }

    #[test]
    fn test_rejects_bad_geometry() {
        assert_eq!(
            PixelSurface::new(0, 8, [0u8; 1]).unwrap_err(),
            SurfaceError::InvalidGeometry
        );
        assert_eq!(
            PixelSurface::new(8, 12, [0u8; 9]).unwrap_err(),
            SurfaceError::InvalidGeometry
        );
        assert_eq!(
            PixelSurface::new(8, 8, [0u8; 8]).unwrap_err(),
            SurfaceError::BufferSize {
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn test_pixel_addressing() {
        let mut s = surface();

        s.set_pixel(0, 0, true);
        assert_eq!(s.as_bytes()[1], 0x01);

        s.set_pixel(5, 7, true);
        assert_eq!(s.as_bytes()[6], 0x80);

        // Page 1, column 3, bit 2
        s.set_pixel(3, 10, true);
        assert_eq!(s.as_bytes()[WIDTH + 3 + 1], 0x04);

        // Last pixel lands on the last byte
        s.set_pixel(127, 63, true);
        assert_eq!(s.as_bytes()[LEN - 1], 0x80);

        // Reserved slot is never touched by pixel writes
        assert_eq!(s.as_bytes()[0], 0x00);
    }

    #[test]
    fn test_pixel_readback() {
        let mut s = surface();
        s.set_pixel(42, 33, true);
        assert_eq!(s.pixel(42, 33), Some(true));
        assert_eq!(s.pixel(42, 34), Some(false));
        assert_eq!(s.pixel(128, 0), None);
        assert_eq!(s.pixel(0, 64), None);
    }

    #[test]
    fn test_clear() {
        let mut s = patterned();
        s.clear();
        assert!(s.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_page_view() {
        let mut s = surface();
        s.set_pixel(0, 8, true);
        s.set_pixel(127, 15, true);

        let page = s.page(1).unwrap();
        assert_eq!(page.len(), WIDTH);
        assert_eq!(page[0], 0x01);
        assert_eq!(page[127], 0x80);
        assert!(s.page(8).is_none());
    }

    #[test]
    fn test_tag_page_restores_overlap_byte() {
        let mut s = surface();
        // Last column of page 0 sits where page 1's tag goes
        s.set_pixel(127, 7, true);
        s.set_pixel(127, 0, true);
        let before = s.as_bytes()[WIDTH];
        assert_eq!(before, 0x81);

        {
            let frame = s.tag_page(1, 0x40).unwrap();
            assert_eq!(frame.len(), WIDTH + 1);
            assert_eq!(frame[0], 0x40);
        }

        assert_eq!(s.as_bytes()[WIDTH], before);
        assert_eq!(s.pixel(127, 7), Some(true));
    }

    #[test]
    fn test_tag_page_zero_uses_reserved_slot() {
        let mut s = patterned();
        let reserved = s.as_bytes()[0];
        let page0: [u8; WIDTH] = s.page(0).unwrap().try_into().unwrap();

        {
            let frame = s.tag_page(0, 0x40).unwrap();
            assert_eq!(frame[0], 0x40);
            assert_eq!(&frame[1..], &page0[..]);
        }

        assert_eq!(s.as_bytes()[0], reserved);
        assert!(s.tag_page(8, 0x40).is_none());
    }

    proptest! {
        #[test]
        fn prop_set_then_clear_restores_byte(x in 0usize..WIDTH, y in 0usize..HEIGHT) {
            let mut s = patterned();
            let pos = (y / PAGE_HEIGHT) * WIDTH + x + DATA_START;
            let original = s.as_bytes()[pos];
            let was_on = s.pixel(x, y).unwrap();

            s.set_pixel(x, y, true);
            s.set_pixel(x, y, true);
            prop_assert_eq!(s.as_bytes()[pos], original | (1 << (y % PAGE_HEIGHT)));

            s.set_pixel(x, y, false);
            s.set_pixel(x, y, was_on);
            prop_assert_eq!(s.as_bytes()[pos], original);
        }

        #[test]
        fn prop_out_of_range_is_noop(
            x in 0usize..1024,
            y in 0usize..1024,
            on in any::<bool>(),
        ) {
            prop_assume!(x >= WIDTH || y >= HEIGHT);
            let mut s = patterned();
            let before = s.as_bytes().to_vec();

            s.set_pixel(x, y, on);

            prop_assert_eq!(s.as_bytes(), &before[..]);
        }
    }
}
