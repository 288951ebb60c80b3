//! Grid to pixel rendering

use crate::life::Grid;
use crate::traits::PixelSink;

/// Copy every cell of `grid` onto `sink`, one cell per pixel
///
/// Live cells turn their pixel on and dead cells turn it off, so the sink
/// does not need clearing between generations. Cells that fall outside the
/// sink are dropped by its bounds check.
pub fn render_grid<const W: usize, const H: usize, S>(grid: &Grid<W, H>, sink: &mut S)
where
    S: PixelSink + ?Sized,
{
    for (y, &row) in grid.rows().iter().enumerate() {
        for x in 0..W {
            sink.set_pixel(x, y, row & (1u128 << x) != 0);
        }
    }
}
