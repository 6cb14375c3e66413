//! Line drawing: axis-aligned spans and Bresenham diagonals.
//!
//! Horizontal and vertical lines are span fills, which collapse into the
//! surface's raw [`Surface::fill_block`] when the pipeline is constant and
//! untransformed. Diagonals run integer Bresenham along the major axis
//! (X-major when `|dx| >= |dy|`), always iterating from the lower to the
//! higher major coordinate so the same geometric line produces the same
//! pixel set no matter which endpoint was passed first.

use crate::paint::{emit, ColorShader, ColorSource, Paint, Transform};
use crate::Surface;

/// Draws the line from `(x0, y0)` to `(x1, y1)`, endpoints inclusive.
pub fn line<Su, S, H, T>(
    surface: &mut Su,
    paint: &Paint<S, H, T>,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
) where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    if y0 == y1 {
        hline(surface, paint, x0, x1, y0);
    } else if x0 == x1 {
        vline(surface, paint, x0, y0, y1);
    } else {
        diagonal(surface, paint, x0, y0, x1, y1);
    }
}

/// Fills the horizontal run `x0..=x1` at row `y`, in either argument order.
pub fn hline<Su, S, H, T>(surface: &mut Su, paint: &Paint<S, H, T>, x0: i32, x1: i32, y: i32)
where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
    let flat = paint.flat(x0, y);
    span(surface, paint, flat, x0, x1, y);
}

/// Fills the vertical run `y0..=y1` at column `x`, in either argument order.
pub fn vline<Su, S, H, T>(surface: &mut Su, paint: &Paint<S, H, T>, x: i32, y0: i32, y1: i32)
where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
    let flat = paint.flat(x, y0);
    vspan(surface, paint, flat, x, y0, y1);
}

/// Fills `x0..=x1` at `y` with an already-seeded pipeline. Requires
/// `x0 <= x1`; empty and inverted runs draw nothing, which the triangle
/// stage relies on for its exclusive right edge.
pub(crate) fn span<Su, S, H, T>(
    surface: &mut Su,
    paint: &Paint<S, H, T>,
    flat: Option<S::Color>,
    x0: i32,
    x1: i32,
    y: i32,
) where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    if x0 > x1 {
        return;
    }
    if S::CONSTANT && T::IDENTITY {
        if let Some(color) = flat {
            // Bulk fill. The surface won't clip, so clip here.
            if y < 0 || y >= surface.height() {
                return;
            }
            let x0 = x0.max(0);
            let x1 = x1.min(surface.width() - 1);
            if x0 > x1 {
                return;
            }
            surface.fill_block(x0, y, x1, y, color);
            return;
        }
    }
    for x in x0..=x1 {
        emit(surface, paint, flat, x, y);
    }
}

/// Column-wise counterpart of [`span`]. Requires `y0 <= y1`.
pub(crate) fn vspan<Su, S, H, T>(
    surface: &mut Su,
    paint: &Paint<S, H, T>,
    flat: Option<S::Color>,
    x: i32,
    y0: i32,
    y1: i32,
) where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    if y0 > y1 {
        return;
    }
    if S::CONSTANT && T::IDENTITY {
        if let Some(color) = flat {
            if x < 0 || x >= surface.width() {
                return;
            }
            let y0 = y0.max(0);
            let y1 = y1.min(surface.height() - 1);
            if y0 > y1 {
                return;
            }
            surface.fill_block(x, y0, x, y1, color);
            return;
        }
    }
    for y in y0..=y1 {
        emit(surface, paint, flat, x, y);
    }
}

fn diagonal<Su, S, H, T>(
    surface: &mut Su,
    paint: &Paint<S, H, T>,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
) where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    let flat = paint.flat(x0, y0);
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    if dx >= dy {
        // X-major; canonicalize to left-to-right.
        let (x0, y0, x1, y1) = if x0 <= x1 {
            (x0, y0, x1, y1)
        } else {
            (x1, y1, x0, y0)
        };
        let step = if y1 >= y0 { 1 } else { -1 };
        let mut err = 2 * dy - dx;
        let mut y = y0;
        for x in x0..=x1 {
            emit(surface, paint, flat, x, y);
            if err > 0 {
                y += step;
                err -= 2 * dx;
            }
            err += 2 * dy;
        }
    } else {
        // Y-major; canonicalize to top-to-bottom.
        let (x0, y0, x1, y1) = if y0 <= y1 {
            (x0, y0, x1, y1)
        } else {
            (x1, y1, x0, y0)
        };
        let step = if x1 >= x0 { 1 } else { -1 };
        let mut err = 2 * dx - dy;
        let mut x = x0;
        for y in y0..=y1 {
            emit(surface, paint, flat, x, y);
            if err > 0 {
                x += step;
                err -= 2 * dy;
            }
            err += 2 * dx;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{Clip, FromFn, Identity, Offset, Opaque, Solid};
    use crate::test_frame::Frame;
    use core::cell::Cell;

    fn white() -> Paint<Solid<u8>, Opaque, Identity> {
        Paint {
            source: Solid(1),
            shader: Opaque,
            transform: Identity,
        }
    }

    fn check<F: Fn(i32, i32) -> bool>(frame: &Frame, pred: F) {
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                let lit = frame.get(x, y) != 0;
                assert_eq!(lit, pred(x, y), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn horizontal_full() {
        let mut f = Frame::new(10, 10);
        line(&mut f, &white(), 0, 3, 9, 3);
        check(&f, |_, y| y == 3);
    }

    #[test]
    fn vertical_full() {
        let mut f = Frame::new(10, 10);
        line(&mut f, &white(), 4, 0, 4, 9);
        check(&f, |x, _| x == 4);
    }

    #[test]
    fn diagonal_full() {
        let mut f = Frame::new(10, 10);
        line(&mut f, &white(), 0, 0, 9, 9);
        check(&f, |x, y| x == y);
    }

    #[test]
    fn endpoint_order_is_irrelevant() {
        let cases = [
            (0, 0, 7, 3),
            (7, 3, 0, 0),
            (2, 9, 9, 1),
            (9, 1, 2, 9),
            (0, 9, 3, 0),
            (3, 0, 0, 9),
        ];
        let mut sets = Vec::new();
        for &(x0, y0, x1, y1) in &cases {
            let mut f = Frame::new(10, 10);
            line(&mut f, &white(), x0, y0, x1, y1);
            sets.push(f.lit());
        }
        assert_eq!(sets[0], sets[1]);
        assert_eq!(sets[2], sets[3]);
        assert_eq!(sets[4], sets[5]);
    }

    #[test]
    fn spans_accept_either_argument_order() {
        let mut a = Frame::new(8, 8);
        let mut b = Frame::new(8, 8);
        hline(&mut a, &white(), 1, 6, 2);
        hline(&mut b, &white(), 6, 1, 2);
        assert_eq!(a.lit(), b.lit());

        let mut a = Frame::new(8, 8);
        let mut b = Frame::new(8, 8);
        vline(&mut a, &white(), 3, 1, 6);
        vline(&mut b, &white(), 3, 6, 1);
        assert_eq!(a.lit(), b.lit());
    }

    #[test]
    fn spans_clip_to_surface() {
        let mut f = Frame::new(4, 4);
        hline(&mut f, &white(), -10, 10, 1);
        hline(&mut f, &white(), 0, 3, -1);
        hline(&mut f, &white(), 0, 3, 4);
        check(&f, |_, y| y == 1);
    }

    // The four specialization paths must agree on the pixel set. A sampled
    // source returning a fixed color and a transform mapping to itself give
    // the general paths the same inputs as the fast ones.
    #[test]
    fn specializations_agree() {
        let geometries = [(0, 0, 7, 7), (1, 5, 6, 2), (0, 3, 7, 3), (4, 0, 4, 7)];
        for &(x0, y0, x1, y1) in &geometries {
            let fast = {
                let mut f = Frame::new(8, 8);
                line(&mut f, &white(), x0, y0, x1, y1);
                f.lit()
            };
            let shaded = {
                let mut f = Frame::new(8, 8);
                let paint = Paint {
                    source: FromFn(|_, _| 1u8),
                    shader: Opaque,
                    transform: Identity,
                };
                line(&mut f, &paint, x0, y0, x1, y1);
                f.lit()
            };
            let transformed = {
                let mut f = Frame::new(8, 8);
                let paint = Paint {
                    source: Solid(1u8),
                    shader: Opaque,
                    transform: Offset { dx: 0, dy: 0 },
                };
                line(&mut f, &paint, x0, y0, x1, y1);
                f.lit()
            };
            let general = {
                let mut f = Frame::new(8, 8);
                let paint = Paint {
                    source: FromFn(|_, _| 1u8),
                    shader: Opaque,
                    transform: Offset { dx: 0, dy: 0 },
                };
                line(&mut f, &paint, x0, y0, x1, y1);
                f.lit()
            };
            assert_eq!(fast, shaded);
            assert_eq!(fast, transformed);
            assert_eq!(fast, general);
        }
    }

    struct CountingSolid<'a> {
        color: u8,
        samples: &'a Cell<u32>,
    }

    impl<'a> ColorSource for CountingSolid<'a> {
        type Color = u8;
        const CONSTANT: bool = true;

        fn color_at(&self, _: i32, _: i32) -> u8 {
            self.samples.set(self.samples.get() + 1);
            self.color
        }
    }

    #[test]
    fn constant_source_sampled_once_per_primitive() {
        let samples = Cell::new(0);
        let mut f = Frame::new(32, 32);
        let paint = Paint {
            source: CountingSolid {
                color: 1,
                samples: &samples,
            },
            shader: Opaque,
            transform: Offset { dx: 0, dy: 0 },
        };
        line(&mut f, &paint, 0, 0, 31, 13);
        assert_eq!(samples.get(), 1);
    }

    #[test]
    fn clip_transform_limits_line() {
        let mut f = Frame::new(8, 8);
        let paint = Paint {
            source: Solid(1u8),
            shader: Opaque,
            transform: Clip {
                x0: 2,
                y0: 0,
                x1: 5,
                y1: 7,
            },
        };
        hline(&mut f, &paint, 0, 7, 4);
        check(&f, |x, y| y == 4 && (2..=5).contains(&x));
    }
}
