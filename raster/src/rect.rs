//! Axis-aligned rectangles.
//!
//! A filled rectangle is a stack of row spans between the two Y extremes.
//! When the pipeline is constant and untransformed the whole stack is one
//! raw [`Surface::fill_block`] call instead of per-row iteration.

use crate::line::{span, vspan};
use crate::paint::{ColorShader, ColorSource, Paint, Transform};
use crate::Surface;

/// Fills the rectangle with opposite corners `(x0, y0)` and `(x1, y1)`,
/// inclusive, in any corner order.
pub fn fill<Su, S, H, T>(
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
    let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
    let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
    let flat = paint.flat(x0, y0);
    if S::CONSTANT && T::IDENTITY {
        if let Some(color) = flat {
            let x0 = x0.max(0);
            let y0 = y0.max(0);
            let x1 = x1.min(surface.width() - 1);
            let y1 = y1.min(surface.height() - 1);
            if x0 > x1 || y0 > y1 {
                return;
            }
            surface.fill_block(x0, y0, x1, y1, color);
            return;
        }
    }
    for y in y0..=y1 {
        span(surface, paint, flat, x0, x1, y);
    }
}

/// Draws the rectangle outline. Corner pixels are emitted exactly once, so
/// blend-style shading stays uniform around the border.
pub fn outline<Su, S, H, T>(
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
    let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
    let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
    let flat = paint.flat(x0, y0);
    span(surface, paint, flat, x0, x1, y0);
    if y1 > y0 {
        span(surface, paint, flat, x0, x1, y1);
        vspan(surface, paint, flat, x0, y0 + 1, y1 - 1);
        if x1 > x0 {
            vspan(surface, paint, flat, x1, y0 + 1, y1 - 1);
        }
    }
}
