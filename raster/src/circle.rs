//! Circles and quarter arcs, by integer midpoint stepping.
//!
//! One octant is stepped with the midpoint algorithm and mirrored: into all
//! eight octants for a full outline, into a single reflected pair per step
//! for the quarter arcs that rounded-rectangle corners use. Fills emit
//! horizontal spans through the rectangle machinery instead of tracing
//! arcs. Mirror images that coincide (`y == 0` on the axes, `x == y` on
//! the diagonals) are skipped so nothing is shaded twice in one pass.
//!
//! A radius of zero or less draws nothing, in every variant.

use crate::line::span;
use crate::paint::{emit, ColorShader, ColorSource, Paint, Transform};
use crate::Surface;

/// One corner of a circle.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Quadrant {
    TopRight,
    TopLeft,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// Axis signs for reflecting first-octant offsets into this quadrant.
    fn signs(self) -> (i32, i32) {
        match self {
            Quadrant::TopRight => (1, -1),
            Quadrant::TopLeft => (-1, -1),
            Quadrant::BottomLeft => (-1, 1),
            Quadrant::BottomRight => (1, 1),
        }
    }
}

/// Steps the first octant of a radius-`r` circle, handing each `(x, y)`
/// offset pair (x from `r` in toward the diagonal, y from 0 out) to
/// `step`. Radii of zero or less produce no steps.
fn octant(r: i32, mut step: impl FnMut(i32, i32)) {
    if r <= 0 {
        return;
    }
    let mut x = r;
    let mut y = 0;
    let mut err = 0;
    while x >= y {
        step(x, y);
        y += 1;
        err += 1 + 2 * y;
        if 2 * (err - x) + 1 > 0 {
            x -= 1;
            err += 1 - 2 * x;
        }
    }
}

/// Draws the circle outline centered at `(cx, cy)`.
pub fn outline<Su, S, H, T>(surface: &mut Su, paint: &Paint<S, H, T>, cx: i32, cy: i32, r: i32)
where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    let flat = paint.flat(cx, cy);
    octant(r, |x, y| {
        if y == 0 {
            emit(surface, paint, flat, cx + x, cy);
            emit(surface, paint, flat, cx - x, cy);
            emit(surface, paint, flat, cx, cy - x);
            emit(surface, paint, flat, cx, cy + x);
        } else {
            emit(surface, paint, flat, cx + x, cy - y);
            emit(surface, paint, flat, cx - x, cy - y);
            emit(surface, paint, flat, cx - x, cy + y);
            emit(surface, paint, flat, cx + x, cy + y);
            if x != y {
                emit(surface, paint, flat, cx + y, cy - x);
                emit(surface, paint, flat, cx - y, cy - x);
                emit(surface, paint, flat, cx - y, cy + x);
                emit(surface, paint, flat, cx + y, cy + x);
            }
        }
    });
}

/// Fills the circle centered at `(cx, cy)` with horizontal spans: two rows
/// mirrored across the center per octant step, plus the two outer rows
/// swept by the X offset.
pub fn fill<Su, S, H, T>(surface: &mut Su, paint: &Paint<S, H, T>, cx: i32, cy: i32, r: i32)
where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    let flat = paint.flat(cx, cy);
    octant(r, |x, y| {
        span(surface, paint, flat, cx - x, cx + x, cy + y);
        if y != 0 {
            span(surface, paint, flat, cx - x, cx + x, cy - y);
        }
        if x != y {
            span(surface, paint, flat, cx - y, cx + y, cy + x);
            span(surface, paint, flat, cx - y, cx + y, cy - x);
        }
    });
}

/// Draws one quarter of the circle outline: the arc of `quadrant`, for
/// rounded-rectangle corners. The union of all four quarters is exactly
/// the full outline's pixel set.
pub fn quarter<Su, S, H, T>(
    surface: &mut Su,
    paint: &Paint<S, H, T>,
    cx: i32,
    cy: i32,
    r: i32,
    quadrant: Quadrant,
) where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    let (sx, sy) = quadrant.signs();
    let flat = paint.flat(cx, cy);
    octant(r, |x, y| {
        emit(surface, paint, flat, cx + sx * x, cy + sy * y);
        if x != y {
            emit(surface, paint, flat, cx + sx * y, cy + sy * x);
        }
    });
}

/// Fills one quarter disc with spans anchored at the center column.
pub fn quarter_fill<Su, S, H, T>(
    surface: &mut Su,
    paint: &Paint<S, H, T>,
    cx: i32,
    cy: i32,
    r: i32,
    quadrant: Quadrant,
) where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    let (sx, sy) = quadrant.signs();
    let flat = paint.flat(cx, cy);
    octant(r, |x, y| {
        let xa = cx + sx * x;
        let (x0, x1) = if cx <= xa { (cx, xa) } else { (xa, cx) };
        span(surface, paint, flat, x0, x1, cy + sy * y);
        if x != y {
            let xa = cx + sx * y;
            let (x0, x1) = if cx <= xa { (cx, xa) } else { (xa, cx) };
            span(surface, paint, flat, x0, x1, cy + sy * x);
        }
    });
}
