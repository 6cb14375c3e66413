//! Filled triangles via scanline interpolation.
//!
//! Vertices are sorted by ascending Y (stable, so vertices sharing a
//! scanline keep their argument order) and the triangle is split at the
//! middle vertex. Each half steps a pair of 8-bit fixed-point edge
//! interpolants one scanline at a time: the "long" edge, from the top
//! vertex to the bottom one, runs the full height, while the short side
//! re-anchors at the middle vertex. Whether the long edge forms the left
//! or the right boundary is decided once, by where the middle vertex falls
//! relative to it.
//!
//! The right-hand interpolant tracks one pixel past the true edge, and
//! rows are emitted as `round(left) ..= round(right) - 1`. Two triangles
//! that share an edge therefore tile: the shared column goes to whichever
//! side rounds onto it, and a rectangle split along its diagonal fills
//! exactly the same pixels as a single rectangle fill.

use crate::fixed;
use crate::line::span;
use crate::paint::{ColorShader, ColorSource, Paint, Transform};
use crate::Surface;

/// One interpolated triangle edge: current X position and per-scanline
/// step, both in 8-bit fixed point.
#[derive(Copy, Clone)]
struct Edge {
    x: i32,
    dx: i32,
}

impl Edge {
    /// The edge from `(x0, y0)` to `(x1, y1)`. Horizontal edges step
    /// nowhere.
    fn between(x0: i32, y0: i32, x1: i32, y1: i32) -> Edge {
        let dy = y1 - y0;
        Edge {
            x: fixed::from_int(x0),
            dx: if dy == 0 {
                0
            } else {
                fixed::per_scanline(x1 - x0, dy)
            },
        }
    }

    /// The same edge displaced one pixel rightward: the exclusive bound
    /// used for right-hand interpolants.
    fn past(self) -> Edge {
        Edge {
            x: self.x + fixed::ONE,
            dx: self.dx,
        }
    }

    fn step(&mut self) {
        self.x += self.dx;
    }

    fn col(&self) -> i32 {
        fixed::round(self.x)
    }
}

/// Fills the triangle `a`, `b`, `c`. A triangle whose vertices all share
/// one scanline degenerates to the inclusive span between its X extremes.
pub fn fill<Su, S, H, T>(
    surface: &mut Su,
    paint: &Paint<S, H, T>,
    mut a: (i32, i32),
    mut b: (i32, i32),
    mut c: (i32, i32),
) where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    // Sort by ascending Y. Strict compares keep the sort stable.
    if a.1 > b.1 {
        core::mem::swap(&mut a, &mut b);
    }
    if b.1 > c.1 {
        core::mem::swap(&mut b, &mut c);
    }
    if a.1 > b.1 {
        core::mem::swap(&mut a, &mut b);
    }

    let flat = paint.flat(a.0, a.1);

    if a.1 == c.1 {
        let x0 = a.0.min(b.0).min(c.0);
        let x1 = a.0.max(b.0).max(c.0);
        span(surface, paint, flat, x0, x1, a.1);
        return;
    }

    let long = Edge::between(a.0, a.1, c.0, c.1);
    let long_at_mid = long.x + long.dx * (b.1 - a.1);
    let long_is_left = fixed::from_int(b.0) > long_at_mid;
    let mut long = if long_is_left { long } else { long.past() };

    // Top half: from the top vertex up to, not including, the middle
    // vertex's scanline (which the bottom half owns).
    let top = Edge::between(a.0, a.1, b.0, b.1);
    let mut short = if long_is_left { top.past() } else { top };
    for y in a.1..b.1 {
        emit_row(surface, paint, flat, &long, &short, long_is_left, y);
        long.step();
        short.step();
    }

    // Bottom half. The long interpolant keeps stepping across the split so
    // that boundary stays kink-free; the short side re-anchors.
    let bottom = Edge::between(b.0, b.1, c.0, c.1);
    let mut short = if long_is_left { bottom.past() } else { bottom };
    for y in b.1..=c.1 {
        emit_row(surface, paint, flat, &long, &short, long_is_left, y);
        long.step();
        short.step();
    }
}

#[inline]
fn emit_row<Su, S, H, T>(
    surface: &mut Su,
    paint: &Paint<S, H, T>,
    flat: Option<S::Color>,
    long: &Edge,
    short: &Edge,
    long_is_left: bool,
    y: i32,
) where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    let (l, r) = if long_is_left {
        (long, short)
    } else {
        (short, long)
    };
    span(surface, paint, flat, l.col(), r.col() - 1, y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{Identity, Opaque, Solid};
    use crate::rect;
    use crate::test_frame::Frame;

    fn white() -> Paint<Solid<u8>, Opaque, Identity> {
        Paint {
            source: Solid(1),
            shader: Opaque,
            transform: Identity,
        }
    }

    /// Two triangles sharing a rectangle's diagonal must fill exactly the
    /// pixels of the rectangle fill — no gaps, nothing outside.
    fn check_rect_tiling(w: i32, h: i32) {
        let mut tris = Frame::new(w, h);
        fill(&mut tris, &white(), (0, 0), (w - 1, 0), (0, h - 1));
        fill(&mut tris, &white(), (w - 1, 0), (w - 1, h - 1), (0, h - 1));

        let mut rect = Frame::new(w, h);
        rect::fill(&mut rect, &white(), 0, 0, w - 1, h - 1);

        assert_eq!(tris.lit(), rect.lit(), "{}x{} tiling", w, h);
    }

    #[test]
    fn two_triangles_tile_a_rectangle() {
        // Includes the square case, where the diagonal crosses pixel
        // columns exactly.
        check_rect_tiling(8, 6);
        check_rect_tiling(4, 4);
        check_rect_tiling(7, 5);
        check_rect_tiling(16, 9);
    }

    #[test]
    fn degenerate_flat_triangle_is_one_span() {
        let mut f = Frame::new(16, 4);
        fill(&mut f, &white(), (0, 0), (10, 0), (5, 0));
        assert_eq!(f.lit(), (0..=10).map(|x| (x, 0)).collect::<Vec<_>>());
    }

    #[test]
    fn single_point_triangle() {
        let mut f = Frame::new(8, 8);
        fill(&mut f, &white(), (3, 3), (3, 3), (3, 3));
        assert_eq!(f.lit(), vec![(3, 3)]);
    }

    #[test]
    fn flat_top_and_flat_bottom_cover_their_rows() {
        // Flat top: full top edge, apex at the bottom.
        let mut f = Frame::new(8, 8);
        fill(&mut f, &white(), (0, 0), (6, 0), (3, 4));
        let lit = f.lit();
        assert_eq!(
            lit.iter().filter(|&&(_, y)| y == 0).count(),
            7,
            "top edge spans all columns"
        );
        assert!(lit.contains(&(3, 4)), "apex present");
        assert!(lit.iter().all(|&(_, y)| (0..=4).contains(&y)));

        // Flat bottom: apex on top.
        let mut f = Frame::new(8, 8);
        fill(&mut f, &white(), (3, 0), (0, 4), (6, 4));
        let lit = f.lit();
        assert_eq!(
            lit.iter().filter(|&&(_, y)| y == 4).count(),
            7,
            "bottom edge spans all columns"
        );
        assert!(lit.contains(&(3, 0)), "apex present");
    }

    #[test]
    fn vertex_order_does_not_change_the_fill() {
        let v = [(1, 1), (12, 4), (5, 10)];
        let orders = [[0, 1, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        let mut sets = Vec::new();
        for order in &orders {
            let mut f = Frame::new(16, 12);
            fill(&mut f, &white(), v[order[0]], v[order[1]], v[order[2]]);
            sets.push(f.lit());
        }
        for s in &sets[1..] {
            assert_eq!(&sets[0], s);
        }
    }

    #[test]
    fn off_surface_vertices_clip() {
        let mut f = Frame::new(8, 8);
        fill(&mut f, &white(), (-4, -2), (12, 3), (2, 11));
        // Must not panic, and must light something inside.
        assert!(!f.lit().is_empty());
    }
}
