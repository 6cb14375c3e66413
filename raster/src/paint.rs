//! The per-pixel color pipeline, and the pixel stage built on it.
//!
//! Every primitive runs each candidate pixel through three stages: a
//! [`ColorSource`] answers "what color lives at (x, y)", a [`ColorShader`]
//! transforms that color, and a [`Transform`] decides whether the pixel is
//! visible at all and where it lands. Sources sample at the logical
//! (pre-transform) coordinate, so patterns stay anchored to the shape when a
//! transform moves it.
//!
//! The `CONSTANT` and `IDENTITY` flags are associated consts, so
//! monomorphization deletes the branches on them: a constant source is
//! sampled once per primitive instead of once per pixel, and an identity
//! transform costs nothing per pixel.

use crate::Surface;

/// Produces the pre-shading color for a pixel.
pub trait ColorSource {
    type Color: Copy;

    /// True when `color_at` ignores its arguments. Constant sources are
    /// sampled exactly once per primitive draw.
    const CONSTANT: bool;

    fn color_at(&self, x: i32, y: i32) -> Self::Color;
}

/// Transforms a sourced (or resident) color into the final color.
pub trait ColorShader<C> {
    fn shade(&self, color: C) -> C;
}

/// Decides pixel visibility and final position.
pub trait Transform {
    /// True when `map` is the identity and never rejects, letting the
    /// stages skip the per-pixel check entirely.
    const IDENTITY: bool;

    /// Returns the on-surface position for logical `(x, y)`, or `None` to
    /// drop the pixel.
    fn map(&self, x: i32, y: i32) -> Option<(i32, i32)>;
}

/// A complete pipeline: source, shader, and transform for one draw.
pub struct Paint<S, H, T> {
    pub source: S,
    pub shader: H,
    pub transform: T,
}

impl<S, H, T> Paint<S, H, T>
where
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    /// Sources and shades the color for logical `(x, y)`.
    #[inline]
    pub fn color_at(&self, x: i32, y: i32) -> S::Color {
        self.shader.shade(self.source.color_at(x, y))
    }

    /// Samples the pipeline once if the source is constant. Primitives call
    /// this at their anchor and hand the result to every pixel they emit.
    #[inline]
    pub(crate) fn flat(&self, x: i32, y: i32) -> Option<S::Color> {
        if S::CONSTANT {
            Some(self.color_at(x, y))
        } else {
            None
        }
    }

    /// Applies the transform, folding the identity case away.
    #[inline]
    pub(crate) fn place(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        if T::IDENTITY {
            Some((x, y))
        } else {
            self.transform.map(x, y)
        }
    }
}

/// Emits a single pixel through the pipeline.
///
/// `flat` short-circuits sourcing for constant pipelines ([`Paint::flat`]
/// produces it). Pixels the transform rejects, or that land off the
/// surface, are dropped.
#[inline]
pub(crate) fn emit<Su, S, H, T>(
    surface: &mut Su,
    paint: &Paint<S, H, T>,
    flat: Option<S::Color>,
    x: i32,
    y: i32,
) where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    let (tx, ty) = match paint.place(x, y) {
        Some(p) => p,
        None => return,
    };
    if !surface.in_bounds(tx, ty) {
        return;
    }
    let color = match flat {
        Some(c) => c,
        None => paint.color_at(x, y),
    };
    surface.put(tx, ty, color);
}

/// Draws one pixel.
pub fn pixel<Su, S, H, T>(surface: &mut Su, paint: &Paint<S, H, T>, x: i32, y: i32)
where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    let flat = paint.flat(x, y);
    emit(surface, paint, flat, x, y);
}

/// Re-shades the pixel already on the surface: reads it back, runs it
/// through the shader, and writes the result. The source is not consulted.
pub fn pixel_blend<Su, S, H, T>(surface: &mut Su, paint: &Paint<S, H, T>, x: i32, y: i32)
where
    Su: Surface<Color = S::Color>,
    S: ColorSource,
    H: ColorShader<S::Color>,
    T: Transform,
{
    let (tx, ty) = match paint.place(x, y) {
        Some(p) => p,
        None => return,
    };
    if !surface.in_bounds(tx, ty) {
        return;
    }
    let resident = surface.get(tx, ty);
    surface.put(tx, ty, paint.shader.shade(resident));
}

/// The constant color source.
pub struct Solid<C>(pub C);

impl<C: Copy> ColorSource for Solid<C> {
    type Color = C;
    const CONSTANT: bool = true;

    #[inline]
    fn color_at(&self, _: i32, _: i32) -> C {
        self.0
    }
}

/// A sampled source backed by a function of position.
pub struct FromFn<F>(pub F);

impl<C: Copy, F: Fn(i32, i32) -> C> ColorSource for FromFn<F> {
    type Color = C;
    const CONSTANT: bool = false;

    #[inline]
    fn color_at(&self, x: i32, y: i32) -> C {
        (self.0)(x, y)
    }
}

/// The do-nothing shader.
pub struct Opaque;

impl<C> ColorShader<C> for Opaque {
    #[inline]
    fn shade(&self, color: C) -> C {
        color
    }
}

/// A shader backed by a color-mapping function.
pub struct Map<F>(pub F);

impl<C, F: Fn(C) -> C> ColorShader<C> for Map<F> {
    #[inline]
    fn shade(&self, color: C) -> C {
        (self.0)(color)
    }
}

/// The no-op transform.
pub struct Identity;

impl Transform for Identity {
    const IDENTITY: bool = true;

    #[inline]
    fn map(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        Some((x, y))
    }
}

/// Shifts pixels by a fixed offset.
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Transform for Offset {
    const IDENTITY: bool = false;

    #[inline]
    fn map(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        Some((x + self.dx, y + self.dy))
    }
}

/// Rejects pixels outside an inclusive window, without moving them.
pub struct Clip {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Transform for Clip {
    const IDENTITY: bool = false;

    #[inline]
    fn map(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        if x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1 {
            Some((x, y))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_frame::Frame;

    fn white() -> Paint<Solid<u8>, Opaque, Identity> {
        Paint {
            source: Solid(1),
            shader: Opaque,
            transform: Identity,
        }
    }

    #[test]
    fn pixel_lands_where_asked() {
        let mut f = Frame::new(4, 4);
        pixel(&mut f, &white(), 2, 1);
        assert_eq!(f.lit(), vec![(2, 1)]);
    }

    #[test]
    fn out_of_bounds_pixel_is_dropped() {
        let mut f = Frame::new(4, 4);
        pixel(&mut f, &white(), -1, 0);
        pixel(&mut f, &white(), 4, 0);
        pixel(&mut f, &white(), 0, 4);
        assert_eq!(f.lit(), vec![]);
    }

    #[test]
    fn offset_moves_clip_rejects() {
        let mut f = Frame::new(4, 4);
        let paint = Paint {
            source: Solid(1),
            shader: Opaque,
            transform: Offset { dx: 1, dy: 1 },
        };
        pixel(&mut f, &paint, 0, 0);
        assert_eq!(f.lit(), vec![(1, 1)]);

        let mut f = Frame::new(4, 4);
        let paint = Paint {
            source: Solid(1),
            shader: Opaque,
            transform: Clip {
                x0: 0,
                y0: 0,
                x1: 1,
                y1: 1,
            },
        };
        pixel(&mut f, &paint, 0, 0);
        pixel(&mut f, &paint, 2, 2);
        assert_eq!(f.lit(), vec![(0, 0)]);
    }

    #[test]
    fn shader_applies_to_sourced_color() {
        let mut f = Frame::new(2, 2);
        let paint = Paint {
            source: Solid(3u8),
            shader: Map(|c: u8| c * 2),
            transform: Identity,
        };
        pixel(&mut f, &paint, 0, 0);
        assert_eq!(f.get(0, 0), 6);
    }

    #[test]
    fn blend_reshades_resident_pixel() {
        let mut f = Frame::new(2, 2);
        f.put(1, 1, 7);
        let paint = Paint {
            source: Solid(0u8),
            shader: Map(|c: u8| c + 1),
            transform: Identity,
        };
        pixel_blend(&mut f, &paint, 1, 1);
        assert_eq!(f.get(1, 1), 8);
        // Untouched pixels keep their value.
        assert_eq!(f.get(0, 0), 0);
    }

    #[test]
    fn sampled_source_sees_logical_coordinates() {
        let mut f = Frame::new(4, 4);
        let paint = Paint {
            source: FromFn(|x: i32, y: i32| (10 * x + y) as u8),
            shader: Opaque,
            transform: Offset { dx: 1, dy: 0 },
        };
        pixel(&mut f, &paint, 2, 3);
        // Sampled at the logical (2, 3), written at the transformed (3, 3).
        assert_eq!(f.get(3, 3), 23);
    }
}
