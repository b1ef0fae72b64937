//! Software RGBA surfaces
//!
//! Frame buffers, sprite sheets and individual tiles are all `Surface`s.
//! Drawing is a clipped blit with alpha blending.

use bytemuck::{Pod, Zeroable};

/// One 8-bit RGBA pixel
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Composite `self` over `dst` (straight alpha)
    #[inline]
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            0 => dst,
            255 => self,
            a => {
                let a = a as u32;
                let inv = 255 - a;
                let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
                Rgba {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: (a + (dst.a as u32 * inv + 127) / 255) as u8,
                }
            }
        }
    }
}

/// An owned rectangle of pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: i32,
    height: i32,
    pixels: Vec<Rgba>,
}

impl Surface {
    /// A fully transparent surface. Negative sizes become empty.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: i32, height: i32, color: Rgba) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    /// Wrap decoded RGBA8 bytes, e.g. a sprite sheet from the host's loader.
    /// Returns `None` when the byte count doesn't match the size.
    pub fn from_rgba8(width: i32, height: i32, bytes: &[u8]) -> Option<Self> {
        if width < 0 || height < 0 || bytes.len() != (width * height * 4) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: bytemuck::cast_slice(bytes).to_vec(),
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA8 bytes, row-major, for presenting
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Overwrite every pixel
    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Blend a solid rectangle, clipped to the surface
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width);
        let y1 = (y + h).min(self.height);
        for py in y0..y1 {
            let row = (py * self.width) as usize;
            for px in x0..x1 {
                let i = row + px as usize;
                self.pixels[i] = color.over(self.pixels[i]);
            }
        }
    }

    /// Blit all of `src` with its top-left at `(x, y)`
    pub fn draw(&mut self, src: &Surface, x: i32, y: i32) {
        self.draw_region(src, 0, 0, src.width, src.height, x, y);
    }

    /// Blit the `w` x `h` region of `src` starting at `(sx, sy)` to `(dx, dy)`.
    ///
    /// Both the source region and the destination are clipped; transparent
    /// source pixels leave the destination untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_region(&mut self, src: &Surface, sx: i32, sy: i32, w: i32, h: i32, dx: i32, dy: i32) {
        // Clip source rect to the source surface
        let (mut sx, mut sy, mut dx, mut dy, mut w, mut h) = (sx, sy, dx, dy, w, h);
        if sx < 0 {
            w += sx;
            dx -= sx;
            sx = 0;
        }
        if sy < 0 {
            h += sy;
            dy -= sy;
            sy = 0;
        }
        w = w.min(src.width - sx);
        h = h.min(src.height - sy);

        // ... then to the destination
        if dx < 0 {
            w += dx;
            sx -= dx;
            dx = 0;
        }
        if dy < 0 {
            h += dy;
            sy -= dy;
            dy = 0;
        }
        w = w.min(self.width - dx);
        h = h.min(self.height - dy);
        if w <= 0 || h <= 0 {
            return;
        }

        for row in 0..h {
            let s = ((sy + row) * src.width + sx) as usize;
            let d = ((dy + row) * self.width + dx) as usize;
            let src_row = &src.pixels[s..s + w as usize];
            let dst_row = &mut self.pixels[d..d + w as usize];
            for (dst, &px) in dst_row.iter_mut().zip(src_row) {
                *dst = px.over(*dst);
            }
        }
    }

    /// Copy a region into a new surface; parts outside stay transparent
    pub fn sub_surface(&self, x: i32, y: i32, w: i32, h: i32) -> Surface {
        let mut out = Surface::new(w, h);
        out.draw_region(self, x, y, w, h, 0, 0);
        out
    }
}
