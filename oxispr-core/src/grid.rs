//! Fixed-size RGBA pixel grid.

/// Width and height of every sprite, in pixels.
pub const SPRITE_SIZE: usize = 32;

/// Number of pixels in a sprite.
pub const SPRITE_PIXELS: usize = SPRITE_SIZE * SPRITE_SIZE;

/// One pixel as `[r, g, b, a]`.
pub type Rgba = [u8; 4];

/// Fully transparent pixel; the initial value of every grid cell.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Magenta chroma key written over transparent pixels by the compositor.
pub const KEY_COLOR: Rgba = [255, 0, 255, 255];

/// A 32×32 RGBA raster stored row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pixels: Box<[Rgba; SPRITE_PIXELS]>,
}

impl PixelGrid {
    /// Create a grid with every pixel transparent.
    pub fn new() -> Self {
        Self {
            pixels: Box::new([TRANSPARENT; SPRITE_PIXELS]),
        }
    }

    /// Create a grid with every pixel set to `color`.
    pub fn filled(color: Rgba) -> Self {
        Self {
            pixels: Box::new([color; SPRITE_PIXELS]),
        }
    }

    /// Map a linear pixel index onto `(x, y)`, wrapping in both axes.
    #[inline]
    pub fn coords(index: usize) -> (usize, usize) {
        (index % SPRITE_SIZE, (index / SPRITE_SIZE) % SPRITE_SIZE)
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is not below [`SPRITE_SIZE`].
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * SPRITE_SIZE + x]
    }

    /// Set the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is not below [`SPRITE_SIZE`].
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: Rgba) {
        self.pixels[y * SPRITE_SIZE + x] = color;
    }

    /// Set the pixel at a linear index, wrapping past the last pixel.
    #[inline]
    pub fn set_linear(&mut self, index: usize, color: Rgba) {
        let (x, y) = Self::coords(index);
        self.set(x, y, color);
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels[..]
    }

    /// All pixels in row-major order, mutably.
    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels[..]
    }

    /// Number of pixels with non-zero alpha.
    pub fn opaque_count(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] != 0).count()
    }

    /// Flatten into `r, g, b, a` bytes, row-major.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.as_flattened().to_vec()
    }

    /// Build a grid from `r, g, b, a` bytes, row-major.
    ///
    /// Returns `None` unless `bytes` holds exactly one sprite.
    pub fn from_rgba_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != SPRITE_PIXELS * 4 {
            return None;
        }
        let mut grid = Self::new();
        for (dst, src) in grid.pixels.iter_mut().zip(bytes.chunks_exact(4)) {
            dst.copy_from_slice(src);
        }
        Some(grid)
    }
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PixelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelGrid")
            .field("size", &SPRITE_SIZE)
            .field("opaque", &self.opaque_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent() {
        let grid = PixelGrid::new();
        assert!(grid.pixels().iter().all(|p| *p == TRANSPARENT));
        assert_eq!(grid.opaque_count(), 0);
    }

    #[test]
    fn test_coords_wrap() {
        assert_eq!(PixelGrid::coords(0), (0, 0));
        assert_eq!(PixelGrid::coords(33), (1, 1));
        assert_eq!(PixelGrid::coords(1023), (31, 31));
        assert_eq!(PixelGrid::coords(1024), (0, 0));
        assert_eq!(PixelGrid::coords(1024 + 65), (1, 2));
    }

    #[test]
    fn test_set_linear_wraps_to_row_zero() {
        let mut grid = PixelGrid::new();
        grid.set_linear(1024 + 3, [1, 2, 3, 255]);
        assert_eq!(grid.get(3, 0), [1, 2, 3, 255]);
    }

    #[test]
    fn test_rgba_bytes() {
        let mut grid = PixelGrid::new();
        grid.set(1, 0, [10, 20, 30, 255]);
        let bytes = grid.to_rgba_bytes();
        assert_eq!(bytes.len(), SPRITE_PIXELS * 4);
        assert_eq!(&bytes[4..8], &[10, 20, 30, 255]);

        let back = PixelGrid::from_rgba_bytes(&bytes).unwrap();
        assert_eq!(back, grid);
        assert!(PixelGrid::from_rgba_bytes(&bytes[..10]).is_none());
    }
}
