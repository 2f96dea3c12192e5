//! Transparency key compositing.
//!
//! Downstream consumers of exported sprites have no alpha channel to rely
//! on, so every fully transparent pixel is replaced by a key color. Any
//! pixel with non-zero alpha passes through unchanged.

use crate::grid::{KEY_COLOR, PixelGrid, Rgba, TRANSPARENT};

/// Replaces zero-alpha pixels with a fixed key color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compositor {
    key: Rgba,
}

impl Compositor {
    /// Compositor using `key` as the substitute color.
    ///
    /// The key is always fully opaque: its alpha is forced to 255 so a
    /// composited grid never holds a zero-alpha pixel.
    pub fn new(key: Rgba) -> Self {
        let [r, g, b, _] = key;
        Self {
            key: [r, g, b, 255],
        }
    }

    /// Key color written over transparent pixels.
    pub fn key(&self) -> Rgba {
        self.key
    }

    /// Rewrite transparent pixels of `grid` in place.
    pub fn apply(&self, grid: &mut PixelGrid) {
        for pixel in grid.pixels_mut() {
            if pixel[3] == 0 {
                *pixel = self.key;
            }
        }
    }

    /// Undo compositing: turn every key-colored pixel transparent.
    pub fn strip(&self, grid: &mut PixelGrid) {
        for pixel in grid.pixels_mut() {
            if *pixel == self.key {
                *pixel = TRANSPARENT;
            }
        }
    }

    /// Return a composited copy of `grid`.
    pub fn composite(&self, grid: &PixelGrid) -> PixelGrid {
        let mut out = grid.clone();
        self.apply(&mut out);
        out
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(KEY_COLOR)
    }
}

/// Composite `grid` with the magenta key.
pub fn composite(grid: &PixelGrid) -> PixelGrid {
    Compositor::default().composite(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SPRITE_PIXELS;

    #[test]
    fn test_transparent_becomes_key() {
        let mut grid = PixelGrid::new();
        grid.set(0, 0, [255, 0, 0, 255]);
        let out = composite(&grid);
        assert_eq!(out.get(0, 0), [255, 0, 0, 255]);
        assert_eq!(out.get(1, 0), KEY_COLOR);
        assert_eq!(
            out.pixels().iter().filter(|p| **p == KEY_COLOR).count(),
            SPRITE_PIXELS - 1
        );
        assert!(out.pixels().iter().all(|p| p[3] != 0));
    }

    #[test]
    fn test_nonzero_alpha_untouched() {
        let mut grid = PixelGrid::new();
        grid.set(5, 5, [0, 0, 0, 1]);
        let out = composite(&grid);
        assert_eq!(out.get(5, 5), [0, 0, 0, 1]);
    }

    #[test]
    fn test_idempotent() {
        let mut grid = PixelGrid::new();
        grid.set(3, 7, [12, 34, 56, 255]);
        let once = composite(&grid);
        let twice = composite(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strip_reverses_apply() {
        let compositor = Compositor::default();
        let mut grid = PixelGrid::new();
        grid.set(9, 9, [1, 2, 3, 255]);
        let mut keyed = compositor.composite(&grid);
        compositor.strip(&mut keyed);
        assert_eq!(keyed, grid);
    }

    #[test]
    fn test_custom_key() {
        let compositor = Compositor::new([0, 255, 0, 255]);
        let mut grid = PixelGrid::new();
        compositor.apply(&mut grid);
        assert_eq!(grid, PixelGrid::filled([0, 255, 0, 255]));
        assert_eq!(compositor.key(), [0, 255, 0, 255]);
    }

    #[test]
    fn test_key_forced_opaque() {
        let compositor = Compositor::new([10, 20, 30, 0]);
        assert_eq!(compositor.key(), [10, 20, 30, 255]);

        let out = compositor.composite(&PixelGrid::new());
        assert!(out.pixels().iter().all(|p| p[3] == 255));
    }
}
