//! PNG export and import of sprites.

use image::{ImageFormat, RgbaImage};
use oxispr_core::{Compositor, Exporter, PixelGrid, SPRITE_SIZE, SprError};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes each sprite as `<id>.png` into one directory.
#[derive(Debug, Clone)]
pub struct PngExporter {
    dir: PathBuf,
}

impl PngExporter {
    /// Exporter writing into `dir`, creating it if it does not exist.
    pub fn create(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path a sprite with `id` is written to.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.png"))
    }
}

impl Exporter for PngExporter {
    fn export(&self, id: &str, grid: &PixelGrid) -> oxispr_core::Result<()> {
        let size = SPRITE_SIZE as u32;
        let img = RgbaImage::from_raw(size, size, grid.to_rgba_bytes())
            .ok_or_else(|| SprError::export(id, "pixel buffer does not match sprite size"))?;
        img.save_with_format(self.path_for(id), ImageFormat::Png)
            .map_err(|e| SprError::export(id, e.to_string()))
    }
}

/// Load a 32x32 image and turn key-colored pixels back into transparency.
pub fn load_sprite(path: &Path, compositor: &Compositor) -> oxispr_core::Result<PixelGrid> {
    let name = path.display().to_string();
    let img = image::open(path)
        .map_err(|e| SprError::invalid_image(format!("{name}: {e}")))?
        .to_rgba8();

    if img.width() as usize != SPRITE_SIZE || img.height() as usize != SPRITE_SIZE {
        return Err(SprError::invalid_image(format!(
            "{name}: expected {SPRITE_SIZE}x{SPRITE_SIZE}, found {}x{}",
            img.width(),
            img.height()
        )));
    }

    let mut grid = PixelGrid::from_rgba_bytes(img.as_raw())
        .ok_or_else(|| SprError::invalid_image(format!("{name}: unexpected pixel layout")))?;
    compositor.strip(&mut grid);
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxispr_core::{KEY_COLOR, composite};

    #[test]
    fn test_export_creates_png() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PngExporter::create(dir.path().join("nested/output")).unwrap();

        let mut grid = PixelGrid::new();
        grid.set(0, 0, [255, 0, 0, 255]);
        let grid = composite(&grid);
        exporter.export("42", &grid).unwrap();

        let path = exporter.path_for("42");
        assert!(path.ends_with("42.png"));
        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (32, 32));
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(31, 31).0, KEY_COLOR);
    }

    #[test]
    fn test_load_sprite_strips_key() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PngExporter::create(dir.path()).unwrap();

        let mut grid = PixelGrid::new();
        grid.set(5, 6, [1, 2, 3, 255]);
        exporter.export("1", &composite(&grid)).unwrap();

        let loaded = load_sprite(&exporter.path_for("1"), &Compositor::default()).unwrap();
        assert_eq!(loaded, grid);
    }

    #[test]
    fn test_load_sprite_rejects_wrong_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        RgbaImage::new(64, 32).save(&path).unwrap();

        let err = load_sprite(&path, &Compositor::default()).unwrap_err();
        assert!(err.to_string().contains("expected 32x32"));
    }

    #[test]
    fn test_export_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PngExporter::create(dir.path()).unwrap();
        fs::remove_dir_all(dir.path()).unwrap();

        let err = exporter.export("7", &PixelGrid::new()).unwrap_err();
        assert!(err.is_export());
    }
}
