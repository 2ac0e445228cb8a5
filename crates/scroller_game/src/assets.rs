//! Sprite-sheet metadata loading.
//!
//! The simulation never touches pixels. It needs each sheet's dimensions to
//! derive frame size (`sheet / (cols, rows)`), which in turn sizes bodies and
//! hitboxes. `SheetLoader` abstracts where those dimensions come from so the
//! world can boot against real PNGs or against fixed sizes in tests.

use std::path::{Path, PathBuf};

use scroller_core::animation::AnimationSet;

use crate::config::SheetConfig;

pub trait SheetLoader {
    /// Pixel `(width, height)` of the sheet at `source`.
    fn load_dimensions(&self, source: &str) -> Result<(u32, u32), String>;
}

/// Reads sheet headers from disk, resolving sources against `root`.
#[derive(Debug, Clone)]
pub struct ImageSheetLoader {
    root: PathBuf,
}

impl ImageSheetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, source: &str) -> PathBuf {
        let path = Path::new(source);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl SheetLoader for ImageSheetLoader {
    fn load_dimensions(&self, source: &str) -> Result<(u32, u32), String> {
        let path = self.resolve(source);
        image::image_dimensions(&path)
            .map_err(|e| format!("Failed to load sprite sheet '{}': {e}", path.display()))
    }
}

/// Grid geometry of one loaded sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheet {
    pub width: u32,
    pub height: u32,
    pub cols: u32,
    pub rows: u32,
    pub frame_w: u32,
    pub frame_h: u32,
}

impl SpriteSheet {
    pub fn from_dimensions(
        source: &str,
        (width, height): (u32, u32),
        cols: u32,
        rows: u32,
    ) -> Result<Self, String> {
        if cols == 0 || rows == 0 {
            return Err(format!("Sprite sheet '{source}' needs at least one column and row"));
        }
        let frame_w = width / cols;
        let frame_h = height / rows;
        if frame_w == 0 || frame_h == 0 {
            return Err(format!(
                "Sprite sheet '{source}' ({width}x{height}) is too small for a {cols}x{rows} grid"
            ));
        }
        if width % cols != 0 || height % rows != 0 {
            log::warn!(
                "Sprite sheet '{source}' ({width}x{height}) does not divide evenly into {cols}x{rows}; trailing pixels are ignored"
            );
        }
        Ok(Self {
            width,
            height,
            cols,
            rows,
            frame_w,
            frame_h,
        })
    }

    /// Source rectangle `(x, y, w, h)` of cell `(row, frame)` in sheet pixels.
    pub fn frame_rect(&self, row: u32, frame: u32) -> (u32, u32, u32, u32) {
        (
            frame * self.frame_w,
            row * self.frame_h,
            self.frame_w,
            self.frame_h,
        )
    }

    /// Reject clips that point at cells outside the grid.
    pub fn check_clips(&self, set: &AnimationSet) -> Result<(), String> {
        for (name, def) in set.iter() {
            if def.row >= self.rows || def.end_frame >= self.cols {
                return Err(format!(
                    "Animation '{}/{name}' uses row {} frames {}..={} outside the {}x{} sheet grid",
                    set.set_id, def.row, def.start_frame, def.end_frame, self.cols, self.rows
                ));
            }
        }
        Ok(())
    }
}

pub fn load_sheet(loader: &dyn SheetLoader, sheet: &SheetConfig) -> Result<SpriteSheet, String> {
    let dims = loader.load_dimensions(&sheet.source)?;
    let sprite_sheet = SpriteSheet::from_dimensions(&sheet.source, dims, sheet.cols, sheet.rows)?;
    log::info!(
        "Loaded sprite sheet '{}' ({}x{}, {}x{} frames)",
        sheet.source,
        sprite_sheet.width,
        sprite_sheet.height,
        sprite_sheet.frame_w,
        sprite_sheet.frame_h
    );
    Ok(sprite_sheet)
}

/// Fixed dimensions for every source, or a failure for listed sources.
#[cfg(test)]
pub struct StaticSheetLoader {
    pub dimensions: (u32, u32),
    pub missing: Vec<String>,
}

#[cfg(test)]
impl StaticSheetLoader {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: (width, height),
            missing: Vec::new(),
        }
    }
}

#[cfg(test)]
impl SheetLoader for StaticSheetLoader {
    fn load_dimensions(&self, source: &str) -> Result<(u32, u32), String> {
        if self.missing.iter().any(|m| m == source) {
            return Err(format!("Failed to load sprite sheet '{source}': not found"));
        }
        Ok(self.dimensions)
    }
}
