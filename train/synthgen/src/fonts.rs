use std::{
    fs::read_dir,
    path::{Path, PathBuf},
};

use ab_glyph::{Font, FontArc};
use once_cell::sync::OnceCell;
use rand::{Rng, rngs::SmallRng};
use tracing::{info, warn};

static FONT_CACHE: OnceCell<FontCache> = OnceCell::new();

/// Glyphs every usable font must have for the captions we draw.
const REQUIRED_GLYPHS: &str = "AaBbIiLlMmTt0123456789.";

pub struct FontCache {
    fonts: Vec<FontArc>,
}

impl FontCache {
    fn new(dir: &Path) -> Self {
        let fonts = Self::load_fonts(dir);
        if fonts.is_empty() {
            warn!(dir = %dir.display(), "no usable fonts found, captions will not be drawn");
        } else {
            info!(count = fonts.len(), dir = %dir.display(), "fonts loaded");
        }
        FontCache { fonts }
    }

    fn load_fonts(dir: &Path) -> Vec<FontArc> {
        let mut paths: Vec<PathBuf> = read_dir(dir)
            .ok()
            .into_iter()
            .flat_map(|rd| rd.filter_map(|e| e.ok()))
            .map(|e| e.path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|s| s.to_str()),
                    Some("ttf") | Some("otf")
                )
            })
            .collect();
        // directory order is not stable across filesystems
        paths.sort();

        paths
            .iter()
            .filter_map(|path| {
                std::fs::read(path)
                    .ok()
                    .and_then(|bytes| FontArc::try_from_vec(bytes).ok())
                    .filter(|f| REQUIRED_GLYPHS.chars().all(|ch| f.glyph_id(ch).0 != 0))
            })
            .collect()
    }

    pub fn get_random<'a>(&'a self, rng: &mut SmallRng) -> Option<&'a FontArc> {
        if self.fonts.is_empty() {
            return None;
        }
        Some(&self.fonts[rng.random_range(0..self.fonts.len())])
    }

    /// Process-wide cache, filled from `dir` on first use.
    pub fn global(dir: &Path) -> &'static FontCache {
        FONT_CACHE.get_or_init(|| FontCache::new(dir))
    }
}
