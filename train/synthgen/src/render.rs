use image::{Rgba, RgbaImage};
use imageproc::rect::Rect;
use layout::{CanvasBounds, ClassCatalog, ElementSpec, LayoutError, PlacedRect, Renderer};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

use crate::{
    config::GenCfg,
    controls::{ControlKind, Look, draw_control},
    fonts::FontCache,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no appearance rolled for {0}; elements() must run before apply_layout()")]
    MissingLook(String),
}

struct Slot {
    name: &'static str,
    kind: ControlKind,
    look: Option<Look>,
}

/// Software renderer drawing every catalog control onto an RGBA canvas.
///
/// `elements` rolls a fresh look (size, colors, font size) for each control;
/// `apply_layout` draws the controls with those looks at the placed positions.
pub struct ControlRenderer {
    width: u32,
    height: u32,
    slots: Vec<Slot>,
    fonts: &'static FontCache,
    rng: SmallRng,
}

impl ControlRenderer {
    /// Fails when a catalog name has no drawable control kind.
    pub fn new(catalog: &ClassCatalog, cfg: &GenCfg, seed: u64) -> Result<Self, LayoutError> {
        let slots = catalog
            .entries()
            .iter()
            .map(|e| {
                ControlKind::from_name(e.name)
                    .map(|kind| Slot {
                        name: e.name,
                        kind,
                        look: None,
                    })
                    .ok_or_else(|| LayoutError::UnknownClass(e.name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            width: cfg.canvas_width,
            height: cfg.canvas_height,
            slots,
            fonts: FontCache::global(&cfg.font_dir),
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    fn canvas_color(&mut self) -> Rgba<u8> {
        // light backgrounds, like a desktop window
        let mut c = || self.rng.random_range(200..=255);
        Rgba([c(), c(), c(), 255])
    }
}

impl Renderer for ControlRenderer {
    type Raster = RgbaImage;
    type Error = RenderError;

    fn canvas_bounds(&mut self) -> CanvasBounds {
        CanvasBounds::new(self.width as f64, self.height as f64)
    }

    fn elements(&mut self) -> Vec<ElementSpec> {
        let rng = &mut self.rng;
        self.slots
            .iter_mut()
            .map(|slot| {
                let look = Look::random(rng);
                slot.look = Some(look);
                ElementSpec::new(slot.name, look.width as f64, look.height as f64)
            })
            .collect()
    }

    fn apply_layout(&mut self, placed: &[PlacedRect]) -> Result<RgbaImage, RenderError> {
        let background = self.canvas_color();
        let mut img = RgbaImage::from_pixel(self.width, self.height, background);

        for p in placed {
            let slot = self
                .slots
                .iter()
                .find(|s| s.name == p.name)
                .ok_or_else(|| RenderError::MissingLook(p.name.clone()))?;
            let look = slot
                .look
                .as_ref()
                .ok_or_else(|| RenderError::MissingLook(p.name.clone()))?;

            let area = Rect::at(p.rect.x.round() as i32, p.rect.y.round() as i32)
                .of_size(look.width.max(1), look.height.max(1));
            let font = self.fonts.get_random(&mut self.rng);
            draw_control(&mut img, slot.kind, area, look, font);
        }

        Ok(img)
    }
}
