use rand::Rng;
use tracing::{debug, warn};

use crate::{
    catalog::ClassCatalog,
    error::LayoutError,
    geom::{CanvasBounds, ElementSpec, FallbackReason, PlacedRect, Placement, Rect},
};

pub const MAX_ATTEMPTS: u32 = 1000;
pub const FALLBACK_MARGIN: f64 = 50.0;

/// Greedy random placement of controls without overlap.
///
/// The occupied set lives for one cycle only: `place` clears it before doing
/// anything else. Elements are handled strictly in input order, each one
/// avoiding everything placed before it, so swapping two elements changes
/// the outcome even under the same seed.
pub struct LayoutGenerator {
    max_attempts: u32,
    fallback_margin: f64,
    occupied: Vec<PlacedRect>,
}

impl Default for LayoutGenerator {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS, FALLBACK_MARGIN)
    }
}

impl LayoutGenerator {
    pub fn new(max_attempts: u32, fallback_margin: f64) -> Self {
        Self {
            max_attempts,
            fallback_margin,
            occupied: Vec::new(),
        }
    }

    /// Rectangles placed by the last `place` call.
    pub fn occupied(&self) -> &[PlacedRect] {
        &self.occupied
    }

    pub fn clear(&mut self) {
        self.occupied.clear();
    }

    /// Positions every element on the canvas. Never fails on lack of space:
    /// an element that cannot be sampled is pinned at the fallback position.
    /// Fails before placing anything when the canvas is degenerate, an element
    /// name is missing from the catalog, or an element size is negative or
    /// not finite.
    pub fn place<R: Rng>(
        &mut self,
        rng: &mut R,
        catalog: &ClassCatalog,
        bounds: CanvasBounds,
        elements: &[ElementSpec],
    ) -> Result<&[PlacedRect], LayoutError> {
        self.clear();
        if !bounds.is_valid() {
            return Err(LayoutError::InvalidCanvas {
                width: bounds.width,
                height: bounds.height,
            });
        }

        let classes = elements
            .iter()
            .map(|e| {
                let sane = |v: f64| v.is_finite() && v >= 0.0;
                if !sane(e.width) || !sane(e.height) {
                    return Err(LayoutError::InvalidElement {
                        name: e.name.clone(),
                        width: e.width,
                        height: e.height,
                    });
                }
                catalog.class_index_of(&e.name)
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (el, class_index) in elements.iter().zip(classes) {
            let (rect, placement) = match self.sample(rng, bounds, el) {
                Ok((rect, attempts)) => (rect, Placement::Sampled { attempts }),
                Err(reason) => {
                    warn!(
                        element = %el.name,
                        ?reason,
                        "no free position found, using fallback"
                    );
                    (self.fallback_rect(bounds, el), Placement::Fallback(reason))
                }
            };
            self.occupied.push(PlacedRect {
                name: el.name.clone(),
                rect,
                class_index,
                placement,
            });
        }

        debug!(
            placed = self.occupied.len(),
            fallbacks = self.occupied.iter().filter(|p| p.is_fallback()).count(),
            "layout done"
        );
        Ok(&self.occupied)
    }

    fn sample<R: Rng>(
        &self,
        rng: &mut R,
        bounds: CanvasBounds,
        el: &ElementSpec,
    ) -> Result<(Rect, u32), FallbackReason> {
        let (w, h) = (el.width, el.height);
        if w > bounds.width || h > bounds.height {
            return Err(FallbackReason::DoesNotFit);
        }

        let max_x = bounds.width - w;
        let max_y = bounds.height - h;
        for attempt in 1..=self.max_attempts {
            let x = rng.random_range(0.0..=max_x);
            let y = rng.random_range(0.0..=max_y);
            let candidate = Rect::new(x, y, w, h);
            if !self.occupied.iter().any(|p| p.rect.intersects(&candidate)) {
                return Ok((candidate, attempt));
            }
        }
        Err(FallbackReason::AttemptsExhausted)
    }

    // Margin offset, pulled toward the origin when the element would cross
    // the right/bottom edge. Oversized elements end up at 0.
    fn fallback_rect(&self, bounds: CanvasBounds, el: &ElementSpec) -> Rect {
        let x = self.fallback_margin.min(bounds.width - el.width).max(0.0);
        let y = self.fallback_margin.min(bounds.height - el.height).max(0.0);
        Rect::new(x, y, el.width, el.height)
    }
}
