/// Canvas size reported by the renderer at the start of a cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasBounds {
    pub width: f64,
    pub height: f64,
}

impl CanvasBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Positive and finite in both dimensions.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle in canvas pixels, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Closed-interval test: rectangles sharing only an edge still collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Part of the rectangle inside `[0, width] x [0, height]`, if any area is left.
    pub fn clip_to(&self, bounds: CanvasBounds) -> Option<Rect> {
        let x0 = self.x.max(0.0);
        let y0 = self.y.max(0.0);
        let x1 = self.right().min(bounds.width);
        let y1 = self.bottom().min(bounds.height);
        (x1 > x0 && y1 > y0).then(|| Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// A control the renderer wants placed, with its natural size.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementSpec {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

impl ElementSpec {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// Element is larger than the canvas in at least one dimension.
    DoesNotFit,
    /// Every sampled position collided with an earlier element.
    AttemptsExhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Sampled { attempts: u32 },
    Fallback(FallbackReason),
}

/// Final position of one element within a cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedRect {
    pub name: String,
    pub rect: Rect,
    pub class_index: u32,
    pub placement: Placement,
}

impl PlacedRect {
    pub fn is_fallback(&self) -> bool {
        matches!(self.placement, Placement::Fallback(_))
    }
}
