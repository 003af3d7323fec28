use std::path::PathBuf;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Placement input errors. Unknown or duplicate classes are programmer
/// errors; invalid sizes only spoil the current cycle.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("unknown control class: {0}")]
    UnknownClass(String),
    #[error("control class defined twice: {0}")]
    DuplicateClass(String),
    #[error("element {name} has invalid size {width}x{height}")]
    InvalidElement { name: String, width: f64, height: f64 },
    #[error("cannot place on a {width}x{height} canvas")]
    InvalidCanvas { width: f64, height: f64 },
}

impl LayoutError {
    /// Catalog wiring errors; bad sizes come from a single cycle's input.
    pub fn is_wiring(&self) -> bool {
        matches!(
            self,
            LayoutError::UnknownClass(_) | LayoutError::DuplicateClass(_)
        )
    }
}

/// Why a generation cycle produced no sample.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("degenerate canvas {width}x{height}")]
    DegenerateCanvas { width: f64, height: f64 },

    #[error("render failed: {0}")]
    Render(#[source] BoxError),

    #[error("write failed for {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl CycleError {
    /// Only catalog wiring errors stop the run; everything else skips a cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CycleError::Layout(e) if e.is_wiring())
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        CycleError::Write {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// A label line that does not follow `class cx cy w h`.
#[derive(Debug, Error, PartialEq)]
#[error("label line {line}: {reason}")]
pub struct AnnotationParseError {
    pub line: usize,
    pub reason: String,
}
