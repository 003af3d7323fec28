//! Non-overlapping random layout of UI controls and YOLO label export for
//! synthetic object-detection datasets.

pub mod annotation;
pub mod catalog;
pub mod error;
pub mod geom;
pub mod orchestrator;
pub mod placer;
pub mod stem;

pub use annotation::{AnnotationRecord, encode, parse_labels, to_label_text, write_labels};
pub use catalog::{ClassCatalog, ClassEntry};
pub use error::{AnnotationParseError, CycleError, LayoutError};
pub use geom::{CanvasBounds, ElementSpec, FallbackReason, PlacedRect, Placement, Rect};
pub use orchestrator::{ImageWriter, Renderer, Sample, SampleOrchestrator};
pub use placer::LayoutGenerator;
pub use stem::{DatasetDirs, StemAllocator};
