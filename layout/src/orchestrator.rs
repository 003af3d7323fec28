use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};
use rand::Rng;
use tracing::{info, warn};

use crate::{
    annotation::{AnnotationRecord, encode, write_labels},
    catalog::ClassCatalog,
    error::CycleError,
    geom::{CanvasBounds, ElementSpec, PlacedRect},
    placer::LayoutGenerator,
    stem::{DatasetDirs, StemAllocator},
};

/// Draws controls and rasterizes the canvas.
pub trait Renderer {
    type Raster;
    type Error: std::error::Error + Send + Sync + 'static;

    fn canvas_bounds(&mut self) -> CanvasBounds;
    /// Controls to place this cycle with their natural sizes, in catalog order.
    fn elements(&mut self) -> Vec<ElementSpec>;
    fn apply_layout(&mut self, placed: &[PlacedRect]) -> Result<Self::Raster, Self::Error>;
}

/// Encodes a raster produced by a [`Renderer`] to a file.
pub trait ImageWriter<Raster> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn write(&mut self, raster: &Raster, path: &Path) -> Result<(), Self::Error>;
}

pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// One written (image, label) pair.
#[derive(Clone, Debug)]
pub struct Sample {
    pub stem: String,
    pub image_path: PathBuf,
    pub label_path: PathBuf,
    pub bounds: CanvasBounds,
    pub placed: Vec<PlacedRect>,
    pub records: Vec<AnnotationRecord>,
}

/// Runs generation cycles: place, render, encode, write.
///
/// A cycle either writes both files of a pair or none of them.
pub struct SampleOrchestrator<R, W> {
    catalog: ClassCatalog,
    generator: LayoutGenerator,
    renderer: R,
    writer: W,
    dirs: DatasetDirs,
    stems: StemAllocator,
    clock: Clock,
}

impl<R, W> SampleOrchestrator<R, W>
where
    R: Renderer,
    W: ImageWriter<R::Raster>,
{
    pub fn new(
        catalog: ClassCatalog,
        generator: LayoutGenerator,
        renderer: R,
        writer: W,
        dirs: DatasetDirs,
    ) -> Self {
        Self {
            catalog,
            generator,
            renderer,
            writer,
            dirs,
            stems: StemAllocator::new(),
            clock: local_now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    pub fn dirs(&self) -> &DatasetDirs {
        &self.dirs
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Runs one cycle and logs its outcome. Only fatal errors come back as
    /// `Err`; a skipped cycle yields `Ok(None)`.
    pub fn tick<G: Rng>(&mut self, rng: &mut G) -> Result<Option<Sample>, CycleError> {
        match self.run_cycle(rng) {
            Ok(sample) => {
                info!(
                    image = %sample.image_path.display(),
                    labels = %sample.label_path.display(),
                    boxes = sample.records.len(),
                    "sample written"
                );
                Ok(Some(sample))
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(error = %e, "cycle skipped");
                Ok(None)
            }
        }
    }

    pub fn run_cycle<G: Rng>(&mut self, rng: &mut G) -> Result<Sample, CycleError> {
        let bounds = self.renderer.canvas_bounds();
        let elements = self.renderer.elements();
        if !bounds.is_valid() {
            return Err(CycleError::DegenerateCanvas {
                width: bounds.width,
                height: bounds.height,
            });
        }

        let placed = self
            .generator
            .place(rng, &self.catalog, bounds, &elements)?
            .to_vec();

        let raster = self
            .renderer
            .apply_layout(&placed)
            .map_err(|e| CycleError::Render(Box::new(e)))?;

        let records = encode(&placed, bounds);

        self.dirs
            .create()
            .map_err(|e| CycleError::write(self.dirs.root(), e))?;
        let stem = self.stems.next((self.clock)(), &self.dirs);
        let image_path = self.dirs.image_path(&stem);
        let label_path = self.dirs.label_path(&stem);

        self.writer
            .write(&raster, &image_path)
            .map_err(|e| CycleError::write(&image_path, e))?;

        if let Err(e) = write_label_file(&label_path, &records) {
            // drop the image so it never sits in the dataset without labels
            if let Err(rm) = fs::remove_file(&image_path) {
                warn!(
                    path = %image_path.display(),
                    error = %rm,
                    "could not remove unlabeled image"
                );
            }
            return Err(CycleError::write(label_path, e));
        }

        Ok(Sample {
            stem,
            image_path,
            label_path,
            bounds,
            placed,
            records,
        })
    }
}

fn write_label_file(path: &Path, records: &[AnnotationRecord]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_labels(&mut out, records)?;
    out.flush()
}
