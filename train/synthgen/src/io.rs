use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Error, Write},
    path::{Path, PathBuf},
};

use image::{ImageFormat, RgbaImage};
use layout::{ClassCatalog, ImageWriter};

use crate::record::JsonRecord;

/// Encodes rendered canvases as PNG.
pub struct PngWriter;

impl ImageWriter<RgbaImage> for PngWriter {
    type Error = image::ImageError;

    fn write(&mut self, raster: &RgbaImage, path: &Path) -> image::ImageResult<()> {
        raster.save_with_format(path, ImageFormat::Png)
    }
}

/// `classes.txt`: one class name per line, line number = class index.
pub fn write_classes(root: &Path, catalog: &ClassCatalog) -> Result<PathBuf, Error> {
    let path = root.join("classes.txt");
    let mut out = BufWriter::new(File::create(&path)?);
    for name in catalog.class_names() {
        writeln!(out, "{name}")?;
    }
    out.flush()?;
    Ok(path)
}

/// Append-only `manifest.jsonl` with one line per written sample.
pub struct Manifest {
    writer: Option<BufWriter<File>>,
}

impl Manifest {
    pub fn open(root: &Path) -> Result<Self, Error> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(root.join("manifest.jsonl"))?;
        Ok(Self {
            writer: Some(BufWriter::with_capacity(1 << 16, file)),
        })
    }

    pub fn append(&mut self, rec: &JsonRecord) -> anyhow::Result<()> {
        if let Some(ref mut writer) = self.writer {
            serde_json::to_writer(&mut *writer, rec)?;
            writeln!(writer)?;
        }
        Ok(())
    }

    pub fn finalize(&mut self) -> Result<(), Error> {
        if let Some(writer) = self.writer.take() {
            writer.into_inner()?.sync_all()?;
        }
        Ok(())
    }
}

impl Drop for Manifest {
    fn drop(&mut self) {
        let _ = self.finalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout::{CanvasBounds, FallbackReason, Placement, Rect, Sample};

    #[test]
    fn classes_file_lists_collapsed_classes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_classes(dir.path(), &ClassCatalog::default()).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            text,
            "Button\nCheckBox\nComboBox\nicon\ninput\nlabel\nmenu\nmenuItem\nradio\n"
        );
    }

    #[test]
    fn png_writer_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        let img = RgbaImage::from_pixel(4, 3, image::Rgba([9, 8, 7, 255]));
        PngWriter.write(&img, &path).unwrap();

        let back = image::open(&path).unwrap().to_rgba8();
        assert_eq!(back, img);
    }

    #[test]
    fn png_writer_reports_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let img = RgbaImage::new(2, 2);
        assert!(PngWriter.write(&img, &dir.path().join("nope/a.png")).is_err());
    }

    #[test]
    fn manifest_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let sample = Sample {
            stem: "Screenshot_20250101_000000".into(),
            image_path: dir.path().join("images/Screenshot_20250101_000000.png"),
            label_path: dir.path().join("labels/Screenshot_20250101_000000.txt"),
            bounds: CanvasBounds::new(400.0, 300.0),
            placed: vec![
                layout::PlacedRect {
                    name: "Button".into(),
                    rect: Rect::new(1.0, 2.0, 80.0, 40.0),
                    class_index: 0,
                    placement: Placement::Sampled { attempts: 3 },
                },
                layout::PlacedRect {
                    name: "switch".into(),
                    rect: Rect::new(50.0, 50.0, 80.0, 40.0),
                    class_index: 8,
                    placement: Placement::Fallback(FallbackReason::AttemptsExhausted),
                },
            ],
            records: Vec::new(),
        };

        let mut m = Manifest::open(dir.path()).unwrap();
        m.append(&JsonRecord::new(&sample, 77)).unwrap();
        m.append(&JsonRecord::new(&sample, 78)).unwrap();
        m.finalize().unwrap();

        let text = std::fs::read_to_string(dir.path().join("manifest.jsonl")).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let v: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(v["schema"], "v1");
        assert_eq!(v["image"], "images/Screenshot_20250101_000000.png");
        assert_eq!(v["label"], "labels/Screenshot_20250101_000000.txt");
        assert_eq!(v["seed"], 77);
        assert_eq!(v["objects"][0]["class"], 0);
        assert!(v["objects"][0].get("fallback").is_none());
        assert_eq!(v["objects"][1]["fallback"], true);
        assert_eq!(v["objects"][1]["bbox"][0], 50.0);
    }
}
