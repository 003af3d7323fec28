use layout::{PlacedRect, Sample};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct ObjectRecord<'a> {
    pub name: &'a str,
    pub class: u32,
    /// x, y, w, h in canvas pixels
    pub bbox: [f64; 4],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl<'a> From<&'a PlacedRect> for ObjectRecord<'a> {
    fn from(p: &'a PlacedRect) -> Self {
        Self {
            name: &p.name,
            class: p.class_index,
            bbox: [p.rect.x, p.rect.y, p.rect.w, p.rect.h],
            fallback: p.is_fallback(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct JsonRecord<'a> {
    pub schema: &'static str,
    pub image: String,
    pub label: String,
    pub seed: u64,
    pub canvas: [f64; 2],
    pub objects: Vec<ObjectRecord<'a>>,
}

impl<'a> JsonRecord<'a> {
    pub fn new(sample: &'a Sample, seed: u64) -> Self {
        Self {
            schema: "v1",
            image: format!("{}/{}.png", layout::stem::IMAGES_DIR, sample.stem),
            label: format!("{}/{}.txt", layout::stem::LABELS_DIR, sample.stem),
            seed,
            canvas: [sample.bounds.width, sample.bounds.height],
            objects: sample.placed.iter().map(ObjectRecord::from).collect(),
        }
    }
}
