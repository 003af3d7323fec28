use std::{fmt, io::Write};

use tracing::warn;

use crate::{
    error::AnnotationParseError,
    geom::{CanvasBounds, PlacedRect},
};

/// One YOLO-style box: class index and center/size as fractions of the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnnotationRecord {
    pub class_index: u32,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl fmt::Display for AnnotationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_index, self.cx, self.cy, self.w, self.h
        )
    }
}

/// Normalizes placed rectangles against the canvas, keeping input order.
///
/// Rectangles sticking out of the canvas (fallback placements) are clipped to
/// their visible part first, so every value lands in `[0, 1]`. A rectangle
/// with nothing visible is left out of the result.
pub fn encode(placed: &[PlacedRect], bounds: CanvasBounds) -> Vec<AnnotationRecord> {
    placed
        .iter()
        .filter_map(|p| {
            let Some(r) = p.rect.clip_to(bounds) else {
                warn!(element = %p.name, rect = ?p.rect, "element outside canvas, not labeled");
                return None;
            };
            Some(AnnotationRecord {
                class_index: p.class_index,
                cx: (r.x + r.w / 2.0) / bounds.width,
                cy: (r.y + r.h / 2.0) / bounds.height,
                w: r.w / bounds.width,
                h: r.h / bounds.height,
            })
        })
        .collect()
}

pub fn write_labels<W: Write>(out: &mut W, records: &[AnnotationRecord]) -> std::io::Result<()> {
    for rec in records {
        writeln!(out, "{rec}")?;
    }
    Ok(())
}

pub fn to_label_text(records: &[AnnotationRecord]) -> String {
    records.iter().map(|r| format!("{r}\n")).collect()
}

/// Reads back a label file. Blank lines are ignored.
pub fn parse_labels(text: &str) -> Result<Vec<AnnotationRecord>, AnnotationParseError> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| parse_line(i + 1, l))
        .collect()
}

fn parse_line(line: usize, text: &str) -> Result<AnnotationRecord, AnnotationParseError> {
    let err = |reason: String| AnnotationParseError { line, reason };
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(err(format!("expected 5 fields, got {}", fields.len())));
    }

    let class_index = fields[0]
        .parse::<u32>()
        .map_err(|e| err(format!("class index {:?}: {e}", fields[0])))?;
    let mut vals = [0.0f64; 4];
    for (v, f) in vals.iter_mut().zip(&fields[1..]) {
        *v = f
            .parse::<f64>()
            .map_err(|e| err(format!("coordinate {f:?}: {e}")))?;
    }

    let [cx, cy, w, h] = vals;
    Ok(AnnotationRecord {
        class_index,
        cx,
        cy,
        w,
        h,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{FallbackReason, Placement, Rect};

    fn placed(class_index: u32, x: f64, y: f64, w: f64, h: f64) -> PlacedRect {
        PlacedRect {
            name: "Button".to_string(),
            rect: Rect::new(x, y, w, h),
            class_index,
            placement: Placement::Sampled { attempts: 1 },
        }
    }

    #[test]
    fn button_on_400x300() {
        let bounds = CanvasBounds::new(400.0, 300.0);
        let recs = encode(&[placed(0, 100.0, 60.0, 80.0, 40.0)], bounds);

        assert_eq!(recs.len(), 1);
        let r = recs[0];
        assert_eq!(r.class_index, 0);
        assert!((r.w - 0.2).abs() < 1e-12);
        assert!((r.h - 40.0 / 300.0).abs() < 1e-12);
        assert!((r.cx - 0.35).abs() < 1e-12);
        assert!((r.cy - 80.0 / 300.0).abs() < 1e-12);
        assert_eq!(r.to_string(), "0 0.350000 0.266667 0.200000 0.133333");
    }

    #[test]
    fn in_canvas_rects_reconstruct() {
        let bounds = CanvasBounds::new(813.0, 577.0);
        let input = [
            placed(3, 0.0, 0.0, 50.0, 20.0),
            placed(8, 763.0, 557.0, 50.0, 20.0),
            placed(1, 123.456, 78.9, 199.0, 99.0),
        ];
        let recs = encode(&input, bounds);

        for (p, r) in input.iter().zip(&recs) {
            for v in [r.cx, r.cy, r.w, r.h] {
                assert!((0.0..=1.0).contains(&v));
            }
            let w = r.w * bounds.width;
            let h = r.h * bounds.height;
            let x = r.cx * bounds.width - w / 2.0;
            let y = r.cy * bounds.height - h / 2.0;
            assert!((x - p.rect.x).abs() < 1e-9);
            assert!((y - p.rect.y).abs() < 1e-9);
            assert!((w - p.rect.w).abs() < 1e-9);
            assert!((h - p.rect.h).abs() < 1e-9);
        }
    }

    #[test]
    fn off_canvas_fallback_is_clipped() {
        let bounds = CanvasBounds::new(400.0, 300.0);
        let mut p = placed(6, 0.0, 0.0, 500.0, 500.0);
        p.placement = Placement::Fallback(FallbackReason::DoesNotFit);
        let recs = encode(&[p], bounds);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].to_string(), "6 0.500000 0.500000 1.000000 1.000000");

        let partly = encode(&[placed(2, 350.0, 250.0, 100.0, 100.0)], bounds);
        let r = partly[0];
        assert!((r.w - 50.0 / 400.0).abs() < 1e-12);
        assert!((r.cx - 375.0 / 400.0).abs() < 1e-12);
    }

    #[test]
    fn invisible_rect_is_dropped() {
        let bounds = CanvasBounds::new(400.0, 300.0);
        let recs = encode(
            &[placed(0, 10.0, 10.0, 5.0, 5.0), placed(1, 410.0, 0.0, 5.0, 5.0)],
            bounds,
        );
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].class_index, 0);
    }

    #[test]
    fn text_format_is_exact() {
        let recs = [
            AnnotationRecord {
                class_index: 8,
                cx: 0.5,
                cy: 0.25,
                w: 0.1,
                h: 1.0,
            },
            AnnotationRecord {
                class_index: 12,
                cx: 1.0 / 3.0,
                cy: 0.0,
                w: 0.0000004,
                h: 0.9999996,
            },
        ];
        assert_eq!(
            to_label_text(&recs),
            "8 0.500000 0.250000 0.100000 1.000000\n12 0.333333 0.000000 0.000000 1.000000\n"
        );
        assert_eq!(to_label_text(&[]), "");

        let mut buf = Vec::new();
        write_labels(&mut buf, &recs).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), to_label_text(&recs));
    }

    #[test]
    fn label_text_round_trip() {
        let bounds = CanvasBounds::new(800.0, 600.0);
        let input: Vec<_> = (0..9)
            .map(|i| placed(i, 13.7 * i as f64, 41.3 * i as f64, 57.0 + i as f64, 23.5))
            .collect();
        let recs = encode(&input, bounds);
        let parsed = parse_labels(&to_label_text(&recs)).unwrap();

        assert_eq!(parsed.len(), recs.len());
        for (a, b) in recs.iter().zip(&parsed) {
            assert_eq!(a.class_index, b.class_index);
            assert!((a.cx - b.cx).abs() <= 1e-6);
            assert!((a.cy - b.cy).abs() <= 1e-6);
            assert!((a.w - b.w).abs() <= 1e-6);
            assert!((a.h - b.h).abs() <= 1e-6);
        }
    }

    #[test]
    fn malformed_lines_report_line_number() {
        let err = parse_labels("0 0.5 0.5 0.1 0.1\n\n1 0.5 0.5\n").unwrap_err();
        assert_eq!(err.line, 3);

        let err = parse_labels("x 0.5 0.5 0.1 0.1").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.reason.contains("class index"));

        let err = parse_labels("0 0.5 abc 0.1 0.1").unwrap_err();
        assert!(err.reason.contains("abc"));
    }
}
