use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::{
    drawing::{
        draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut,
        draw_hollow_rect_mut, draw_line_segment_mut, draw_polygon_mut, draw_text_mut, text_size,
    },
    point::Point,
    rect::Rect,
};
use rand::{Rng, rngs::SmallRng};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const EDGE: Rgba<u8> = Rgba([112, 112, 112, 255]);

/// Drawable control kinds, one per catalog name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    Button,
    CheckBox,
    ComboBox,
    Icon,
    Input,
    Label,
    Menu,
    MenuItem,
    Radio,
    Switch,
    TabControl,
    UpDown,
}

impl ControlKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Button" => Self::Button,
            "CheckBox" => Self::CheckBox,
            "ComboBox" => Self::ComboBox,
            "icon" => Self::Icon,
            "input" => Self::Input,
            "label" => Self::Label,
            "menu" => Self::Menu,
            "menuItem" => Self::MenuItem,
            "radio" => Self::Radio,
            "switch" => Self::Switch,
            "tabControl" => Self::TabControl,
            "upDown" => Self::UpDown,
            _ => return None,
        })
    }

    fn caption(self) -> &'static str {
        match self {
            Self::Button => "Button",
            Self::CheckBox => "CheckBox",
            Self::ComboBox => "Item 1",
            Self::Icon => "Icon",
            Self::Input => "Text",
            Self::Label => "Label",
            Self::Menu => "File Edit View",
            Self::MenuItem => "MenuItem",
            Self::Radio => "RadioButton",
            Self::Switch => "Switch",
            Self::TabControl => "Tab 1",
            Self::UpDown => "0.00",
        }
    }
}

/// Per-cycle random look of one control.
#[derive(Clone, Copy, Debug)]
pub struct Look {
    pub width: u32,
    pub height: u32,
    pub background: Rgba<u8>,
    pub foreground: Rgba<u8>,
    pub font_px: f32,
}

impl Look {
    pub fn random(rng: &mut SmallRng) -> Self {
        Self {
            width: rng.random_range(50..200),
            height: rng.random_range(20..100),
            background: random_color(rng),
            foreground: random_color(rng),
            font_px: rng.random_range(12..24) as f32,
        }
    }
}

fn random_color(rng: &mut SmallRng) -> Rgba<u8> {
    Rgba([rng.random(), rng.random(), rng.random(), 255])
}

/// Draws `kind` filling `area`. Text is skipped when no font is available.
pub fn draw_control(
    img: &mut RgbaImage,
    kind: ControlKind,
    area: Rect,
    look: &Look,
    font: Option<&FontArc>,
) {
    let (x, y) = (area.left(), area.top());
    let (w, h) = (area.width(), area.height());
    let mid_y = y + h as i32 / 2;
    let text = Caption { font, look };

    match kind {
        ControlKind::Button | ControlKind::Icon => {
            draw_filled_rect_mut(img, area, look.background);
            draw_hollow_rect_mut(img, area, EDGE);
            text.centered(img, area, kind.caption());
        }
        ControlKind::CheckBox => {
            draw_filled_rect_mut(img, area, look.background);
            let side = (h.min(w) as i32 - 4).clamp(4, 16);
            let tick = Rect::at(x + 2, mid_y - side / 2).of_size(side as u32, side as u32);
            draw_filled_rect_mut(img, tick, WHITE);
            draw_hollow_rect_mut(img, tick, EDGE);
            draw_line_segment_mut(
                img,
                ((x + 4) as f32, mid_y as f32),
                ((x + side / 2 + 2) as f32, (mid_y + side / 2 - 2) as f32),
                look.foreground,
            );
            draw_line_segment_mut(
                img,
                ((x + side / 2 + 2) as f32, (mid_y + side / 2 - 2) as f32),
                ((x + side) as f32, (mid_y - side / 2 + 2) as f32),
                look.foreground,
            );
            text.left(img, x + side + 6, mid_y, kind.caption());
        }
        ControlKind::Radio => {
            draw_filled_rect_mut(img, area, look.background);
            let r = ((h.min(w) as i32 - 4) / 2).clamp(2, 8);
            let c = (x + 2 + r, mid_y);
            draw_filled_circle_mut(img, c, r, WHITE);
            draw_hollow_circle_mut(img, c, r, EDGE);
            draw_filled_circle_mut(img, c, (r / 2).max(1), look.foreground);
            text.left(img, x + 2 * r + 8, mid_y, kind.caption());
        }
        ControlKind::Switch => {
            draw_filled_rect_mut(img, area, look.background);
            let track_h = (h as i32 - 4).clamp(6, 18);
            let track_w = (track_h * 2).min(w as i32 - 4).max(track_h);
            let track =
                Rect::at(x + 2, mid_y - track_h / 2).of_size(track_w as u32, track_h as u32);
            draw_filled_rect_mut(img, track, look.foreground);
            draw_filled_circle_mut(
                img,
                (x + 2 + track_w - track_h / 2, mid_y),
                (track_h / 2 - 1).max(1),
                WHITE,
            );
            text.left(img, x + track_w + 8, mid_y, kind.caption());
        }
        ControlKind::ComboBox => {
            draw_filled_rect_mut(img, area, look.background);
            draw_hollow_rect_mut(img, area, EDGE);
            let bw = (h as i32).min(w as i32 / 3).max(6);
            let bx = x + w as i32 - bw;
            draw_line_segment_mut(
                img,
                (bx as f32, y as f32),
                (bx as f32, (y + h as i32 - 1) as f32),
                EDGE,
            );
            let s = (bw / 4).max(2);
            let cx = bx + bw / 2;
            draw_polygon_mut(
                img,
                &[
                    Point::new(cx - s, mid_y - s / 2),
                    Point::new(cx + s, mid_y - s / 2),
                    Point::new(cx, mid_y + s / 2),
                ],
                look.foreground,
            );
            text.left(img, x + 4, mid_y, kind.caption());
        }
        ControlKind::Input => {
            draw_filled_rect_mut(img, area, WHITE);
            draw_hollow_rect_mut(img, area, look.background);
            text.left(img, x + 4, mid_y, kind.caption());
        }
        ControlKind::Label | ControlKind::MenuItem => {
            draw_filled_rect_mut(img, area, look.background);
            text.left(img, x + 4, mid_y, kind.caption());
        }
        ControlKind::Menu => {
            draw_filled_rect_mut(img, area, look.background);
            let bar_h = (look.font_px as u32 + 8).min(h);
            let bar = Rect::at(x, y).of_size(w, bar_h);
            draw_hollow_rect_mut(img, bar, EDGE);
            text.left(img, x + 4, y + bar_h as i32 / 2, kind.caption());
        }
        ControlKind::TabControl => {
            let header_h = (look.font_px as u32 + 8).min(h / 2).max(1);
            let body = Rect::at(x, y + header_h as i32).of_size(w, (h - header_h).max(1));
            draw_filled_rect_mut(img, body, WHITE);
            draw_hollow_rect_mut(img, body, EDGE);
            let tab_w = (w / 2).max(1);
            for (i, color) in [look.background, WHITE].into_iter().enumerate() {
                let tab = Rect::at(x + (i as u32 * tab_w) as i32, y).of_size(tab_w, header_h);
                draw_filled_rect_mut(img, tab, color);
                draw_hollow_rect_mut(img, tab, EDGE);
            }
            text.left(img, x + 4, y + header_h as i32 / 2, kind.caption());
        }
        ControlKind::UpDown => {
            draw_filled_rect_mut(img, area, WHITE);
            draw_hollow_rect_mut(img, area, EDGE);
            let bw = (w as i32 / 4).clamp(6, 20);
            let bx = x + w as i32 - bw;
            let half = (h / 2).max(1);
            for (i, up) in [true, false].into_iter().enumerate() {
                let btn = Rect::at(bx, y + (i as u32 * half) as i32).of_size(bw as u32, half);
                draw_filled_rect_mut(img, btn, look.background);
                draw_hollow_rect_mut(img, btn, EDGE);
                let cy = btn.top() + half as i32 / 2;
                let s = (bw / 4).max(2);
                let (tip, base) = if up {
                    (cy - s / 2, cy + s / 2)
                } else {
                    (cy + s / 2, cy - s / 2)
                };
                draw_polygon_mut(
                    img,
                    &[
                        Point::new(bx + bw / 2 - s, base),
                        Point::new(bx + bw / 2 + s, base),
                        Point::new(bx + bw / 2, tip),
                    ],
                    look.foreground,
                );
            }
            text.left(img, x + 4, mid_y, kind.caption());
        }
    }
}

struct Caption<'a> {
    font: Option<&'a FontArc>,
    look: &'a Look,
}

impl Caption<'_> {
    fn scale(&self) -> PxScale {
        PxScale::from(self.look.font_px)
    }

    /// Text starting at `x`, vertically centered on `mid_y`.
    fn left(&self, img: &mut RgbaImage, x: i32, mid_y: i32, text: &str) {
        let Some(font) = self.font else { return };
        let (_, th) = text_size(self.scale(), font, text);
        draw_text_mut(
            img,
            self.look.foreground,
            x,
            mid_y - th as i32 / 2,
            self.scale(),
            font,
            text,
        );
    }

    fn centered(&self, img: &mut RgbaImage, area: Rect, text: &str) {
        let Some(font) = self.font else { return };
        let (tw, th) = text_size(self.scale(), font, text);
        let x = area.left() + (area.width() as i32 - tw as i32) / 2;
        let y = area.top() + (area.height() as i32 - th as i32) / 2;
        draw_text_mut(img, self.look.foreground, x, y, self.scale(), font, text);
    }
}
