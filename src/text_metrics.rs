use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static MEASURER: Lazy<Mutex<Measurer>> = Lazy::new(|| Mutex::new(Measurer::new()));

/// Approximate advance width per character when no font can be resolved,
/// as a fraction of the font size.
const FALLBACK_CHAR_RATIO: f32 = 0.56;

/// Measures the rendered width of a single line of text. Newlines are
/// ignored; callers split multi-line labels before measuring. Falls back
/// to a fixed per-character estimate when no matching font is installed.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> f32 {
    if text.is_empty() || font_size <= 0.0 {
        return 0.0;
    }
    let estimate = text.chars().count() as f32 * font_size * FALLBACK_CHAR_RATIO;
    let Ok(mut guard) = MEASURER.lock() else {
        return estimate;
    };
    guard.measure(text, font_size, font_family).unwrap_or(estimate)
}

struct Measurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<FaceMetrics>>,
}

impl Measurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = family_key(font_family);
        if !self.faces.contains_key(&key) {
            let metrics = self.resolve_face(font_family);
            self.faces.insert(key.clone(), metrics);
        }
        let metrics = self.faces.get(&key)?.as_ref()?;
        let normalized = text.replace('\t', "    ");
        Some(metrics.line_width(&normalized, font_size))
    }

    fn resolve_face(&mut self, font_family: &str) -> Option<FaceMetrics> {
        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let names: Vec<String> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names.iter().map(|name| resolve_family(name)).collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut metrics = None;
        self.db.with_face_data(id, |data, index| {
            if let Ok(face) = Face::parse(data, index) {
                metrics = Some(FaceMetrics::from_face(&face));
            }
        });
        metrics
    }
}

fn resolve_family(name: &str) -> Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => Family::Serif,
        "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => Family::SansSerif,
        "monospace" | "ui-monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(name),
    }
}

fn family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Advance-width table captured once per face. Holding the table instead of
/// the parsed `Face` avoids tying the cache to borrowed font data.
struct FaceMetrics {
    units_per_em: f32,
    ascii_advances: [u16; 128],
    average_advance: f32,
}

impl FaceMetrics {
    fn from_face(face: &Face<'_>) -> Self {
        let units_per_em = face.units_per_em().max(1) as f32;
        let mut ascii_advances = [0u16; 128];
        let mut sum = 0u32;
        let mut counted = 0u32;
        for byte in 0x20u8..0x7F {
            let ch = byte as char;
            if let Some(glyph) = face.glyph_index(ch) {
                let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
                ascii_advances[byte as usize] = advance;
                if advance > 0 {
                    sum += u32::from(advance);
                    counted += 1;
                }
            }
        }
        let average_advance = if counted > 0 {
            sum as f32 / counted as f32
        } else {
            units_per_em * FALLBACK_CHAR_RATIO
        };
        Self {
            units_per_em,
            ascii_advances,
            average_advance,
        }
    }

    fn line_width(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em;
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = if ch.is_ascii() {
                let stored = self.ascii_advances[ch as usize];
                if stored > 0 {
                    stored as f32
                } else {
                    self.average_advance
                }
            } else {
                // Non-ascii glyphs use the face average; lesson content is
                // overwhelmingly ascii so the error stays small.
                self.average_advance
            };
            width += advance * scale;
        }
        width.max(0.0)
    }
}
