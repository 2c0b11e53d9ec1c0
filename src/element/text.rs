//! Text measuring seam.
//!
//! The core has no font stack. Hosts plug in a real measurer; the default
//! approximation keeps headless use and tests deterministic.

use crate::constants::TEXT_LINE_HEIGHT;
use crate::types::FontFamily;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
    pub baseline: f32,
}

pub trait TextMeasurer: Send {
    fn measure(&self, text: &str, font_size: f32, font_family: FontFamily) -> TextMetrics;
}

/// Fixed advance per character, scaled by font size.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApproximateTextMeasurer;

impl TextMeasurer for ApproximateTextMeasurer {
    fn measure(&self, text: &str, font_size: f32, font_family: FontFamily) -> TextMetrics {
        let advance = match font_family {
            FontFamily::Cascadia => 0.6,
            FontFamily::Helvetica => 0.55,
            FontFamily::Virgil => 0.5,
        };
        let lines: Vec<&str> = text.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let line_height = font_size * TEXT_LINE_HEIGHT;
        let height = line_height * lines.len() as f32;
        TextMetrics {
            width: longest as f32 * font_size * advance,
            height,
            baseline: height - (line_height - font_size * 0.8),
        }
    }
}
