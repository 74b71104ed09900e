use image::RgbImage;
use serde::{Deserialize, Serialize};

/// One piece of text found by the OCR engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFragment")]
pub struct TextFragment {
    /// Polygon around the text, in crop pixels.
    pub region: Vec<[f32; 2]>,
    pub text: String,
    pub confidence: f32,
}

impl TextFragment {
    pub fn new(text: &str, confidence: f32) -> Self {
        Self {
            region: vec![],
            text: text.to_string(),
            confidence,
        }
    }

    pub fn with_region(mut self, region: Vec<[f32; 2]>) -> Self {
        self.region = region;
        self
    }
}

/// Accepts both `{"region", "text", "confidence"}` objects and the
/// `[region, text, confidence]` triples easyocr's `readtext` dumps to JSON.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFragment {
    Object {
        #[serde(default)]
        region: Vec<[f32; 2]>,
        text: String,
        #[serde(default)]
        confidence: f32,
    },
    Triple(Vec<[f32; 2]>, String, f32),
}

impl From<RawFragment> for TextFragment {
    fn from(raw: RawFragment) -> Self {
        match raw {
            RawFragment::Object { region, text, confidence } | RawFragment::Triple(region, text, confidence) => Self {
                region,
                text,
                confidence,
            },
        }
    }
}

/// The opaque text recognizer.
///
/// `blocklist` lists characters the engine should never emit. An empty result is valid.
pub trait OcrEngine {
    fn read_text(&mut self, region: &RgbImage, blocklist: &str) -> anyhow::Result<Vec<TextFragment>>;
}

impl<E: OcrEngine + ?Sized> OcrEngine for Box<E> {
    fn read_text(&mut self, region: &RgbImage, blocklist: &str) -> anyhow::Result<Vec<TextFragment>> {
        (**self).read_text(region, blocklist)
    }
}
