use regex::Regex;
use crate::recognition::{OcrEngine, TextFragment};
use crate::region_extractor::Crop;

/// Recognition adapter: turns a plate crop into one canonical plate string.
///
/// An empty string means "nothing read" and never replaces the displayed plate.
#[derive(Debug)]
pub struct PlateReader<E> {
    engine: E,
    blocklist: String,
    strip: Regex,
}

impl<E: OcrEngine> PlateReader<E> {
    pub fn new(engine: E, blocklist: &str) -> anyhow::Result<Self> {
        Ok(Self {
            engine,
            blocklist: blocklist.to_string(),
            strip: strip_pattern(blocklist)?,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn recognize(&mut self, crop: &Crop) -> String {
        match self.engine.read_text(&crop.image, &self.blocklist) {
            Ok(fragments) => self.normalize(&fragments),
            Err(e) => {
                log::warn!("Recognition failed for {}x{} crop: {:#}", crop.width(), crop.height(), e);
                String::new()
            }
        }
    }

    /// Concatenates fragments in order, drops whitespace and blocked characters,
    /// then uppercases.
    pub fn normalize(&self, fragments: &[TextFragment]) -> String {
        let joined: String = fragments.iter().map(|f| f.text.as_str()).collect();
        self.strip.replace_all(&joined, "").to_uppercase()
    }
}

fn strip_pattern(blocklist: &str) -> Result<Regex, regex::Error> {
    if blocklist.is_empty() {
        return Regex::new(r"\s+");
    }
    let blocked: String = blocklist.chars().map(|c| regex::escape(&c.to_string())).collect();
    Regex::new(&format!(r"[\s{}]+", blocked))
}
