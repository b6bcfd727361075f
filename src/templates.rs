use std::path::Path;

use image::GrayImage;
use tracing::debug;
use walkdir::WalkDir;

use crate::{extract::binarize::binarize, types::TicketResult};

// Template set
//------------------------------------------------------------------------------

/// The shared read-only template library: one glyph image per digit plus the
/// "PB" marker. Loaded once at startup and passed into every extraction call;
/// invocations never mutate it. Templates carry the same binarization
/// convention as the runtime frames (ink = 255).
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    digits: [Option<GrayImage>; 10],
    pb: Option<GrayImage>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads templates from a directory of image files named by label:
    /// `0` through `9` and `pb` (any image extension, case-insensitive).
    /// Unrelated files are skipped; missing labels leave their slot empty,
    /// which disables the primary path but not the fallback.
    pub fn load_dir(dir: &Path) -> TicketResult<Self> {
        let mut set = Self::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match stem.to_ascii_lowercase().as_str() {
                "pb" => set.set_pb(binarize(&image::open(path)?)),
                stem => {
                    if let Ok(digit @ 0..=9) = stem.parse::<u8>() {
                        set.set_digit(digit, binarize(&image::open(path)?));
                    }
                }
            }
        }
        debug!(complete = set.is_complete(), "loaded template directory");
        Ok(set)
    }

    pub fn set_digit(&mut self, digit: u8, template: GrayImage) {
        self.digits[digit as usize] = Some(template);
    }

    pub fn set_pb(&mut self, template: GrayImage) {
        self.pb = Some(template);
    }

    pub fn digit(&self, digit: u8) -> Option<&GrayImage> {
        self.digits.get(digit as usize)?.as_ref()
    }

    pub fn pb(&self) -> Option<&GrayImage> {
        self.pb.as_ref()
    }

    /// All eleven templates present.
    pub fn is_complete(&self) -> bool {
        self.pb.is_some() && self.digits.iter().all(Option::is_some)
    }
}
