use image::{
    imageops::{self, FilterType},
    GrayImage,
};
use imageproc::{
    contours::{find_contours, BorderType},
    point::Point,
    template_matching::{match_template, MatchTemplateMethod},
};
use tracing::debug;

use crate::templates::TemplateSet;

pub const PB_SCORE_FLOOR: f32 = 0.75;
pub const DIGIT_SCORE_FLOOR: f32 = 0.40;
// Tolerates the ticket-to-template size mismatch that remains after QR
// normalization (about +/-15%).
pub const DIGIT_SCALES: [f32; 5] = [0.85, 0.925, 1.0, 1.075, 1.15];
const PB_SUPPRESSION_DIST: i32 = 30;
const DUPLICATE_RADIUS_SQ: i32 = 10 * 10;
const MIN_GLYPH_HEIGHT: u32 = 30;
const MIN_GLYPH_WIDTH: u32 = 15;
const MAX_GLYPH_WIDTH: u32 = 90;
const MIN_GLYPH_AREA: u32 = 800;
const MAX_GLYPH_AREA: u32 = 6000;

// PB marker detection
//------------------------------------------------------------------------------

/// A matched "PB" glyph; (x, y) is the top-left of the matched window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PbMarker {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub score: f32,
}

impl PbMarker {
    pub fn center_y(&self) -> f32 {
        self.y as f32 + self.h as f32 / 2.0
    }

    pub fn right(&self) -> u32 {
        self.x + self.w
    }
}

/// Normalized cross-correlation sweep for the PB template over the plays
/// region, followed by greedy non-maximum suppression: candidates are taken
/// best-first and kept only when no kept marker lies within 30 px in both
/// axes. Markers return sorted top-to-bottom.
pub fn locate_pb_markers(region: &GrayImage, templates: &TemplateSet) -> Vec<PbMarker> {
    let Some(template) = templates.pb() else {
        return Vec::new();
    };
    let (tw, th) = template.dimensions();
    if region.width() < tw || region.height() < th {
        return Vec::new();
    }

    let scores = match_template(region, template, MatchTemplateMethod::CrossCorrelationNormalized);

    let mut candidates: Vec<PbMarker> = scores
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] >= PB_SCORE_FLOOR)
        .map(|(x, y, p)| PbMarker { x, y, w: tw, h: th, score: p[0] })
        .collect();
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<PbMarker> = Vec::new();
    for candidate in candidates {
        let suppressed = kept.iter().any(|k| {
            (k.x as i32 - candidate.x as i32).abs() < PB_SUPPRESSION_DIST
                && (k.y as i32 - candidate.y as i32).abs() < PB_SUPPRESSION_DIST
        });
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept.sort_by_key(|m| (m.y, m.x));

    debug!(markers = kept.len(), "PB marker sweep complete");
    kept
}

// Digit detection
//------------------------------------------------------------------------------

/// A classified digit; x is the glyph box's left edge, y its vertical center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigitHit {
    pub x: u32,
    pub y: u32,
    pub digit: u8,
    pub score: f32,
}

#[derive(Debug, Clone, Copy)]
struct GlyphBox {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Contour-finds digit candidates in the plays region and classifies each by
/// multi-scale template correlation. Hits scoring below the floor are
/// dropped; overlapping duplicates keep the higher-scoring classification.
pub fn locate_digits(region: &GrayImage, templates: &TemplateSet) -> Vec<DigitHit> {
    let mut hits = Vec::new();
    for glyph in glyph_boxes(region) {
        if let Some((digit, score)) = classify(region, glyph, templates) {
            hits.push(DigitHit { x: glyph.x, y: glyph.y + glyph.h / 2, digit, score });
        }
    }
    debug!(digits = hits.len(), "digit sweep complete");
    dedupe(hits)
}

/// External contours whose bounding boxes look like printed digits. The
/// brackets reject noise specks below and glued double digits above.
fn glyph_boxes(region: &GrayImage) -> Vec<GlyphBox> {
    find_contours::<i32>(region)
        .iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .filter_map(|c| bounding_box(&c.points))
        .filter(|b| {
            b.h >= MIN_GLYPH_HEIGHT
                && (MIN_GLYPH_WIDTH..=MAX_GLYPH_WIDTH).contains(&b.w)
                && (MIN_GLYPH_AREA..=MAX_GLYPH_AREA).contains(&(b.w * b.h))
        })
        .collect()
}

fn bounding_box(points: &[Point<i32>]) -> Option<GlyphBox> {
    let (first, rest) = points.split_first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in rest {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if min_x < 0 || min_y < 0 {
        return None;
    }
    Some(GlyphBox {
        x: min_x as u32,
        y: min_y as u32,
        w: (max_x - min_x + 1) as u32,
        h: (max_y - min_y + 1) as u32,
    })
}

/// Best digit for a candidate box: for every digit and every scale, both the
/// candidate and the template are brought to the scaled template size and
/// correlated; the digit with the highest per-digit maximum wins.
fn classify(region: &GrayImage, glyph: GlyphBox, templates: &TemplateSet) -> Option<(u8, f32)> {
    let candidate = imageops::crop_imm(region, glyph.x, glyph.y, glyph.w, glyph.h).to_image();

    let mut best: Option<(u8, f32)> = None;
    for digit in 0..=9u8 {
        let template = templates.digit(digit)?;
        let mut digit_best = f32::MIN;
        for scale in DIGIT_SCALES {
            let tw = ((template.width() as f32 * scale).round() as u32).max(1);
            let th = ((template.height() as f32 * scale).round() as u32).max(1);
            let scaled_template = imageops::resize(template, tw, th, FilterType::Triangle);
            let scaled_candidate = imageops::resize(&candidate, tw, th, FilterType::Triangle);
            let score = match_template(
                &scaled_candidate,
                &scaled_template,
                MatchTemplateMethod::CrossCorrelationNormalized,
            )
            .get_pixel(0, 0)[0];
            digit_best = digit_best.max(score);
        }
        if best.map_or(true, |(_, s)| digit_best > s) {
            best = Some((digit, digit_best));
        }
    }
    best.filter(|&(_, score)| score >= DIGIT_SCORE_FLOOR)
}

/// Contour detection can emit two boxes for one glyph. Within a 10 px radius
/// only the higher-scoring hit survives.
fn dedupe(mut hits: Vec<DigitHit>) -> Vec<DigitHit> {
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    let mut kept: Vec<DigitHit> = Vec::new();
    for hit in hits {
        let duplicate = kept.iter().any(|k| {
            let dx = k.x as i32 - hit.x as i32;
            let dy = k.y as i32 - hit.y as i32;
            dx * dx + dy * dy <= DUPLICATE_RADIUS_SQ
        });
        if !duplicate {
            kept.push(hit);
        }
    }
    kept
}
