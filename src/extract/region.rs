use image::{imageops, GrayImage};
use imageproc::{distance_transform::Norm, morphology::close};
use tracing::debug;

// The dashed separator sits in a fixed fraction of the band above the QR.
const SEPARATOR_SEARCH_LO: f32 = 0.58;
const SEPARATOR_SEARCH_HI: f32 = 0.72;
// A dashed row fills a moderate share of the width; solid header rows fill
// more, blank rows less.
const SEPARATOR_BAND_LO: f32 = 0.3;
const SEPARATOR_BAND_HI: f32 = 0.7;
// Margin absorbing small localization error.
const REGION_MARGIN: u32 = 10;

// Plays region
//------------------------------------------------------------------------------

/// The horizontal band holding the numeric plays, between the dashed header
/// separator and the QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaysRegion {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Finds the plays band on the normalized canvas. The separator is the first
/// row inside the search window whose foreground projection falls between
/// 30% and 70% of the window's maximum.
pub fn locate_plays_region(canvas: &GrayImage, qr_top: u32) -> Option<PlaysRegion> {
    let w = canvas.width();
    let band_h = qr_top.min(canvas.height());
    if band_h == 0 || w == 0 {
        return None;
    }

    let lo = (band_h as f32 * SEPARATOR_SEARCH_LO) as u32;
    let hi = (band_h as f32 * SEPARATOR_SEARCH_HI) as u32;
    if hi <= lo {
        return None;
    }

    let projection: Vec<u32> = (lo..hi).map(|y| row_projection(canvas, y)).collect();
    let max = *projection.iter().max()?;
    if max == 0 {
        return None;
    }

    let band_lo = max as f32 * SEPARATOR_BAND_LO;
    let band_hi = max as f32 * SEPARATOR_BAND_HI;
    let separator = projection
        .iter()
        .position(|&p| p as f32 >= band_lo && p as f32 <= band_hi)
        .map(|i| lo + i as u32)?;

    let top = separator + REGION_MARGIN;
    let bottom = qr_top.saturating_sub(REGION_MARGIN);
    if bottom <= top {
        return None;
    }

    debug!(separator, top, bottom, "located plays region");
    Some(PlaysRegion { x: 0, y: top, w, h: bottom - top })
}

fn row_projection(canvas: &GrayImage, y: u32) -> u32 {
    (0..canvas.width()).filter(|&x| canvas.get_pixel(x, y)[0] > 0).count() as u32
}

pub fn crop(canvas: &GrayImage, region: PlaysRegion) -> GrayImage {
    imageops::crop_imm(canvas, region.x, region.y, region.w, region.h).to_image()
}

// Morphological cleaner
//------------------------------------------------------------------------------

/// Joins broken digit strokes. Equivalent to two passes of a 3x3 closing:
/// one L-inf closing of radius 2 composes the same dilations and erosions.
pub fn clean(region: &GrayImage) -> GrayImage {
    close(region, Norm::LInf, 2)
}

#[cfg(test)]
mod region_tests {
    use image::{GrayImage, Luma};

    use super::{clean, crop, locate_plays_region, PlaysRegion};

    fn fill_row(img: &mut GrayImage, y: u32, step: u32) {
        for x in 0..img.width() {
            if step == 0 || (x / step) % 2 == 0 {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }
    }

    #[test]
    fn test_separator_is_first_moderate_row() {
        // Band above the QR is 300 rows; search window is [174, 216).
        let mut canvas = GrayImage::new(200, 400);
        fill_row(&mut canvas, 180, 0); // solid header row: maximal projection
        fill_row(&mut canvas, 190, 10); // dashed separator: ~half projection

        let region = locate_plays_region(&canvas, 300).unwrap();

        assert_eq!(region, PlaysRegion { x: 0, y: 200, w: 200, h: 90 });
    }

    #[test]
    fn test_no_separator_yields_none() {
        let canvas = GrayImage::new(200, 400);
        assert!(locate_plays_region(&canvas, 300).is_none());
    }

    #[test]
    fn test_solid_rows_only_yields_none() {
        let mut canvas = GrayImage::new(200, 400);
        fill_row(&mut canvas, 180, 0);
        fill_row(&mut canvas, 190, 0);
        assert!(locate_plays_region(&canvas, 300).is_none());
    }

    #[test]
    fn test_crop_extracts_rect() {
        let mut canvas = GrayImage::new(50, 50);
        canvas.put_pixel(12, 22, Luma([255u8]));
        let out = crop(&canvas, PlaysRegion { x: 10, y: 20, w: 20, h: 10 });
        assert_eq!(out.dimensions(), (20, 10));
        assert_eq!(out.get_pixel(2, 2)[0], 255);
    }

    #[test]
    fn test_clean_bridges_stroke_gap() {
        // Two halves of a stroke with a 2 px break between them.
        let mut img = GrayImage::new(40, 20);
        for x in 5..17 {
            img.put_pixel(x, 10, Luma([255u8]));
        }
        for x in 19..31 {
            img.put_pixel(x, 10, Luma([255u8]));
        }
        let cleaned = clean(&img);
        assert_eq!(cleaned.get_pixel(17, 10)[0], 255);
        assert_eq!(cleaned.get_pixel(18, 10)[0], 255);
    }

    #[test]
    fn test_clean_keeps_distant_glyphs_apart() {
        let mut img = GrayImage::new(60, 20);
        for y in 5..15 {
            for x in 5..15 {
                img.put_pixel(x, y, Luma([255u8]));
            }
            for x in 30..40 {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }
        let cleaned = clean(&img);
        assert_eq!(cleaned.get_pixel(22, 10)[0], 0);
    }
}
