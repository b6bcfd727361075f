//! Ticket-to-plays extraction pipeline.
//!
//! Two paths produce plays and share only the validator: the primary path
//! normalizes the frame on its QR anchor and template-matches digits; the
//! textual fallback repairs externally recognized text. The dispatcher runs
//! the fallback only when the primary path yields zero plays.

use std::sync::Once;

use image::{DynamicImage, GrayImage};
use tracing::{debug, warn};

use crate::{
    templates::TemplateSet,
    types::{Play, TicketResult},
};

pub mod binarize;
pub mod fallback;
pub mod matcher;
pub mod normalize;
pub mod region;
pub mod rows;

#[cfg(test)]
pub(crate) mod testfont;

// Recognizer
//------------------------------------------------------------------------------

/// External OCR collaborator. Only consulted when template matching fails,
/// and always with the un-normalized grayscale frame.
pub trait Recognizer {
    fn recognize(&self, frame: &GrayImage) -> TicketResult<String>;
}

// Dispatcher
//------------------------------------------------------------------------------

static TEMPLATES_UNAVAILABLE: Once = Once::new();

/// Extracts every recoverable play from a ticket photograph, top-to-bottom.
/// An empty list means no validated play; hard image or recognizer failures
/// surface as errors. Each call is a pure function of the frame and the
/// immutable template set.
pub fn extract_plays(
    frame: &DynamicImage,
    templates: &TemplateSet,
    recognizer: Option<&dyn Recognizer>,
) -> TicketResult<Vec<Play>> {
    let binary = binarize::binarize(frame);

    let plays = if templates.is_complete() {
        template_match_plays(&binary, templates)
    } else {
        TEMPLATES_UNAVAILABLE
            .call_once(|| warn!("template set incomplete, primary extraction disabled"));
        Vec::new()
    };
    if !plays.is_empty() {
        return Ok(plays);
    }

    match recognizer {
        Some(recognizer) => {
            debug!("primary path yielded no plays, consulting recognizer");
            let text = recognizer.recognize(&frame.to_luma8())?;
            Ok(fallback::extract(&text))
        }
        None => Ok(plays),
    }
}

/// The QR-anchored template-matching path. Every miss short-circuits to an
/// empty result; the dispatcher decides what happens next.
fn template_match_plays(binary: &GrayImage, templates: &TemplateSet) -> Vec<Play> {
    let Some(anchor) = normalize::QrAnchor::detect(binary) else {
        debug!("no QR anchor found");
        return Vec::new();
    };
    let Some(ticket) = normalize::normalize(binary, &anchor) else {
        debug!("degenerate anchor quad, cannot normalize");
        return Vec::new();
    };
    let Some(bounds) = region::locate_plays_region(&ticket.canvas, ticket.qr_top) else {
        debug!("no separator found above the QR");
        return Vec::new();
    };
    let plays_region = region::clean(&region::crop(&ticket.canvas, bounds));

    let markers = matcher::locate_pb_markers(&plays_region, templates);
    let hits = matcher::locate_digits(&plays_region, templates);
    rows::reconstruct_plays(hits, &markers)
}
