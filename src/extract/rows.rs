use tracing::debug;

use super::matcher::{DigitHit, PbMarker};
use crate::types::Play;

// Hits within this vertical distance of a row's first hit belong to the row;
// a row's PB marker must also sit within it.
const ROW_TOLERANCE: u32 = 40;
// Adjacent digits closer than this in x form one two-digit number.
const PAIR_DISTANCE: u32 = 110;
// A full row carries ten white digits before the marker and a two-digit
// powerball after it.
const WHITE_DIGIT_LIMIT: usize = 10;
const POWERBALL_DIGIT_LIMIT: usize = 2;

// Row grouping
//------------------------------------------------------------------------------

/// Greedy single-linkage clustering on the vertical coordinate: hits are
/// y-sorted and a new row starts whenever a hit sits more than 40 px below
/// the current row's first hit. Rows come out in top-to-bottom order.
fn group_rows(mut hits: Vec<DigitHit>) -> Vec<Vec<DigitHit>> {
    hits.sort_by_key(|h| (h.y, h.x));
    let mut rows: Vec<Vec<DigitHit>> = Vec::new();
    for hit in hits {
        match rows.last_mut() {
            Some(row) if hit.y - row[0].y <= ROW_TOLERANCE => row.push(hit),
            _ => rows.push(vec![hit]),
        }
    }
    rows
}

// Play reconstruction
//------------------------------------------------------------------------------

/// Turns classified digits and PB markers into validated plays, one per
/// recoverable row. Rows that fail marker assignment, pairing, or validation
/// are dropped silently; the remaining rows keep ticket order.
pub fn reconstruct_plays(hits: Vec<DigitHit>, markers: &[PbMarker]) -> Vec<Play> {
    let mut plays = Vec::new();
    for mut row in group_rows(hits) {
        if let Some(play) = reconstruct_row(&mut row, markers) {
            plays.push(play);
        }
    }
    debug!(plays = plays.len(), "row reconstruction complete");
    plays
}

fn reconstruct_row(row: &mut [DigitHit], markers: &[PbMarker]) -> Option<Play> {
    row.sort_by_key(|h| h.x);
    let mean_y = row.iter().map(|h| h.y as f32).sum::<f32>() / row.len() as f32;

    let marker = nearest_marker(markers, mean_y)?;

    let before: Vec<&DigitHit> = row.iter().filter(|h| h.x < marker.x).collect();
    let after: Vec<&DigitHit> = row.iter().filter(|h| h.x > marker.right()).collect();

    let skip = before.len().saturating_sub(WHITE_DIGIT_LIMIT);
    let white = pair_digits(&before[skip..]);
    let powerball = *pair_digits(&after[..after.len().min(POWERBALL_DIGIT_LIMIT)]).first()?;

    Play::from_parts(&white, powerball)
}

/// The marker whose vertical center is closest to the row's mean y, provided
/// it falls within the row tolerance; equidistant markers resolve to the
/// smaller y.
fn nearest_marker(markers: &[PbMarker], mean_y: f32) -> Option<&PbMarker> {
    markers
        .iter()
        .min_by(|a, b| {
            let da = (a.center_y() - mean_y).abs();
            let db = (b.center_y() - mean_y).abs();
            da.total_cmp(&db).then(a.y.cmp(&b.y))
        })
        .filter(|m| (m.center_y() - mean_y).abs() <= ROW_TOLERANCE as f32)
}

/// Steps through x-sorted hits pairing neighbors within 110 px into
/// two-digit numbers; an isolated digit passes through on its own.
fn pair_digits(hits: &[&DigitHit]) -> Vec<u8> {
    let mut numbers = Vec::new();
    let mut i = 0;
    while i < hits.len() {
        if i + 1 < hits.len() && hits[i + 1].x - hits[i].x <= PAIR_DISTANCE {
            numbers.push(hits[i].digit * 10 + hits[i + 1].digit);
            i += 2;
        } else {
            numbers.push(hits[i].digit);
            i += 1;
        }
    }
    numbers
}
