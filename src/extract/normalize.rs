use image::{imageops, GrayImage, ImageBuffer, Luma};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use tracing::debug;

// Empirical print ratios: ticket side to QR edge, and the QR's margin from
// the ticket border, both in units of the QR edge length.
pub const CANVAS_TO_QR_RATIO: f32 = 10.8;
pub const QR_MARGIN_RATIO: f32 = 0.2;

// QR anchor
//------------------------------------------------------------------------------

/// The ticket's QR code located in the binary frame. Corners are kept in the
/// code's own orientation (TL, TR, BR, BL as printed), which is what makes
/// the subsequent warp undo rotation as well as perspective.
#[derive(Debug, Clone, Copy)]
pub struct QrAnchor {
    pub corners: [(f32, f32); 4],
    pub edge: f32,
}

impl QrAnchor {
    /// Runs the QR detector against the binary frame. The pipeline keeps ink
    /// at 255, while the detector wants dark modules, so the frame is
    /// inverted for detection only.
    pub fn detect(binary: &GrayImage) -> Option<Self> {
        let mut dark = binary.clone();
        imageops::invert(&mut dark);

        let mut prepared = rqrr::PreparedImage::prepare(dark);
        let grids = prepared.detect_grids();
        let grid = grids.first()?;

        let corners = grid.bounds.map(|p| (p.x as f32, p.y as f32));
        let edge = mean_edge(&corners);
        if edge <= 0.0 {
            return None;
        }
        Some(Self { corners, edge })
    }
}

/// Mean of the two horizontal and two vertical edges of the corner quad.
fn mean_edge(c: &[(f32, f32); 4]) -> f32 {
    let dist = |a: (f32, f32), b: (f32, f32)| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
    (dist(c[0], c[1]) + dist(c[3], c[2]) + dist(c[0], c[3]) + dist(c[1], c[2])) / 4.0
}

// Normalization
//------------------------------------------------------------------------------

/// The upright ticket canvas: square, side `round(10.8 * s)`, with the QR
/// occupying a fixed square near the bottom-right corner.
#[derive(Debug)]
pub struct NormalizedTicket {
    pub canvas: GrayImage,
    pub qr_top: u32,
    pub edge: f32,
}

/// Warps the binary frame onto the canonical canvas so that the QR lands
/// upright at its printed position. Regions outside the source frame fill
/// with background.
pub fn normalize(binary: &GrayImage, anchor: &QrAnchor) -> Option<NormalizedTicket> {
    let s = anchor.edge;
    let side = (CANVAS_TO_QR_RATIO * s).round();
    let margin = (QR_MARGIN_RATIO * s).round();
    let qx = side - s - margin;
    let qy = side - s - margin;

    let dst = [(qx, qy), (qx + s, qy), (qx + s, qy + s), (qx, qy + s)];
    let projection = Projection::from_control_points(anchor.corners, dst)?;

    let mut canvas: GrayImage = ImageBuffer::new(side as u32, side as u32);
    warp_into(binary, &projection, Interpolation::Nearest, Luma([0u8]), &mut canvas);

    debug!(edge = s, side, "normalized ticket onto QR-anchored canvas");
    Some(NormalizedTicket { canvas, qr_top: qy as u32, edge: s })
}
