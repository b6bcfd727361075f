use image::{DynamicImage, GrayImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};

// Binarizer
//------------------------------------------------------------------------------

/// Converts a color frame to a clean foreground/background image. The
/// threshold is inverted so ink reads as 255: correlation, contour finding
/// and row projections all treat ink as positive signal.
pub fn binarize(frame: &DynamicImage) -> GrayImage {
    binarize_gray(&frame.to_luma8())
}

/// Same convention for an already-grayscale image. Templates are pushed
/// through this as well so frames and templates agree on polarity.
pub fn binarize_gray(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    threshold(gray, level, ThresholdType::BinaryInverted)
}
