//! Apply baked tone curves to an image file.

use std::path::Path;

use image::{DynamicImage, Rgba32FImage};
use tonecurve_core::ToneLut;

/// Errors from the image pass.
#[derive(Debug, thiserror::Error)]
pub enum ImagePassError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
}

/// Map every pixel's RGB through `lut`; alpha is untouched.
pub fn apply_lut(image: &mut Rgba32FImage, lut: &ToneLut) {
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let [r, g, b] = lut.apply([r, g, b]);
        pixel.0 = [r, g, b, a];
    }
}

/// Load `input`, apply `lut`, and save to `output` as 8-bit RGBA.
///
/// The output format follows the extension of `output`.
pub fn grade_file(
    input: &Path,
    output: &Path,
    lut: &ToneLut,
) -> Result<(u32, u32), ImagePassError> {
    let img = image::open(input).map_err(ImagePassError::Decode)?;
    let mut rgba = img.to_rgba32f();
    let dimensions = rgba.dimensions();
    tracing::info!(
        "grading {} ({}x{})",
        input.display(),
        dimensions.0,
        dimensions.1
    );

    if lut.is_identity() {
        tracing::info!("all curves are identity, copying pixels unchanged");
    } else {
        apply_lut(&mut rgba, lut);
    }

    DynamicImage::ImageRgba32F(rgba)
        .to_rgba8()
        .save(output)
        .map_err(ImagePassError::Encode)?;
    Ok(dimensions)
}
