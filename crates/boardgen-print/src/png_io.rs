//! PNG output.

use std::fs;
use std::path::Path;

use boardgen_core::GrayImage;

use crate::PrintError;

const METRES_PER_INCH: f64 = 0.0254;

/// Encode an 8-bit grayscale PNG.
///
/// With `dpi` set, a `pHYs` chunk records the physical resolution so that the
/// board prints at the intended scale.
pub fn encode_png(img: &GrayImage, dpi: Option<f32>) -> Result<Vec<u8>, PrintError> {
    let view = img.view();
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, view.width as u32, view.height as u32);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        if let Some(dpi) = dpi {
            let ppm = pixels_per_metre(dpi)?;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));
        }
        let mut writer = encoder.write_header()?;
        writer.write_image_data(view.data)?;
        writer.finish()?;
    }
    Ok(out)
}

/// Encode `img` and write it to `path`.
///
/// The image is fully encoded before the file is created, so an encoding
/// failure never leaves a truncated file behind.
pub fn write_png(path: impl AsRef<Path>, img: &GrayImage, dpi: Option<f32>) -> Result<(), PrintError> {
    let path = path.as_ref();
    let bytes = encode_png(img, dpi)?;
    fs::write(path, &bytes)?;
    log::info!(
        "wrote {}x{} PNG ({} bytes) to {}",
        img.width,
        img.height,
        bytes.len(),
        path.display()
    );
    Ok(())
}

fn pixels_per_metre(dpi: f32) -> Result<u32, PrintError> {
    if !dpi.is_finite() || dpi <= 0.0 {
        return Err(PrintError::InvalidDpi(dpi));
    }
    Ok((dpi as f64 / METRES_PER_INCH).round() as u32)
}
