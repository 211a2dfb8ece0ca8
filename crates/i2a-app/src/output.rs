use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, RgbImage};
use i2a_core::error::CoreError;
use i2a_core::frame::FrameBuffer;

/// Format d'écriture : `override_name`, sinon l'extension, sinon PNG.
///
/// # Errors
/// Returns `UnsupportedFormat` when the name is unknown or this build
/// cannot encode it.
pub fn image_format(path: &Path, override_name: Option<&str>) -> Result<ImageFormat, CoreError> {
    let name = override_name
        .map(str::to_owned)
        .or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| "png".to_owned());
    match ImageFormat::from_extension(name.to_ascii_lowercase()) {
        Some(format) if format.writing_enabled() => Ok(format),
        _ => Err(CoreError::UnsupportedFormat { format: name }),
    }
}

/// Encode `frame` as an opaque RGB image at `path`.
///
/// # Errors
/// Returns an error for an unsupported format or a failed write.
pub fn save_image(frame: &FrameBuffer, path: &Path, override_name: Option<&str>) -> Result<()> {
    let format = image_format(path, override_name)?;
    let img = RgbImage::from_fn(frame.width, frame.height, |x, y| {
        let (r, g, b) = frame.rgb(x, y);
        image::Rgb([r, g, b])
    });
    img.save_with_format(path, format)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!(
        "Image écrite : {} ({}x{}, {format:?})",
        path.display(),
        frame.width,
        frame.height
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension_or_override() {
        assert_eq!(image_format(Path::new("a.PNG"), None), Ok(ImageFormat::Png));
        assert_eq!(image_format(Path::new("a.jpg"), None), Ok(ImageFormat::Jpeg));
        assert_eq!(image_format(Path::new("a"), None), Ok(ImageFormat::Png));
        assert_eq!(
            image_format(Path::new("a.png"), Some("bmp")),
            Ok(ImageFormat::Bmp)
        );
    }

    #[test]
    fn unknown_format_is_reported() {
        assert_eq!(
            image_format(Path::new("a.xyz"), None),
            Err(CoreError::UnsupportedFormat {
                format: "xyz".into()
            })
        );
    }

    #[test]
    fn saved_image_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let frame = FrameBuffer::from_fn(3, 2, |x, y| ((x * 80) as u8, (y * 100) as u8, 7));
        save_image(&frame, &path, None).unwrap();
        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(2, 1).0, [160, 100, 7]);
    }
}
