use std::path::Path;

use anyhow::{Context, Result};
use i2a_core::frame::FrameBuffer;

/// Charge une image depuis le disque et la décode en RGBA.
///
/// # Errors
/// Returns an error if the file is missing, unreadable, or not a supported
/// image format.
///
/// # Example
/// ```no_run
/// use i2a_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("photo.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer> {
    if !path.exists() {
        anyhow::bail!("Fichier introuvable : {}", path.display());
    }
    let img = image::open(path)
        .with_context(|| format!("Impossible de charger {}", path.display()))?;
    let frame = to_frame(img)?;
    log::debug!(
        "Image chargée : {} ({}x{})",
        path.display(),
        frame.width,
        frame.height
    );
    Ok(frame)
}

/// Décode une image déjà en mémoire.
///
/// # Errors
/// Returns an error if the bytes are not a supported image format.
///
/// # Example
/// ```
/// use i2a_source::image::load_image_from_memory;
/// assert!(load_image_from_memory(b"not an image").is_err());
/// ```
pub fn load_image_from_memory(bytes: &[u8]) -> Result<FrameBuffer> {
    let img = image::load_from_memory(bytes).context("Données d'image invalides")?;
    to_frame(img)
}

fn to_frame(img: image::DynamicImage) -> Result<FrameBuffer> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(FrameBuffer::from_rgba(width, height, rgba.into_raw())?)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn decodes_png_bytes() {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let frame = load_image_from_memory(&bytes).unwrap();
        assert_eq!(frame.dimensions(), (3, 2));
        assert_eq!(frame.rgb(2, 1), (10, 20, 30));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_image(Path::new("/nonexistent/cat.png")).unwrap_err();
        assert!(err.to_string().contains("introuvable"));
    }
}
