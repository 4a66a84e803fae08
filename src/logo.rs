use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui::{ColorImage, DroppedFile};
use resvg::usvg;

use crate::error::LogoError;

const SVG_MEDIA_TYPE: &str = "image/svg+xml";

/// Longest side of a decoded logo. Keeps textures well under GPU limits.
pub const LOGO_MAX_SIDE: u32 = 256;

/// Extensions offered by the file picker.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "ico", "tif", "tiff",
];

#[derive(Debug, Clone)]
pub enum LogoSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// A file offered as the invoice logo, not yet validated.
#[derive(Debug, Clone)]
pub struct LogoFile {
    pub name: String,
    pub media_type: String,
    pub source: LogoSource,
}

impl LogoFile {
    pub fn from_path(path: &Path) -> Self {
        Self {
            name: display_name(path),
            media_type: media_type_for(path).to_string(),
            source: LogoSource::Path(path.to_path_buf()),
        }
    }

    /// Native drops carry a path, web drops carry bytes and a MIME type.
    pub fn from_dropped(file: &DroppedFile) -> Option<Self> {
        let source = match (&file.bytes, &file.path) {
            (Some(bytes), _) => LogoSource::Bytes(bytes.clone()),
            (None, Some(path)) => LogoSource::Path(path.clone()),
            (None, None) => return None,
        };
        let name = if file.name.is_empty() {
            file.path.as_deref().map(display_name).unwrap_or_default()
        } else {
            file.name.clone()
        };
        let media_type = if file.mime.is_empty() {
            media_type_for(Path::new(&name)).to_string()
        } else {
            file.mime.clone()
        };
        Some(Self { name, media_type, source })
    }

    pub fn read_bytes(&self) -> Result<Cow<'_, [u8]>, LogoError> {
        match &self.source {
            LogoSource::Bytes(bytes) => Ok(Cow::Borrowed(&bytes[..])),
            LogoSource::Path(path) => fs::read(path).map(Cow::Owned).map_err(|source| LogoError::Read {
                name: self.name.clone(),
                source,
            }),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Media type implied by a file extension.
pub fn media_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => SVG_MEDIA_TYPE,
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Only `image/*` uploads are accepted.
pub fn ensure_image(file: &LogoFile) -> Result<(), LogoError> {
    if file.media_type.starts_with("image/") {
        Ok(())
    } else {
        Err(LogoError::InvalidType {
            media_type: file.media_type.clone(),
        })
    }
}

/// Decodes the logo into pixels ready for upload as a texture.
///
/// Either side ends up at most [`LOGO_MAX_SIDE`] pixels, aspect ratio kept.
/// SVG is rasterized with resvg; everything else goes through the `image`
/// decoders.
pub fn decode(file: &LogoFile) -> Result<ColorImage, LogoError> {
    let bytes = file.read_bytes()?;
    if file.media_type == SVG_MEDIA_TYPE {
        return rasterize_svg(file, &bytes);
    }

    let mut image = image::load_from_memory(&bytes).map_err(|e| decode_error(file, e))?;
    if image.width() > LOGO_MAX_SIDE || image.height() > LOGO_MAX_SIDE {
        image = image.thumbnail(LOGO_MAX_SIDE, LOGO_MAX_SIDE);
    }
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

fn rasterize_svg(file: &LogoFile, data: &[u8]) -> Result<ColorImage, LogoError> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())
        .map_err(|e| decode_error(file, e))?;

    let natural = tree.size();
    let scale = (LOGO_MAX_SIDE as f32 / natural.width().max(natural.height())).min(1.0);
    let width = (natural.width() * scale).round().max(1.0) as u32;
    let height = (natural.height() * scale).round().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| decode_error(file, "could not allocate SVG pixmap"))?;
    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied RGBA
    let size = [pixmap.width() as usize, pixmap.height() as usize];
    Ok(ColorImage::from_rgba_premultiplied(size, pixmap.data()))
}

fn decode_error(file: &LogoFile, reason: impl ToString) -> LogoError {
    LogoError::Decode {
        name: file.name.clone(),
        reason: reason.to_string(),
    }
}
