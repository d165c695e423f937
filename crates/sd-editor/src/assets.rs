//! Image asset loading: fetch, sniff, decode.
//!
//! Loading is async and does not borrow the editor; the caller inserts the
//! finished `LoadedAsset` with `Editor::insert_asset`, so a slow load can
//! never observe or clobber the selection of an unrelated edit.

use sd_core::model::RasterImage;
use sd_core::parser::{SvgDocument, parse_svg_document};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

const SVG_MIME: &str = "image/svg+xml";

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Url(String),
    /// Bytes already in memory (file uploads), with the MIME type if known.
    Bytes { data: Vec<u8>, mime: Option<String> },
}

impl ImageSource {
    /// Vector if the URL ends in `.svg` or names the SVG MIME type, or
    /// if in-memory bytes declare or look like SVG.
    pub fn is_svg(&self) -> bool {
        match self {
            ImageSource::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or(url);
                path.to_ascii_lowercase().ends_with(".svg") || url.contains(SVG_MIME)
            }
            ImageSource::Bytes { data, mime } => bytes_are_svg(data, mime.as_deref()),
        }
    }
}

/// Declared SVG MIME type, or an `<svg` tag near the start of the bytes.
pub fn bytes_are_svg(data: &[u8], mime: Option<&str>) -> bool {
    if mime.is_some_and(|m| m.contains(SVG_MIME)) {
        return true;
    }
    let head = &data[..data.len().min(1024)];
    String::from_utf8_lossy(head).contains("<svg")
}

/// A decoded asset ready to be inserted.
#[derive(Debug, Clone)]
pub enum LoadedAsset {
    Raster(RasterImage),
    Vector(SvgDocument),
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("vector image has no drawable shapes")]
    EmptyVector,
}

/// Retrieves the bytes behind a URL.
pub trait AssetFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, AssetError>>;
}

/// Fetch (if needed) and decode an image source.
pub async fn load_asset<F: AssetFetcher>(
    fetcher: &F,
    source: ImageSource,
) -> Result<LoadedAsset, AssetError> {
    let svg = source.is_svg();
    let (bytes, origin) = match source {
        ImageSource::Url(url) => {
            log::debug!("fetching asset {url}");
            (fetcher.fetch(&url).await?, Some(url))
        }
        ImageSource::Bytes { data, .. } => (data, None),
    };
    decode_asset(&bytes, svg, origin)
}

/// Decode bytes as SVG or as a raster image.
pub fn decode_asset(
    bytes: &[u8],
    svg: bool,
    origin: Option<String>,
) -> Result<LoadedAsset, AssetError> {
    if svg {
        let text = std::str::from_utf8(bytes).map_err(|e| AssetError::Decode(e.to_string()))?;
        let doc = parse_svg_document(text).map_err(AssetError::Decode)?;
        if doc.shapes.is_empty() {
            return Err(AssetError::EmptyVector);
        }
        return Ok(LoadedAsset::Vector(doc));
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| AssetError::Decode(e.to_string()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(LoadedAsset::Raster(RasterImage {
        width,
        height,
        pixels: Arc::from(decoded.into_raw()),
        source: origin,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_detection() {
        assert!(ImageSource::Url("https://cdn.example/a/logo.SVG?v=2".into()).is_svg());
        assert!(ImageSource::Url("data:image/svg+xml;base64,PHN2Zz4=".into()).is_svg());
        assert!(!ImageSource::Url("https://cdn.example/photo.png".into()).is_svg());

        let sniffed = ImageSource::Bytes {
            data: br#"<?xml version="1.0"?><svg viewBox="0 0 1 1"/>"#.to_vec(),
            mime: None,
        };
        assert!(sniffed.is_svg());
        let declared = ImageSource::Bytes {
            data: vec![],
            mime: Some("image/svg+xml".into()),
        };
        assert!(declared.is_svg());
    }

    #[test]
    fn empty_vector_is_rejected() {
        let err = decode_asset(br#"<svg width="4" height="4"></svg>"#, true, None).unwrap_err();
        assert!(matches!(err, AssetError::EmptyVector));
    }

    #[test]
    fn garbage_raster_is_a_decode_error() {
        let err = decode_asset(b"not an image", false, None).unwrap_err();
        assert!(err.to_string().starts_with("failed to decode image"));
    }
}
