//! PNG export of the design.

use crate::sync::Editor;
use sd_core::scene::{RasterError, RasterFormat, RasterOptions, SceneCapability};
use std::time::{SystemTime, UNIX_EPOCH};

/// An encoded image plus the name it should be downloaded under.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime: &'static str,
}

impl<S: SceneCapability> Editor<S> {
    /// Deselect, redraw, and rasterize the scene. `timestamp_ms` goes into
    /// the filename. Returns `None` without a scene or if encoding fails.
    pub fn export(&mut self, timestamp_ms: u64) -> Option<ExportedImage> {
        self.export_with(timestamp_ms, |scene, options| scene.export_raster(options))
    }

    /// `export` with a caller-supplied rasterizer, for hosts that compose
    /// the image themselves (the browser draws text with its own fonts).
    pub fn export_with<F>(&mut self, timestamp_ms: u64, rasterize: F) -> Option<ExportedImage>
    where
        F: FnOnce(&S, &RasterOptions) -> Result<Vec<u8>, RasterError>,
    {
        let options = RasterOptions {
            format: RasterFormat::Png,
            quality: self.config.export_quality,
            multiplier: self.config.export_multiplier,
        };
        let filename = format!(
            "{}-{timestamp_ms}.{}",
            self.config.export_prefix,
            options.format.extension()
        );

        let Some(scene) = self.scene_mut() else {
            log::debug!("export: no scene mounted");
            return None;
        };
        scene.set_active_node(None);
        scene.request_redraw();
        let result = rasterize(&*scene, &options);
        self.reconcile();

        match result {
            Ok(bytes) => {
                log::debug!("exported {filename} ({} bytes)", bytes.len());
                Some(ExportedImage {
                    bytes,
                    filename,
                    mime: options.format.mime(),
                })
            }
            Err(e) => {
                log::error!("export failed: {e}");
                None
            }
        }
    }

    /// `export` stamped with the current wall-clock time. Native only; the
    /// browser bridge passes `Date.now()` to `export` instead.
    pub fn export_now(&mut self) -> Option<ExportedImage> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        self.export(millis)
    }
}
