//! Image loading.

use crate::error::ImageLoadError;
use image::GenericImageView;
use std::path::Path;
use tracing::debug;

/// Reads one image from disk into an engine-ready representation
pub trait ImageLoader {
    /// Loaded image type
    type Image;

    /// Load the image at `path`
    fn load(&self, path: &Path) -> Result<Self::Image, ImageLoadError>;
}

/// RGB raster, 3 bytes per pixel, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Interleaved RGB bytes
    pub pixels: Vec<u8>,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

/// [`ImageLoader`] backed by the `image` crate.
///
/// Images whose longer side exceeds `max_dim` are downscaled with a triangle
/// filter before conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterLoader {
    max_dim: Option<u32>,
}

impl RasterLoader {
    /// Loader that keeps images at full resolution
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader that caps the longer image side at `max_dim` (`None` = no cap)
    pub fn with_max_dim(max_dim: Option<u32>) -> Self {
        Self {
            max_dim: max_dim.filter(|&d| d > 0),
        }
    }
}

impl ImageLoader for RasterLoader {
    type Image = RasterImage;

    fn load(&self, path: &Path) -> Result<RasterImage, ImageLoadError> {
        if !path.exists() {
            return Err(ImageLoadError::Missing(path.to_path_buf()));
        }
        let img = image::open(path)?;
        let rgb = match self.max_dim {
            Some(max_dim) if img.width().max(img.height()) > max_dim => {
                let (orig_w, orig_h) = img.dimensions();
                debug!(
                    "Downscaling {} from {}x{} to fit {}",
                    path.display(),
                    orig_w,
                    orig_h,
                    max_dim
                );
                img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
                    .to_rgb8()
            }
            _ => img.to_rgb8(),
        };
        let (width, height) = rgb.dimensions();
        Ok(RasterImage {
            pixels: rgb.into_raw(),
            width: width as usize,
            height: height as usize,
        })
    }
}
