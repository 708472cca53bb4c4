// ABOUTME: Injected image codec capability used by the image preparer
// ABOUTME: Bundles an `image`-crate backend; builds without it report the codec as unavailable

use crate::error::{GraphicsError, Result};
use serde::Deserialize;
use std::io::Write;
use std::path::Path;

/// Color layout of a decoded raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgb,
    Rgba,
    /// Anything the wire format cannot declare (grayscale, 16-bit, float, ...)
    Other,
}

/// Resampling filter used when downscaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

/// Operations the preparer needs from an image library
pub trait ImageCodec {
    type Image;

    fn open(&self, path: &Path) -> Result<Self::Image>;

    fn dimensions(&self, image: &Self::Image) -> (u32, u32);

    fn color_mode(&self, image: &Self::Image) -> ColorMode;

    fn resize(&self, image: Self::Image, width: u32, height: u32, filter: ResizeFilter)
        -> Self::Image;

    fn convert_to_rgb(&self, image: Self::Image) -> Self::Image;

    /// Write the image as a minimally compressed PNG
    fn write_png(&self, image: &Self::Image, out: &mut dyn Write) -> Result<()>;
}

#[cfg(feature = "codec")]
pub use bundled::ImageCrateCodec as BundledCodec;

#[cfg(not(feature = "codec"))]
pub use unavailable::NoCodec as BundledCodec;

/// The codec compiled into this build
pub fn bundled_codec() -> Result<BundledCodec> {
    #[cfg(feature = "codec")]
    {
        Ok(bundled::ImageCrateCodec)
    }
    #[cfg(not(feature = "codec"))]
    {
        Err(GraphicsError::CodecUnavailable)
    }
}

#[cfg(feature = "codec")]
mod bundled {
    use super::*;
    use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
    use image::imageops::FilterType;
    use image::{DynamicImage, ImageReader};

    #[derive(Debug, Default, Clone, Copy)]
    pub struct ImageCrateCodec;

    impl From<ResizeFilter> for FilterType {
        fn from(filter: ResizeFilter) -> Self {
            match filter {
                ResizeFilter::Nearest => FilterType::Nearest,
                ResizeFilter::Triangle => FilterType::Triangle,
                ResizeFilter::CatmullRom => FilterType::CatmullRom,
                ResizeFilter::Gaussian => FilterType::Gaussian,
                ResizeFilter::Lanczos3 => FilterType::Lanczos3,
            }
        }
    }

    impl ImageCodec for ImageCrateCodec {
        type Image = DynamicImage;

        fn open(&self, path: &Path) -> Result<DynamicImage> {
            let mut reader = ImageReader::open(path)
                .map_err(|e| GraphicsError::image_decode(path, e))?
                .with_guessed_format()
                .map_err(|e| GraphicsError::image_decode(path, e))?;

            // Large sources are expected; they get downscaled right away
            reader.no_limits();

            reader
                .decode()
                .map_err(|e| GraphicsError::image_decode(path, e))
        }

        fn dimensions(&self, image: &DynamicImage) -> (u32, u32) {
            (image.width(), image.height())
        }

        fn color_mode(&self, image: &DynamicImage) -> ColorMode {
            match image {
                DynamicImage::ImageRgb8(_) => ColorMode::Rgb,
                DynamicImage::ImageRgba8(_) => ColorMode::Rgba,
                _ => ColorMode::Other,
            }
        }

        fn resize(
            &self,
            image: DynamicImage,
            width: u32,
            height: u32,
            filter: ResizeFilter,
        ) -> DynamicImage {
            image.resize_exact(width, height, filter.into())
        }

        fn convert_to_rgb(&self, image: DynamicImage) -> DynamicImage {
            DynamicImage::ImageRgb8(image.to_rgb8())
        }

        fn write_png(&self, image: &DynamicImage, out: &mut dyn Write) -> Result<()> {
            let encoder =
                PngEncoder::new_with_quality(out, CompressionType::Fast, PngFilter::NoFilter);
            image
                .write_with_encoder(encoder)
                .map_err(GraphicsError::image_encode)
        }
    }
}

#[cfg(not(feature = "codec"))]
mod unavailable {
    use super::*;
    use std::convert::Infallible;

    /// Stand-in codec for builds without an image library. Never constructed.
    #[derive(Debug)]
    pub enum NoCodec {}

    impl ImageCodec for NoCodec {
        type Image = Infallible;

        fn open(&self, _path: &Path) -> Result<Infallible> {
            match *self {}
        }

        fn dimensions(&self, image: &Infallible) -> (u32, u32) {
            match *image {}
        }

        fn color_mode(&self, image: &Infallible) -> ColorMode {
            match *image {}
        }

        fn resize(&self, image: Infallible, _: u32, _: u32, _: ResizeFilter) -> Infallible {
            match image {}
        }

        fn convert_to_rgb(&self, image: Infallible) -> Infallible {
            match image {}
        }

        fn write_png(&self, image: &Infallible, _out: &mut dyn Write) -> Result<()> {
            match *image {}
        }
    }
}


#[cfg(all(test, not(feature = "codec")))]
mod unavailable_tests {
    use super::*;

    #[test]
    fn test_bundled_codec_unavailable() {
        let err = bundled_codec().unwrap_err();
        assert!(matches!(err, GraphicsError::CodecUnavailable));
        assert!(err.help_text().unwrap().contains("codec"));
    }
}
