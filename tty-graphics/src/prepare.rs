// ABOUTME: Image preparation: decode, fit into a cell box, normalize color and serialize as PNG
// ABOUTME: Produces either a temp file path or in-memory bytes to match the transmission medium

use crate::codec::{bundled_codec, BundledCodec, ColorMode, ImageCodec, ResizeFilter};
use crate::command::Medium;
use crate::constants::temp_file;
use crate::error::{GraphicsError, Result};
use crate::metrics::CellMetrics;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Color modes the wire format can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreparedColor {
    Rgb,
    Rgba,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedData {
    /// PNG written to disk for the terminal to read (and delete)
    File(PathBuf),
    /// PNG bytes sent inline
    Bytes(Vec<u8>),
}

/// A serialized image ready for transmission. Consumed by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub color_mode: PreparedColor,
    pub data: PreparedData,
}

impl PreparedImage {
    pub fn medium(&self) -> Medium {
        match self.data {
            PreparedData::File(_) => Medium::File,
            PreparedData::Bytes(_) => Medium::Direct,
        }
    }

    /// Raw (pre-base64) payload: the file path for the file medium, PNG bytes otherwise
    pub fn into_payload(self) -> Vec<u8> {
        match self.data {
            PreparedData::File(path) => path_bytes(&path),
            PreparedData::Bytes(bytes) => bytes,
        }
    }
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

/// Target size for an image of `source` pixels inside `bounds`, or `None` when it
/// already fits. Never upscales; aspect ratio is preserved up to integer truncation.
/// Each axis is clamped to at least 1 px, so `bounds` must be non-zero on both axes.
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> Option<(u32, u32)> {
    let (width, height) = source;
    let (max_width, max_height) = bounds;

    if width <= max_width && height <= max_height {
        return None;
    }

    let (w, h) = (u64::from(width), u64::from(height));
    let (bw, bh) = (u64::from(max_width), u64::from(max_height));

    // Compare bw/w against bh/h without floating point
    let (target_width, target_height) = if bw * h <= bh * w {
        (bw, h * bw / w)
    } else {
        (w * bh / h, bh)
    };

    Some((
        u32::try_from(target_width).unwrap_or(max_width).max(1),
        u32::try_from(target_height).unwrap_or(max_height).max(1),
    ))
}

pub struct ImagePreparer<C: ImageCodec> {
    codec: C,
    medium: Medium,
    filter: ResizeFilter,
    temp_dir: Option<PathBuf>,
}

impl ImagePreparer<BundledCodec> {
    /// Preparer backed by the codec compiled into this build
    #[cfg_attr(not(feature = "codec"), allow(unreachable_code))]
    pub fn bundled() -> Result<Self> {
        Ok(Self::new(bundled_codec()?))
    }
}

impl<C: ImageCodec> ImagePreparer<C> {
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            medium: Medium::default(),
            filter: ResizeFilter::default(),
            temp_dir: None,
        }
    }

    pub fn with_medium(mut self, medium: Medium) -> Self {
        self.medium = medium;
        self
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_temp_dir(mut self, temp_dir: Option<PathBuf>) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }

    /// Load `path` and fit it into a `width_cells` x `height_cells` box
    pub fn prepare(
        &self,
        path: &Path,
        width_cells: u32,
        height_cells: u32,
        metrics: &CellMetrics,
    ) -> Result<PreparedImage> {
        if width_cells == 0 || height_cells == 0 {
            return Err(GraphicsError::EmptyBox {
                width: width_cells,
                height: height_cells,
            });
        }

        let bounds = metrics.pixel_box(width_cells, height_cells);
        let mut image = self.codec.open(path)?;
        let source = self.codec.dimensions(&image);

        if let Some((width, height)) = fit_within(source, bounds) {
            log::debug!(
                "Scaling {} from {}x{} to {}x{} (box {}x{})",
                path.display(),
                source.0,
                source.1,
                width,
                height,
                bounds.0,
                bounds.1
            );
            image = self.codec.resize(image, width, height, self.filter);
        } else {
            log::debug!(
                "{} fits within {}x{}, no scaling",
                path.display(),
                bounds.0,
                bounds.1
            );
        }

        let color_mode = match self.codec.color_mode(&image) {
            ColorMode::Rgb => PreparedColor::Rgb,
            ColorMode::Rgba => PreparedColor::Rgba,
            ColorMode::Other => {
                log::debug!("Converting {} to RGB", path.display());
                image = self.codec.convert_to_rgb(image);
                PreparedColor::Rgb
            }
        };

        let (pixel_width, pixel_height) = self.codec.dimensions(&image);
        let data = match self.medium {
            Medium::File => PreparedData::File(self.write_temp_png(&image)?),
            Medium::Direct => {
                let mut bytes = Vec::new();
                self.codec.write_png(&image, &mut bytes)?;
                PreparedData::Bytes(bytes)
            }
        };

        Ok(PreparedImage {
            pixel_width,
            pixel_height,
            color_mode,
            data,
        })
    }

    fn write_temp_png(&self, image: &C::Image) -> Result<PathBuf> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(temp_file::PREFIX).suffix(temp_file::SUFFIX);

        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(GraphicsError::image_encode)?;

        {
            let mut writer = BufWriter::new(file.as_file_mut());
            self.codec.write_png(image, &mut writer)?;
            writer.flush().map_err(GraphicsError::image_encode)?;
        }

        // The terminal removes the file once it has read it
        let (_, path) = file.keep().map_err(GraphicsError::image_encode)?;
        log::debug!("Wrote prepared image to {}", path.display());
        Ok(path)
    }
}
