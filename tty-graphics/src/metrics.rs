// ABOUTME: Terminal geometry probe that derives the pixel size of one character cell
// ABOUTME: Queried fresh on every invocation since the terminal may be resized between calls

use crate::error::{GraphicsError, Result};

/// Raw window geometry as reported by the terminal device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub columns: u16,
    pub rows: u16,
    pub pixel_width: u16,
    pub pixel_height: u16,
}

/// Source of window geometry. Tests substitute a fixed geometry.
pub trait GeometrySource {
    fn window_geometry(&self) -> std::io::Result<WindowGeometry>;
}

/// Queries the controlling terminal via crossterm (TIOCGWINSZ on unix)
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalGeometry;

impl GeometrySource for TerminalGeometry {
    fn window_geometry(&self) -> std::io::Result<WindowGeometry> {
        let size = crossterm::terminal::window_size()?;
        Ok(WindowGeometry {
            columns: size.columns,
            rows: size.rows,
            pixel_width: size.width,
            pixel_height: size.height,
        })
    }
}

impl GeometrySource for WindowGeometry {
    fn window_geometry(&self) -> std::io::Result<WindowGeometry> {
        Ok(*self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub cell_pixel_width: u32,
    pub cell_pixel_height: u32,
}

impl CellMetrics {
    pub fn from_geometry(geometry: WindowGeometry) -> Result<Self> {
        if geometry.columns == 0 || geometry.rows == 0 {
            return Err(GraphicsError::TerminalQuery(format!(
                "terminal reported an empty grid ({}x{} cells)",
                geometry.columns, geometry.rows
            )));
        }

        let cell_pixel_width = u32::from(geometry.pixel_width) / u32::from(geometry.columns);
        let cell_pixel_height = u32::from(geometry.pixel_height) / u32::from(geometry.rows);

        // Zero here means the terminal left the pixel fields unset
        if cell_pixel_width == 0 || cell_pixel_height == 0 {
            return Err(GraphicsError::TerminalQuery(format!(
                "terminal did not report usable pixel dimensions ({}x{} px for {}x{} cells)",
                geometry.pixel_width, geometry.pixel_height, geometry.columns, geometry.rows
            )));
        }

        Ok(Self {
            cell_pixel_width,
            cell_pixel_height,
        })
    }

    /// Pixel box covered by a block of cells
    pub fn pixel_box(&self, width_cells: u32, height_cells: u32) -> (u32, u32) {
        (
            width_cells.saturating_mul(self.cell_pixel_width),
            height_cells.saturating_mul(self.cell_pixel_height),
        )
    }
}

/// Query the terminal and compute cell metrics. Never cached.
pub fn measure(source: &impl GeometrySource) -> Result<CellMetrics> {
    let geometry = source
        .window_geometry()
        .map_err(|e| GraphicsError::TerminalQuery(e.to_string()))?;

    log::debug!(
        "Terminal geometry: {}x{} cells, {}x{} px",
        geometry.columns,
        geometry.rows,
        geometry.pixel_width,
        geometry.pixel_height
    );

    CellMetrics::from_geometry(geometry)
}
