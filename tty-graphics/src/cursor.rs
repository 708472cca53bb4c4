// ABOUTME: Scoped cursor save/move/restore around graphics output
// ABOUTME: The restore sequence runs exactly once on every exit path, including errors

use crossterm::cursor::{MoveTo, RestorePosition, SavePosition};
use crossterm::queue;
use std::io::{self, Write};

/// Saves the cursor, moves it to an absolute cell and restores it when finished
/// or dropped. Writes made through the scope go to the wrapped writer.
pub struct CursorScope<'a, W: Write> {
    out: &'a mut W,
    restored: bool,
}

impl<'a, W: Write> CursorScope<'a, W> {
    /// Save the cursor position and move to the 0-based cell (`x`, `y`).
    /// `u16::MAX` has no 1-based CSI form and is rejected before anything is written.
    pub fn enter(out: &'a mut W, x: u16, y: u16) -> io::Result<Self> {
        if !in_range(x, y) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cell {},{} is out of range", x, y),
            ));
        }

        queue!(out, SavePosition)?;

        // From here on the position is saved, so the guard must exist
        let scope = Self {
            out,
            restored: false,
        };
        queue!(scope.out, MoveTo(x, y))?;
        Ok(scope)
    }

    /// Restore the cursor and flush, reporting any write error
    pub fn exit(mut self) -> io::Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        queue!(self.out, RestorePosition)?;
        self.out.flush()
    }
}

/// Whether (`x`, `y`) can be addressed with a cursor move
pub fn in_range(x: u16, y: u16) -> bool {
    x < u16::MAX && y < u16::MAX
}

impl<W: Write> Write for CursorScope<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> Drop for CursorScope<'_, W> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::warn!("Failed to restore cursor position: {}", e);
        }
    }
}
