// ABOUTME: Protocol encoder writing graphics commands to an explicitly passed output stream
// ABOUTME: Implements load, display, draw and clear on top of framing and cursor scoping

use crate::command::{serialize_and_chunk, DeleteTarget, GraphicsCommand, ImageId};
use crate::constants::quiet;
use crate::cursor::{self, CursorScope};
use crate::error::{GraphicsError, Result};
use crate::prepare::PreparedImage;
use std::io::Write;

/// Writes graphics commands to `W`. Stdout in production, a buffer in tests.
pub struct GraphicsEncoder<W: Write> {
    out: W,
    quiet: u8,
}

impl<W: Write> GraphicsEncoder<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            quiet: quiet::SILENT,
        }
    }

    pub fn with_quiet(mut self, level: u8) -> Self {
        self.quiet = level;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write one command, frame by frame, returning the number of frames
    pub fn send(&mut self, command: GraphicsCommand) -> Result<usize> {
        let frames = write_command(&mut self.out, command.with_quiet(self.quiet))?;
        self.out.flush()?;
        Ok(frames)
    }

    /// Upload a prepared image under `id` without displaying it
    pub fn transmit(&mut self, prepared: PreparedImage, id: ImageId) -> Result<()> {
        let medium = prepared.medium();
        let frames = self.send(GraphicsCommand::transmit(
            id,
            medium,
            prepared.into_payload(),
        ))?;
        log::debug!("Transmitted image {} ({:?} medium, {} frames)", id, medium, frames);
        Ok(())
    }

    /// Remove visible placements, then show `id` at cell (`x`, `y`)
    pub fn display(&mut self, id: ImageId, x: u16, y: u16) -> Result<()> {
        check_position(x, y)?;
        let quiet = self.quiet;
        let mut scope = CursorScope::enter(&mut self.out, x, y)?;
        write_command(
            &mut scope,
            GraphicsCommand::delete(DeleteTarget::AllPlacements).with_quiet(quiet),
        )?;
        write_command(&mut scope, GraphicsCommand::place(id).with_quiet(quiet))?;
        scope.exit()?;

        log::debug!("Displayed image {} at cell {},{}", id, x, y);
        Ok(())
    }

    /// Upload `prepared` under `id` and show it at cell (`x`, `y`)
    pub fn transmit_and_place(
        &mut self,
        prepared: PreparedImage,
        id: ImageId,
        x: u16,
        y: u16,
    ) -> Result<()> {
        check_position(x, y)?;
        let quiet = self.quiet;
        let medium = prepared.medium();
        let mut scope = CursorScope::enter(&mut self.out, x, y)?;
        let frames = write_command(
            &mut scope,
            GraphicsCommand::transmit(id, medium, prepared.into_payload()).with_quiet(quiet),
        )?;
        write_command(&mut scope, GraphicsCommand::place(id).with_quiet(quiet))?;
        scope.exit()?;

        log::debug!(
            "Drew image {} at cell {},{} ({} transmit frames)",
            id,
            x,
            y,
            frames
        );
        Ok(())
    }

    /// Delete the placements of `id`, or of every image when `None`
    pub fn clear(&mut self, id: Option<ImageId>) -> Result<()> {
        let target = match id {
            Some(id) => DeleteTarget::Image(id),
            None => DeleteTarget::AllPlacements,
        };
        self.send(GraphicsCommand::delete(target))?;
        Ok(())
    }
}

fn check_position(x: u16, y: u16) -> Result<()> {
    if cursor::in_range(x, y) {
        Ok(())
    } else {
        Err(GraphicsError::InvalidPosition { x, y })
    }
}

/// Frames are written and flushed one at a time, in order
fn write_command<W: Write + ?Sized>(out: &mut W, command: GraphicsCommand) -> Result<usize> {
    let frames = serialize_and_chunk(&command);
    for frame in &frames {
        frame.write_to(out)?;
        out.flush()?;
    }
    Ok(frames.len())
}
