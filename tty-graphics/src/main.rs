// ABOUTME: Main entry point for the tty-graphics preview helper
// ABOUTME: Parses the sub-operation, prepares the image and writes protocol frames to stdout

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::Path;
use tty_graphics::cli::{Cli, Commands};
use tty_graphics::command::{ImageId, Medium};
use tty_graphics::config::Config;
use tty_graphics::detection::TerminalSupport;
use tty_graphics::metrics::{self, TerminalGeometry};
use tty_graphics::{GraphicsEncoder, GraphicsError, ImagePreparer, PreparedImage};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        // stdout is the graphics channel, so diagnostics only go to stderr
        eprintln!("error: {:#}", err);
        if let Some(help) = err
            .chain()
            .find_map(|e| e.downcast_ref::<GraphicsError>())
            .and_then(GraphicsError::help_text)
        {
            eprintln!("hint: {}", help);
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_module("tty_graphics", log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };
    let medium = cli.medium.unwrap_or(config.medium());
    let quiet = cli.quiet.unwrap_or(config.quiet());

    let support = TerminalSupport::detect();
    if !support.kitty_graphics {
        log::warn!(
            "Terminal '{}' does not advertise kitty graphics support; images may not appear",
            support.terminal_name
        );
    }

    let mut encoder = GraphicsEncoder::new(io::stdout().lock()).with_quiet(quiet);

    match cli.command {
        Commands::Load {
            path,
            id,
            width,
            height,
        } => {
            let id = ImageId::new(id)?;
            let prepared = prepare(&config, medium, &path, width, height)?;
            encoder.transmit(prepared, id)?;
        }
        Commands::Display { id, x, y } => {
            encoder.display(ImageId::new(id)?, x, y)?;
        }
        Commands::Draw {
            path,
            x,
            y,
            width,
            height,
            id,
        } => {
            let id = ImageId::new(id)?;
            let prepared = prepare(&config, medium, &path, width, height)?;
            encoder.transmit_and_place(prepared, id, x, y)?;
        }
        Commands::Clear { id } => {
            let id = id.map(ImageId::new).transpose()?;
            encoder.clear(id)?;
        }
    }

    Ok(())
}

fn prepare(
    config: &Config,
    medium: Medium,
    path: &Path,
    width: u32,
    height: u32,
) -> Result<PreparedImage> {
    // Codec availability is checked before touching the terminal
    let preparer = ImagePreparer::bundled()?
        .with_medium(medium)
        .with_filter(config.filter())
        .with_temp_dir(config.temp_dir.clone());

    let metrics = metrics::measure(&TerminalGeometry)?;
    log::debug!(
        "Cell size {}x{} px",
        metrics.cell_pixel_width,
        metrics.cell_pixel_height
    );

    preparer
        .prepare(path, width, height, &metrics)
        .with_context(|| format!("Failed to prepare {}", path.display()))
}
