// ABOUTME: CLI argument definitions for the tty-graphics helper
// ABOUTME: Defines the command-line interface structure using clap derive macros

use crate::command::Medium;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cursor moves are 1-based on the wire, so the last u16 value is unaddressable
const MAX_CELL: i64 = u16::MAX as i64;

#[derive(Parser, Debug)]
#[command(name = "tty-graphics")]
#[command(about = "Render images inline in terminals that speak the kitty graphics protocol", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Read configuration from FILE instead of the standard locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How image data reaches the terminal
    #[arg(long, global = true, value_enum)]
    pub medium: Option<Medium>,

    /// Terminal response level (0 = all, 1 = errors only, 2 = none)
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub quiet: Option<u8>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prepare an image and upload it under ID without displaying it
    Load {
        /// Image file to preview
        path: PathBuf,

        /// Image id to register (1 or greater)
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: u32,

        /// Width of the preview box in cells
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        width: u32,

        /// Height of the preview box in cells
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        height: u32,
    },
    /// Clear visible images, then display a loaded image at a cell position
    Display {
        /// Id given to `load`
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: u32,

        /// Column, counted from 0
        #[arg(value_parser = clap::value_parser!(u16).range(..MAX_CELL))]
        x: u16,

        /// Row, counted from 0
        #[arg(value_parser = clap::value_parser!(u16).range(..MAX_CELL))]
        y: u16,
    },
    /// Prepare, upload and display an image in one step
    Draw {
        /// Image file to preview
        path: PathBuf,

        /// Column, counted from 0
        #[arg(value_parser = clap::value_parser!(u16).range(..MAX_CELL))]
        x: u16,

        /// Row, counted from 0
        #[arg(value_parser = clap::value_parser!(u16).range(..MAX_CELL))]
        y: u16,

        /// Width of the preview box in cells
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        width: u32,

        /// Height of the preview box in cells
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        height: u32,

        /// Image id to register
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        id: u32,
    },
    /// Delete displayed images
    Clear {
        /// Only delete placements of this image id
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        id: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();

        let cli = Cli::command();
        assert_eq!(cli.get_name(), "tty-graphics");

        for name in ["load", "display", "draw", "clear"] {
            assert!(cli.find_subcommand(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_parse_load() {
        let cli = Cli::try_parse_from(["tty-graphics", "load", "img.png", "1", "10", "5"]).unwrap();
        match cli.command {
            Commands::Load {
                path,
                id,
                width,
                height,
            } => {
                assert_eq!(path, PathBuf::from("img.png"));
                assert_eq!(id, 1);
                assert_eq!(width, 10);
                assert_eq!(height, 5);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_display() {
        let cli = Cli::try_parse_from(["tty-graphics", "display", "1", "5", "2"]).unwrap();
        match cli.command {
            Commands::Display { id, x, y } => {
                assert_eq!((id, x, y), (1, 5, 2));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_draw_defaults_id() {
        let cli =
            Cli::try_parse_from(["tty-graphics", "draw", "a.jpg", "0", "1", "40", "20"]).unwrap();
        match cli.command {
            Commands::Draw { id, x, y, .. } => {
                assert_eq!((id, x, y), (1, 0, 1));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_clear() {
        let cli = Cli::try_parse_from(["tty-graphics", "clear"]).unwrap();
        assert!(matches!(cli.command, Commands::Clear { id: None }));

        let cli = Cli::try_parse_from(["tty-graphics", "clear", "--id", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Clear { id: Some(3) }));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "tty-graphics",
            "clear",
            "--medium",
            "direct",
            "--quiet",
            "1",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.medium, Some(Medium::Direct));
        assert_eq!(cli.quiet, Some(1));
        assert!(cli.verbose);
    }

    #[test]
    fn test_invalid_arguments_rejected() {
        assert!(Cli::try_parse_from(["tty-graphics", "load", "img.png", "0", "10", "5"]).is_err());
        assert!(Cli::try_parse_from(["tty-graphics", "load", "img.png", "1", "0", "5"]).is_err());
        assert!(Cli::try_parse_from(["tty-graphics", "display", "1", "-1", "2"]).is_err());
        assert!(Cli::try_parse_from(["tty-graphics", "clear", "--quiet", "3"]).is_err());
        assert!(Cli::try_parse_from(["tty-graphics", "display", "1"]).is_err());
    }

    #[test]
    fn test_position_limits() {
        assert!(Cli::try_parse_from(["tty-graphics", "display", "1", "65535", "0"]).is_err());
        assert!(
            Cli::try_parse_from(["tty-graphics", "draw", "a.png", "0", "65535", "4", "4"]).is_err()
        );

        let cli = Cli::try_parse_from(["tty-graphics", "display", "1", "65534", "65534"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Display {
                x: 65534,
                y: 65534,
                ..
            }
        ));
    }
}
