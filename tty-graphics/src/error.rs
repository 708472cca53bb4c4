// ABOUTME: Error taxonomy for terminal queries, image preparation and protocol output
// ABOUTME: Every variant is fatal to the invocation; none are retried

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = GraphicsError> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("Terminal size query failed: {0}")]
    TerminalQuery(String),

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("Failed to encode prepared image: {0}")]
    ImageEncode(#[source] BoxError),

    #[error("Image codec is not available in this build")]
    CodecUnavailable,

    #[error("Failed to write graphics command to terminal: {0}")]
    ProtocolWrite(#[from] std::io::Error),

    #[error("Invalid image id {0}: ids start at 1")]
    InvalidImageId(u64),

    #[error("Preview box of {width}x{height} cells is empty")]
    EmptyBox { width: u32, height: u32 },

    #[error("Cell position {x},{y} is outside the addressable range")]
    InvalidPosition { x: u16, y: u16 },
}

impl GraphicsError {
    pub fn image_decode(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        GraphicsError::ImageDecode {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn image_encode(source: impl Into<BoxError>) -> Self {
        GraphicsError::ImageEncode(source.into())
    }

    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            GraphicsError::TerminalQuery(_) => Some(
                "Run inside a terminal that reports its pixel size (stdout must be a tty)",
            ),
            GraphicsError::CodecUnavailable => {
                Some("Rebuild with the `codec` feature enabled to decode images")
            }
            GraphicsError::ImageDecode { .. } => {
                Some("Check that the file exists and is a supported image format")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GraphicsError::TerminalQuery("not a tty".to_string()).to_string(),
            "Terminal size query failed: not a tty"
        );
        assert_eq!(
            GraphicsError::CodecUnavailable.to_string(),
            "Image codec is not available in this build"
        );
        assert_eq!(
            GraphicsError::InvalidImageId(0).to_string(),
            "Invalid image id 0: ids start at 1"
        );
        assert_eq!(
            GraphicsError::EmptyBox {
                width: 0,
                height: 5
            }
            .to_string(),
            "Preview box of 0x5 cells is empty"
        );

        let decode = GraphicsError::image_decode("/tmp/missing.png", "no such file");
        assert_eq!(
            decode.to_string(),
            "Failed to decode image /tmp/missing.png: no such file"
        );
    }

    #[test]
    fn test_io_error_becomes_protocol_write() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: GraphicsError = io.into();
        assert!(matches!(err, GraphicsError::ProtocolWrite(_)));
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_help_text() {
        assert!(GraphicsError::CodecUnavailable.help_text().is_some());
        assert!(
            GraphicsError::TerminalQuery("x".to_string())
                .help_text()
                .unwrap()
                .contains("tty")
        );
        assert_eq!(GraphicsError::InvalidImageId(0).help_text(), None);
    }
}
