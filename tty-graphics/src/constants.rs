// ABOUTME: Centralized constants for the terminal graphics protocol
// ABOUTME: Contains escape markers, chunk limits, format tags and temp file naming

/// Graphics channel framing
pub mod protocol {
    /// APC introducer followed by the graphics command tag
    pub const START: &[u8] = b"\x1b_G";

    /// String terminator closing every frame
    pub const END: &[u8] = b"\x1b\\";

    /// Maximum encoded payload bytes per frame
    pub const MAX_CHUNK_LEN: usize = 4096;

    /// Pixel format tag for PNG data
    pub const FORMAT_PNG: u32 = 100;
}

/// Quiet levels for terminal responses
pub mod quiet {
    /// Terminal replies with OK and errors
    pub const VERBOSE: u8 = 0;
    /// Terminal replies with errors only
    pub const ERRORS_ONLY: u8 = 1;
    /// Terminal never replies
    pub const SILENT: u8 = 2;
}

/// Temporary file naming for the file medium
pub mod temp_file {
    /// The terminal only removes temp files whose name carries this marker
    pub const PREFIX: &str = "tty-graphics-protocol-";
    pub const SUFFIX: &str = ".png";
}

/// Environment variables read at startup
pub mod env {
    pub const FORCE_PROTOCOL: &str = "TTY_GRAPHICS_FORCE_PROTOCOL";
    pub const CONFIG_DIR_NAME: &str = "tty-graphics";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_markers() {
        assert_eq!(protocol::START, b"\x1b_G");
        assert_eq!(protocol::END, b"\x1b\\");
        // base64 quanta must not be split across frames
        assert_eq!(protocol::MAX_CHUNK_LEN % 4, 0);
    }

    #[test]
    fn test_quiet_levels() {
        assert_eq!(quiet::VERBOSE, 0);
        assert_eq!(quiet::ERRORS_ONLY, 1);
        assert_eq!(quiet::SILENT, 2);
    }

    #[test]
    fn test_tempfile_marker() {
        assert!(temp_file::PREFIX.contains("tty-graphics-protocol"));
        assert_eq!(temp_file::SUFFIX, ".png");
    }
}
