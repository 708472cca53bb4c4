// ABOUTME: Terminal detection for kitty graphics protocol support
// ABOUTME: Inspects well-known environment variables; no escape-sequence negotiation

use crate::constants::env::FORCE_PROTOCOL;
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalSupport {
    pub kitty_graphics: bool,
    pub terminal_name: String,
}

impl TerminalSupport {
    pub fn detect() -> Self {
        // Check for user override first
        if let Ok(forced_protocol) = env::var(FORCE_PROTOCOL) {
            return Self::from_forced_protocol(&forced_protocol);
        }

        Self::detect_without_override()
    }

    fn from_forced_protocol(protocol: &str) -> Self {
        let terminal_name = format!("forced-{}", protocol);

        match protocol.to_lowercase().as_str() {
            "kitty" => Self {
                kitty_graphics: true,
                terminal_name,
            },
            "none" | "disable" | "disabled" => Self {
                kitty_graphics: false,
                terminal_name,
            },
            _ => {
                log::warn!(
                    "Unknown protocol '{}' in {}. Valid values: kitty, none",
                    protocol,
                    FORCE_PROTOCOL
                );
                Self::detect_without_override()
            }
        }
    }

    fn detect_without_override() -> Self {
        let term_program = env::var("TERM_PROGRAM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        let wezterm_exe = env::var("WEZTERM_EXECUTABLE").ok();
        let kitty_window_id = env::var("KITTY_WINDOW_ID").ok();

        Self {
            kitty_graphics: detect_kitty_support(
                &term_program,
                &term,
                wezterm_exe.as_deref(),
                kitty_window_id.as_deref(),
            ),
            terminal_name: determine_terminal_name(&term_program, &term),
        }
    }
}

fn detect_kitty_support(
    term_program: &str,
    term: &str,
    wezterm_exe: Option<&str>,
    kitty_window_id: Option<&str>,
) -> bool {
    if term_program == "kitty" || kitty_window_id.is_some() {
        return true;
    }

    // WezTerm and Ghostty implement the kitty graphics protocol
    if term_program == "WezTerm" || wezterm_exe.is_some() || term_program == "ghostty" {
        return true;
    }

    term.contains("kitty") || term.contains("ghostty")
}

fn determine_terminal_name(term_program: &str, term: &str) -> String {
    if !term_program.is_empty() {
        term_program.to_string()
    } else if !term.is_empty() {
        term.to_string()
    } else {
        "unknown".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        FORCE_PROTOCOL,
        "TERM_PROGRAM",
        "TERM",
        "WEZTERM_EXECUTABLE",
        "KITTY_WINDOW_ID",
    ];

    /// Run `f` with exactly `vars` set among the detection variables, then restore
    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let saved: Vec<_> = VARS.iter().map(|k| (*k, env::var(k).ok())).collect();

        for key in VARS {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }

        let result = f();

        for (key, value) in saved {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
        result
    }

    #[test]
    fn test_kitty_detection_helpers() {
        assert!(detect_kitty_support("kitty", "", None, None));
        assert!(detect_kitty_support("", "xterm-kitty", None, None));
        assert!(detect_kitty_support("", "", None, Some("1")));
        assert!(detect_kitty_support("", "", Some("/usr/bin/wezterm"), None));
        assert!(detect_kitty_support("ghostty", "xterm-256color", None, None));
        assert!(!detect_kitty_support("iTerm.app", "xterm-256color", None, None));
        assert!(!detect_kitty_support("", "", None, None));
    }

    #[test]
    fn test_terminal_name() {
        assert_eq!(determine_terminal_name("WezTerm", "xterm"), "WezTerm");
        assert_eq!(determine_terminal_name("", "xterm-kitty"), "xterm-kitty");
        assert_eq!(determine_terminal_name("", ""), "unknown");
    }

    #[test]
    #[serial]
    fn test_detect_kitty_from_term() {
        let support = with_env(&[("TERM", "xterm-kitty")], TerminalSupport::detect);
        assert!(support.kitty_graphics);
        assert_eq!(support.terminal_name, "xterm-kitty");
    }

    #[test]
    #[serial]
    fn test_detect_unsupported_terminal() {
        let support = with_env(
            &[("TERM_PROGRAM", "Apple_Terminal"), ("TERM", "xterm-256color")],
            TerminalSupport::detect,
        );
        assert!(!support.kitty_graphics);
        assert_eq!(support.terminal_name, "Apple_Terminal");
    }

    #[test]
    #[serial]
    fn test_force_protocol_overrides_environment() {
        let support = with_env(
            &[(FORCE_PROTOCOL, "kitty"), ("TERM", "dumb")],
            TerminalSupport::detect,
        );
        assert!(support.kitty_graphics);
        assert_eq!(support.terminal_name, "forced-kitty");

        let support = with_env(
            &[(FORCE_PROTOCOL, "none"), ("TERM", "xterm-kitty")],
            TerminalSupport::detect,
        );
        assert!(!support.kitty_graphics);
        assert_eq!(support.terminal_name, "forced-none");
    }

    #[test]
    #[serial]
    fn test_unknown_forced_protocol_falls_back() {
        let support = with_env(
            &[(FORCE_PROTOCOL, "sixel"), ("TERM", "xterm-kitty")],
            TerminalSupport::detect,
        );
        assert!(support.kitty_graphics);
        assert_eq!(support.terminal_name, "xterm-kitty");
    }
}
