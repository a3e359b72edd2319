//! Color utilities for CLI output

use console::{Style, StyledObject};

/// Style a container exit status
///
/// - 0 -> green bold
/// - anything else -> red bold
pub fn exit_code_style(code: i64) -> StyledObject<String> {
    let style = if code == 0 {
        Style::new().green().bold()
    } else {
        Style::new().red().bold()
    };
    style.apply_to(code.to_string())
}

/// First 12 hex digits of an image or container ID
pub fn short_id(id: &str) -> &str {
    let hex = id.strip_prefix("sha256:").unwrap_or(id);
    hex.get(..12).unwrap_or(hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_style_keeps_text() {
        assert!(exit_code_style(0).to_string().contains('0'));
        assert!(exit_code_style(2).to_string().contains('2'));
    }

    #[test]
    fn short_id_strips_digest_prefix() {
        assert_eq!(short_id("sha256:0123456789abcdef0123"), "0123456789ab");
        assert_eq!(short_id("abc"), "abc");
    }
}
