//! GRBL Response Parser
//!
//! Classifies the lines GRBL sends back while jogging: acknowledgments,
//! error and alarm codes, and free text such as the startup banner.

use std::fmt;

/// GRBL response types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrblResponse {
    /// OK acknowledgment
    Ok,
    /// Error response with error code
    Error(u8),
    /// Alarm response with alarm code
    Alarm(u8),
    /// Banner, feedback message, or other text
    Message(String),
}

impl GrblResponse {
    /// Parse a GRBL response line; blank lines yield `None`
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();

        if line.is_empty() {
            return None;
        }

        if line == super::COMPLETION_SENTINEL {
            return Some(Self::Ok);
        }

        if let Some(code) = line.strip_prefix("error:").and_then(parse_code) {
            return Some(Self::Error(code));
        }

        // GRBL prints upper case; some clones print lower case
        if let Some(code) = line
            .strip_prefix("ALARM:")
            .or_else(|| line.strip_prefix("alarm:"))
            .and_then(parse_code)
        {
            return Some(Self::Alarm(code));
        }

        Some(Self::Message(line.to_string()))
    }

    /// Whether this line finishes the exchange for the pending command
    pub fn completes_command(&self) -> bool {
        matches!(self, Self::Ok | Self::Error(_))
    }
}

fn parse_code(code: &str) -> Option<u8> {
    code.trim().parse::<u8>().ok()
}

impl fmt::Display for GrblResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Error(code) => write!(f, "{}", super::error_decoder::format_error(*code)),
            Self::Alarm(code) => write!(f, "{}", super::error_decoder::format_alarm(*code)),
            Self::Message(msg) => write!(f, "{}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ok() {
        assert_eq!(GrblResponse::parse("ok"), Some(GrblResponse::Ok));
        assert_eq!(GrblResponse::parse("  ok\r"), Some(GrblResponse::Ok));
    }

    #[test]
    fn test_parse_error_and_alarm() {
        assert_eq!(GrblResponse::parse("error:15"), Some(GrblResponse::Error(15)));
        assert_eq!(GrblResponse::parse("ALARM:2"), Some(GrblResponse::Alarm(2)));
        assert_eq!(GrblResponse::parse("alarm:1"), Some(GrblResponse::Alarm(1)));
    }

    #[test]
    fn test_malformed_codes_are_messages() {
        assert_eq!(
            GrblResponse::parse("error:abc"),
            Some(GrblResponse::Message("error:abc".to_string()))
        );
    }

    #[test]
    fn test_parse_banner_and_blank() {
        assert_eq!(
            GrblResponse::parse("Grbl 1.1h ['$' for help]"),
            Some(GrblResponse::Message("Grbl 1.1h ['$' for help]".to_string()))
        );
        assert_eq!(GrblResponse::parse("   "), None);
    }

    #[test]
    fn test_completion() {
        assert!(GrblResponse::Ok.completes_command());
        assert!(GrblResponse::Error(9).completes_command());
        assert!(!GrblResponse::Alarm(1).completes_command());
        assert!(!GrblResponse::Message("[MSG:'$H'|'$X' to unlock]".into()).completes_command());
    }

    #[test]
    fn test_display_decodes() {
        assert!(GrblResponse::Error(15).to_string().starts_with("error:15 - "));
        assert!(GrblResponse::Alarm(1).to_string().contains("Hard limit"));
    }
}
