use serialecho::core::format::{clean_lines, clean_log, decode, framed_log, strip_escape_sequences, LOG_FOOTER, LOG_HEADER};
use serialecho::{DeviceCommand, LineEnding, OutputMode, SendStrategy, SessionConfig, Timings};
use std::time::Duration;

/// Integration tests for SerialEcho library
#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_strip_colored_reply() {
        assert_eq!(strip_escape_sequences("\x1b[31mHELLO\x1b[0m\r\n"), "HELLO\r\n");
    }

    #[test]
    fn test_clean_log_drops_banner_and_prompt() {
        let raw = "=banner=\r\nline1\r\nline2\r\n=prompt=";
        assert_eq!(clean_lines(raw), vec!["line1".to_string(), "line2".to_string()]);
        assert_eq!(clean_log(raw), "line1\nline2\n");
    }

    #[test]
    fn test_device_capture_to_framed_log() {
        let raw: &[u8] = b"cat /proc/version\r\n\x1b[0mLinux version 5.10\x1b[K\r\n\r\n\xc2\x9b1mroot@dev\xc2\x9b0m:~# ";
        let text = decode(raw);
        assert_eq!(
            framed_log(&text),
            format!("{}\nLinux version 5.10\n{}\n", LOG_HEADER, LOG_FOOTER)
        );
    }

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::new("/dev/ttyUSB0", SendStrategy::Bulk.default_baud_rate(), Duration::from_secs(2));

        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.output_mode, OutputMode::Buffered);
        assert_eq!(config.line_ending, LineEnding::CrLf);
        assert_eq!(config.timings, Timings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_command_wire_format() {
        let command = DeviceCommand::from_tokens(["i2cdetect", "-y", "1"]).unwrap();
        assert_eq!(command.encode(LineEnding::CrLf), b"i2cdetect -y 1\r\n".to_vec());
        assert!(!command.is_interrupt());
    }
}
