use std::process::Command;
use std::str;

/// CLI interface tests
#[cfg(test)]
mod cli_tests {
    use super::*;

    fn serialecho(args: &[&str]) -> std::process::Output {
        Command::new("cargo")
            .args(["run", "--quiet", "--"])
            .args(args)
            .output()
            .expect("Failed to execute command")
    }

    #[test]
    fn test_cli_help() {
        let output = serialecho(&["--help"]);
        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");

        assert!(output.status.success());
        assert!(stdout.contains("Usage:"));
        assert!(stdout.contains("Commands:"));
        assert!(stdout.contains("send"));
        assert!(stdout.contains("paced"));
        assert!(stdout.contains("list"));
    }

    #[test]
    fn test_cli_version() {
        let output = serialecho(&["--version"]);
        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_cli_send_help() {
        let output = serialecho(&["send", "--help"]);
        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");

        assert!(stdout.contains("--port"));
        assert!(stdout.contains("--baudrate"));
        assert!(stdout.contains("--timeout"));
        assert!(stdout.contains("--mode"));
    }

    #[test]
    fn test_cli_missing_port_prints_usage() {
        let output = serialecho(&["send", "ls"]);
        let stderr = str::from_utf8(&output.stderr).expect("Invalid UTF-8");

        assert_eq!(output.status.code(), Some(2));
        assert!(stderr.contains("--port"));
        assert!(stderr.contains("Usage:"));
    }

    #[test]
    fn test_cli_unopenable_port_is_connection_error() {
        let output = serialecho(&["send", "-p", "/dev/serialecho-missing-port", "ls"]);
        let stderr = str::from_utf8(&output.stderr).expect("Invalid UTF-8");

        assert_eq!(output.status.code(), Some(3));
        assert!(stderr.contains("Error opening serial port"));
    }

    #[test]
    fn test_cli_invalid_mode() {
        let output = serialecho(&["send", "-p", "COM3", "-m", "xml", "ls"]);
        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_cli_invalid_command() {
        let output = serialecho(&["invalid-command"]);
        assert!(!output.status.success());
    }
}
