//! Small helpers shared by the CLI and the formatters

use std::path::PathBuf;

/// Debug log file in the platform temp dir
pub fn get_debug_log_path() -> PathBuf {
    std::env::temp_dir().join("sharelist-debug.log")
}

/// Human-readable size with binary units, e.g. "1.50 KB"
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024 * 1024), "3.00 TB");
    }

    #[test]
    fn test_debug_log_path() {
        assert!(get_debug_log_path().ends_with("sharelist-debug.log"));
    }
}
