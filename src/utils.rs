/*!
 * Utility functions for glm
 */

use std::fs;
use std::path::Path;

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Shorten a file name for single-line progress messages
pub fn truncate_name(name: &str, max_len: usize) -> String {
    let count = name.chars().count();
    if count <= max_len || max_len <= 3 {
        return name.to_string();
    }
    let tail: String = name.chars().skip(count - (max_len - 3)).collect();
    format!("...{}", tail)
}

/// Size of the plain file at `path`, or `None` when it is missing or not a file
pub fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path)
        .ok()
        .filter(|metadata| metadata.is_file())
        .map(|metadata| metadata.len())
}

/// Whether `path` already holds a file of exactly `size` bytes
pub fn is_satisfied(path: &Path, size: u64) -> bool {
    file_size(path) == Some(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 bytes");
        assert_eq!(format_file_size(1023), "1023 bytes");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short.bin", 40), "short.bin");
        let long = "a".repeat(50) + ".pak";
        let truncated = truncate_name(&long, 20);
        assert_eq!(truncated.chars().count(), 20);
        assert!(truncated.starts_with("..."));
        assert!(truncated.ends_with(".pak"));
    }

    #[test]
    fn test_is_satisfied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.bin");
        assert!(!is_satisfied(&path, 0));
        fs::write(&path, b"12345").unwrap();
        assert!(is_satisfied(&path, 5));
        assert!(!is_satisfied(&path, 4));
        assert!(!is_satisfied(dir.path(), 0));
    }
}
