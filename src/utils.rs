//! Utility functions for timestamps, log previews and output directories.
//!
//! This module provides helper functions used throughout the application:
//! - Local-time formats for file names, fallback headers and push footers
//! - String truncation for logging response bodies
//! - File system validation for the output directory

use chrono::{DateTime, TimeZone};
use std::error::Error;
use std::fmt::Display;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// `20250506_0930`, used in briefing file names.
pub fn file_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%Y%m%d_%H%M").to_string()
}

/// `05月06日 09:30`, shown in the fallback briefing header.
pub fn short_cn_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%m月%d日 %H:%M").to_string()
}

/// `2025-05-06 09:30`, shown in the push footer.
pub fn minute_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Truncate a string for logging purposes.
///
/// Counts characters rather than bytes so CJK text is never split inside a
/// code point. Long strings keep `max` characters and get `"…(+N chars)"`
/// appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => {
            let rest = s[cut..].chars().count();
            format!("{}…(+{} chars)", &s[..cut], rest)
        }
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use tempfile::TempDir;

    fn sample() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 5, 6, 9, 3, 59)
            .unwrap()
    }

    #[test]
    fn test_stamps() {
        let at = sample();
        assert_eq!(file_stamp(&at), "20250506_0903");
        assert_eq!(short_cn_stamp(&at), "05月06日 09:03");
        assert_eq!(minute_stamp(&at), "2025-05-06 09:03");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 chars)"));
    }

    #[test]
    fn test_truncate_for_log_cjk() {
        let s = "世纪华通新闻简报";
        assert_eq!(truncate_for_log(s, 4), "世纪华通…(+4 chars)");
        assert_eq!(truncate_for_log(s, 8), s);
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested");
        let path_str = path.to_str().unwrap();

        ensure_writable_dir(path_str).await.unwrap();
        assert!(path.is_dir());
    }
}
