//! Briefing file output.
//!
//! One UTF-8 file per run, named after the local start time to the minute.
//! Two runs in the same minute write the same path; the later one wins.

use crate::utils::file_stamp;
use chrono::{DateTime, TimeZone};
use std::error::Error;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// `briefing_20250506_0930.md`
pub fn briefing_filename<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("briefing_{}.md", file_stamp(at))
}

/// Write `text` verbatim to `{output_dir}/briefing_<stamp>.md`.
///
/// # Returns
///
/// The path written, or the I/O error.
#[instrument(level = "info", skip_all, fields(%output_dir))]
pub async fn write_briefing<Tz: TimeZone>(
    output_dir: &str,
    text: &str,
    at: &DateTime<Tz>,
) -> Result<PathBuf, Box<dyn Error>>
where
    Tz::Offset: Display,
{
    let path = Path::new(output_dir).join(briefing_filename(at));

    info!(path = %path.display(), bytes = text.len(), "Writing briefing");
    fs::write(&path, text).await?;
    info!(path = %path.display(), "Wrote briefing file");

    Ok(path)
}
