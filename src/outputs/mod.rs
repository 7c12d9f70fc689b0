//! Output channels for a finished briefing.
//!
//! # Submodules
//!
//! - [`markdown`]: Writes the briefing to `briefing_<YYYYMMDD_HHMM>.md`
//! - [`dingtalk`]: Pushes the briefing to a DingTalk robot webhook
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── briefing_20250506_0930.md
//! └── briefing_20250507_0930.md
//! ```
//!
//! Both channels receive the briefing text unchanged; only the push adds a
//! timestamp footer.

pub mod dingtalk;
pub mod markdown;

pub use dingtalk::{DingTalkNotifier, Notify};
