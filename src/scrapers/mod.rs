//! News sources for the briefing.
//!
//! Only one source exists today:
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Eastmoney search suggest | [`eastmoney`] | JSON API | Keyed by stock name; first 5 records |
//!
//! A source never fails outward. Network and decoding problems are logged
//! and turn into an empty list, so generation always gets to run.

pub mod eastmoney;
