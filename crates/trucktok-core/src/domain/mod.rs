//! # Domain Models
//!
//! The canonical video record every adapter produces, and the unit formatters
//! that turn raw provider counts and durations into display strings.
//!
//! | Type / fn | Description |
//! |-----------|-------------|
//! | [`VideoRecord`] | Provider-agnostic video metadata |
//! | [`format_view_count`] | `1500` → `"1.5K"` |
//! | [`format_iso_duration`] | `"PT1H2M3S"` → `"1:02:03"` |
//! | [`format_millis_duration`] | `65000` → `"1:05"` |
//!
//! Records are built once per request. Every field is always populated:
//! absent upstream data degrades to a documented default instead of being
//! omitted.

mod format;
mod video;

pub use format::{
    format_iso_duration, format_millis_duration, format_view_count, is_canonical_duration,
    parse_view_count, DEFAULT_DURATION,
};
pub use video::{VideoRecord, PLACEHOLDER_THUMBNAIL_URL};
