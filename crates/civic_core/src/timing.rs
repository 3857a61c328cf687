use crate::error::{CivicError, Result};
use crate::schema::Language;
use time::format_description::well_known::Rfc3339;
use time::macros::datetime;
use time::{Duration, OffsetDateTime, UtcOffset};

const EARLIEST: OffsetDateTime = datetime!(0000-01-01 0:00 UTC);
const LATEST: OffsetDateTime = datetime!(9999-12-31 23:59:59.999_999_999 UTC);

/// Always UTC with a `Z` suffix. Instants outside years 0000..=9999 are
/// clamped to the nearest representable one.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    // Rfc3339 rejects out-of-range years and offsets with a seconds part;
    // neither survives the clamp and conversion.
    at.clamp(EARLIEST, LATEST)
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .unwrap_or_default()
}

pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|source| CivicError::Timestamp {
        value: value.to_string(),
        source,
    })
}

/// Elapsed time from creation to fix, or to `now` while the issue is open,
/// rendered as `"{hours}h {minutes}m"`.
pub fn time_to_fix(created_at: &str, fixed_at: Option<&str>, now: OffsetDateTime) -> Result<String> {
    let start = parse_timestamp(created_at)?;
    let end = match fixed_at {
        Some(value) => parse_timestamp(value)?,
        None => now,
    };
    let elapsed = end - start;
    Ok(format!("{}h {}m", elapsed.whole_hours(), elapsed.whole_minutes() % 60))
}

pub fn time_ago(timestamp: &str, now: OffsetDateTime, language: Language) -> Result<String> {
    let then = parse_timestamp(timestamp)?;
    Ok(describe_elapsed(now - then, language))
}

fn describe_elapsed(elapsed: Duration, language: Language) -> String {
    let english = matches!(language, Language::English);
    if elapsed.whole_seconds() < 60 {
        return if english { "Just now" } else { "आत्ताच" }.to_string();
    }
    let minutes = elapsed.whole_minutes();
    if minutes < 60 {
        return format!("{minutes} {}", if english { "m ago" } else { "मि. पूर्वी" });
    }
    let hours = elapsed.whole_hours();
    if hours < 24 {
        return format!("{hours} {}", if english { "h ago" } else { "तास पूर्वी" });
    }
    let days = elapsed.whole_days();
    format!("{days} {}", if english { "d ago" } else { "दिवस पूर्वी" })
}
