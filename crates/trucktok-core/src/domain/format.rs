/// Rendered when a duration is absent or cannot be parsed.
pub const DEFAULT_DURATION: &str = "0:00";

/// Renders a raw view count: `999` → `"999"`, `1500` → `"1.5K"`, `2_300_000` → `"2.3M"`.
///
/// The decimal is rounded half-up on integer tenths, so `1250` renders as
/// `"1.3K"` rather than truncating to `"1.2K"`.
pub fn format_view_count(count: u64) -> String {
    if count >= 1_000_000 {
        scaled_tenths(count, 1_000_000, 'M')
    } else if count >= 1_000 {
        scaled_tenths(count, 1_000, 'K')
    } else {
        count.to_string()
    }
}

fn scaled_tenths(count: u64, unit: u64, suffix: char) -> String {
    let tenths = (u128::from(count) * 10 + u128::from(unit) / 2) / u128::from(unit);
    format!("{}.{}{suffix}", tenths / 10, tenths % 10)
}

/// Parses a provider count reported as a string. Anything that is not a
/// non-negative integer counts as zero.
pub fn parse_view_count(raw: &str) -> u64 {
    raw.trim().parse::<u64>().unwrap_or(0)
}

/// Renders an ISO-8601 duration (`PT#H#M#S`, every component optional).
///
/// Hours present → `H:MM:SS`, otherwise `M:SS`. A day component folds into
/// hours. Anything malformed renders as [`DEFAULT_DURATION`].
pub fn format_iso_duration(raw: &str) -> String {
    match parse_iso_duration(raw.trim()) {
        Some(parts) => parts.render(),
        None => String::from(DEFAULT_DURATION),
    }
}

/// Renders a millisecond duration as `M:SS`.
pub fn format_millis_duration(millis: u64) -> String {
    let total_seconds = millis / 1_000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Whether `value` has the canonical `M:SS` / `H:MM:SS` shape.
pub fn is_canonical_duration(value: &str) -> bool {
    let segments = value.split(':').collect::<Vec<_>>();
    if !(2..=3).contains(&segments.len()) {
        return false;
    }

    let all_digits = segments
        .iter()
        .all(|segment| !segment.is_empty() && segment.bytes().all(|byte| byte.is_ascii_digit()));

    all_digits && segments.last().is_some_and(|seconds| seconds.len() == 2)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct DurationParts {
    hours: Option<u64>,
    minutes: u64,
    seconds: u64,
}

impl DurationParts {
    fn render(self) -> String {
        match self.hours {
            Some(hours) => format!("{hours}:{:02}:{:02}", self.minutes, self.seconds),
            None => format!("{}:{:02}", self.minutes, self.seconds),
        }
    }
}

fn parse_iso_duration(raw: &str) -> Option<DurationParts> {
    let body = raw.strip_prefix('P')?;
    let (date_part, time_part) = match body.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (body, None),
    };

    let mut days = None;
    for (value, unit) in components(date_part)? {
        match unit {
            'D' if days.is_none() => days = Some(value),
            _ => return None,
        }
    }

    let mut parts = DurationParts::default();
    let mut last_rank = 0;
    if let Some(time_part) = time_part {
        for (value, unit) in components(time_part)? {
            let rank = match unit {
                'H' => 1,
                'M' => 2,
                'S' => 3,
                _ => return None,
            };
            if rank <= last_rank {
                return None;
            }
            last_rank = rank;

            match unit {
                'H' => parts.hours = Some(value),
                'M' => parts.minutes = value,
                _ => parts.seconds = value,
            }
        }
    }

    if days.is_none() && time_part.is_none() {
        return None;
    }

    if let Some(days) = days.filter(|days| *days > 0) {
        let hours = parts.hours.unwrap_or(0);
        parts.hours = Some(days.checked_mul(24)?.checked_add(hours)?);
    }

    Some(parts)
}

/// Splits `12H3M` into `[(12, 'H'), (3, 'M')]`. Returns `None` on stray text.
fn components(segment: &str) -> Option<Vec<(u64, char)>> {
    let mut output = Vec::new();
    let mut digits = String::new();

    for ch in segment.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }

        if digits.is_empty() {
            return None;
        }
        let value = digits.parse::<u64>().ok()?;
        output.push((value, ch));
        digits.clear();
    }

    if !digits.is_empty() {
        return None;
    }

    Some(output)
}
