//! Rest duration parsing and formatting.
//!
//! Rest is stored on a series as `m:ss` text. Authoring input is looser:
//! - Clock form (e.g., "1:30", "0:45", "1:02:00")
//! - Plain seconds (e.g., "90")
//! - Unit suffixes (e.g., "90s", "2m", "1m30s", "2 min 15 sec")
//!
//! Anything else is no rest at all.

use crate::numeric::parse_f64;

/// Parse rest text into whole seconds. Empty or unparsable text is `0`.
pub fn parse_rest_seconds(value: &str) -> u32 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0;
    }

    if trimmed.contains(':') {
        return parse_clock(trimmed).unwrap_or(0);
    }

    if let Some(seconds) = parse_f64(trimmed) {
        return if seconds > 0.0 { seconds.floor() as u32 } else { 0 };
    }

    parse_text_duration(trimmed).unwrap_or(0)
}

/// Format seconds as `m:ss`.
pub fn format_rest(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Canonical stored form: `m:ss` for a positive rest, empty otherwise.
pub fn canonical_rest(value: &str) -> String {
    match parse_rest_seconds(value) {
        0 => String::new(),
        seconds => format_rest(seconds),
    }
}

/// Parse `m:ss` or `h:mm:ss`.
fn parse_clock(value: &str) -> Option<u32> {
    let parts: Vec<&str> = value.split(':').map(str::trim).collect();
    let numbers: Option<Vec<u32>> = parts.iter().map(|p| p.parse::<u32>().ok()).collect();
    let numbers = numbers?;
    match numbers.as_slice() {
        [minutes, seconds] if *seconds < 60 => minutes.checked_mul(60)?.checked_add(*seconds),
        [hours, minutes, seconds] if *minutes < 60 && *seconds < 60 => hours
            .checked_mul(3600)?
            .checked_add(minutes * 60)?
            .checked_add(*seconds),
        _ => None,
    }
}

#[derive(Debug)]
enum RestComponent {
    Hours(u32),
    Minutes(u32),
    Seconds(u32),
}

impl RestComponent {
    fn seconds(&self) -> Option<u32> {
        match self {
            Self::Hours(n) => n.checked_mul(3600),
            Self::Minutes(n) => n.checked_mul(60),
            Self::Seconds(n) => Some(*n),
        }
    }
}

/// Parse descriptions like "2 min 30 sec" or "1m30s".
fn parse_text_duration(value: &str) -> Option<u32> {
    let lower = value.to_lowercase();
    let parts: Vec<&str> = lower.split_whitespace().collect();
    let mut total = 0u32;
    let mut matched = false;
    let mut i = 0;

    while i < parts.len() {
        let part = parts[i];

        // Number followed by a separate unit word
        if let Ok(num) = part.parse::<u32>() {
            let component = parts.get(i + 1).and_then(|unit| unit_component(unit, num))?;
            total = total.checked_add(component.seconds()?)?;
            matched = true;
            i += 2;
            continue;
        }

        // Glued forms like "90s" or "1m30s"
        for component in parse_glued(part)? {
            total = total.checked_add(component.seconds()?)?;
            matched = true;
        }
        i += 1;
    }

    matched.then_some(total)
}

fn unit_component(unit: &str, num: u32) -> Option<RestComponent> {
    match unit {
        u if u.starts_with("hour") || u == "h" || u == "hr" || u == "hrs" => {
            Some(RestComponent::Hours(num))
        }
        u if u.starts_with("min") || u == "m" => Some(RestComponent::Minutes(num)),
        u if u.starts_with("sec") || u == "s" => Some(RestComponent::Seconds(num)),
        _ => None,
    }
}

/// Split a token such as "1m30s" into digit runs and unit runs.
fn parse_glued(token: &str) -> Option<Vec<RestComponent>> {
    let mut components = Vec::new();
    let mut rest = token;
    while !rest.is_empty() {
        let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits_end == 0 {
            return None;
        }
        let num = rest[..digits_end].parse::<u32>().ok()?;
        rest = &rest[digits_end..];
        let unit_end = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        components.push(unit_component(&rest[..unit_end], num)?);
        rest = &rest[unit_end..];
    }
    Some(components)
}
