//! Per-field derivations.
//!
//! Each helper returns `None` when its field should be left out of the
//! record. A field that cannot be derived never affects the others.

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// N1MM reports `rxfreq` in tens of hertz.
pub const RX_FREQ_DIVISOR: Decimal = dec!(100000);

/// Longest grid square written to the log.
pub const MAX_GRID_LEN: usize = 8;

/// N1MM mode names that all mean plain CW.
pub const CW_MODES: &[&str] = &["CW", "CW-U", "CW-L", "CW-R", "CWR"];

/// Sideband modes logged as `SSB` with a submode.
pub const SIDEBAND_MODES: &[&str] = &["USB", "LSB"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Split an N1MM timestamp into ADIF `QSO_DATE` and `TIME_ON` tokens.
///
/// Well-formed input gives `YYYYMMDD` and `HHMMSS`. Anything else keeps the
/// digits found where those components would be.
#[must_use]
pub fn split_timestamp(timestamp: &str) -> (Option<String>, Option<String>) {
    let timestamp = timestamp.trim();
    if let Ok(parsed) = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT) {
        return (
            Some(parsed.format("%Y%m%d").to_string()),
            Some(parsed.format("%H%M%S").to_string()),
        );
    }

    let date: String = timestamp
        .chars()
        .take(10)
        .filter(char::is_ascii_digit)
        .collect();
    let time: String = timestamp
        .chars()
        .skip(10)
        .filter(char::is_ascii_digit)
        .take(6)
        .collect();

    (non_empty(date), non_empty(time))
}

/// Mode and optional submode to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTags {
    /// ADIF `MODE` value.
    pub mode: String,
    /// ADIF `SUBMODE` value.
    pub submode: Option<String>,
}

/// Normalize an N1MM mode.
///
/// CW variants collapse to `CW`, RTTY contests force `RTTY`, and sideband
/// modes become `SSB` with the sideband kept as submode.
#[must_use]
pub fn normalize_mode(mode: Option<&str>, force_rtty: bool) -> Option<ModeTags> {
    let mode = if force_rtty {
        "RTTY"
    } else {
        let mode = mode?;
        if CW_MODES.contains(&mode) {
            "CW"
        } else {
            mode
        }
    };

    if SIDEBAND_MODES.contains(&mode) {
        Some(ModeTags {
            mode: "SSB".to_string(),
            submode: Some(mode.to_string()),
        })
    } else {
        Some(ModeTags {
            mode: mode.to_string(),
            submode: None,
        })
    }
}

/// Convert a raw `rxfreq` value to MHz.
///
/// Returns `None` when the value is not a decimal number.
#[must_use]
pub fn scale_frequency(raw: &str) -> Option<Decimal> {
    let raw: Decimal = raw.trim().parse().ok()?;
    raw.checked_div(RX_FREQ_DIVISOR).map(|mhz| mhz.normalize())
}

fn grid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[A-R][A-R](?:[0-9][0-9][A-X][A-X])*(?:[0-9][0-9])?")
            .expect("Invalid grid pattern")
    })
}

/// Validate a Maidenhead locator.
///
/// Only the matched prefix is kept, then cut to [`MAX_GRID_LEN`] characters.
#[must_use]
pub fn grid_square(raw: &str) -> Option<String> {
    let matched = grid_pattern().find(raw.trim())?;
    let grid: String = matched.as_str().chars().take(MAX_GRID_LEN).collect();
    (grid.len() > 1).then_some(grid)
}

/// Title-case a name: first letter of every word upper, the rest lower.
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_is_letter = false;
    for c in name.chars() {
        if prev_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_is_letter = c.is_alphabetic();
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
