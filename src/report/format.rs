//! Duration formatting.

use crate::config::TimeFormat;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Format `seconds` for display.
///
/// The default format is clock-like: `HH:MM:SS` with fractional seconds
/// dropped, prefixed by `D day, ` once the duration reaches a full day. Unit
/// formats print the value in that unit with a thousands separator and three
/// decimals.
///
/// # Examples
///
/// ```
/// use viddur::config::TimeFormat;
/// use viddur::report::format_time;
///
/// assert_eq!(format_time(100.0, TimeFormat::Default), "00:01:40");
/// assert_eq!(format_time(285_120.0, TimeFormat::Default), "3 day, 07:12:00");
/// assert_eq!(format_time(1_234_567.891, TimeFormat::Seconds), "1,234,567.891s");
/// ```
pub fn format_time(seconds: f64, format: TimeFormat) -> String {
    match format.unit_seconds() {
        None => format_clock(seconds),
        Some(unit) => format!(
            "{}{}",
            group_thousands(&format!("{:.3}", seconds / unit)),
            format.suffix()
        ),
    }
}

fn format_clock(seconds: f64) -> String {
    let days = (seconds / SECONDS_PER_DAY).floor();
    let remainder = (seconds - days * SECONDS_PER_DAY).max(0.0) as u64;

    let prefix = if days > 0.0 {
        format!("{} day, ", days as u64)
    } else {
        String::new()
    };

    format!(
        "{prefix}{:02}:{:02}:{:02}",
        remainder / 3_600,
        remainder % 3_600 / 60,
        remainder % 60
    )
}

/// Insert `,` between groups of three digits in the integer part.
fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(number.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
