//! Header-tagged subtitle format: an optional `WEBVTT` header, then blocks
//! of a `HH:MM:SS.mmm` (or short `MM:SS.mmm`) time line followed by body
//! lines up to the next blank line.

use std::sync::LazyLock;

use regex::Regex;

use crate::state::CueSnapshot;

static TIME_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{2}:\d{2}:\d{2}\.\d{3}|\d{1,2}:\d{2}\.\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2}\.\d{3}|\d{1,2}:\d{2}\.\d{3})",
    )
    .unwrap()
});

fn stamp_to_seconds(stamp: &str) -> f64 {
    let parts: Vec<&str> = stamp.split(':').collect();
    let (hh, mm, rest) = match parts.as_slice() {
        [hh, mm, rest] => (hh.parse::<f64>().unwrap_or(0.0), mm.parse::<f64>().unwrap_or(0.0), *rest),
        [mm, rest] => (0.0, mm.parse::<f64>().unwrap_or(0.0), *rest),
        _ => return 0.0,
    };
    let seconds = rest.parse::<f64>().unwrap_or(0.0);
    hh * 3600.0 + mm * 60.0 + seconds
}

/// Parse header-tagged subtitle text. Lines before the first time line
/// (including the header) are ignored; malformed blocks are skipped.
pub fn parse(text: &str) -> Vec<CueSnapshot> {
    let norm = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = norm.split('\n').collect();

    let mut out = Vec::new();
    let mut i = 0;
    if lines
        .first()
        .is_some_and(|line| line.trim_start().starts_with("WEBVTT"))
    {
        i = 1;
    }
    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
            continue;
        }
        let Some(caps) = TIME_LINE.captures(line) else {
            i += 1;
            continue;
        };
        let start = stamp_to_seconds(&caps[1]);
        let end = stamp_to_seconds(&caps[2]);
        let mut body = Vec::new();
        i += 1;
        while i < lines.len() && !lines[i].trim().is_empty() {
            body.push(lines[i]);
            i += 1;
        }
        out.push(CueSnapshot::new(start, end, body.join("\n").trim().to_string()));
    }
    out
}

fn seconds_to_stamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as i64;
    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        total_s / 3600,
        (total_s % 3600) / 60,
        total_s % 60,
        ms
    )
}

/// Encode cue records under a `WEBVTT` header with dot milliseconds.
pub fn encode(records: &[CueSnapshot]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for record in records {
        out.push_str(&format!(
            "{} --> {}\n{}\n\n",
            seconds_to_stamp(record.start),
            seconds_to_stamp(record.end),
            record.text.trim()
        ));
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_header() {
        let text = "WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nFirst\n\n00:00:05.500 --> 00:00:08.000\nSecond\nwrapped\n";
        let cues = parse(text);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0], CueSnapshot::new(1.0, 4.0, "First"));
        assert_eq!(cues[1].text, "Second\nwrapped");
    }

    #[test]
    fn test_parse_short_timestamps() {
        let cues = parse("WEBVTT\n\n01:05.250 --> 01:07.000\nshort form\n");
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start, 65.25);
        assert_eq!(cues[0].end, 67.0);
    }

    #[test]
    fn test_parse_without_header() {
        let cues = parse("00:00:01.000 --> 00:00:02.000\nbare\n");
        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn test_parse_skips_non_time_lines() {
        let text = "WEBVTT\n\nNOTE a comment\n\n00:00:01.000 --> 00:00:02.000\nkept\n";
        let cues = parse(text);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "kept");
    }

    #[test]
    fn test_encode_round_trip() {
        let cues = vec![
            CueSnapshot::new(1.0, 4.0, "First"),
            CueSnapshot::new(5.5, 8.0, "Second"),
        ];
        let encoded = encode(&cues);
        assert!(encoded.starts_with("WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nFirst"));
        assert_eq!(parse(&encoded), cues);
    }
}
