//! Numbered-block subtitle format: blank-line separated blocks of an
//! optional index line, a `HH:MM:SS,mmm --> HH:MM:SS,mmm` time line, and
//! body text. Comma and dot milliseconds are both tolerated on parse.

use std::sync::LazyLock;

use regex::Regex;

use crate::state::CueSnapshot;

static BLOCK_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

static TIME_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2}[.,]\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2}[.,]\d{3})").unwrap()
});

static STAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2}):(\d{2}):(\d{2})[.,](\d{3})").unwrap());

fn stamp_to_seconds(stamp: &str) -> f64 {
    let Some(caps) = STAMP.captures(stamp) else {
        return 0.0;
    };
    let field = |i: usize| caps[i].parse::<f64>().unwrap_or(0.0);
    field(1) * 3600.0 + field(2) * 60.0 + field(3) + field(4) / 1000.0
}

/// Parse numbered-block subtitle text. Malformed blocks are skipped.
pub fn parse(text: &str) -> Vec<CueSnapshot> {
    let norm = text.replace("\r\n", "\n").replace('\r', "\n");
    let norm = norm.trim();
    if norm.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for block in BLOCK_SPLIT.split(norm) {
        let lines: Vec<&str> = block.split('\n').filter(|line| !line.is_empty()).collect();
        if lines.len() < 2 {
            continue;
        }
        let mut i = 0;
        // Optional numeric index line.
        let first = lines[0].trim();
        if !first.is_empty() && first.chars().all(|c| c.is_ascii_digit()) {
            i = 1;
        }
        let Some(caps) = lines.get(i).and_then(|line| TIME_LINE.captures(line.trim())) else {
            continue;
        };
        let start = stamp_to_seconds(&caps[1]);
        let end = stamp_to_seconds(&caps[2]);
        let body = lines[i + 1..].join("\n").trim().to_string();
        out.push(CueSnapshot::new(start, end, body));
    }
    out
}

fn seconds_to_stamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as i64;
    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;
    format!(
        "{:02}:{:02}:{:02},{:03}",
        total_s / 3600,
        (total_s % 3600) / 60,
        total_s % 60,
        ms
    )
}

/// Encode cue records as 1-based numbered blocks with comma milliseconds.
pub fn encode(records: &[CueSnapshot]) -> String {
    let mut out = String::new();
    for (index, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
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

    const SAMPLE: &str = "1\n00:00:01,000 --> 00:00:04,000\nFirst line\n\n2\n00:00:05,500 --> 00:00:08,250\nSecond line\nwith a wrap\n";

    #[test]
    fn test_parse_numbered_blocks() {
        let cues = parse(SAMPLE);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0], CueSnapshot::new(1.0, 4.0, "First line"));
        assert_eq!(cues[1].start, 5.5);
        assert_eq!(cues[1].end, 8.25);
        assert_eq!(cues[1].text, "Second line\nwith a wrap");
    }

    #[test]
    fn test_parse_without_index_lines() {
        let cues = parse("00:00:01,000 --> 00:00:02,000\nno index\n");
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "no index");
    }

    #[test]
    fn test_parse_tolerates_dot_milliseconds() {
        let cues = parse("1\n00:00:01.250 --> 00:00:02.750\ndots\n");
        assert_eq!(cues[0].start, 1.25);
        assert_eq!(cues[0].end, 2.75);
    }

    #[test]
    fn test_parse_skips_malformed_blocks() {
        let text = "1\nnot a time line\nbody\n\n2\n00:00:01,000 --> 00:00:02,000\ngood\n";
        let cues = parse(text);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "good");
    }

    #[test]
    fn test_parse_handles_crlf() {
        let cues = parse("1\r\n00:00:01,000 --> 00:00:02,000\r\nwindows\r\n");
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "windows");
    }

    #[test]
    fn test_encode_round_trip() {
        let cues = parse(SAMPLE);
        let encoded = encode(&cues);
        assert_eq!(parse(&encoded), cues);
        assert!(encoded.starts_with("1\n00:00:01,000 --> 00:00:04,000\nFirst line"));
        assert!(!encoded.ends_with('\n'));
    }

    #[test]
    fn test_encode_carries_millisecond_overflow() {
        let encoded = encode(&[CueSnapshot::new(1.9996, 3.0, "x")]);
        assert!(encoded.contains("00:00:02,000 --> 00:00:03,000"), "{encoded}");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n ").is_empty());
        assert_eq!(encode(&[]), "");
    }
}
