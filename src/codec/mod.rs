//! Subtitle wire formats.
//!
//! Two formats are supported: the numbered-block comma-millisecond format
//! (`srt`) and the header-tagged dot-millisecond format (`vtt`). Decoding is
//! permissive: malformed blocks are skipped, and invariants are enforced by
//! the edit operations rather than at import. Encoding is exact.

mod srt;
mod vtt;

use crate::state::CueSnapshot;

/// Wire format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecFormat {
    Srt,
    Vtt,
}

/// Sniff the format from the header: a leading `WEBVTT` (any case) tags the
/// dot-millisecond format, everything else is treated as numbered blocks.
pub fn detect(text: &str) -> CodecFormat {
    let head = text.trim_start();
    if head.get(..6).is_some_and(|tag| tag.eq_ignore_ascii_case("WEBVTT")) {
        CodecFormat::Vtt
    } else {
        CodecFormat::Srt
    }
}

/// Decode subtitle text into ordered cue records, auto-detecting the format.
pub fn decode(text: &str) -> Vec<CueSnapshot> {
    match detect(text) {
        CodecFormat::Srt => srt::parse(text),
        CodecFormat::Vtt => vtt::parse(text),
    }
}

/// Encode cue records in the requested format.
pub fn encode(records: &[CueSnapshot], format: CodecFormat) -> String {
    match format {
        CodecFormat::Srt => srt::encode(records),
        CodecFormat::Vtt => vtt::encode(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_header() {
        assert_eq!(detect("WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nhi"), CodecFormat::Vtt);
        assert_eq!(detect("\n  webvtt"), CodecFormat::Vtt);
        assert_eq!(detect("1\n00:00:01,000 --> 00:00:02,000\nhi"), CodecFormat::Srt);
        assert_eq!(detect(""), CodecFormat::Srt);
    }

    #[test]
    fn test_decode_routes_by_format() {
        let vtt = "WEBVTT\n\n00:00:01.000 --> 00:00:02.500\nhello\n";
        let cues = decode(vtt);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start, 1.0);
        assert_eq!(cues[0].end, 2.5);

        let srt = "1\n00:00:01,000 --> 00:00:02,500\nhello\n";
        let cues = decode(srt);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "hello");
    }
}
