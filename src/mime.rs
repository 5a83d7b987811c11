use std::fmt::Display;

use smol_str::SmolStr;

/// A `type/subtype` media type pair.
///
/// Parameters (`;`-delimited, e.g. `;charset=utf-8`) are stripped when
/// parsing and never take part in equality, which is ASCII
/// case-insensitive by construction: both halves are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    kind: SmolStr,
    subtype: SmolStr,
}

impl MediaType {
    pub fn new(kind: impl AsRef<str>, subtype: impl AsRef<str>) -> Self {
        Self {
            kind: kind.as_ref().trim().to_ascii_lowercase().into(),
            subtype: subtype.as_ref().trim().to_ascii_lowercase().into(),
        }
    }

    pub fn audio(subtype: impl AsRef<str>) -> Self {
        Self::new("audio", subtype)
    }

    pub fn video(subtype: impl AsRef<str>) -> Self {
        Self::new("video", subtype)
    }

    pub fn application(subtype: impl AsRef<str>) -> Self {
        Self::new("application", subtype)
    }

    /// Parses a MIME-style string, keeping only the part before the first
    /// `;`. Returns `None` when either half is missing or empty.
    pub fn parse(input: impl AsRef<str>) -> Option<Self> {
        let essence = input.as_ref().split(';').next().unwrap_or("").trim();
        let (kind, subtype) = essence.split_once('/')?;

        if kind.trim().is_empty() || subtype.trim().is_empty() {
            return None;
        }

        Some(Self::new(kind, subtype))
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.subtype)
    }
}

#[cfg(test)]
mod tests {
    use super::MediaType;

    #[test]
    fn test_parse_plain() {
        let parsed = MediaType::parse("audio/x-mpegurl").unwrap();
        assert_eq!(parsed, MediaType::audio("x-mpegurl"));
    }

    #[test]
    fn test_parse_strips_parameters() {
        let parsed = MediaType::parse("audio/x-scpls; charset=utf-8").unwrap();
        assert_eq!(parsed, MediaType::audio("x-scpls"));
    }

    #[test]
    fn test_parse_ignores_case() {
        let parsed = MediaType::parse("Video/X-MS-ASF").unwrap();
        assert_eq!(parsed, MediaType::video("x-ms-asf"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(MediaType::parse("").is_none());
        assert!(MediaType::parse("audio").is_none());
        assert!(MediaType::parse("/x-mpegurl").is_none());
        assert!(MediaType::parse("audio/").is_none());
    }
}
