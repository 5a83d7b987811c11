use lazy_static::lazy_static;

use crate::{error::ResolveError, mime::MediaType};

/// The closed set of playlist formats this crate understands.
///
/// Each variant owns a canonical file extension and a set of media types;
/// both are consulted by [`detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Asx,
    M3u,
    M3u8,
    Pls,
    Xspf,
}

pub(crate) const FORMAT_COUNT: usize = 5;

lazy_static! {
    static ref ASX_TYPES: Vec<MediaType> = vec![MediaType::video("x-ms-asf")];
    // One set for both M3U flavors; see the dispatch rule in `detect`
    static ref MPEGURL_TYPES: Vec<MediaType> = vec![MediaType::audio("x-mpegurl")];
    static ref PLS_TYPES: Vec<MediaType> = vec![MediaType::audio("x-scpls")];
    static ref XSPF_TYPES: Vec<MediaType> = vec![MediaType::application("xspf+xml")];
}

impl FormatKind {
    /// All formats, in dispatch probe order.
    pub const ALL: [FormatKind; FORMAT_COUNT] = [
        FormatKind::Asx,
        FormatKind::M3u,
        FormatKind::M3u8,
        FormatKind::Pls,
        FormatKind::Xspf,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Asx => "asx",
            Self::M3u => "m3u",
            Self::M3u8 => "m3u8",
            Self::Pls => "pls",
            Self::Xspf => "xspf",
        }
    }

    pub fn supported_types(self) -> &'static [MediaType] {
        match self {
            Self::Asx => ASX_TYPES.as_slice(),
            Self::M3u | Self::M3u8 => MPEGURL_TYPES.as_slice(),
            Self::Pls => PLS_TYPES.as_slice(),
            Self::Xspf => XSPF_TYPES.as_slice(),
        }
    }
}

/// Selects the format to parse `uri` with.
///
/// The file extension is tried first, then the media-type hint, format by
/// format in [`FormatKind::ALL`] order; the first match wins. A missing
/// hint (or one that is not a parseable media type) matches nothing.
pub fn detect(uri: &str, media_type: Option<&str>) -> Result<FormatKind, ResolveError> {
    let extension = file_extension(uri);
    let hint = media_type.and_then(MediaType::parse);

    for kind in FormatKind::ALL {
        if kind.extension().eq_ignore_ascii_case(extension) {
            return Ok(kind);
        }

        // Plain M3U is never selected from the media type alone: the
        // shared audio/x-mpegurl type belongs to the extended parser.
        if kind == FormatKind::M3u {
            continue;
        }

        if let Some(hint) = &hint {
            if kind.supported_types().contains(hint) {
                return Ok(kind);
            }
        }
    }

    Err(ResolveError::UnsupportedFormat(uri.to_string()))
}

/// Substring after the last `.`; empty when the URI has no dot.
fn file_extension(uri: &str) -> &str {
    match uri.rfind('.') {
        Some(index) => &uri[index + 1..],
        None => "",
    }
}
