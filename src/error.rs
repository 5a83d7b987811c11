use std::{error::Error, fmt::Display, io};

/// Failure while fetching a playlist resource.
#[derive(Debug)]
pub enum FetchError {
    InvalidUri(url::ParseError),
    RequestError(reqwest::Error),
    RequestNotSuccess(u16),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUri(e) => e.fmt(f),
            Self::RequestError(e) => e.fmt(f),
            Self::RequestNotSuccess(status_code) => {
                write!(f, "Server respond with status code {}", status_code)
            }
        }
    }
}

impl Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        Self::RequestError(value)
    }
}

impl From<url::ParseError> for FetchError {
    fn from(value: url::ParseError) -> Self {
        Self::InvalidUri(value)
    }
}

/// Structural failure inside a single format parser.
#[derive(Debug)]
pub enum ParseError {
    IoError(io::Error),
    InvalidUri(String),
    MarkupError(quick_xml::Error),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => e.fmt(f),
            Self::InvalidUri(uri) => write!(f, "Cannot derive a base from \"{}\"", uri),
            Self::MarkupError(e) => e.fmt(f),
        }
    }
}

impl Error for ParseError {}

impl From<io::Error> for ParseError {
    fn from(value: io::Error) -> Self {
        Self::IoError(value)
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(value: quick_xml::Error) -> Self {
        Self::MarkupError(value)
    }
}

/// Failure of a whole resolution attempt.
#[derive(Debug)]
pub enum ResolveError {
    /// Neither the extension nor the media type matched a known format
    UnsupportedFormat(String),
    FetchError(FetchError),
    ParseError(ParseError),
    /// The entry URI is already on the current resolution path
    CycleDetected(String),
    DepthExceeded(usize),
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat(uri) => write!(f, "Unsupported format: {}", uri),
            Self::FetchError(e) => e.fmt(f),
            Self::ParseError(e) => e.fmt(f),
            Self::CycleDetected(uri) => write!(f, "Playlist references itself: {}", uri),
            Self::DepthExceeded(depth) => {
                write!(f, "Nesting depth limit reached at {} levels", depth)
            }
        }
    }
}

impl Error for ResolveError {}

impl From<FetchError> for ResolveError {
    fn from(value: FetchError) -> Self {
        Self::FetchError(value)
    }
}

impl From<ParseError> for ResolveError {
    fn from(value: ParseError) -> Self {
        Self::ParseError(value)
    }
}
