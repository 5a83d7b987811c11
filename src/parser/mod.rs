//! One parser per playlist format. Each module exposes a single
//! `parse` function that reads a byte stream, extracts raw entries and
//! finalizes every one of them through
//! [`Session::save_entry`](crate::resolver::Session::save_entry).

pub(crate) mod asx;
pub(crate) mod m3u;
pub(crate) mod m3u8;
pub(crate) mod pls;
pub(crate) mod xspf;

use std::io::{self, BufRead};

use lazy_static::lazy_static;
use regex::Regex;

/// Header tag opening every M3U-family playlist
pub(crate) const EXTM3U: &str = "#EXTM3U";

lazy_static! {
    /// `#EXT-X-` extended tags, skipped by the extended parser
    pub(crate) static ref EXT_X_TAG: Regex =
        Regex::new("(?i)^#ext-x-").expect("Regular expression error");
    /// `#EXTINF` per-entry metadata tags
    pub(crate) static ref EXTINF_TAG: Regex =
        Regex::new("(?i)^#extinf").expect("Regular expression error");
    /// References that are already absolute and must pass through verbatim
    pub(crate) static ref ABSOLUTE_REFERENCE: Regex =
        Regex::new("(?i)^http").expect("Regular expression error");
}

/// Reads one line without its trailing newline; `None` at end of stream.
pub(crate) fn next_line(reader: &mut dyn BufRead) -> io::Result<Option<String>> {
    let mut buffer = String::new();
    match reader.read_line(&mut buffer)? {
        0 => Ok(None),
        _ => {
            while buffer.ends_with('\n') || buffer.ends_with('\r') {
                buffer.pop();
            }
            Ok(Some(buffer))
        }
    }
}

/// Title carried by an `#EXTINF` line: everything after the first comma,
/// or the whole line when it has none.
pub(crate) fn extinf_title(line: &str) -> &str {
    match line.find(',') {
        Some(index) => &line[index + 1..],
        None => line,
    }
}
