use std::io::BufRead;

use smol_str::SmolStr;
use url::Url;

use crate::{
    detect::FormatKind,
    error::ParseError,
    parser::{ABSOLUTE_REFERENCE, EXT_X_TAG, EXTINF_TAG, EXTM3U, extinf_title, next_line},
    playlist::{Playlist, PlaylistEntry},
    resolver::Session,
};

/// Extended M3U parser.
///
/// Two states: idle and accumulating metadata. An `#EXTINF` line opens an
/// entry and carries its title; the next plain line closes it with the
/// reference, absolutized against the playlist's own directory. `#EXT-X-`
/// tags, the `#EXTM3U` header and blank lines are skipped. Nothing needs
/// flushing at end of stream: an open entry is only ever closed by a
/// reference line.
pub(crate) fn parse(
    session: &mut Session<'_>,
    uri: &str,
    reader: &mut dyn BufRead,
    playlist: &mut Playlist,
) -> Result<(), ParseError> {
    let host = host_prefix(uri)?;

    let mut entry = PlaylistEntry::default();
    let mut processing = false;

    while let Some(line) = next_line(reader)? {
        if line.eq_ignore_ascii_case(EXTM3U)
            || EXT_X_TAG.is_match(&line)
            || line.trim().is_empty()
        {
            continue;
        }

        if EXTINF_TAG.is_match(&line) {
            entry = PlaylistEntry::default();
            entry.title = Some(SmolStr::new(extinf_title(&line)));
            processing = true;
        } else {
            if !processing {
                entry = PlaylistEntry::default();
            }

            entry.uri = generate_uri(line.trim(), &host).into();
            let finished = std::mem::take(&mut entry);
            processing = false;
            session.save_entry(FormatKind::M3u8, finished, playlist);
        }
    }

    Ok(())
}

/// The playlist's own directory, used to absolutize relative references:
/// scheme and authority preserved, path truncated after its last `/`,
/// query and fragment dropped. A URI with an empty path just gains a
/// trailing slash.
fn host_prefix(uri: &str) -> Result<String, ParseError> {
    let mut url = Url::parse(uri).map_err(|_| ParseError::InvalidUri(uri.to_string()))?;

    if url.path().trim().is_empty() {
        return Ok(format!("{}/", uri));
    }

    url.set_query(None);
    url.set_fragment(None);

    let path = url.path().to_string();
    if let Some(index) = path.rfind('/') {
        url.set_path(&path[..index + 1]);
    }

    Ok(url.to_string())
}

/// Prefixes relative references with the host; `http...` references are
/// used as-is.
fn generate_uri(reference: &str, host: &str) -> String {
    if ABSOLUTE_REFERENCE.is_match(reference) {
        return reference.to_string();
    }

    format!("{}{}", host, reference)
}
