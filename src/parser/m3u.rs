use std::io::BufRead;

use smol_str::SmolStr;

use crate::{
    detect::FormatKind,
    error::ParseError,
    parser::{EXTINF_TAG, EXTM3U, extinf_title, next_line},
    playlist::{Playlist, PlaylistEntry},
    resolver::Session,
};

/// Plain M3U parser.
///
/// Same machine as the extended parser, except that references are used
/// verbatim (no absolutization) and only the `#EXTM3U` header and blank
/// lines are skipped; any other line that is not an `#EXTINF` tag counts
/// as a reference.
pub(crate) fn parse(
    session: &mut Session<'_>,
    reader: &mut dyn BufRead,
    playlist: &mut Playlist,
) -> Result<(), ParseError> {
    let mut entry = PlaylistEntry::default();
    let mut processing = false;

    while let Some(line) = next_line(reader)? {
        if line.eq_ignore_ascii_case(EXTM3U) || line.trim().is_empty() {
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

            entry.uri = SmolStr::new(line.trim());
            let finished = std::mem::take(&mut entry);
            processing = false;
            session.save_entry(FormatKind::M3u, finished, playlist);
        }
    }

    Ok(())
}
