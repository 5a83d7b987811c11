use std::io::BufRead;

use smol_str::SmolStr;

use crate::{
    detect::FormatKind,
    error::ParseError,
    parser::next_line,
    playlist::{Playlist, PlaylistEntry},
    resolver::Session,
};

/// PLS parser.
///
/// Key=value blocks; a blank line or a `Length` key closes the block
/// being processed. Keys are matched case-insensitively: a `File` prefix
/// carries the reference, anything containing `Title` the title. Lines
/// without `=` and unrecognized keys are ignored. An entry still open at
/// end of stream is finalized, so files that drop the trailing blank
/// line (or the Length lines entirely) still yield their entries.
pub(crate) fn parse(
    session: &mut Session<'_>,
    reader: &mut dyn BufRead,
    playlist: &mut Playlist,
) -> Result<(), ParseError> {
    let mut entry = PlaylistEntry::default();
    let mut processing = false;

    while let Some(line) = next_line(reader)? {
        if line.trim().is_empty() {
            if processing {
                session.save_entry(FormatKind::Pls, std::mem::take(&mut entry), playlist);
            }

            entry = PlaylistEntry::default();
            processing = false;
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        if key.starts_with("file") {
            processing = true;
            entry.uri = SmolStr::new(value);
        } else if key.contains("title") {
            entry.title = Some(SmolStr::new(value));
        } else if key.contains("length") {
            if processing {
                session.save_entry(FormatKind::Pls, std::mem::take(&mut entry), playlist);
            }

            entry = PlaylistEntry::default();
            processing = false;
        }
    }

    if processing {
        session.save_entry(FormatKind::Pls, entry, playlist);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::parse;
    use crate::{playlist::Playlist, resolver::testing::offline_session};

    fn parse_str(data: &str) -> Playlist {
        let mut session = offline_session();
        let mut playlist = Playlist::new();
        let mut reader = Cursor::new(data.as_bytes().to_vec());
        parse(&mut session, &mut reader, &mut playlist).unwrap();
        playlist
    }

    #[test]
    fn test_full_block() {
        let playlist = parse_str("File1=http://host/a.mp3\nTitle1=Song A\nLength1=180\n\n");

        assert_eq!(playlist.len(), 1);
        let entry = &playlist.entries()[0];
        assert_eq!(entry.uri, "http://host/a.mp3");
        assert_eq!(entry.title.as_deref(), Some("Song A"));
        assert_eq!(entry.track, Some(1));
    }

    #[test]
    fn test_missing_trailing_blank_line() {
        let playlist = parse_str("File1=http://host/a.mp3\nTitle1=Song A\nLength1=180");

        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.entries()[0].uri, "http://host/a.mp3");
    }

    #[test]
    fn test_blocks_separated_by_blank_line_only() {
        let playlist = parse_str("File1=http://host/a.mp3\n\nFile2=http://host/b.mp3\n\n");

        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.entries()[0].uri, "http://host/a.mp3");
        assert_eq!(playlist.entries()[1].uri, "http://host/b.mp3");
        assert_eq!(playlist.entries()[1].track, Some(2));
    }

    #[test]
    fn test_length_closes_block_without_blank_line() {
        let playlist = parse_str(
            "File1=http://host/a.mp3\nLength1=180\nFile2=http://host/b.mp3\nLength2=90\n",
        );

        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.entries()[0].uri, "http://host/a.mp3");
        assert_eq!(playlist.entries()[1].uri, "http://host/b.mp3");
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let playlist = parse_str("FILE1=http://host/a.mp3\ntitle1=Song A\nLENGTH1=10\n");

        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.entries()[0].title.as_deref(), Some("Song A"));
    }

    #[test]
    fn test_unrecognized_lines_are_ignored() {
        let playlist = parse_str(
            "[playlist]\nNumberOfEntries=1\nFile1=http://host/a.mp3\nVersion=2\n",
        );

        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.entries()[0].uri, "http://host/a.mp3");
    }

    #[test]
    fn test_title_without_file_yields_nothing() {
        let playlist = parse_str("Title1=Orphan\nLength1=10\n\n");

        assert!(playlist.is_empty());
    }
}
