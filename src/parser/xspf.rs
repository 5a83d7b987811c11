use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::Event;
use quick_xml::name::QName;

use crate::{
    detect::FormatKind,
    error::ParseError,
    playlist::{Playlist, PlaylistEntry},
    resolver::Session,
};

/// XSPF parser.
///
/// Walks the `<trackList>`: every `<track>` with a non-empty
/// `<location>` becomes an entry, with `<track>`-level `<title>` text as
/// its title. The playlist-level `<title>` is not entry metadata.
/// Unknown elements are skipped; broken markup aborts the parse, keeping
/// the entries finalized so far.
pub(crate) fn parse(
    session: &mut Session<'_>,
    reader: &mut dyn BufRead,
    playlist: &mut Playlist,
) -> Result<(), ParseError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut in_track = false;
    let mut location: Option<String> = None;
    let mut title: Option<String> = None;
    let mut text = String::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if local_name(e.name()) == "track" {
                    in_track = true;
                    location = None;
                    title = None;
                }
                text.clear();
            }

            Ok(Event::Text(e)) => text.push_str(&String::from_utf8_lossy(&e)),
            Ok(Event::CData(e)) => text.push_str(&String::from_utf8_lossy(&e)),

            Ok(Event::End(e)) => {
                match local_name(e.name()).as_str() {
                    "location" if in_track => {
                        if !text.trim().is_empty() {
                            location = Some(text.trim().to_string());
                        }
                    }
                    "title" if in_track => {
                        if !text.trim().is_empty() {
                            title = Some(text.trim().to_string());
                        }
                    }
                    "track" => {
                        if let Some(location) = location.take() {
                            let entry = PlaylistEntry {
                                uri: location.into(),
                                title: title.take().map(Into::into),
                                track: None,
                            };
                            session.save_entry(FormatKind::Xspf, entry, playlist);
                        }
                        in_track = false;
                        title = None;
                    }
                    _ => {}
                }
                text.clear();
            }

            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::from(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn local_name(name: QName<'_>) -> String {
    String::from_utf8_lossy(name.local_name().as_ref()).to_ascii_lowercase()
}
