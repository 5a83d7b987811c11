use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;

use crate::{
    detect::FormatKind,
    error::ParseError,
    playlist::{Playlist, PlaylistEntry},
    resolver::Session,
};

/// ASX parser.
///
/// Streaming walk over the markup; names are matched case-insensitively
/// because ASX is written in every capitalization in the wild. Each
/// `<entry>` contributes one playlist entry: the first `<ref>` `href`
/// (further refs are fallback locations for the same clip) plus the
/// entry-level `<title>` text, in whichever order they appear. Unknown
/// elements are skipped; broken markup aborts the parse, keeping the
/// entries finalized so far.
pub(crate) fn parse(
    session: &mut Session<'_>,
    reader: &mut dyn BufRead,
    playlist: &mut Playlist,
) -> Result<(), ParseError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut in_entry = false;
    let mut href: Option<String> = None;
    let mut title: Option<String> = None;
    let mut text = String::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                match local_name(e.name()).as_str() {
                    "entry" => {
                        in_entry = true;
                        href = None;
                        title = None;
                    }
                    "ref" if in_entry && href.is_none() => href = href_attribute(&e),
                    _ => {}
                }
                text.clear();
            }

            Ok(Event::Empty(e)) => {
                if in_entry && href.is_none() && local_name(e.name()) == "ref" {
                    href = href_attribute(&e);
                }
            }

            Ok(Event::Text(e)) => text.push_str(&String::from_utf8_lossy(&e)),
            Ok(Event::CData(e)) => text.push_str(&String::from_utf8_lossy(&e)),

            Ok(Event::End(e)) => {
                match local_name(e.name()).as_str() {
                    "title" if in_entry => {
                        if !text.trim().is_empty() {
                            title = Some(text.trim().to_string());
                        }
                    }
                    "entry" => {
                        if let Some(href) = href.take() {
                            if !href.is_empty() {
                                let entry = PlaylistEntry {
                                    uri: href.into(),
                                    title: title.take().map(Into::into),
                                    track: None,
                                };
                                session.save_entry(FormatKind::Asx, entry, playlist);
                            }
                        }
                        in_entry = false;
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

fn href_attribute(element: &BytesStart<'_>) -> Option<String> {
    for attr in element.attributes().flatten() {
        if attr.key.as_ref().eq_ignore_ascii_case(b"href") {
            return Some(String::from_utf8_lossy(&attr.value).trim().to_string());
        }
    }

    None
}
