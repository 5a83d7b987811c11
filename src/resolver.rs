use std::{collections::HashSet, io::BufRead};

use log::{debug, error};
use url::Url;

use crate::{
    config::{DEFAULT_MAX_DEPTH, ResolveConfig},
    detect::{FORMAT_COUNT, FormatKind, detect},
    error::{ParseError, ResolveError},
    fetch::{Fetch, HttpFetcher},
    parser,
    playlist::{Playlist, PlaylistEntry},
};

/// Resolves playlist resources into flat playlists.
///
/// A `Resolver` carries no state across calls; every call runs its own
/// resolution session (nesting path, depth, track counters), so one
/// instance can be reused freely.
pub struct Resolver {
    fetcher: Box<dyn Fetch>,
    config: ResolveConfig,
}

impl Resolver {
    pub fn new() -> Self {
        Self::with_config(ResolveConfig::default())
    }

    pub fn with_config(config: ResolveConfig) -> Self {
        let fetcher = Box::new(HttpFetcher::new(&config));
        Self { fetcher, config }
    }

    /// Substitutes `fetcher` for the built-in HTTP transport.
    pub fn with_fetcher(fetcher: Box<dyn Fetch>, config: ResolveConfig) -> Self {
        Self { fetcher, config }
    }

    /// Fetches `uri` and resolves its content into a flat playlist.
    ///
    /// The format is chosen from the file extension alone; an unknown
    /// extension fails with [`ResolveError::UnsupportedFormat`] before
    /// any network access. Fetch and parse failures surface as errors
    /// unless [`ResolveConfig::degrade_on_error`] is set, in which case
    /// they are logged and whatever was resolved so far is returned.
    pub fn resolve(&self, uri: &str) -> Result<Playlist, ResolveError> {
        let mut playlist = Playlist::new();
        let mut session = Session::new(self.fetcher.as_ref(), self.max_depth());
        session.visited.insert(normalize(uri));

        match session.resolve_into(uri, &mut playlist) {
            Ok(()) => Ok(playlist),
            Err(e @ ResolveError::UnsupportedFormat(_)) => Err(e),
            Err(e) if self.config.degrade_on_error => {
                error!("Failed to resolve {}: {}", uri, e);
                Ok(playlist)
            }
            Err(e) => Err(e),
        }
    }

    /// Parses an already-open byte stream as the playlist at `uri`,
    /// appending the resolved leaves to `playlist`.
    ///
    /// Dispatch considers the extension first and then `media_type`.
    /// Every failure kind propagates to the caller; the degrade option
    /// only applies to [`resolve`](Self::resolve).
    pub fn parse(
        &self,
        uri: &str,
        media_type: Option<&str>,
        reader: impl BufRead,
        playlist: &mut Playlist,
    ) -> Result<(), ResolveError> {
        let kind = detect(uri, media_type)?;

        let mut session = Session::new(self.fetcher.as_ref(), self.max_depth());
        session.visited.insert(normalize(uri));

        let mut reader = reader;
        session.run_parser(kind, uri, &mut reader, playlist)?;
        Ok(())
    }

    fn max_depth(&self) -> usize {
        self.config.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one top-level resolution call: the chain of URIs currently
/// being expanded, the nesting depth, and the per-format track counters.
pub(crate) struct Session<'a> {
    fetcher: &'a dyn Fetch,
    max_depth: usize,
    depth: usize,
    visited: HashSet<String>,
    counters: [u32; FORMAT_COUNT],
}

impl<'a> Session<'a> {
    pub(crate) fn new(fetcher: &'a dyn Fetch, max_depth: usize) -> Self {
        Self {
            fetcher,
            max_depth,
            depth: 0,
            visited: HashSet::new(),
            counters: [0; FORMAT_COUNT],
        }
    }

    /// Detects, fetches and parses one playlist resource, appending its
    /// leaves to `playlist`. The fetched stream is released when parsing
    /// ends, on every exit path.
    fn resolve_into(&mut self, uri: &str, playlist: &mut Playlist) -> Result<(), ResolveError> {
        let kind = detect(uri, None)?;

        let resource = self.fetcher.fetch(uri)?;
        debug!("Resolving {} as {:?}", resource.resolved_uri, kind);

        let mut reader = resource.reader;
        self.run_parser(kind, &resource.resolved_uri, reader.as_mut(), playlist)?;
        Ok(())
    }

    fn run_parser(
        &mut self,
        kind: FormatKind,
        uri: &str,
        reader: &mut dyn BufRead,
        playlist: &mut Playlist,
    ) -> Result<(), ParseError> {
        match kind {
            FormatKind::Asx => parser::asx::parse(self, reader, playlist),
            FormatKind::M3u => parser::m3u::parse(self, reader, playlist),
            FormatKind::M3u8 => parser::m3u8::parse(self, uri, reader, playlist),
            FormatKind::Pls => parser::pls::parse(self, reader, playlist),
            FormatKind::Xspf => parser::xspf::parse(self, reader, playlist),
        }
    }

    /// Finalizes one raw entry coming out of a format parser: assigns the
    /// next track number for that format and hands the entry over to the
    /// recursive expansion.
    pub(crate) fn save_entry(
        &mut self,
        kind: FormatKind,
        mut entry: PlaylistEntry,
        playlist: &mut Playlist,
    ) {
        let counter = &mut self.counters[kind as usize];
        *counter += 1;
        entry.track = Some(*counter);

        self.expand(entry, playlist);
    }

    /// Tries to resolve `entry` as a nested playlist; on any failure the
    /// entry is kept as a terminal leaf instead. The fallback is what
    /// lets a list of plain media URIs resolve: every one of them fails
    /// format detection and lands here.
    fn expand(&mut self, entry: PlaylistEntry, playlist: &mut Playlist) {
        match self.try_expand(&entry, playlist) {
            Ok(()) => {}
            Err(e) => {
                debug!("Keeping {} as a terminal entry: {}", entry.uri, e);
                playlist.add(entry);
            }
        }
    }

    fn try_expand(
        &mut self,
        entry: &PlaylistEntry,
        playlist: &mut Playlist,
    ) -> Result<(), ResolveError> {
        let key = normalize(&entry.uri);

        if self.visited.contains(&key) {
            return Err(ResolveError::CycleDetected(entry.uri.to_string()));
        }

        if self.depth >= self.max_depth {
            return Err(ResolveError::DepthExceeded(self.depth));
        }

        // The URI stays in the set only while its branch is open, so a
        // playlist referenced twice in sequence expands both times.
        self.visited.insert(key.clone());
        self.depth += 1;
        let result = self.resolve_into(&entry.uri, playlist);
        self.depth -= 1;
        self.visited.remove(&key);

        result
    }
}

/// Round-trips through [`Url`] so that equivalent spellings of one
/// location compare equal on the resolution path.
fn normalize(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(url) => url.to_string(),
        Err(_) => uri.trim().to_string(),
    }
}


#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::testing::{MapFetcher, NoTransport};
    use super::Resolver;
    use crate::{
        config::ResolveConfig,
        error::ResolveError,
        playlist::Playlist,
    };

    fn resolver_with(fetcher: MapFetcher, config: ResolveConfig) -> Resolver {
        Resolver::with_fetcher(Box::new(fetcher), config)
    }

    #[test]
    fn test_nested_playlist_flattens_into_leaves() {
        let mut fetcher = MapFetcher::new();
        fetcher.insert(
            "http://host/dir/top.m3u8",
            "#EXTM3U\n#EXTINF:0,Nested\nsub.m3u8\n",
        );
        fetcher.insert(
            "http://host/dir/sub.m3u8",
            "#EXTM3U\na.mp3\nb.mp3\n",
        );

        let resolver = resolver_with(fetcher, ResolveConfig::default());
        let playlist = resolver.resolve("http://host/dir/top.m3u8").unwrap();

        // only the nested leaves are visible, not the referencing entry
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.entries()[0].uri, "http://host/dir/a.mp3");
        assert_eq!(playlist.entries()[1].uri, "http://host/dir/b.mp3");
        // the referencing entry consumed track 1 before it expanded
        assert_eq!(playlist.entries()[0].track, Some(2));
        assert_eq!(playlist.entries()[1].track, Some(3));
    }

    #[test]
    fn test_unresolvable_reference_survives_as_leaf() {
        let mut fetcher = MapFetcher::new();
        fetcher.insert(
            "http://host/top.m3u8",
            "#EXTM3U\n#EXTINF:0,Gone\nmissing.pls\n",
        );

        let resolver = resolver_with(fetcher, ResolveConfig::default());
        let playlist = resolver.resolve("http://host/top.m3u8").unwrap();

        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.entries()[0].uri, "http://host/missing.pls");
        assert_eq!(playlist.entries()[0].title.as_deref(), Some("Gone"));
    }

    #[test]
    fn test_self_reference_terminates() {
        let mut fetcher = MapFetcher::new();
        fetcher.insert("http://host/loop.m3u8", "#EXTM3U\nloop.m3u8\n");

        let resolver = resolver_with(fetcher, ResolveConfig::default());
        let playlist = resolver.resolve("http://host/loop.m3u8").unwrap();

        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.entries()[0].uri, "http://host/loop.m3u8");
    }

    #[test]
    fn test_mutual_reference_terminates() {
        let mut fetcher = MapFetcher::new();
        fetcher.insert("http://host/a.m3u8", "#EXTM3U\nb.m3u8\n");
        fetcher.insert("http://host/b.m3u8", "#EXTM3U\na.m3u8\n");

        let resolver = resolver_with(fetcher, ResolveConfig::default());
        let playlist = resolver.resolve("http://host/a.m3u8").unwrap();

        // b was expanded once; its reference back to a was cut
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.entries()[0].uri, "http://host/a.m3u8");
    }

    #[test]
    fn test_depth_limit_keeps_references_whole() {
        let mut fetcher = MapFetcher::new();
        fetcher.insert("http://host/top.m3u8", "#EXTM3U\nsub.m3u8\n");
        fetcher.insert("http://host/sub.m3u8", "#EXTM3U\nsong.mp3\n");

        let config = ResolveConfig {
            max_depth: Some(0),
            ..ResolveConfig::default()
        };
        let resolver = resolver_with(fetcher, config);
        let playlist = resolver.resolve("http://host/top.m3u8").unwrap();

        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.entries()[0].uri, "http://host/sub.m3u8");
    }

    #[test]
    fn test_top_level_fetch_failure_surfaces() {
        let resolver = resolver_with(MapFetcher::new(), ResolveConfig::default());
        match resolver.resolve("http://host/gone.m3u8") {
            Err(ResolveError::FetchError(_)) => {}
            other => panic!("Expected FetchError, got {:?}", other),
        }
    }

    #[test]
    fn test_degrade_swallows_fetch_failure() {
        let config = ResolveConfig {
            degrade_on_error: true,
            ..ResolveConfig::default()
        };
        let resolver = resolver_with(MapFetcher::new(), config);

        let playlist = resolver.resolve("http://host/gone.m3u8").unwrap();
        assert!(playlist.is_empty());
    }

    #[test]
    fn test_unsupported_extension_fails_under_both_policies() {
        for degrade_on_error in [false, true] {
            let config = ResolveConfig {
                degrade_on_error,
                ..ResolveConfig::default()
            };
            let resolver = resolver_with(MapFetcher::new(), config);

            match resolver.resolve("http://host/song.mp3") {
                Err(ResolveError::UnsupportedFormat(_)) => {}
                other => panic!("Expected UnsupportedFormat, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_dispatches_on_hint() {
        let resolver =
            Resolver::with_fetcher(Box::new(NoTransport), ResolveConfig::default());
        let mut playlist = Playlist::new();

        let data = "File1=http://host/a.mp3\nTitle1=Song A\n\n";
        resolver
            .parse(
                "http://host/listen",
                Some("audio/x-scpls"),
                Cursor::new(data),
                &mut playlist,
            )
            .unwrap();

        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.entries()[0].uri, "http://host/a.mp3");
    }

    #[test]
    fn test_parse_is_idempotent_across_sessions() {
        let resolver =
            Resolver::with_fetcher(Box::new(NoTransport), ResolveConfig::default());
        let data = "#EXTM3U\n#EXTINF:0,One\none.mp3\n#EXTINF:0,Two\ntwo.mp3\n";

        let mut first = Playlist::new();
        resolver
            .parse("http://host/x.m3u8", None, Cursor::new(data), &mut first)
            .unwrap();

        let mut second = Playlist::new();
        resolver
            .parse("http://host/x.m3u8", None, Cursor::new(data), &mut second)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.entries()[0].track, Some(1));
    }
}
