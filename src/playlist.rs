use smol_str::SmolStr;

/// One reference extracted from a playlist, before or after resolution.
///
/// Entries are filled in by the format parsers and become immutable once
/// they are appended to a [`Playlist`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Location of the media (or nested playlist) this entry points at
    pub uri: SmolStr,
    /// Free-text title or description carried by the source format
    pub title: Option<SmolStr>,
    /// 1-based sequence number assigned at resolution time
    pub track: Option<u32>,
}

/// Ordered, append-only collection of resolved terminal entries.
///
/// Insertion order is resolution order: when an entry expands into a
/// nested playlist, the nested leaves take its place in the sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    entries: Vec<PlaylistEntry>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: PlaylistEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlaylistEntry> {
        self.entries.iter()
    }
}

impl IntoIterator for Playlist {
    type Item = PlaylistEntry;
    type IntoIter = std::vec::IntoIter<PlaylistEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a PlaylistEntry;
    type IntoIter = std::slice::Iter<'a, PlaylistEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
