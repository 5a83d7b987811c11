//! # playlist-resolver
//! A library for detecting and recursively resolving media playlists
//! (M3U, M3U8, PLS, ASX, XSPF).
//!
//! Playlists can reference other playlists, so resolution walks the
//! reference tree depth-first and flattens it: every entry that turns
//! out to be a nested playlist is replaced by that playlist's own
//! entries, while everything else (plain media, dead references) stays
//! in place as a terminal entry.
//!
//! # Example
//! ```rust
//! use std::io::Cursor;
//!
//! use playlist_resolver::{Playlist, Resolver};
//!
//! let resolver = Resolver::new();
//! let mut playlist = Playlist::new();
//!
//! resolver
//!     .parse(
//!         "http://example.com/radio/list.m3u8",
//!         None,
//!         Cursor::new("#EXTM3U\n#EXTINF:0,Morning Show\nmorning.mp3"),
//!         &mut playlist,
//!     )
//!     .unwrap();
//!
//! assert_eq!(playlist.entries()[0].uri, "http://example.com/radio/morning.mp3");
//! assert_eq!(playlist.entries()[0].title.as_deref(), Some("Morning Show"));
//! ```
//!
//! Fetching playlists over HTTP goes through [`Resolver::resolve`],
//! which needs no pre-opened stream.

mod config;
mod detect;
mod error;
mod fetch;
mod mime;
mod parser;
mod playlist;
mod resolver;

pub use config::*;
pub use detect::{FormatKind, detect};
pub use error::*;
pub use fetch::{Fetch, FetchedResource, HttpFetcher};
pub use mime::MediaType;
pub use playlist::*;
pub use resolver::Resolver;
