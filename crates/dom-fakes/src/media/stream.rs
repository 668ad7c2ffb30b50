//! Fake `MediaStream`.
//!
//! A stream is an insertion-ordered, duplicate-free set of [`MediaTrack`]s.
//! `add_track`/`remove_track` are idempotent for membership but invoke the
//! `onaddtrack`/`onremovetrack` handler on every call, including re-adding a
//! member or removing a non-member. Code relying on once-only notification
//! has to dedupe itself.

use super::track::{MediaTrack, TrackKind, TrackOptions};
use crate::event::{EventTarget, Listener, Subscribe};
use crate::id::generate_id;
use crate::result::{FakesError, FakesResult};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Synthetic tracks to create when constructing a stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamOptions {
    /// Number of video tracks to create
    pub num_video_tracks: usize,
    /// Number of audio tracks to create
    pub num_audio_tracks: usize,
}

impl StreamOptions {
    /// Options creating no tracks
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of synthetic video tracks
    #[must_use]
    pub const fn with_video_tracks(mut self, n: usize) -> Self {
        self.num_video_tracks = n;
        self
    }

    /// Set the number of synthetic audio tracks
    #[must_use]
    pub const fn with_audio_tracks(mut self, n: usize) -> Self {
        self.num_audio_tracks = n;
        self
    }

    /// Parse options from a JSON object such as `{"numVideoTracks": 3}`
    ///
    /// Anything other than an object (arrays included) is rejected.
    pub fn from_json(json: &str) -> FakesResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(FakesError::InvalidOptions {
                message: format!("expected a JSON object, got {value}"),
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Payload of `onaddtrack` / `onremovetrack`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEvent {
    /// Track that was added or removed
    pub track: MediaTrack,
}

/// First constructor argument of a stream
#[derive(Debug, Clone)]
pub enum StreamInit {
    /// Copy the current tracks of another stream
    Stream(MediaStream),
    /// Adopt these tracks
    Tracks(Vec<MediaTrack>),
    /// A plain options object in first position
    Options(StreamOptions),
}

impl From<MediaStream> for StreamInit {
    fn from(stream: MediaStream) -> Self {
        Self::Stream(stream)
    }
}

impl From<&MediaStream> for StreamInit {
    fn from(stream: &MediaStream) -> Self {
        Self::Stream(stream.clone())
    }
}

impl From<Vec<MediaTrack>> for StreamInit {
    fn from(tracks: Vec<MediaTrack>) -> Self {
        Self::Tracks(tracks)
    }
}

impl From<StreamOptions> for StreamInit {
    fn from(options: StreamOptions) -> Self {
        Self::Options(options)
    }
}

type TrackHandler = Rc<dyn Fn(&TrackEvent)>;

struct StreamInner {
    id: String,
    tracks: RefCell<Vec<MediaTrack>>,
    on_add_track: RefCell<Option<TrackHandler>>,
    on_remove_track: RefCell<Option<TrackHandler>>,
    events: EventTarget,
}

/// Handle to a fake media stream
///
/// Cloning the handle yields another reference to the same stream.
#[derive(Clone)]
pub struct MediaStream {
    inner: Rc<StreamInner>,
}

impl MediaStream {
    /// Create an empty stream
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(StreamInner {
                id: generate_id(),
                tracks: RefCell::new(Vec::new()),
                on_add_track: RefCell::new(None),
                on_remove_track: RefCell::new(None),
                events: EventTarget::new(),
            }),
        }
    }

    /// Create a stream pre-populated with synthetic tracks
    #[must_use]
    pub fn with_options(options: StreamOptions) -> Self {
        Self::construct(None, Some(options))
    }

    /// Snapshot copy of another stream's current tracks
    #[must_use]
    pub fn from_stream(source: &Self) -> Self {
        Self::construct(Some(StreamInit::from(source)), None)
    }

    /// Create a stream adopting the given tracks
    #[must_use]
    pub fn from_tracks<I>(tracks: I) -> Self
    where
        I: IntoIterator<Item = MediaTrack>,
    {
        Self::construct(Some(StreamInit::Tracks(tracks.into_iter().collect())), None)
    }

    /// General constructor mirroring `new MediaStream(arg, opts)`
    ///
    /// A [`StreamInit::Options`] first argument replaces `options`. Synthetic
    /// tracks from the options are added after any copied or adopted tracks.
    #[must_use]
    pub fn construct(init: Option<StreamInit>, options: Option<StreamOptions>) -> Self {
        let stream = Self::new();
        let mut options = options;
        match init {
            Some(StreamInit::Stream(source)) => {
                for track in source.get_tracks() {
                    stream.insert(track);
                }
            }
            Some(StreamInit::Tracks(tracks)) => {
                for track in tracks {
                    stream.insert(track);
                }
            }
            Some(StreamInit::Options(opts)) => options = Some(opts),
            None => {}
        }

        let options = options.unwrap_or_default();
        for _ in 0..options.num_video_tracks {
            stream.add_track(&MediaTrack::with_options(
                TrackOptions::new().with_kind(TrackKind::Video),
            ));
        }
        for _ in 0..options.num_audio_tracks {
            stream.add_track(&MediaTrack::with_options(
                TrackOptions::new().with_kind(TrackKind::Audio),
            ));
        }

        tracing::debug!(
            stream_id = %stream.id(),
            tracks = stream.track_count(),
            "stream constructed"
        );
        stream
    }

    /// Unique stream id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    fn insert(&self, track: MediaTrack) -> bool {
        let mut tracks = self.inner.tracks.borrow_mut();
        if tracks.contains(&track) {
            false
        } else {
            tracks.push(track);
            true
        }
    }

    /// Add a track; the `onaddtrack` handler fires even if already present
    pub fn add_track(&self, track: &MediaTrack) {
        let inserted = self.insert(track.clone());
        tracing::trace!(stream_id = %self.id(), track_id = %track.id(), inserted, "add track");
        let handler = self.inner.on_add_track.borrow().clone();
        if let Some(handler) = handler {
            handler(&TrackEvent {
                track: track.clone(),
            });
        }
    }

    /// Remove a track; the `onremovetrack` handler fires even if absent
    pub fn remove_track(&self, track: &MediaTrack) {
        let removed = {
            let mut tracks = self.inner.tracks.borrow_mut();
            let before = tracks.len();
            tracks.retain(|t| t != track);
            tracks.len() != before
        };
        tracing::trace!(stream_id = %self.id(), track_id = %track.id(), removed, "remove track");
        let handler = self.inner.on_remove_track.borrow().clone();
        if let Some(handler) = handler {
            handler(&TrackEvent {
                track: track.clone(),
            });
        }
    }

    /// All tracks in insertion order
    #[must_use]
    pub fn get_tracks(&self) -> Vec<MediaTrack> {
        self.inner.tracks.borrow().clone()
    }

    fn filtered_tracks(&self, kind: TrackKind) -> Vec<MediaTrack> {
        self.inner
            .tracks
            .borrow()
            .iter()
            .filter(|t| t.kind() == kind)
            .cloned()
            .collect()
    }

    /// Video tracks in insertion order
    #[must_use]
    pub fn get_video_tracks(&self) -> Vec<MediaTrack> {
        self.filtered_tracks(TrackKind::Video)
    }

    /// Audio tracks in insertion order
    #[must_use]
    pub fn get_audio_tracks(&self) -> Vec<MediaTrack> {
        self.filtered_tracks(TrackKind::Audio)
    }

    /// Find a member track by id
    #[must_use]
    pub fn get_track_by_id(&self, id: &str) -> Option<MediaTrack> {
        self.inner
            .tracks
            .borrow()
            .iter()
            .find(|t| t.id() == id)
            .cloned()
    }

    /// Whether `track` is a member
    #[must_use]
    pub fn contains(&self, track: &MediaTrack) -> bool {
        self.inner.tracks.borrow().contains(track)
    }

    /// Number of member tracks
    #[must_use]
    pub fn track_count(&self) -> usize {
        self.inner.tracks.borrow().len()
    }

    /// Set the single `onaddtrack` handler, replacing any previous one
    pub fn set_on_add_track<F>(&self, handler: F)
    where
        F: Fn(&TrackEvent) + 'static,
    {
        *self.inner.on_add_track.borrow_mut() = Some(Rc::new(handler));
    }

    /// Clear the `onaddtrack` handler
    pub fn clear_on_add_track(&self) {
        *self.inner.on_add_track.borrow_mut() = None;
    }

    /// Set the single `onremovetrack` handler, replacing any previous one
    pub fn set_on_remove_track<F>(&self, handler: F)
    where
        F: Fn(&TrackEvent) + 'static,
    {
        *self.inner.on_remove_track.borrow_mut() = Some(Rc::new(handler));
    }

    /// Clear the `onremovetrack` handler
    pub fn clear_on_remove_track(&self) {
        *self.inner.on_remove_track.borrow_mut() = None;
    }

    /// Event target of this stream
    #[must_use]
    pub fn events(&self) -> &EventTarget {
        &self.inner.events
    }

    /// Whether both handles refer to the same stream
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for MediaStream {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for MediaStream {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for MediaStream {}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("id", &self.id())
            .field("tracks", &self.inner.tracks.borrow())
            .field("has_on_add_track", &self.inner.on_add_track.borrow().is_some())
            .field(
                "has_on_remove_track",
                &self.inner.on_remove_track.borrow().is_some(),
            )
            .finish()
    }
}

impl Subscribe for MediaStream {
    fn subscribe(&self, event: &str, listener: &Listener) {
        self.events().add_event_listener(event, listener);
    }

    fn unsubscribe(&self, event: &str, listener: &Listener) {
        self.events().remove_event_listener(event, listener);
    }
}
