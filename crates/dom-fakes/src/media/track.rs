//! Fake `MediaStreamTrack`.

use crate::event::{EventTarget, Listener, Subscribe};
use crate::id::generate_id;
use crate::spy::Spy;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

/// Kind of media carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Audio track
    Audio,
    /// Video track
    Video,
}

impl TrackKind {
    /// Pick a kind uniformly at random
    #[must_use]
    pub fn random() -> Self {
        if rand::random::<bool>() {
            Self::Video
        } else {
            Self::Audio
        }
    }

    /// Platform name of the kind (`"audio"` / `"video"`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction options for [`MediaTrack`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackOptions {
    /// Track kind; random when unset
    pub kind: Option<TrackKind>,
    /// Enabled flag; `true` when unset
    pub enabled: Option<bool>,
}

impl TrackOptions {
    /// Create default options (random kind, enabled)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the track kind
    #[must_use]
    pub const fn with_kind(mut self, kind: TrackKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the enabled flag
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }
}

struct TrackInner {
    id: String,
    kind: TrackKind,
    enabled: Cell<bool>,
    stop: Spy<()>,
    events: EventTarget,
}

/// Handle to a fake media track
///
/// Cloning the handle yields another reference to the same track; use
/// [`MediaTrack::clone_track`] for the platform `clone()` operation.
#[derive(Clone)]
pub struct MediaTrack {
    inner: Rc<TrackInner>,
}

impl MediaTrack {
    /// Create a track of random kind, enabled
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(TrackOptions::default())
    }

    /// Create an audio track
    #[must_use]
    pub fn audio() -> Self {
        Self::with_options(TrackOptions::new().with_kind(TrackKind::Audio))
    }

    /// Create a video track
    #[must_use]
    pub fn video() -> Self {
        Self::with_options(TrackOptions::new().with_kind(TrackKind::Video))
    }

    /// Create a track from options
    #[must_use]
    pub fn with_options(options: TrackOptions) -> Self {
        let kind = options.kind.unwrap_or_else(TrackKind::random);
        let track = Self {
            inner: Rc::new(TrackInner {
                id: generate_id(),
                kind,
                enabled: Cell::new(options.enabled.unwrap_or(true)),
                stop: Spy::new("stop"),
                events: EventTarget::new(),
            }),
        };
        tracing::trace!(track_id = %track.id(), %kind, "track created");
        track
    }

    /// Unique track id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Track kind
    #[must_use]
    pub fn kind(&self) -> TrackKind {
        self.inner.kind
    }

    /// Whether the track is enabled
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    /// Set the enabled flag
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.set(enabled);
    }

    /// Stop the track; only recorded, `enabled` is unchanged
    pub fn stop(&self) {
        self.inner.stop.record(());
    }

    /// Recorded calls to [`MediaTrack::stop`]
    #[must_use]
    pub fn stop_spy(&self) -> &Spy<()> {
        &self.inner.stop
    }

    /// Event target of this track
    #[must_use]
    pub fn events(&self) -> &EventTarget {
        &self.inner.events
    }

    /// Platform `clone()`: a new track with a fresh id and its own `stop`,
    /// copying kind and enabled state
    #[must_use]
    pub fn clone_track(&self) -> Self {
        Self::with_options(
            TrackOptions::new()
                .with_kind(self.kind())
                .with_enabled(self.enabled()),
        )
    }

    /// Whether both handles refer to the same track
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for MediaTrack {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for MediaTrack {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for MediaTrack {}

impl std::fmt::Debug for MediaTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaTrack")
            .field("id", &self.id())
            .field("kind", &self.kind())
            .field("enabled", &self.enabled())
            .finish()
    }
}

impl Subscribe for MediaTrack {
    fn subscribe(&self, event: &str, listener: &Listener) {
        self.events().add_event_listener(event, listener);
    }

    fn unsubscribe(&self, event: &str, listener: &Listener) {
        self.events().remove_event_listener(event, listener);
    }
}
