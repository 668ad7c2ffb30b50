//! Fake `AudioNode` and the destination seam it routes tracks into.
//!
//! A node holds a set of tracks and remembers the last destination passed to
//! `connect`. Connecting pushes the tracks held *at that moment* into the
//! destination; disconnecting pulls the currently held tracks back out of the
//! remembered destination. Tracks added after `connect` are not forwarded
//! until the next `connect`.
//!
//! ```text
//!   unconnected ──connect(d)──► connected(d) ──connect(e)──► connected(e)
//!        │                          │  ▲
//!   disconnect (no-op)          disconnect (pull tracks, keep d)
//! ```

use crate::id::generate_id;
use crate::media::{MediaStream, MediaTrack};
use crate::spy::Spy;
use std::cell::RefCell;
use std::rc::Rc;

/// Anything that accepts tracks directly (`addTrack` / `removeTrack`)
pub trait TrackSink {
    /// Accept a track
    fn add_track(&self, track: &MediaTrack);
    /// Release a track
    fn remove_track(&self, track: &MediaTrack);
}

/// Where a node's tracks go on `connect`
///
/// Resolved once per `connect` from an [`AsDestination`] value.
#[derive(Clone)]
pub enum Destination {
    /// A stream-bearing destination (`{ stream }`); tracks go into the stream
    Stream(MediaStream),
    /// A direct track sink such as another audio node
    Sink(Rc<dyn TrackSink>),
}

impl Destination {
    /// Inner stream of a stream-bearing destination
    #[must_use]
    pub fn stream(&self) -> Option<&MediaStream> {
        match self {
            Self::Stream(stream) => Some(stream),
            Self::Sink(_) => None,
        }
    }

    fn push(&self, track: &MediaTrack) {
        match self {
            Self::Stream(stream) => stream.add_track(track),
            Self::Sink(sink) => sink.add_track(track),
        }
    }

    fn pull(&self, track: &MediaTrack) {
        match self {
            Self::Stream(stream) => stream.remove_track(track),
            Self::Sink(sink) => sink.remove_track(track),
        }
    }

    fn sink_addr(sink: &Rc<dyn TrackSink>) -> *const () {
        Rc::as_ptr(sink).cast::<()>()
    }
}

impl PartialEq for Destination {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Stream(a), Self::Stream(b)) => a.ptr_eq(b),
            (Self::Sink(a), Self::Sink(b)) => Self::sink_addr(a) == Self::sink_addr(b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stream(stream) => f.debug_tuple("Stream").field(&stream.id()).finish(),
            Self::Sink(sink) => f.debug_tuple("Sink").field(&Self::sink_addr(sink)).finish(),
        }
    }
}

/// Values that can be passed to [`AudioNode::connect`]
pub trait AsDestination {
    /// Resolve into a [`Destination`]
    fn as_destination(&self) -> Destination;
}

impl AsDestination for Destination {
    fn as_destination(&self) -> Destination {
        self.clone()
    }
}

impl AsDestination for MediaStream {
    fn as_destination(&self) -> Destination {
        Destination::Stream(self.clone())
    }
}

impl AsDestination for Rc<dyn TrackSink> {
    fn as_destination(&self) -> Destination {
        Destination::Sink(Rc::clone(self))
    }
}

impl AsDestination for AudioNode {
    fn as_destination(&self) -> Destination {
        let sink: Rc<dyn TrackSink> = self.inner.clone();
        Destination::Sink(sink)
    }
}

struct NodeInner {
    id: String,
    tracks: RefCell<Vec<MediaTrack>>,
    dst: RefCell<Option<Destination>>,
    connect: Spy<Destination>,
    disconnect: Spy<()>,
    add_track: Spy<MediaTrack>,
    remove_track: Spy<MediaTrack>,
}

impl TrackSink for NodeInner {
    fn add_track(&self, track: &MediaTrack) {
        self.add_track.record(track.clone());
        let mut tracks = self.tracks.borrow_mut();
        if !tracks.contains(track) {
            tracks.push(track.clone());
        }
    }

    fn remove_track(&self, track: &MediaTrack) {
        self.remove_track.record(track.clone());
        self.tracks.borrow_mut().retain(|t| t != track);
    }
}

/// Handle to a fake audio graph node
///
/// Cloning the handle yields another reference to the same node.
#[derive(Clone)]
pub struct AudioNode {
    inner: Rc<NodeInner>,
}

impl AudioNode {
    /// Create a node holding no tracks
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(NodeInner {
                id: generate_id(),
                tracks: RefCell::new(Vec::new()),
                dst: RefCell::new(None),
                connect: Spy::new("connect"),
                disconnect: Spy::new("disconnect"),
                add_track: Spy::new("addTrack"),
                remove_track: Spy::new("removeTrack"),
            }),
        }
    }

    /// Create a node seeded with the stream's current audio tracks
    ///
    /// Video tracks are ignored and later changes to the stream are not
    /// reflected in the node.
    #[must_use]
    pub fn from_stream(stream: &MediaStream) -> Self {
        let node = Self::new();
        for track in stream.get_audio_tracks() {
            node.add_track(&track);
        }
        node
    }

    /// Create a node seeded from an optional stream
    #[must_use]
    pub fn with_stream(stream: Option<&MediaStream>) -> Self {
        stream.map_or_else(Self::new, Self::from_stream)
    }

    /// Node id (diagnostics only)
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Add a track to the held set
    pub fn add_track(&self, track: &MediaTrack) {
        TrackSink::add_track(&*self.inner, track);
    }

    /// Remove a track from the held set
    pub fn remove_track(&self, track: &MediaTrack) {
        TrackSink::remove_track(&*self.inner, track);
    }

    /// Connect to `destination`, pushing the currently held tracks into it
    ///
    /// Replaces any previously remembered destination and returns
    /// `destination` so calls can be chained.
    pub fn connect<'a, D>(&self, destination: &'a D) -> &'a D
    where
        D: AsDestination + ?Sized,
    {
        self.connect_to(destination.as_destination());
        destination
    }

    /// Connect to an already resolved [`Destination`]
    pub fn connect_to(&self, destination: Destination) {
        self.inner.connect.record(destination.clone());
        *self.inner.dst.borrow_mut() = Some(destination.clone());

        let tracks = self.tracks();
        tracing::debug!(node_id = %self.id(), ?destination, tracks = tracks.len(), "connect");
        for track in &tracks {
            destination.push(track);
        }
    }

    /// Pull the currently held tracks back out of the remembered destination
    ///
    /// A no-op before the first `connect`. The destination stays remembered,
    /// so calling this again repeats the removal harmlessly.
    pub fn disconnect(&self) {
        self.inner.disconnect.record(());
        let Some(destination) = self.inner.dst.borrow().clone() else {
            tracing::trace!(node_id = %self.id(), "disconnect without destination");
            return;
        };

        let tracks = self.tracks();
        tracing::debug!(node_id = %self.id(), ?destination, tracks = tracks.len(), "disconnect");
        for track in &tracks {
            destination.pull(track);
        }
    }

    /// Held tracks in insertion order
    #[must_use]
    pub fn tracks(&self) -> Vec<MediaTrack> {
        self.inner.tracks.borrow().clone()
    }

    /// Whether `track` is held
    #[must_use]
    pub fn has_track(&self, track: &MediaTrack) -> bool {
        self.inner.tracks.borrow().contains(track)
    }

    /// Number of held tracks
    #[must_use]
    pub fn track_count(&self) -> usize {
        self.inner.tracks.borrow().len()
    }

    /// Last destination passed to `connect`
    #[must_use]
    pub fn destination(&self) -> Option<Destination> {
        self.inner.dst.borrow().clone()
    }

    /// Whether `connect` was ever called
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.dst.borrow().is_some()
    }

    /// Recorded `connect` calls
    #[must_use]
    pub fn connect_spy(&self) -> &Spy<Destination> {
        &self.inner.connect
    }

    /// Recorded `disconnect` calls
    #[must_use]
    pub fn disconnect_spy(&self) -> &Spy<()> {
        &self.inner.disconnect
    }

    /// Recorded `addTrack` calls, including those made by upstream `connect`
    #[must_use]
    pub fn add_track_spy(&self) -> &Spy<MediaTrack> {
        &self.inner.add_track
    }

    /// Recorded `removeTrack` calls, including those made by upstream
    /// `disconnect`
    #[must_use]
    pub fn remove_track_spy(&self) -> &Spy<MediaTrack> {
        &self.inner.remove_track
    }

    /// Whether both handles refer to the same node
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for AudioNode {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for AudioNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for AudioNode {}

impl TrackSink for AudioNode {
    fn add_track(&self, track: &MediaTrack) {
        Self::add_track(self, track);
    }

    fn remove_track(&self, track: &MediaTrack) {
        Self::remove_track(self, track);
    }
}

impl std::fmt::Debug for AudioNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioNode")
            .field("id", &self.id())
            .field("tracks", &self.inner.tracks.borrow())
            .field("destination", &self.inner.dst.borrow())
            .finish()
    }
}
