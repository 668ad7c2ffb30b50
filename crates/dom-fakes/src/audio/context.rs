//! Fake `AudioContext` and the objects it creates.

use super::node::{AsDestination, AudioNode, Destination};
use super::worklet::AudioWorkletNode;
use crate::media::MediaStream;
use crate::spy::Spy;
use std::cell::Cell;
use std::ops::Deref;
use std::rc::Rc;

/// Default value of a gain node's `gain` parameter
pub const DEFAULT_GAIN: f32 = 1.0;

/// A numeric audio parameter (`gain.value`)
///
/// Clones share the value.
#[derive(Debug, Clone)]
pub struct AudioParam {
    value: Rc<Cell<f32>>,
}

impl AudioParam {
    /// Create a parameter with an initial value
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self {
            value: Rc::new(Cell::new(value)),
        }
    }

    /// Current value
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value.get()
    }

    /// Set the value
    pub fn set_value(&self, value: f32) {
        self.value.set(value);
    }
}

/// Audio node returned by [`AudioContext::create_gain`]
#[derive(Debug, Clone)]
pub struct GainNode {
    node: AudioNode,
    /// Gain parameter, initially [`DEFAULT_GAIN`]
    pub gain: AudioParam,
}

impl GainNode {
    /// Create a gain node holding no tracks
    #[must_use]
    pub fn new() -> Self {
        Self {
            node: AudioNode::new(),
            gain: AudioParam::new(DEFAULT_GAIN),
        }
    }

    /// Underlying audio node
    #[must_use]
    pub fn node(&self) -> &AudioNode {
        &self.node
    }
}

impl Default for GainNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for GainNode {
    type Target = AudioNode;

    fn deref(&self) -> &AudioNode {
        &self.node
    }
}

impl AsDestination for GainNode {
    fn as_destination(&self) -> Destination {
        self.node.as_destination()
    }
}

/// Return value of `createMediaStreamDestination()`: a plain `{ stream }`
/// wrapper, not an audio node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaStreamDestination {
    /// Stream receiving connected tracks
    pub stream: MediaStream,
}

impl MediaStreamDestination {
    /// Wrap a fresh empty stream
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AsDestination for MediaStreamDestination {
    fn as_destination(&self) -> Destination {
        Destination::Stream(self.stream.clone())
    }
}

/// `audioWorklet` capability of a context; module loading is only recorded
#[derive(Debug, Clone)]
pub struct AudioWorklet {
    add_module: Spy<String>,
}

impl AudioWorklet {
    fn new() -> Self {
        Self {
            add_module: Spy::new("addModule"),
        }
    }

    /// Record a module load
    pub fn add_module(&self, url: impl Into<String>) {
        self.add_module.record(url.into());
    }

    /// Recorded `addModule` calls
    #[must_use]
    pub fn add_module_spy(&self) -> &Spy<String> {
        &self.add_module
    }
}

/// Fake root audio context
///
/// The context is itself an audio node. Cloning shares all state.
#[derive(Debug, Clone)]
pub struct AudioContext {
    node: AudioNode,
    audio_worklet: AudioWorklet,
    destination: AudioNode,
    close: Spy<()>,
}

impl AudioContext {
    /// Create a context holding no tracks
    #[must_use]
    pub fn new() -> Self {
        Self::with_stream(None)
    }

    /// Create a context whose own node is seeded from `stream`
    #[must_use]
    pub fn with_stream(stream: Option<&MediaStream>) -> Self {
        let context = Self {
            node: AudioNode::with_stream(stream),
            audio_worklet: AudioWorklet::new(),
            destination: AudioNode::from_stream(&MediaStream::new()),
            close: Spy::new("close"),
        };
        tracing::debug!(node_id = %context.node.id(), "audio context created");
        context
    }

    /// Worklet module loader
    #[must_use]
    pub fn audio_worklet(&self) -> &AudioWorklet {
        &self.audio_worklet
    }

    /// Final destination node of the context
    #[must_use]
    pub fn destination(&self) -> &AudioNode {
        &self.destination
    }

    /// Close the context; only recorded
    pub fn close(&self) {
        self.close.record(());
    }

    /// Recorded `close` calls
    #[must_use]
    pub fn close_spy(&self) -> &Spy<()> {
        &self.close
    }

    /// A fresh node seeded with `stream`'s audio tracks
    #[must_use]
    pub fn create_media_stream_source(&self, stream: &MediaStream) -> AudioNode {
        AudioNode::from_stream(stream)
    }

    /// A fresh `{ stream }` destination wrapping an empty stream
    #[must_use]
    pub fn create_media_stream_destination(&self) -> MediaStreamDestination {
        MediaStreamDestination::new()
    }

    /// A fresh gain node with `gain.value == 1.0`
    #[must_use]
    pub fn create_gain(&self) -> GainNode {
        GainNode::new()
    }

    /// A worklet node owned by this context
    #[must_use]
    pub fn create_worklet_node(&self, name: impl Into<String>) -> AudioWorkletNode {
        AudioWorkletNode::new(self, name)
    }

    /// Underlying audio node
    #[must_use]
    pub fn node(&self) -> &AudioNode {
        &self.node
    }

    /// Whether both handles refer to the same context
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.node.ptr_eq(&other.node)
    }
}

impl Default for AudioContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for AudioContext {
    type Target = AudioNode;

    fn deref(&self) -> &AudioNode {
        &self.node
    }
}

impl AsDestination for AudioContext {
    fn as_destination(&self) -> Destination {
        self.node.as_destination()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaTrack;

    #[test]
    fn test_constructor() {
        let context = AudioContext::new();
        assert!(!context.audio_worklet().add_module_spy().was_called());
        assert_eq!(context.destination().track_count(), 0);
        assert!(!context.close_spy().was_called());
        assert!(!context.is_connected());
    }

    #[test]
    fn test_constructor_with_stream() {
        let track = MediaTrack::audio();
        let stream = MediaStream::from_tracks(vec![track.clone(), MediaTrack::video()]);
        let context = AudioContext::with_stream(Some(&stream));
        assert_eq!(context.tracks(), vec![track]);
    }

    #[test]
    fn test_close_and_add_module_recorded() {
        let context = AudioContext::new();
        context.close();
        context.audio_worklet().add_module("processor.js");
        assert_eq!(context.close_spy().call_count(), 1);
        assert_eq!(
            context.audio_worklet().add_module_spy().last_call().as_deref(),
            Some("processor.js")
        );
    }

    #[test]
    fn test_create_media_stream_source() {
        let context = AudioContext::new();
        let track = MediaTrack::audio();
        let stream = MediaStream::from_tracks(vec![track.clone()]);
        let source = context.create_media_stream_source(&stream);
        assert!(source.has_track(&track));
    }

    #[test]
    fn test_create_media_stream_destination() {
        let context = AudioContext::new();
        let destination = context.create_media_stream_destination();
        assert_eq!(destination.stream.track_count(), 0);
        assert_ne!(
            destination.stream,
            context.create_media_stream_destination().stream
        );
    }

    #[test]
    fn test_create_gain() {
        let context = AudioContext::new();
        let gain = context.create_gain();
        assert_eq!(gain.gain.value(), 1.0);

        let track = MediaTrack::new();
        gain.add_track(&track);
        let destination = context.create_media_stream_destination();
        gain.connect(&destination);
        assert!(destination.stream.contains(&track));
        gain.disconnect();
        assert!(!destination.stream.contains(&track));
    }

    #[test]
    fn test_gain_value_shared_between_clones() {
        let gain = GainNode::new();
        let handle = gain.clone();
        handle.gain.set_value(0.25);
        assert_eq!(gain.gain.value(), 0.25);
    }

    #[test]
    fn test_source_to_gain_to_destination() {
        let context = AudioContext::new();
        let stream = MediaStream::from_tracks(vec![MediaTrack::audio(), MediaTrack::audio()]);
        let source = context.create_media_stream_source(&stream);
        let gain = context.create_gain();
        let destination = context.create_media_stream_destination();

        source.connect(&gain).connect(&destination);
        assert_eq!(destination.stream.get_tracks(), stream.get_tracks());
    }

    #[test]
    fn test_connect_to_context_destination() {
        let context = AudioContext::new();
        let source = context.create_media_stream_source(&MediaStream::from_tracks(vec![
            MediaTrack::audio(),
        ]));
        source.connect(context.destination());
        assert_eq!(context.destination().track_count(), 1);
    }

    #[test]
    fn test_context_clone_shares_state() {
        let context = AudioContext::new();
        let handle = context.clone();
        handle.close();
        assert!(context.close_spy().was_called());
        assert!(context.ptr_eq(&handle));
    }
}
