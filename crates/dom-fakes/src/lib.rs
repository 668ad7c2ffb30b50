//! dom-fakes: In-Memory Browser API Fakes for Unit Tests
//!
//! Lightweight stand-ins for the media capture and Web Audio APIs (plus a
//! few smaller browser collaborators) so that code written against those
//! APIs can be unit tested without a browser, audio hardware or a socket.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     dom-fakes media graph                        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  MediaTrack ──► MediaStream ──► AudioNode ──connect──► AudioNode  │
//! │   (id, kind,     (ordered set,    (held tracks,        or         │
//! │    enabled,       onaddtrack/      last destination)  { stream }  │
//! │    stop spy)      onremovetrack)                                  │
//! │                                                                   │
//! │  AudioContext ─► destination / createGain / createMediaStream*    │
//! │  AudioWorkletNode ─► port (onmessage / postMessage spies)         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is single-threaded and synchronous: every mutation and every
//! callback completes before the call returns.
//!
//! # Example
//!
//! ```rust
//! use dom_fakes::{AudioContext, MediaStream, StreamOptions};
//!
//! let mic = MediaStream::with_options(StreamOptions::new().with_audio_tracks(1));
//! let ctx = AudioContext::new();
//! let source = ctx.create_media_stream_source(&mic);
//! let out = ctx.create_media_stream_destination();
//!
//! source.connect(&ctx.create_gain()).connect(&out);
//! assert_eq!(out.stream.get_audio_tracks(), mic.get_audio_tracks());
//!
//! source.disconnect();
//! ```

#![warn(missing_docs)]

/// Fake Web Audio graph
#[allow(clippy::missing_const_for_fn, clippy::must_use_candidate)]
pub mod audio;

/// Synchronous event emitter and DOM event target
pub mod event;

/// Event expectations (synchronous `testForEvent` / `testForNoEvent`)
pub mod expect;

/// Identifier and random string generation
pub mod id;

/// Test log output
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;

/// Fake media tracks and streams
#[allow(clippy::missing_const_for_fn, clippy::must_use_candidate)]
pub mod media;

mod result;

/// Paired mock sockets
pub mod socket;

/// Call-recording spies
pub mod spy;

/// In-memory `localStorage`
pub mod storage;

/// Proptest strategies and membership operations
pub mod strategies;

pub use audio::{
    AsDestination, AudioContext, AudioNode, AudioParam, AudioWorklet, AudioWorkletNode,
    Destination, GainNode, MediaStreamDestination, MessagePort, TrackSink,
};
pub use event::{Emitter, Event, EventTarget, Listener, Subscribe};
pub use expect::{expect_event, expect_no_event, EventExpectation, NoEventExpectation};
pub use id::{generate_id, random_string};
pub use media::global::{install, install_with, new_media_stream, Installation};
pub use media::{
    MediaStream, MediaTrack, StreamInit, StreamOptions, TrackEvent, TrackKind, TrackOptions,
};
pub use result::{FakesError, FakesResult};
pub use socket::{create_mock_socket_pair, MockSocket, MockSocketPair};
pub use spy::Spy;
pub use storage::LocalStorageMock;
