//! Fake Web Audio graph.
//!
//! Nodes route the tracks they hold into whatever they are connected to:
//! either a stream-bearing destination (tracks land in its stream) or a
//! direct [`TrackSink`] such as another node. Specialized nodes
//! ([`GainNode`], [`AudioWorkletNode`], [`AudioContext`]) dereference to
//! [`AudioNode`].

mod context;
mod node;
mod worklet;

pub use context::{
    AudioContext, AudioParam, AudioWorklet, GainNode, MediaStreamDestination, DEFAULT_GAIN,
};
pub use node::{AsDestination, AudioNode, Destination, TrackSink};
pub use worklet::{AudioWorkletNode, MessagePort};
