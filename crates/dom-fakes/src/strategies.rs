//! Proptest strategies for fake tracks, streams and membership operations.
//!
//! ```rust,ignore
//! proptest! {
//!     #[test]
//!     fn prop_no_duplicates(ops in stream_op_sequence(4, 32)) {
//!         let pool: Vec<_> = (0..4).map(|_| MediaTrack::new()).collect();
//!         let stream = MediaStream::new();
//!         for op in &ops {
//!             op.apply(&stream, &pool);
//!         }
//!         // each pool track is present at most once
//!     }
//! }
//! ```

use crate::media::{MediaStream, MediaTrack, StreamOptions};

#[cfg(feature = "proptest")]
use crate::media::{TrackKind, TrackOptions};
#[cfg(feature = "proptest")]
use proptest::prelude::*;

/// A membership operation against a pool of tracks, by pool index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOp {
    /// `add_track(pool[i])`
    Add(usize),
    /// `remove_track(pool[i])`
    Remove(usize),
}

impl StreamOp {
    /// Apply to `stream`; indices wrap around the pool
    pub fn apply(&self, stream: &MediaStream, pool: &[MediaTrack]) {
        if pool.is_empty() {
            return;
        }
        match *self {
            Self::Add(i) => stream.add_track(&pool[i % pool.len()]),
            Self::Remove(i) => stream.remove_track(&pool[i % pool.len()]),
        }
    }
}

/// Stream options commonly used by tests
#[must_use]
pub fn standard_stream_options() -> Vec<StreamOptions> {
    vec![
        StreamOptions::new(),
        StreamOptions::new().with_video_tracks(1),
        StreamOptions::new().with_audio_tracks(1),
        StreamOptions::new().with_video_tracks(1).with_audio_tracks(1),
        StreamOptions::new().with_video_tracks(3).with_audio_tracks(3),
    ]
}

/// Either track kind
#[cfg(feature = "proptest")]
pub fn any_track_kind() -> impl Strategy<Value = TrackKind> {
    prop_oneof![Just(TrackKind::Audio), Just(TrackKind::Video)]
}

/// Track options with optional kind and enabled flag
#[cfg(feature = "proptest")]
pub fn any_track_options() -> impl Strategy<Value = TrackOptions> {
    (
        proptest::option::of(any_track_kind()),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(kind, enabled)| TrackOptions { kind, enabled })
}

/// Stream options with up to `max` tracks of each kind
#[cfg(feature = "proptest")]
pub fn any_stream_options(max: usize) -> impl Strategy<Value = StreamOptions> {
    (0..=max, 0..=max).prop_map(|(video, audio)| {
        StreamOptions::new()
            .with_video_tracks(video)
            .with_audio_tracks(audio)
    })
}

/// Add-heavy sequences of membership operations over a pool of `pool` tracks
#[cfg(feature = "proptest")]
pub fn stream_op_sequence(pool: usize, max_len: usize) -> impl Strategy<Value = Vec<StreamOp>> {
    let pool = pool.max(1);
    prop::collection::vec(
        prop_oneof![
            2 => (0..pool).prop_map(StreamOp::Add),
            1 => (0..pool).prop_map(StreamOp::Remove),
        ],
        0..max_len,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_options_build() {
        for options in standard_stream_options() {
            let stream = MediaStream::with_options(options);
            assert_eq!(
                stream.track_count(),
                options.num_video_tracks + options.num_audio_tracks
            );
        }
    }

    #[test]
    fn test_stream_op_apply() {
        let pool: Vec<MediaTrack> = (0..2).map(|_| MediaTrack::new()).collect();
        let stream = MediaStream::new();
        StreamOp::Add(0).apply(&stream, &pool);
        StreamOp::Add(3).apply(&stream, &pool);
        StreamOp::Remove(2).apply(&stream, &pool);
        assert_eq!(stream.get_tracks(), vec![pool[1].clone()]);
    }

    #[test]
    fn test_stream_op_empty_pool() {
        let stream = MediaStream::new();
        StreamOp::Add(0).apply(&stream, &[]);
        assert_eq!(stream.track_count(), 0);
    }

    #[cfg(feature = "proptest")]
    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_track_options_respected(options in any_track_options()) {
                let track = MediaTrack::with_options(options);
                if let Some(kind) = options.kind {
                    prop_assert_eq!(track.kind(), kind);
                }
                prop_assert_eq!(track.enabled(), options.enabled.unwrap_or(true));
            }

            #[test]
            fn prop_stream_options_counts(options in any_stream_options(6)) {
                let stream = MediaStream::with_options(options);
                prop_assert_eq!(stream.get_video_tracks().len(), options.num_video_tracks);
                prop_assert_eq!(stream.get_audio_tracks().len(), options.num_audio_tracks);
            }
        }
    }
}
