//! Ambient `MediaStream` constructor.
//!
//! Code under test that builds streams without being handed a factory goes
//! through [`new_media_stream`]. The test harness decides when the fake is
//! active by calling [`install`] and holding the returned [`Installation`];
//! dropping it restores the uninstalled state. Installation is per thread, so
//! parallel tests do not see each other's constructors.

use super::stream::{MediaStream, StreamInit, StreamOptions};
use crate::result::{FakesError, FakesResult};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

/// Constructor signature of the ambient `MediaStream`
pub type StreamConstructor = Rc<dyn Fn(Option<StreamInit>, Option<StreamOptions>) -> MediaStream>;

thread_local! {
    static AMBIENT: RefCell<Option<StreamConstructor>> = const { RefCell::new(None) };
}

/// Guard for an installed ambient constructor; uninstalls on drop
#[must_use = "dropping the installation uninstalls the constructor immediately"]
pub struct Installation {
    _not_send: PhantomData<*const ()>,
}

impl Installation {
    /// Uninstall explicitly
    pub fn uninstall(self) {
        drop(self);
    }
}

impl Drop for Installation {
    fn drop(&mut self) {
        AMBIENT.with(|slot| slot.borrow_mut().take());
        tracing::debug!("ambient MediaStream constructor uninstalled");
    }
}

impl std::fmt::Debug for Installation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installation").finish()
    }
}

/// Install [`MediaStream::construct`] as this thread's ambient constructor
///
/// # Errors
///
/// Returns [`FakesError::AlreadyInstalled`] if a constructor is installed.
pub fn install() -> FakesResult<Installation> {
    install_with(Rc::new(MediaStream::construct))
}

/// Install a custom ambient constructor
///
/// # Errors
///
/// Returns [`FakesError::AlreadyInstalled`] if a constructor is installed.
pub fn install_with(constructor: StreamConstructor) -> FakesResult<Installation> {
    AMBIENT.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return Err(FakesError::AlreadyInstalled);
        }
        *slot = Some(constructor);
        Ok(())
    })?;
    tracing::debug!("ambient MediaStream constructor installed");
    Ok(Installation {
        _not_send: PhantomData,
    })
}

/// Whether an ambient constructor is installed on this thread
#[must_use]
pub fn is_installed() -> bool {
    AMBIENT.with(|slot| slot.borrow().is_some())
}

/// Construct a stream through the ambient constructor
///
/// # Errors
///
/// Returns [`FakesError::NotInstalled`] when nothing is installed.
pub fn new_media_stream(
    init: Option<StreamInit>,
    options: Option<StreamOptions>,
) -> FakesResult<MediaStream> {
    let constructor = AMBIENT
        .with(|slot| slot.borrow().clone())
        .ok_or(FakesError::NotInstalled)?;
    Ok(constructor(init, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaTrack;
    use std::cell::Cell;

    #[test]
    fn test_not_installed_by_default() {
        assert!(!is_installed());
        assert!(matches!(
            new_media_stream(None, None),
            Err(FakesError::NotInstalled)
        ));
    }

    #[test]
    fn test_install_and_construct() {
        let installation = install().unwrap();
        assert!(is_installed());

        let stream =
            new_media_stream(None, Some(StreamOptions::new().with_video_tracks(2))).unwrap();
        assert_eq!(stream.get_video_tracks().len(), 2);

        let copy = new_media_stream(Some(stream.clone().into()), None).unwrap();
        assert_eq!(copy.get_tracks(), stream.get_tracks());

        drop(installation);
        assert!(!is_installed());
    }

    #[test]
    fn test_double_install_fails() {
        let _installation = install().unwrap();
        assert!(matches!(install(), Err(FakesError::AlreadyInstalled)));
    }

    #[test]
    fn test_reinstall_after_uninstall() {
        install().unwrap().uninstall();
        let _again = install().unwrap();
        assert!(is_installed());
    }

    #[test]
    fn test_install_custom_constructor() {
        let calls = Rc::new(Cell::new(0));
        let calls_clone = Rc::clone(&calls);
        let _installation = install_with(Rc::new(move |init, options| {
            calls_clone.set(calls_clone.get() + 1);
            MediaStream::construct(init, options)
        }))
        .unwrap();

        let track = MediaTrack::new();
        let stream = new_media_stream(Some(vec![track.clone()].into()), None).unwrap();
        assert!(stream.contains(&track));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_installation_is_per_thread() {
        let _installation = install().unwrap();
        let other = std::thread::spawn(is_installed).join().unwrap();
        assert!(!other);
    }
}
