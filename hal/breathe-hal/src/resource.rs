//! Session-scoped platform resources
//!
//! A running session holds two resources: a lock that keeps the display
//! awake, and an audio unlock handle that some platforms require before
//! any sound may play. Both are optional comforts; a session that cannot
//! get them carries on without.

use core::fmt;

/// Why a resource could not be acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceError {
    /// The platform has no such capability
    Unsupported,
    /// The platform refused the request (permissions, battery saver)
    Denied,
    /// Blocked by policy until the user interacts (autoplay rules)
    Blocked,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ResourceError::Unsupported => "unsupported on this platform",
            ResourceError::Denied => "denied by the platform",
            ResourceError::Blocked => "blocked by platform policy",
        };
        f.write_str(text)
    }
}

/// Keep-display-awake lock
///
/// Implementations need not track whether the lock is held; the session
/// controller guarantees at most one acquisition at a time and releases
/// only what it acquired.
pub trait WakeLock {
    /// Request that the display stays on
    fn acquire(&mut self) -> Result<(), ResourceError>;

    /// Let the display sleep again
    fn release(&mut self);
}

/// Audio playback unlock
///
/// On some platforms audio may only start in response to a user gesture.
/// Starting a silent looping stream from the start gesture keeps playback
/// unlocked for the remainder of the session.
pub trait AudioUnlock {
    /// Start the unlock stream
    fn unlock(&mut self) -> Result<(), ResourceError>;

    /// Pause the unlock stream
    fn pause(&mut self);
}

impl<T: WakeLock + ?Sized> WakeLock for &mut T {
    fn acquire(&mut self) -> Result<(), ResourceError> {
        (**self).acquire()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

impl<T: AudioUnlock + ?Sized> AudioUnlock for &mut T {
    fn unlock(&mut self) -> Result<(), ResourceError> {
        (**self).unlock()
    }

    fn pause(&mut self) {
        (**self).pause()
    }
}
