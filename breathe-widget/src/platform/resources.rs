//! Host wake lock and audio unlock
//!
//! A terminal has no screen-wake API and needs no audio unlock. These
//! handles honour the config switches and log the session-scoped
//! acquire/release pairs so the lifecycle stays observable.

use breathe_hal::{AudioUnlock, ResourceError, WakeLock};
use tracing::debug;

/// Wake lock for the host
#[derive(Debug, Default)]
pub struct HostWakeLock {
    enabled: bool,
    held: bool,
}

impl HostWakeLock {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            held: false,
        }
    }
}

impl WakeLock for HostWakeLock {
    fn acquire(&mut self) -> Result<(), ResourceError> {
        if !self.enabled {
            return Err(ResourceError::Unsupported);
        }
        self.held = true;
        debug!("wake lock acquired");
        Ok(())
    }

    fn release(&mut self) {
        if self.held {
            self.held = false;
            debug!("wake lock released");
        }
    }
}

/// Audio unlock for the host
#[derive(Debug, Default)]
pub struct HostAudioUnlock {
    enabled: bool,
    unlocked: bool,
}

impl HostAudioUnlock {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            unlocked: false,
        }
    }
}

impl AudioUnlock for HostAudioUnlock {
    fn unlock(&mut self) -> Result<(), ResourceError> {
        if !self.enabled {
            return Err(ResourceError::Unsupported);
        }
        self.unlocked = true;
        debug!("audio unlocked");
        Ok(())
    }

    fn pause(&mut self) {
        if self.unlocked {
            self.unlocked = false;
            debug!("audio unlock paused");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wake_lock_lifecycle() {
        let mut lock = HostWakeLock::new(true);
        lock.acquire().unwrap();
        assert!(lock.held);
        lock.release();
        assert!(!lock.held);
    }

    #[test]
    fn test_disabled_is_unsupported() {
        assert_eq!(
            HostWakeLock::new(false).acquire(),
            Err(ResourceError::Unsupported)
        );
        assert_eq!(
            HostAudioUnlock::new(false).unlock(),
            Err(ResourceError::Unsupported)
        );
    }

    #[test]
    fn test_audio_unlock_lifecycle() {
        let mut audio = HostAudioUnlock::new(true);
        audio.unlock().unwrap();
        assert!(audio.unlocked);
        audio.pause();
        assert!(!audio.unlocked);
    }
}
