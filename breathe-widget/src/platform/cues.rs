//! Terminal bell cues

use std::io::Write;

use breathe_core::traits::{Cue, CueError, CuePlayer};
use tracing::trace;

const BEL: &[u8] = b"\x07";

/// Plays cues on the terminal bell
///
/// The bell has a single tone, so completion rings twice to stand apart
/// from the phase cues.
pub struct BellCuePlayer<W: Write> {
    out: W,
    enabled: bool,
    bell: bool,
}

impl<W: Write> BellCuePlayer<W> {
    /// `enabled` mutes all cues; `bell` selects audible output
    pub fn new(out: W, enabled: bool, bell: bool) -> Self {
        Self { out, enabled, bell }
    }

    fn rings(cue: Cue) -> usize {
        match cue {
            Cue::Completion => 2,
            Cue::Inhale | Cue::Hold | Cue::Exhale => 1,
        }
    }
}

impl<W: Write> CuePlayer for BellCuePlayer<W> {
    fn play(&mut self, cue: Cue) -> Result<(), CueError> {
        if !self.enabled {
            return Ok(());
        }
        trace!(?cue, "cue");
        if !self.bell {
            return Ok(());
        }

        for _ in 0..Self::rings(cue) {
            self.out.write_all(BEL).map_err(|_| CueError::Unavailable)?;
        }
        self.out.flush().map_err(|_| CueError::Unavailable)
    }
}
