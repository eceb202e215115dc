//! Character interaction tracking
//!
//! A conversation counts only once its dialog has been opened and then
//! closed again. The gate pairs the two notifications; a close with no
//! matching open is stale and ignored.

use tracing::{debug, trace};

#[derive(Clone, Debug, Default)]
pub struct InteractionGate {
    open: Option<String>,
    chest_opened: bool,
}

impl InteractionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Character whose dialog is currently open
    pub fn open_character(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Record that `character`'s dialog opened
    ///
    /// Opening a second dialog replaces the first, which then never
    /// completes.
    pub fn opened(&mut self, character: &str) {
        if let Some(previous) = self.open.replace(character.to_string()) {
            if previous != character {
                trace!("dialog for {} replaced by {}", previous, character);
            }
        }
        debug!("interaction opened: {}", character);
    }

    /// Record that `character`'s dialog closed
    ///
    /// Returns true when this completes an open-then-close cycle.
    pub fn closed(&mut self, character: &str) -> bool {
        match self.open.as_deref() {
            Some(open) if open == character => {
                self.open = None;
                debug!("interaction completed: {}", character);
                true
            }
            _ => {
                trace!("ignoring stale close for {}", character);
                false
            }
        }
    }

    pub fn chest_opened(&self) -> bool {
        self.chest_opened
    }

    /// Latch the chest open. Returns true only the first time.
    pub fn open_chest(&mut self) -> bool {
        if self.chest_opened {
            trace!("chest already open");
            return false;
        }
        self.chest_opened = true;
        true
    }
}
