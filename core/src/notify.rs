use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Sound cue emitted by the engine after an action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Notification {
    TileRevealed,
    MineHit,
    RoundWon,
}

impl Notification {
    pub const fn tag(self) -> &'static str {
        use Notification::*;
        match self {
            TileRevealed => "tile-revealed",
            MineHit => "mine-hit",
            RoundWon => "round-won",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Receives sound cues. Failures never affect the game, the engine only logs them.
pub trait AudioNotifier {
    fn notify(&mut self, notification: Notification) -> core::result::Result<(), NotifyError>;
}

impl<N: AudioNotifier + ?Sized> AudioNotifier for &mut N {
    fn notify(&mut self, notification: Notification) -> core::result::Result<(), NotifyError> {
        (**self).notify(notification)
    }
}

/// Notifier that discards everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoSound;

impl AudioNotifier for NoSound {
    fn notify(&mut self, _notification: Notification) -> core::result::Result<(), NotifyError> {
        Ok(())
    }
}

/// Mute switch in front of another notifier.
#[derive(Clone, Debug)]
pub struct SoundSwitch<N> {
    inner: N,
    enabled: bool,
}

impl<N> SoundSwitch<N> {
    pub fn new(inner: N) -> Self {
        Self {
            inner,
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        log::debug!("sound {}", if enabled { "on" } else { "off" });
        self.enabled = enabled;
    }

    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }
}

impl<N: AudioNotifier> AudioNotifier for SoundSwitch<N> {
    fn notify(&mut self, notification: Notification) -> core::result::Result<(), NotifyError> {
        if self.enabled {
            self.inner.notify(notification)
        } else {
            log::trace!("muted: {}", notification);
            Ok(())
        }
    }
}
