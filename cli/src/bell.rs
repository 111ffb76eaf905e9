use std::io::{self, Write};

use mines_core::{AudioNotifier, Notification, NotifyError};

/// Plays cues on the terminal: a log line per cue, and the bell for the
/// loud ones.
#[derive(Debug)]
pub(crate) struct TerminalBell<W> {
    out: W,
}

impl TerminalBell<io::Stderr> {
    pub(crate) fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> TerminalBell<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    const fn rings(notification: Notification) -> bool {
        !matches!(notification, Notification::TileRevealed)
    }
}

impl<W: Write> AudioNotifier for TerminalBell<W> {
    fn notify(&mut self, notification: Notification) -> Result<(), NotifyError> {
        log::info!("cue: {}", notification);
        if !Self::rings(notification) {
            return Ok(());
        }
        self.out
            .write_all(b"\x07")
            .and_then(|()| self.out.flush())
            .map_err(|err| NotifyError::Playback(err.to_string()))
    }
}
