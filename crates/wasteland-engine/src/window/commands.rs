use winit::window::{CursorGrabMode, Window};

/// How the OS cursor behaves over the window.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CursorMode {
    /// Visible and free to leave the window.
    Normal,
    /// Hidden and grabbed; only raw motion is reported.
    Captured,
}

impl CursorMode {
    pub(super) fn apply(self, window: &Window) {
        match self {
            CursorMode::Captured => {
                let grabbed = window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
                if let Err(e) = grabbed {
                    log::warn!("cursor grab unavailable: {e}");
                }
                window.set_cursor_visible(false);
            }
            CursorMode::Normal => {
                if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                    log::warn!("cursor release failed: {e}");
                }
                window.set_cursor_visible(true);
            }
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) enum Command {
    SetCursorMode(CursorMode),
    Exit,
}

/// Requests an app makes of the runtime from inside a callback.
///
/// They are queued and carried out once the callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    queued: Vec<Command>,
}

impl RuntimeCtx {
    pub fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.queued.push(Command::SetCursorMode(mode));
    }

    pub fn exit(&mut self) {
        self.queued.push(Command::Exit);
    }

    pub(super) fn into_commands(self) -> Vec<Command> {
        self.queued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_keep_their_order() {
        let mut ctx = RuntimeCtx::default();
        ctx.set_cursor_mode(CursorMode::Normal);
        ctx.exit();
        ctx.set_cursor_mode(CursorMode::Captured);
        assert_eq!(
            ctx.into_commands(),
            vec![
                Command::SetCursorMode(CursorMode::Normal),
                Command::Exit,
                Command::SetCursorMode(CursorMode::Captured),
            ]
        );
    }
}
