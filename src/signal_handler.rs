use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::sync::atomic::{AtomicBool, Ordering};

pub const INTERRUPT: Signal = Signal::SIGINT;
pub const MODE_TOGGLE: Signal = Signal::SIGTSTP;

const ENTER_MESSAGE: &[u8] = b"\nEntering foreground-only mode (& is now ignored)\n";
const EXIT_MESSAGE: &[u8] = b"\nExiting foreground-only mode\n";

pub struct ModeFlag(AtomicBool);

impl ModeFlag {
    pub const fn new() -> Self {
        ModeFlag(AtomicBool::new(false))
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Flip the mode and return the new state.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::SeqCst)
    }
}

static FOREGROUND_ONLY: ModeFlag = ModeFlag::new();

/// Whether a trailing `&` is currently ignored.
pub fn foreground_only() -> bool {
    FOREGROUND_ONLY.is_set()
}

fn toggle_message(entered: bool) -> &'static [u8] {
    if entered {
        ENTER_MESSAGE
    } else {
        EXIT_MESSAGE
    }
}

// async-signal-safe: an atomic flip and a single write(2)
extern "C" fn handle_mode_toggle(_signal: libc::c_int) {
    let message = toggle_message(FOREGROUND_ONLY.toggle());
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            message.as_ptr().cast::<libc::c_void>(),
            message.len(),
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Ignore,
    Default,
    Handler,
}

impl Disposition {
    fn action(self) -> SigAction {
        let handler = match self {
            Disposition::Ignore => SigHandler::SigIgn,
            Disposition::Default => SigHandler::SigDfl,
            Disposition::Handler => SigHandler::Handler(handle_mode_toggle),
        };
        // SA_RESTART keeps the blocking read and waitpid going across a toggle.
        SigAction::new(handler, SaFlags::SA_RESTART, SigSet::all())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispositionSet {
    pub interrupt: Disposition,
    pub toggle: Disposition,
}

impl DispositionSet {
    pub const INTERPRETER: DispositionSet = DispositionSet {
        interrupt: Disposition::Ignore,
        toggle: Disposition::Handler,
    };

    /// Only a foreground child gets SIGINT back. No child ever sees the toggle.
    pub fn for_child(foreground: bool) -> Self {
        DispositionSet {
            interrupt: if foreground {
                Disposition::Default
            } else {
                Disposition::Ignore
            },
            toggle: Disposition::Ignore,
        }
    }

    pub fn apply(&self) -> nix::Result<()> {
        unsafe {
            sigaction(INTERRUPT, &self.interrupt.action())?;
            sigaction(MODE_TOGGLE, &self.toggle.action())?;
        }
        Ok(())
    }
}
