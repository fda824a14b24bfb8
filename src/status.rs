use nix::sys::signal::Signal;
use nix::sys::wait::WaitStatus;
use std::fmt;

/// How a command finished: a normal exit code or the signal that killed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Exited(i32),
    Signaled(Signal),
}

impl ExitStatus {
    /// Translate a `waitpid` result. Returns `None` for states that are not
    /// a completion (still alive, stopped, continued).
    pub fn from_wait(status: WaitStatus) -> Option<Self> {
        match status {
            WaitStatus::Exited(_, code) => Some(ExitStatus::Exited(code)),
            WaitStatus::Signaled(_, signal, _) => Some(ExitStatus::Signaled(signal)),
            _ => None,
        }
    }

    /// Completion report used for background jobs; names the signal as well.
    pub fn describe(&self) -> String {
        match self {
            ExitStatus::Exited(_) => self.to_string(),
            ExitStatus::Signaled(signal) => format!("{} ({})", self, signal.as_str()),
        }
    }
}

impl Default for ExitStatus {
    fn default() -> Self {
        ExitStatus::Exited(0)
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exit value {}", code),
            ExitStatus::Signaled(signal) => write!(f, "terminated by signal {}", *signal as i32),
        }
    }
}
