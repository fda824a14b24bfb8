use crate::command::CommandRecord;
use crate::error::ShellError;
use crate::jobs::JobManager;
use crate::redirects::RedirectPlan;
use crate::signal_handler::DispositionSet;
use crate::status::ExitStatus;
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag};
use nix::unistd::{execvp, fork, ForkResult, Pid};
use std::ffi::CString;
use std::io::{self, Write};
use tracing::{debug, warn};

pub const NOT_FOUND: i32 = 127;
pub const NOT_EXECUTABLE: i32 = 126;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Foreground(ExitStatus),
    Background(Pid),
}

fn exec_failure_status(errno: Errno) -> i32 {
    match errno {
        Errno::ENOENT => NOT_FOUND,
        _ => NOT_EXECUTABLE,
    }
}

fn to_cstrings(argv: &[String]) -> Result<Vec<CString>, ShellError> {
    argv.iter()
        .map(|arg| CString::new(arg.as_str()).map_err(|_| ShellError::InvalidArgument(arg.clone())))
        .collect()
}

pub fn run_external(record: &CommandRecord, jobs: &mut JobManager) -> Result<Outcome, ShellError> {
    DispositionSet::INTERPRETER.apply().map_err(ShellError::Signals)?;

    // everything the child needs is built before the fork
    let argv = to_cstrings(&record.argv)?;
    let plan = RedirectPlan::for_record(record)?;
    let child_signals = DispositionSet::for_child(!record.background);

    let _ = io::stdout().flush();
    let _ = io::stderr().flush();

    match unsafe { fork() } {
        Err(e) => Err(ShellError::Fork(e)),
        Ok(ForkResult::Child) => {
            let error = exec_child(&argv, &plan, child_signals);
            let _ = writeln!(io::stderr(), "{}: {}", record.program(), error.desc());
            unsafe { libc::_exit(exec_failure_status(error)) }
        }
        Ok(ForkResult::Parent { child }) => {
            debug!(pid = %child, program = record.program(), background = record.background, "spawned");
            if record.background {
                Ok(Outcome::Background(track_background(child, jobs)))
            } else {
                wait_foreground(child).map(Outcome::Foreground)
            }
        }
    }
}

/// Child side of the fork. Only returns if the exec itself failed.
fn exec_child(argv: &[CString], plan: &RedirectPlan, signals: DispositionSet) -> Errno {
    if let Err(e) = signals.apply() {
        return e;
    }
    plan.apply();
    match execvp(&argv[0], argv) {
        Ok(never) => match never {},
        Err(e) => e,
    }
}

fn wait_foreground(child: Pid) -> Result<ExitStatus, ShellError> {
    loop {
        match waitpid(child, None) {
            Ok(wait_status) => {
                if let Some(status) = ExitStatus::from_wait(wait_status) {
                    if let ExitStatus::Signaled(_) = status {
                        println!("{}", status);
                    }
                    return Ok(status);
                }
            }
            Err(Errno::EINTR) => continue,
            Err(e) => {
                // the child is gone without a status we can report
                warn!(pid = %child, error = %e, "waitpid failed for foreground child");
                return Ok(ExitStatus::Exited(1));
            }
        }
    }
}

fn track_background(child: Pid, jobs: &mut JobManager) -> Pid {
    let early = match waitpid(child, Some(WaitPidFlag::WNOHANG)) {
        Ok(wait_status) => ExitStatus::from_wait(wait_status),
        Err(e) => {
            warn!(pid = %child, error = %e, "initial status check failed");
            None
        }
    };
    println!("background pid is {}", child);
    jobs.record_with_status(child, early);
    child
}
