use crate::status::ExitStatus;
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag};
use nix::unistd::Pid;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub pid: Pid,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub pid: Pid,
    pub status: ExitStatus,
}

/// Background processes spawned by the interpreter and not yet reaped.
/// Only the main control thread touches this table.
pub struct JobManager {
    jobs: Vec<Job>,
    // reaped before the first sweep; reported but never signalled
    pending: Vec<Completion>,
    capacity: Option<usize>,
}

impl JobManager {
    pub fn new() -> Self {
        Self::with_capacity_limit(None)
    }

    pub fn with_capacity_limit(capacity: Option<usize>) -> Self {
        JobManager {
            jobs: Vec::new(),
            pending: Vec::new(),
            capacity,
        }
    }

    /// Returns false when the configured capacity is exhausted.
    pub fn record(&mut self, pid: Pid) -> bool {
        self.record_with_status(pid, None)
    }

    /// A child the spawner already reaped is queued for the next sweep's
    /// report instead of entering the active table.
    pub fn record_with_status(&mut self, pid: Pid, reaped: Option<ExitStatus>) -> bool {
        if let Some(status) = reaped {
            debug!(%pid, ?status, "background job finished before tracking");
            self.pending.push(Completion { pid, status });
            return true;
        }
        if let Some(capacity) = self.capacity {
            if self.active_count() >= capacity {
                warn!(%pid, capacity, "background job table full, not tracking");
                return false;
            }
        }
        debug!(%pid, "tracking background job");
        self.jobs.push(Job { pid, active: true });
        true
    }

    pub fn active_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.active).count()
    }

    #[cfg(test)]
    pub fn pids(&self) -> Vec<Pid> {
        self.jobs.iter().filter(|j| j.active).map(|j| j.pid).collect()
    }

    /// Poll every active job without blocking; finished ones are retired and
    /// returned after any already-reaped completions.
    pub fn sweep(&mut self) -> Vec<Completion> {
        let mut completed = std::mem::take(&mut self.pending);

        for job in self.jobs.iter_mut().filter(|j| j.active) {
            match waitpid(job.pid, Some(WaitPidFlag::WNOHANG)) {
                Ok(wait_status) => {
                    if let Some(status) = ExitStatus::from_wait(wait_status) {
                        job.active = false;
                        completed.push(Completion { pid: job.pid, status });
                    }
                }
                Err(Errno::ECHILD) => {
                    debug!(pid = %job.pid, "job already reaped elsewhere");
                    job.active = false;
                }
                Err(e) => warn!(pid = %job.pid, error = %e, "error checking background job"),
            }
        }

        self.jobs.retain(|j| j.active);
        completed
    }

    /// Send SIGTERM to every active job. Returns how many were signalled.
    pub fn kill_all(&mut self) -> usize {
        let mut signalled = 0;
        for job in self.jobs.iter().filter(|j| j.active) {
            match kill(job.pid, Signal::SIGTERM) {
                Ok(()) => {
                    debug!(pid = %job.pid, "sent SIGTERM");
                    signalled += 1;
                }
                Err(e) => warn!(pid = %job.pid, error = %e, "failed to terminate background job"),
            }
        }
        signalled
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new()
    }
}
