use crate::command::CommandRecord;
use crate::error::ShellError;
use std::ffi::CString;
use std::io::{self, Write};

pub const NULL_DEVICE: &str = "/dev/null";

/// Exit status of a child whose redirection could not be set up.
pub const REDIRECT_FAILURE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectType {
    StdinFrom,
    StdoutTo,
}

impl RedirectType {
    fn target_fd(self) -> libc::c_int {
        match self {
            RedirectType::StdinFrom => libc::STDIN_FILENO,
            RedirectType::StdoutTo => libc::STDOUT_FILENO,
        }
    }

    fn open_flags(self) -> libc::c_int {
        match self {
            RedirectType::StdinFrom => libc::O_RDONLY,
            RedirectType::StdoutTo => libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
        }
    }

    fn direction(self) -> &'static str {
        match self {
            RedirectType::StdinFrom => "input",
            RedirectType::StdoutTo => "output",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub kind: RedirectType,
    pub path: CString,
}

/// File bindings for a child, prepared in the parent so the child only has
/// to open and dup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectPlan {
    pub redirects: Vec<Redirect>,
}

impl RedirectPlan {
    pub fn for_record(record: &CommandRecord) -> Result<Self, ShellError> {
        let mut redirects = Vec::new();

        if let Some(path) = &record.input_path {
            redirects.push(Redirect::new(RedirectType::StdinFrom, path)?);
        }
        if let Some(path) = &record.output_path {
            redirects.push(Redirect::new(RedirectType::StdoutTo, path)?);
        }

        // silent background jobs must not block on the terminal
        if !record.has_redirects() && record.background && record.arg_count == 0 {
            redirects.push(Redirect::new(RedirectType::StdinFrom, NULL_DEVICE)?);
            redirects.push(Redirect::new(RedirectType::StdoutTo, NULL_DEVICE)?);
        }

        Ok(RedirectPlan { redirects })
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.redirects.is_empty()
    }

    /// Bind every redirect onto fd 0/1. Runs in the forked child only and
    /// never returns on failure.
    pub fn apply(&self) {
        for redirect in &self.redirects {
            if let Err(e) = redirect.bind() {
                let _ = writeln!(
                    io::stderr(),
                    "cannot open {} for {}: {}",
                    redirect.path.to_string_lossy(),
                    redirect.kind.direction(),
                    e
                );
                unsafe { libc::_exit(REDIRECT_FAILURE) }
            }
        }
    }
}

impl Redirect {
    fn new(kind: RedirectType, path: &str) -> Result<Self, ShellError> {
        let path = CString::new(path).map_err(|_| ShellError::InvalidArgument(path.to_string()))?;
        Ok(Redirect { kind, path })
    }

    fn bind(&self) -> io::Result<()> {
        let fd = unsafe { libc::open(self.path.as_ptr(), self.kind.open_flags(), 0o644 as libc::c_uint) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        let target = self.kind.target_fd();
        if fd != target {
            let result = unsafe { libc::dup2(fd, target) };
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            if result < 0 {
                return Err(err);
            }
        }
        Ok(())
    }
}
