use crate::command::CommandRecord;
use crate::jobs::JobManager;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

/// Commands handled inside the interpreter without spawning a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Status,
    Exit,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "cd" => Some(Builtin::Cd),
            "status" => Some(Builtin::Status),
            "exit" => Some(Builtin::Exit),
            _ => None,
        }
    }

    /// Run the built-in. Returns false only when the interpreter should stop.
    pub fn execute(self, record: &CommandRecord, jobs: &mut JobManager) -> bool {
        match self {
            Builtin::Cd => {
                change_directory(&record.argv[1..]);
                true
            }

            Builtin::Status => {
                println!("{}", record.last_status);
                true
            }

            Builtin::Exit => {
                let signalled = jobs.kill_all();
                debug!(signalled, "exit requested");
                false
            }
        }
    }
}

/// Where `cd` should go: HOME with no arguments, the argument with exactly
/// one, nowhere with more.
pub fn cd_target(args: &[String], home: Option<OsString>) -> Option<Result<PathBuf, &'static str>> {
    match args {
        [] => Some(home.map(PathBuf::from).ok_or("HOME not set")),
        [path] => Some(Ok(PathBuf::from(path))),
        _ => None,
    }
}

fn change_directory(args: &[String]) {
    match cd_target(args, env::var_os("HOME")) {
        None => debug!(count = args.len(), "cd ignored, too many arguments"),
        Some(Err(reason)) => eprintln!("cd: {}", reason),
        Some(Ok(target)) => {
            if let Err(e) = env::set_current_dir(&target) {
                eprintln!("cd: {}: {}", target.display(), e);
            }
        }
    }
}
