use crate::command::DEFAULT_ARG_LIMIT;
use argh::FromArgs;

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "SMALLSH_LOG";

/// smallsh - a small interactive shell with built-in cd, status and exit
#[derive(FromArgs, Debug)]
pub struct Args {
    /// maximum number of arguments a single command may carry
    #[argh(option, default = "DEFAULT_ARG_LIMIT")]
    pub max_args: usize,

    /// cap on tracked background jobs (unbounded when omitted)
    #[argh(option)]
    pub max_jobs: Option<usize>,

    /// print version and exit
    #[argh(switch, short = 'v')]
    pub version: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub arg_limit: usize,
    pub job_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            arg_limit: DEFAULT_ARG_LIMIT,
            job_capacity: None,
        }
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Config {
            arg_limit: args.max_args,
            job_capacity: args.max_jobs,
        }
    }
}
