use std::io;
use thiserror::Error;

/// Problems found while turning an input line into a `CommandRecord`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("argument count {count} is greater than the {limit} argument limit")]
    TooManyArguments { count: usize, limit: usize },

    #[error("expected a file name after '{operator}'")]
    MissingPath { operator: char },

    #[error("missing command before redirection")]
    MissingCommand,
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("fork failed: {0}")]
    Fork(#[source] nix::Error),

    #[error("cannot install signal dispositions: {0}")]
    Signals(#[source] nix::Error),

    #[error("{0}: argument contains a NUL byte")]
    InvalidArgument(String),

    #[error("cannot read input: {0}")]
    Input(#[source] io::Error),
}

impl ShellError {
    /// Fatal errors end the interpreter; everything else stays within the
    /// current cycle.
    pub fn is_fatal(&self) -> bool {
        match self {
            ShellError::Parse(ParseError::TooManyArguments { .. }) => true,
            ShellError::Parse(_) | ShellError::InvalidArgument(_) => false,
            ShellError::Fork(_) | ShellError::Signals(_) | ShellError::Input(_) => true,
        }
    }
}
