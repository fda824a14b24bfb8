use nix::unistd::getpid;

/// The one substitution token the interpreter understands.
pub const PID_TOKEN: &str = "$$";

/// Replace every `$$` in `word` with the interpreter's process ID.
pub fn expand_variables(word: &str) -> String {
    if !word.contains(PID_TOKEN) {
        return word.to_string();
    }
    expand_pid(word, &getpid().to_string())
}

/// Left-to-right, non-overlapping replacement: `$$$` keeps its last `$`.
pub fn expand_pid(word: &str, pid: &str) -> String {
    word.replace(PID_TOKEN, pid)
}
