use crate::error::ParseError;
use crate::status::ExitStatus;
use crate::variables::expand_variables;

pub const DEFAULT_ARG_LIMIT: usize = 512;

/// One parsed user command, owned by a single prompt cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub argv: Vec<String>,
    /// Words after the program name and before the first redirection.
    pub arg_count: usize,
    pub input_path: Option<String>,
    pub output_path: Option<String>,
    pub background: bool,
    pub last_status: ExitStatus,
}

impl CommandRecord {
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn has_redirects(&self) -> bool {
        self.input_path.is_some() || self.output_path.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    PathIn,
    PathOut,
    Background,
    Word(&'a str),
}

impl<'a> Token<'a> {
    fn classify(raw: &'a str) -> Self {
        match raw {
            "<" => Token::PathIn,
            ">" => Token::PathOut,
            _ => Token::Word(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Nothing,
    Input,
    Output,
}

/// Blank lines, whitespace-only lines and `#` comments are skipped.
pub fn is_ignorable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Strip a trailing `&` (optionally preceded by whitespace) off the line.
fn split_background(line: &str) -> (&str, bool) {
    let trimmed = line.trim_end();
    match trimmed.strip_suffix('&') {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    }
}

pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let (body, background) = split_background(line);
    let mut tokens: Vec<Token<'_>> = body
        .split(' ')
        .filter(|s| !s.is_empty())
        .map(Token::classify)
        .collect();
    if background {
        tokens.push(Token::Background);
    }
    tokens
}

/// Parse one input line. Returns `Ok(None)` for lines that should simply
/// re-prompt.
pub fn parse(
    line: &str,
    foreground_only: bool,
    last_status: ExitStatus,
    arg_limit: usize,
) -> Result<Option<CommandRecord>, ParseError> {
    let line = line.trim_end_matches(['\n', '\r']);
    if is_ignorable(line) {
        return Ok(None);
    }

    let mut argv = Vec::new();
    let mut arg_count = 0;
    let mut seen_redirect = false;
    let mut input_path = None;
    let mut output_path = None;
    let mut background_marker = false;
    let mut pending = Pending::Nothing;

    for token in tokenize(line) {
        match (pending, token) {
            (Pending::Input, Token::Word(path)) => {
                input_path = Some(path.to_string());
                pending = Pending::Nothing;
            }
            (Pending::Output, Token::Word(path)) => {
                output_path = Some(path.to_string());
                pending = Pending::Nothing;
            }
            (Pending::Input, _) => return Err(ParseError::MissingPath { operator: '<' }),
            (Pending::Output, _) => return Err(ParseError::MissingPath { operator: '>' }),
            (Pending::Nothing, Token::PathIn) => {
                seen_redirect = true;
                pending = Pending::Input;
            }
            (Pending::Nothing, Token::PathOut) => {
                seen_redirect = true;
                pending = Pending::Output;
            }
            (Pending::Nothing, Token::Background) => background_marker = true,
            (Pending::Nothing, Token::Word(word)) => {
                if !argv.is_empty() && !seen_redirect {
                    arg_count += 1;
                }
                argv.push(expand_variables(word));
            }
        }
    }

    match pending {
        Pending::Input => return Err(ParseError::MissingPath { operator: '<' }),
        Pending::Output => return Err(ParseError::MissingPath { operator: '>' }),
        Pending::Nothing => {}
    }

    if argv.is_empty() {
        // "&" alone, or nothing but redirections
        if input_path.is_none() && output_path.is_none() {
            return Ok(None);
        }
        return Err(ParseError::MissingCommand);
    }

    let visible = argv.len() - 1;
    if visible > arg_limit {
        return Err(ParseError::TooManyArguments {
            count: visible,
            limit: arg_limit,
        });
    }

    Ok(Some(CommandRecord {
        argv,
        arg_count,
        input_path,
        output_path,
        background: background_marker && !foreground_only,
        last_status,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::Signal;
    use nix::unistd::getpid;

    fn parse_line(line: &str, foreground_only: bool) -> Option<CommandRecord> {
        parse(line, foreground_only, ExitStatus::default(), DEFAULT_ARG_LIMIT).unwrap()
    }

    #[test]
    fn test_full_grammar() {
        let record = parse_line("ls -la < in.txt > out.txt &", false).unwrap();
        assert_eq!(record.argv, vec!["ls", "-la"]);
        assert_eq!(record.arg_count, 1);
        assert_eq!(record.input_path.as_deref(), Some("in.txt"));
        assert_eq!(record.output_path.as_deref(), Some("out.txt"));
        assert!(record.background);

        let record = parse_line("ls -la < in.txt > out.txt &", true).unwrap();
        assert_eq!(record.argv, vec!["ls", "-la"]);
        assert_eq!(record.input_path.as_deref(), Some("in.txt"));
        assert_eq!(record.output_path.as_deref(), Some("out.txt"));
        assert!(!record.background);
    }

    #[test]
    fn test_redirect_order_is_free() {
        let record = parse_line("sort > out < in", false).unwrap();
        assert_eq!(record.argv, vec!["sort"]);
        assert_eq!(record.input_path.as_deref(), Some("in"));
        assert_eq!(record.output_path.as_deref(), Some("out"));
        assert!(!record.background);
    }

    #[test]
    fn test_ignorable_lines() {
        for line in ["", "   ", "\t", "# comment", "#", "   # indented", "\n"] {
            assert_eq!(parse_line(line, false), None, "line {:?}", line);
        }
        assert_eq!(parse_line("&", false), None);
    }

    #[test]
    fn test_pid_substitution() {
        let pid = getpid().to_string();
        let record = parse_line("echo $$ file$$.log $$$$", false).unwrap();
        assert_eq!(
            record.argv,
            vec![
                "echo".to_string(),
                pid.clone(),
                format!("file{}.log", pid),
                format!("{}{}", pid, pid),
            ]
        );
    }

    #[test]
    fn test_paths_are_not_substituted() {
        let record = parse_line("cat < in$$", false).unwrap();
        assert_eq!(record.input_path.as_deref(), Some("in$$"));
    }

    #[test]
    fn test_background_marker_variants() {
        assert!(parse_line("sleep 5 &", false).unwrap().background);
        assert!(parse_line("sleep 5&", false).unwrap().background);
        assert!(parse_line("sleep 5 &   ", false).unwrap().background);

        let record = parse_line("echo & done", false).unwrap();
        assert!(!record.background);
        assert_eq!(record.argv, vec!["echo", "&", "done"]);
    }

    #[test]
    fn test_arg_count_stops_at_redirection() {
        let record = parse_line("cmd a b < in c", false).unwrap();
        assert_eq!(record.argv, vec!["cmd", "a", "b", "c"]);
        assert_eq!(record.arg_count, 2);

        let record = parse_line("sleep &", false).unwrap();
        assert_eq!(record.argv, vec!["sleep"]);
        assert_eq!(record.arg_count, 0);
    }

    #[test]
    fn test_repeated_spaces_collapse() {
        let record = parse_line("echo   a    b", false).unwrap();
        assert_eq!(record.argv, vec!["echo", "a", "b"]);
    }

    #[test]
    fn test_argument_limit() {
        let at_limit = format!("echo{}", " x".repeat(4));
        assert!(parse(&at_limit, false, ExitStatus::default(), 4).unwrap().is_some());

        let over = format!("echo{}", " x".repeat(5));
        assert_eq!(
            parse(&over, false, ExitStatus::default(), 4),
            Err(ParseError::TooManyArguments { count: 5, limit: 4 })
        );

        let big = format!("echo{} < in > out &", " x".repeat(DEFAULT_ARG_LIMIT));
        assert!(parse_line(&big, false).is_some());
    }

    #[test]
    fn test_missing_pieces() {
        let status = ExitStatus::default();
        assert_eq!(
            parse("cat <", false, status, DEFAULT_ARG_LIMIT),
            Err(ParseError::MissingPath { operator: '<' })
        );
        assert_eq!(
            parse("cat > < in", false, status, DEFAULT_ARG_LIMIT),
            Err(ParseError::MissingPath { operator: '>' })
        );
        assert_eq!(
            parse("< in > out", false, status, DEFAULT_ARG_LIMIT),
            Err(ParseError::MissingCommand)
        );
    }

    #[test]
    fn test_last_status_carried() {
        let status = ExitStatus::Signaled(Signal::SIGINT);
        let record = parse("status", false, status, DEFAULT_ARG_LIMIT)
            .unwrap()
            .unwrap();
        assert_eq!(record.last_status, status);
        assert_eq!(record.program(), "status");
        assert!(!record.has_redirects());
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("wc -l < f &"),
            vec![
                Token::Word("wc"),
                Token::Word("-l"),
                Token::PathIn,
                Token::Word("f"),
                Token::Background,
            ]
        );
    }
}
