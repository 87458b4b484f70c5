//! Input-line tokenizing.
//!
//! A command is a verb plus up to two whitespace-separated arguments. The
//! dispatcher enforces per-verb arity; this module only splits the line.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub args: Vec<String>,
}

impl Command {
    /// Splits a line into a command. Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts.next()?.to_string();
        let args = parts.map(str::to_string).collect();
        Some(Self { verb, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_verb_and_args() {
        let cmd = Command::parse("cp a.txt b.txt").unwrap();
        assert_eq!(cmd.verb, "cp");
        assert_eq!(cmd.args, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn parse_collapses_extra_whitespace() {
        let cmd = Command::parse("  cd   docs ").unwrap();
        assert_eq!(cmd.verb, "cd");
        assert_eq!(cmd.args, vec!["docs"]);
    }

    #[test]
    fn parse_keeps_trailing_tokens_for_arity_checks() {
        let cmd = Command::parse("rn a b c").unwrap();
        assert_eq!(cmd.args.len(), 3);
    }

    #[test]
    fn parse_returns_none_for_blank_lines() {
        assert!(Command::parse("").is_none());
        assert!(Command::parse("   ").is_none());
    }
}
