/*!
Shell enum for the `completion` subcommand.

Variants:
  bash / fish (native clap_complete generators)
  zsh         (bash script wrapped in a compatibility shim)

Helpers:
  - variants()
  - from_str_ci()
  - generator()

The name is parsed here rather than by clap so an unknown shell is
reported as `unsupported shell type <name>`.
*/

use std::fmt;

/// Shells `completion` can emit a script for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    /// All variants, in help display order.
    pub const fn variants() -> &'static [Shell] {
        &[Shell::Bash, Shell::Zsh, Shell::Fish]
    }

    /// Case-insensitive parser.
    pub fn from_str_ci(s: &str) -> Option<Self> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "bash" => Some(Shell::Bash),
            "zsh" => Some(Shell::Zsh),
            "fish" => Some(Shell::Fish),
            _ => None,
        }
    }

    /// Native generator, if clap_complete's output is used directly.
    /// zsh has none here: its script is built from the bash one.
    pub fn generator(&self) -> Option<clap_complete::Shell> {
        match self {
            Shell::Bash => Some(clap_complete::Shell::Bash),
            Shell::Fish => Some(clap_complete::Shell::Fish),
            Shell::Zsh => None,
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
        };
        f.write_str(s)
    }
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::Shell;

    #[test]
    fn parse_case_insensitive() {
        assert_eq!(Shell::from_str_ci("BASH"), Some(Shell::Bash));
        assert_eq!(Shell::from_str_ci(" zsh "), Some(Shell::Zsh));
        assert_eq!(Shell::from_str_ci("Fish"), Some(Shell::Fish));
        assert_eq!(Shell::from_str_ci("powershell"), None);
        assert_eq!(Shell::from_str_ci(""), None);
    }

    #[test]
    fn zsh_has_no_native_generator() {
        assert!(Shell::Bash.generator().is_some());
        assert!(Shell::Fish.generator().is_some());
        assert!(Shell::Zsh.generator().is_none());
    }

    #[test]
    fn display_round_trips_through_parser() {
        for shell in Shell::variants() {
            assert_eq!(Shell::from_str_ci(&shell.to_string()), Some(*shell));
        }
    }
}
