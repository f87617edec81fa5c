/*!
`completion.rs`

Implements `onos completion <shell>`.

  - bash : clap_complete's bash script
  - fish : clap_complete's fish script (descriptions included)
  - zsh  : the bash script, embedded in a fixed zsh shim that defines bash
           emulation helpers and rewrites bash-only syntax with sed before
           sourcing it (`completion/zsh_preamble.zsh`, `completion/zsh_trailer.zsh`)

The script is rendered into memory before anything touches stdout, so an
unsupported shell writes nothing.
*/

use std::io::Write;

use clap::{Args, Command, CommandFactory};
use tracing::debug;

use crate::cmd::shell::Shell;
use crate::error::{CliError, Result};

/// Name the completion scripts register for.
pub const PROGRAM: &str = "onos";

const ZSH_PREAMBLE: &str = include_str!("completion/zsh_preamble.zsh");
const ZSH_TRAILER: &str = include_str!("completion/zsh_trailer.zsh");

/// CLI arguments for `onos completion <shell>`
#[derive(Args, Debug)]
#[command(after_help = "\
For bash run the following command from the shell: eval $(onos completion bash).
For zsh run the following command from the shell: source <(onos completion zsh).
For fish run the following command from the shell: onos completion fish > ~/.config/fish/completions/onos.fish")]
pub struct CompletionArgs {
    /// Shell to generate for (bash|zsh|fish)
    #[arg(value_name = "SHELL")]
    pub shell: String,
}

/// Entry point for the completion subcommand.
pub fn execute_completion(args: &CompletionArgs, out: &mut impl Write) -> Result<()> {
    let Some(shell) = Shell::from_str_ci(&args.shell) else {
        debug!(requested = %args.shell, supported = ?Shell::variants(), "no completion generator");
        return Err(CliError::UnsupportedShell(args.shell.clone()));
    };

    let mut cmd = crate::Cli::command();
    let script = render_script(shell, &mut cmd);
    out.write_all(&script)?;
    out.flush()?;
    Ok(())
}

/// Completion script for `shell` covering every command and flag of `cmd`.
pub fn render_script(shell: Shell, cmd: &mut Command) -> Vec<u8> {
    match shell.generator() {
        Some(generator) => generate(generator, cmd),
        None => {
            let bash = generate(clap_complete::Shell::Bash, cmd);
            let mut script =
                Vec::with_capacity(ZSH_PREAMBLE.len() + bash.len() + ZSH_TRAILER.len());
            script.extend_from_slice(ZSH_PREAMBLE.as_bytes());
            script.extend_from_slice(&bash);
            script.extend_from_slice(ZSH_TRAILER.as_bytes());
            script
        }
    }
}

fn generate(generator: clap_complete::Shell, cmd: &mut Command) -> Vec<u8> {
    let mut buf = Vec::new();
    clap_complete::generate(generator, cmd, PROGRAM, &mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(shell: &str) -> (Result<()>, String) {
        let mut out = Vec::new();
        let res = execute_completion(
            &CompletionArgs {
                shell: shell.to_string(),
            },
            &mut out,
        );
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn every_shell_produces_output() {
        for shell in Shell::variants() {
            let (res, out) = run(&shell.to_string());
            assert!(res.is_ok(), "{shell}: {res:?}");
            assert!(!out.is_empty(), "{shell} script is empty");
        }
    }

    #[test]
    fn zsh_wraps_bash_in_shim() {
        let (res, out) = run("zsh");
        assert!(res.is_ok());
        assert!(out.starts_with("#compdef onos\n"));
        assert!(out.contains("__onos_bash_source() {"));
        assert!(out.contains("__onos_convert_bash_to_zsh() {"));
        assert!(out.trim_end().ends_with("_complete onos 2>/dev/null"));

        let start = out.find("<<'BASH_COMPLETION_EOF'\n").unwrap();
        let end = out.rfind("\nBASH_COMPLETION_EOF\n").unwrap();
        assert!(start < end);

        let mut cmd = crate::Cli::command();
        let bash = String::from_utf8(render_script(Shell::Bash, &mut cmd)).unwrap();
        assert!(out.contains(&bash), "zsh script must embed the bash script verbatim");
    }

    #[test]
    fn scripts_cover_the_command_tree() {
        let (_, bash) = run("bash");
        for word in ["uenib", "completion", "--no-headers", "--aspect"] {
            assert!(bash.contains(word), "bash script missing {word}");
        }
        let (_, fish) = run("fish");
        assert!(fish.contains("complete -c onos"));
    }

    #[test]
    fn unsupported_shell_writes_nothing() {
        let (res, out) = run("tcsh");
        let err = res.unwrap_err();
        assert!(matches!(err, CliError::UnsupportedShell(_)));
        assert_eq!(err.to_string(), "unsupported shell type tcsh");
        assert!(out.is_empty());
    }
}
