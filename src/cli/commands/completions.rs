//! Shell completions generation.
//!
//! Generates shell completion scripts for bash, zsh, fish, PowerShell and elvish.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::FocusError;

/// Execute the completions command.
///
/// # Errors
///
/// Returns `FocusError::InvalidArgument` for an unknown shell name.
pub fn completions(shell: &str, install: bool) -> Result<String, FocusError> {
    let shell = shell_from_str(shell).ok_or_else(|| {
        FocusError::InvalidArgument(format!(
            "Unknown shell '{shell}'. Use bash, zsh, fish, powershell or elvish."
        ))
    })?;

    if install {
        Ok(completion_install_instructions(shell))
    } else {
        generate_completions(shell)
    }
}

/// Generate shell completions for the specified shell.
///
/// # Errors
///
/// Returns an error if the script is not valid UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, FocusError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate_to(&mut buf, shell, &mut cmd);
    String::from_utf8(buf).map_err(|e| FocusError::InvalidArgument(format!("UTF-8 error: {e}")))
}

fn generate_to<W: Write>(buf: &mut W, shell: Shell, cmd: &mut clap::Command) {
    clap_complete::generate(shell, cmd, "focusdot", buf);
}

/// Get shell from string name.
#[must_use]
pub fn shell_from_str(s: &str) -> Option<Shell> {
    match s.to_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "powershell" | "ps" | "pwsh" => Some(Shell::PowerShell),
        "elvish" => Some(Shell::Elvish),
        _ => None,
    }
}

/// Get installation instructions for shell completions.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => r"# Add to ~/.bashrc:
source <(focusdot completions bash)
"
        .to_string(),

        Shell::Zsh => r"# Save to your fpath:
focusdot completions zsh > ~/.zsh/completions/_focusdot
# Then add to ~/.zshrc (before compinit):
fpath=(~/.zsh/completions $fpath)
"
        .to_string(),

        Shell::Fish => r"# Save to fish completions directory:
focusdot completions fish > ~/.config/fish/completions/focusdot.fish
"
        .to_string(),

        Shell::PowerShell => r"# Add to your PowerShell profile ($PROFILE):
focusdot completions powershell | Out-String | Invoke-Expression
"
        .to_string(),

        Shell::Elvish => r"# Save to elvish lib directory, then `use focusdot` in rc.elv:
focusdot completions elvish > ~/.elvish/lib/focusdot.elv
"
        .to_string(),

        _ => "Unknown shell".to_string(),
    }
}
