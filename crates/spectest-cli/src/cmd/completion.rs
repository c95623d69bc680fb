use crate::output::{confirm, print_json, write_stdout};
use anyhow::Context;
use clap::{Args, Subcommand};
use spectest_core::completion::{command_registry, detect_shell, CompletionFactory};
use spectest_core::config::InstallEnv;
use spectest_core::SpectestError;

#[derive(Subcommand)]
pub enum CompletionSubcommand {
    /// Generate completion script and print it
    Generate {
        #[command(flatten)]
        shell: ShellArg,
    },
    /// Install completion script for your shell
    Install {
        #[command(flatten)]
        shell: ShellArg,
        /// Show detailed installation output
        #[arg(long)]
        verbose: bool,
    },
    /// Remove completion script for your shell
    Uninstall {
        #[command(flatten)]
        shell: ShellArg,
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args)]
pub struct ShellArg {
    /// Shell to use (default: detect from $SHELL)
    #[arg(value_name = "SHELL")]
    shell: Option<String>,
    /// Shell to use
    #[arg(long = "shell", value_name = "SHELL", conflicts_with = "shell")]
    shell_flag: Option<String>,
}

impl ShellArg {
    fn requested(&self) -> Option<&str> {
        self.shell_flag.as_deref().or(self.shell.as_deref())
    }
}

pub fn run(subcmd: CompletionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        CompletionSubcommand::Generate { shell } => {
            generate(&resolve_shell(shell.requested(), "generate")?)
        }
        CompletionSubcommand::Install { shell, verbose } => {
            install(&resolve_shell(shell.requested(), "install")?, verbose, json)
        }
        CompletionSubcommand::Uninstall { shell, yes } => {
            uninstall(&resolve_shell(shell.requested(), "uninstall")?, yes, json)
        }
    }
}

/// Explicit shell if given, else the one named by `$SHELL`, validated
/// against the factory before anything is generated.
fn resolve_shell(requested: Option<&str>, operation: &str) -> anyhow::Result<String> {
    let name = match requested {
        Some(name) => name.trim().to_ascii_lowercase(),
        None => match detect_shell().detected {
            Some(name) => name,
            None => anyhow::bail!(
                "{}\nUsage: spectest completion {operation} [SHELL]\nCurrently supported: {}",
                SpectestError::ShellNotDetected,
                supported_list()
            ),
        },
    };

    if !CompletionFactory::is_supported(&name) {
        return Err(SpectestError::UnsupportedShell {
            shell: name,
            supported: supported_list(),
        }
        .into());
    }
    tracing::debug!(shell = %name, "resolved shell");
    Ok(name)
}

fn supported_list() -> String {
    CompletionFactory::supported_shells()
        .iter()
        .map(|shell| shell.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn generate(shell: &str) -> anyhow::Result<()> {
    let generator = CompletionFactory::create_generator(shell)?;
    write_stdout(&generator.generate(command_registry()))
}

fn install(shell: &str, verbose: bool, json: bool) -> anyhow::Result<()> {
    let generator = CompletionFactory::create_generator(shell)?;
    let env = InstallEnv::from_env().context("failed to resolve install environment")?;
    let installer = CompletionFactory::create_installer(shell, env)?;

    let script = generator.generate(command_registry());
    let result = installer.install(&script);

    if json {
        print_json(&result)?;
    }
    if !result.success {
        anyhow::bail!("{}", result.message);
    }
    if json {
        return Ok(());
    }

    println!("✓ {}", result.message);
    if verbose {
        if let Some(path) = &result.installed_path {
            println!("  Installed to: {}", path.display());
        }
        if let Some(backup) = &result.backup_path {
            println!("  Backup created: {}", backup.display());
        }
        if result.configured == Some(true) {
            println!("  Shell startup file configured automatically");
        }
    } else if let Some(backup) = &result.backup_path {
        println!("  Previous file saved to {}", backup.display());
    }

    if !result.instructions.is_empty() {
        println!();
        for line in &result.instructions {
            println!("{line}");
        }
    } else if result.configured == Some(true) {
        println!();
        println!("Restart your shell or run: exec {}", installer.shell());
    }
    Ok(())
}

fn uninstall(shell: &str, yes: bool, json: bool) -> anyhow::Result<()> {
    let env = InstallEnv::from_env().context("failed to resolve install environment")?;
    let question = format!(
        "Remove spectest {shell} completion and its configuration from {}?",
        env.zshrc().display()
    );
    let installer = CompletionFactory::create_installer(shell, env)?;

    if !yes && !confirm(&question)? {
        println!("Uninstall cancelled.");
        return Ok(());
    }

    let result = installer.uninstall();
    if json {
        print_json(&result)?;
    }
    if !result.success {
        anyhow::bail!("{}", result.message);
    }
    if !json {
        println!("✓ {}", result.message);
    }
    Ok(())
}
