//! `guet`: pair and mob programming committers for git.
//!
//! Keeps a roster of committers, tracks who is working in each project, and
//! installs git hooks that credit co-authors on every commit.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;

use guet::context::Context;
use guet::core::committer::Committer;
use guet::exit_codes;
use guet::hook::{Hook, run_hook};
use guet::io::errors_log::record_error;
use guet::io::files::DiskFileSystem;
use guet::io::hooks::HookStrategy;
use guet::io::paths::{GuetPaths, configuration_directory};
use guet::io::settings::{Settings, load_config, load_settings, write_config};
use guet::logging;
use guet::set::set_by_initials;
use guet::start::start;

#[derive(Parser)]
#[command(name = "guet", version, about = "Pair and mob programming committers for git")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the configuration directory (`$GUET_HOME` or `~/.guet`).
    Init,
    /// Install the guet hooks into the current git repository.
    Start {
        /// Replace existing hooks.
        #[arg(long, conflicts_with = "append")]
        overwrite: bool,
        /// Append the guet call to existing hooks.
        #[arg(long)]
        append: bool,
    },
    /// Add a committer to the roster.
    Add {
        initials: String,
        name: String,
        email: String,
    },
    /// Remove a committer from the roster.
    Remove { initials: String },
    /// Set the committers for this project; the first is the author.
    Set {
        #[arg(required = true)]
        initials: Vec<String>,
    },
    /// List committers.
    Get {
        #[arg(value_enum)]
        which: Which,
    },
    /// Show settings, or update one with `key=value`.
    Config { assignment: Option<String> },
    /// Entry point for the installed git hooks.
    #[command(hide = true)]
    Hook {
        name: String,
        /// Commit message file (`commit-msg` only).
        file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Which {
    /// Committers set for this project.
    Current,
    /// Every committer in the roster.
    All,
}

fn main() {
    let cli = Cli::parse();
    let paths = match configuration_directory() {
        Ok(dir) => GuetPaths::new(dir),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FAILURE);
        }
    };
    let (settings, settings_err) = match load_settings(&paths.config) {
        Ok(settings) => (settings, None),
        Err(err) => (Settings::default(), Some(err)),
    };
    logging::init(settings.debug);
    if let Some(err) = settings_err {
        warn!(err = %format!("{err:#}"), "ignoring settings, using defaults");
    }

    if let Err(err) = run(cli.command, &paths, &settings) {
        eprintln!("{:#}", err);
        if paths.errors.exists()
            && let Err(log_err) = record_error(&paths.errors, &format!("{:#}", err))
        {
            warn!(err = %log_err, "could not record error");
        }
        std::process::exit(exit_codes::for_error(&err));
    }
}

fn run(command: Command, paths: &GuetPaths, settings: &Settings) -> Result<()> {
    let mut context = Context::new(None, Box::new(DiskFileSystem::new()), &paths.dir);
    match command {
        Command::Init => cmd_init(&mut context),
        Command::Start { overwrite, append } => {
            let strategy = match (overwrite, append) {
                (true, _) => HookStrategy::Overwrite,
                (_, true) => HookStrategy::Append,
                _ => HookStrategy::Create,
            };
            cmd_start(&mut context, strategy)
        }
        Command::Add {
            initials,
            name,
            email,
        } => {
            ensure_initialized(paths)?;
            let committer = Committer::new(initials, name, email)?;
            context.committers().add(committer.clone())?;
            println!("Added {} ({committer})", committer.initials());
            Ok(())
        }
        Command::Remove { initials } => {
            ensure_initialized(paths)?;
            let removed = context.committers().remove(&initials)?;
            println!("Removed {} ({removed})", removed.initials());
            Ok(())
        }
        Command::Set { initials } => {
            ensure_initialized(paths)?;
            let names = set_by_initials(&mut context, &initials)?;
            println!("Committers set to: {}", names.join(", "));
            Ok(())
        }
        Command::Get { which } => cmd_get(&mut context, which),
        Command::Config { assignment } => {
            ensure_initialized(paths)?;
            cmd_config(&paths.config, assignment.as_deref())
        }
        Command::Hook { name, file } => {
            let hook = Hook::parse(&name)?;
            run_hook(&mut context, settings, hook, file.as_deref())
        }
    }
}

fn cmd_init(context: &mut Context) -> Result<()> {
    let paths = context.initialize()?;
    println!("Initialized guet in {}", paths.dir.display());
    Ok(())
}

fn cmd_start(context: &mut Context, strategy: HookStrategy) -> Result<()> {
    let outcome = start(context, strategy)?;
    for (hook, install) in outcome.hooks {
        println!("{hook}: {}", format!("{install:?}").to_lowercase());
    }
    Ok(())
}

fn cmd_get(context: &mut Context, which: Which) -> Result<()> {
    let committers = match which {
        Which::Current => context.committers().current()?,
        Which::All => context.committers().all()?,
    };
    for committer in committers {
        println!("{} - {committer}", committer.initials());
    }
    Ok(())
}

fn cmd_config(config_path: &Path, assignment: Option<&str>) -> Result<()> {
    let mut config = load_config(config_path)?;
    match assignment {
        None => {
            let rendered = toml::to_string(&config.settings).context("serialize settings")?;
            print!("{rendered}");
        }
        Some(assignment) => {
            let Some((key, value)) = assignment.split_once('=') else {
                bail!("expected key=value, got '{assignment}'");
            };
            config.settings.set(key.trim(), value)?;
            write_config(config_path, &config)
                .with_context(|| format!("update {}", config_path.display()))?;
        }
    }
    Ok(())
}

fn ensure_initialized(paths: &GuetPaths) -> Result<()> {
    if !paths.dir.is_dir() {
        bail!(
            "guet is not initialized at {}; run `guet init` first",
            paths.dir.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_start_strategies() {
        let cli = Cli::parse_from(["guet", "start"]);
        assert!(matches!(
            cli.command,
            Command::Start {
                overwrite: false,
                append: false
            }
        ));
        let cli = Cli::parse_from(["guet", "start", "--append"]);
        assert!(matches!(cli.command, Command::Start { append: true, .. }));
        assert!(Cli::try_parse_from(["guet", "start", "--append", "--overwrite"]).is_err());
    }

    #[test]
    fn parse_set_requires_initials() {
        assert!(Cli::try_parse_from(["guet", "set"]).is_err());
        let cli = Cli::parse_from(["guet", "set", "aa", "bb"]);
        match cli.command {
            Command::Set { initials } => assert_eq!(initials, vec!["aa", "bb"]),
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn parse_get_and_hook() {
        let cli = Cli::parse_from(["guet", "get", "current"]);
        assert!(matches!(
            cli.command,
            Command::Get {
                which: Which::Current
            }
        ));
        let cli = Cli::parse_from(["guet", "hook", "commit-msg", ".git/COMMIT_EDITMSG"]);
        match cli.command {
            Command::Hook { name, file } => {
                assert_eq!(name, "commit-msg");
                assert_eq!(file, Some(PathBuf::from(".git/COMMIT_EDITMSG")));
            }
            _ => panic!("expected hook"),
        }
    }

    #[test]
    fn config_assignment_round_trips_through_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config");
        std::fs::write(&path, format!("{}\n\n", guet::VERSION)).expect("write");

        cmd_config(&path, Some("rotate=true")).expect("set rotate");

        let config = load_config(&path).expect("load");
        assert!(config.settings.rotate);
        assert!(!config.settings.debug);
        assert!(cmd_config(&path, Some("colour=true")).is_err());
        assert!(cmd_config(&path, Some("rotate")).is_err());
    }
}
