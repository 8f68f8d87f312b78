//! mipreset CLI - save, load, and migrate material instance presets
//!
//! Operates on a JSON material library and a project folder that holds the
//! preset files.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use mipreset_cli::commands;
use mipreset_cli::session::Session;

/// mipreset - Material Instance Presets
#[derive(Parser)]
#[command(name = "mipreset")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Material library file (JSON)
    #[arg(long, global = true)]
    library: Option<String>,

    /// Project directory that holds the saved presets
    #[arg(long, global = true)]
    project: Option<String>,

    /// Preset configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Output machine-readable JSON (no colored output)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parameters of a material instance
    Show {
        /// Material instance path
        #[arg(short, long)]
        instance: String,
    },

    /// Save an instance's parameters as a named preset
    Save {
        /// Material instance path
        #[arg(short, long)]
        instance: String,

        /// Preset name
        #[arg(short, long)]
        name: String,

        /// Share the preset across the root or the parent material
        #[arg(long, default_value = "root", value_parser = ["root", "parent"])]
        scope: String,
    },

    /// Apply a named preset to a material instance
    Load {
        /// Material instance path
        #[arg(short, long)]
        instance: String,

        /// Preset name
        #[arg(short, long)]
        name: String,

        /// Look the preset up under the root or the parent material
        #[arg(long, default_value = "root", value_parser = ["root", "parent"])]
        scope: String,
    },

    /// List the presets available to a material instance
    List {
        /// Material instance path
        #[arg(short, long)]
        instance: String,

        /// Look presets up under the root or the parent material
        #[arg(long, default_value = "root", value_parser = ["root", "parent"])]
        scope: String,
    },

    /// Delete a named preset
    Delete {
        /// Material instance path
        #[arg(short, long)]
        instance: String,

        /// Preset name
        #[arg(short, long)]
        name: String,

        /// Look the preset up under the root or the parent material
        #[arg(long, default_value = "root", value_parser = ["root", "parent"])]
        scope: String,
    },

    /// Recompute a target instance's parameters from a source instance
    Migrate {
        /// Source material instance
        #[arg(long)]
        from: String,

        /// Target material instance
        #[arg(long)]
        to: String,

        /// Migration table file (JSON)
        #[arg(short, long)]
        table: String,
    },

    /// Validate a preset file without applying it
    Validate {
        /// Path to the preset file
        #[arg(short, long)]
        preset: String,
    },

    /// Evaluate a migration expression
    Eval {
        /// Expression source
        #[arg(short, long)]
        expr: String,

        /// Bind a name for the expression (name=value, repeatable)
        #[arg(short, long)]
        bind: Vec<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "mipreset=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let result = Session::new(
        cli.library.as_deref(),
        cli.project.as_deref(),
        cli.config.as_deref(),
        cli.json,
    )
    .and_then(|session| match cli.command {
        Commands::Show { instance } => commands::show::run(&session, &instance),
        Commands::Save {
            instance,
            name,
            scope,
        } => commands::save::run(&session, &instance, &name, &scope),
        Commands::Load {
            instance,
            name,
            scope,
        } => commands::load::run(&session, &instance, &name, &scope),
        Commands::List { instance, scope } => commands::list::run(&session, &instance, &scope),
        Commands::Delete {
            instance,
            name,
            scope,
        } => commands::delete::run(&session, &instance, &name, &scope),
        Commands::Migrate { from, to, table } => {
            commands::migrate::run(&session, &from, &to, &table)
        }
        Commands::Validate { preset } => commands::validate::run(&session, &preset),
        Commands::Eval { expr, bind } => commands::eval::run(&session, &expr, &bind),
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_save_with_default_scope() {
        let cli = Cli::try_parse_from([
            "mipreset",
            "--library",
            "lib.json",
            "save",
            "--instance",
            "/Game/MI_Rock",
            "-n",
            "Wet",
        ])
        .unwrap();
        assert_eq!(cli.library.as_deref(), Some("lib.json"));
        match cli.command {
            Commands::Save {
                instance,
                name,
                scope,
            } => {
                assert_eq!(instance, "/Game/MI_Rock");
                assert_eq!(name, "Wet");
                assert_eq!(scope, "root");
            }
            _ => panic!("expected save command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mipreset",
            "load",
            "-i",
            "/Game/MI",
            "--name",
            "Dry",
            "--scope",
            "parent",
            "--json",
            "--project",
            "/proj",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.project.as_deref(), Some("/proj"));
        match cli.command {
            Commands::Load { scope, .. } => assert_eq!(scope, "parent"),
            _ => panic!("expected load command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_scope() {
        let err = Cli::try_parse_from(["mipreset", "list", "-i", "/Game/MI", "--scope", "sibling"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("sibling"));
    }

    #[test]
    fn test_cli_parses_migrate() {
        let cli = Cli::try_parse_from([
            "mipreset",
            "migrate",
            "--from",
            "/Game/A",
            "--to",
            "/Game/B",
            "-t",
            "map.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Migrate { from, to, table } => {
                assert_eq!(from, "/Game/A");
                assert_eq!(to, "/Game/B");
                assert_eq!(table, "map.json");
            }
            _ => panic!("expected migrate command"),
        }
    }

    #[test]
    fn test_cli_parses_eval_binds() {
        let cli = Cli::try_parse_from([
            "mipreset",
            "eval",
            "-e",
            "lerp(a, b, 0.5)",
            "--bind",
            "a=0",
            "-b",
            "b=2",
        ])
        .unwrap();
        match cli.command {
            Commands::Eval { expr, bind } => {
                assert_eq!(expr, "lerp(a, b, 0.5)");
                assert_eq!(bind, vec!["a=0".to_string(), "b=2".to_string()]);
            }
            _ => panic!("expected eval command"),
        }
    }

    #[test]
    fn test_cli_requires_instance() {
        let err = Cli::try_parse_from(["mipreset", "show"]).err().unwrap();
        assert!(err.to_string().contains("--instance"));
    }

    #[test]
    fn test_cli_requires_table_for_migrate() {
        let err = Cli::try_parse_from(["mipreset", "migrate", "--from", "/A", "--to", "/B"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("--table"));
    }
}
