use std::io;
use std::process;

use rowfn_cli::cli::{parse_args, Cli, Commands, ConfigCommands};
use rowfn_cli::commands::{self, ResolveRequest};
use rowfn_cli::config::{validate_config, Config};
use rowfn_cli::BUILD_INFO;
use rowfn_shared::Result;

fn main() {
    // Build details go with --version only; clap handles `rowfn <cmd> --version`
    if std::env::args().nth(1).is_some_and(|arg| arg == "--version" || arg == "-V") {
        print!("{BUILD_INFO}");
        return;
    }

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = parse_args();

    let mut config = Config::load()?;
    if let Some(config_path) = &args.config {
        config.merge_file(config_path)?;
    }
    apply_cli(&mut config, &args);
    validate_config(&config)?;

    setup_logging(&config);
    log::debug!("effective config: {:?}", config);

    let mut out = io::stdout().lock();
    match args.command {
        Commands::Resolve {
            function,
            arg_index,
            plan,
            arity,
            candidates,
        } => {
            if plan.is_some() {
                config.plan.path = plan;
            }
            let request = ResolveRequest {
                function,
                arg_index,
                arity,
                candidates,
            };
            commands::resolve(&config, &request, &mut out)?;
        }
        Commands::Decode { dict_id, ids } => {
            commands::decode(&config, dict_id, &ids, &mut out)?;
        }
        Commands::Intern { dict_id, values } => {
            commands::intern(&config, dict_id, &values, &mut out)?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::show_config(&config, &mut out)?,
            ConfigCommands::Init { path, force } => commands::init_config(&path, force, &mut out)?,
        },
    }

    Ok(())
}

/// Command-line flags override file and environment settings
fn apply_cli(config: &mut Config, args: &Cli) {
    if let Some(path) = &args.dictionaries {
        config.dictionaries.path = Some(path.clone());
    }
    if args.verbose > 0 {
        config.debug.verbosity = args.verbose.min(3);
    }
}

fn setup_logging(config: &Config) {
    let log_level = match config.debug.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new().filter_level(log_level).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowfn_cli::cli::parse_args_from;
    use std::path::PathBuf;

    #[test]
    fn test_apply_cli_overrides() {
        let mut config = Config::default();
        config.debug.verbosity = 1;
        let args = parse_args_from(["rowfn", "-vvvv", "-d", "d.json", "config", "show"]).unwrap();
        apply_cli(&mut config, &args);
        assert_eq!(config.debug.verbosity, 3);
        assert_eq!(config.dictionaries.path, Some(PathBuf::from("d.json")));

        let mut config = Config::default();
        config.debug.verbosity = 2;
        let args = parse_args_from(["rowfn", "config", "show"]).unwrap();
        apply_cli(&mut config, &args);
        assert_eq!(config.debug.verbosity, 2);
    }

    #[test]
    fn test_build_info_display() {
        assert!(BUILD_INFO.to_string().starts_with("rowfn "));
    }
}
