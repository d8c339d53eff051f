use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use roadmap_canvas::PassMode;
use roadmap_cli::{check, load_config, run_pass, CheckSummary, Invocation};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("roadmap-canvas")
        .version(roadmap_cli::VERSION)
        .about("Keep a roadmap canvas in sync with its Markdown records")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("vault")
                .long("vault")
                .global(true)
                .default_value(".")
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding the Markdown records"),
        )
        .arg(
            Arg::new("canvas")
                .long("canvas")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Canvas file [default: <vault>/roadmap.canvas]"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML engine configuration"),
        )
        .arg(
            Arg::new("archive-folder")
                .long("archive-folder")
                .global(true)
                .help("Vault folder archived records are moved into"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print the summary and logs as JSON"),
        )
        .subcommand(
            Command::new("populate")
                .about("Add missing nodes, archive flagged records, prune stale nodes"),
        )
        .subcommand(
            Command::new("reposition")
                .about("Populate, then move every entity node to its computed position"),
        )
        .subcommand(
            Command::new("check")
                .about("Report problems in the records without touching anything"),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn invocation(args: &ArgMatches) -> Result<Invocation> {
    let vault = args
        .get_one::<PathBuf>("vault")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => load_config(path)?,
        None => roadmap_canvas::EngineConfig::default(),
    };
    if let Some(folder) = args.get_one::<String>("archive-folder") {
        config.archive_folder.clone_from(folder);
    }

    let mut invocation = Invocation::new(vault).with_config(config);
    if let Some(canvas) = args.get_one::<PathBuf>("canvas") {
        invocation = invocation.with_canvas(canvas);
    }
    Ok(invocation)
}

fn print_check(summary: &CheckSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }
    println!(
        "{} records, {} entities, {} orphans, {} cycles broken, {} pending archive",
        summary.records,
        summary.entities,
        summary.orphans,
        summary.cycles_broken,
        summary.pending_archive
    );
    for report in &summary.reports {
        println!("  {report}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    let Some((name, args)) = matches.subcommand() else {
        return ExitCode::from(2);
    };
    let json = args.get_flag("json");
    init_tracing(json);

    match dispatch(name, args, json) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// `args` are the subcommand's matches, which carry every global flag
fn dispatch(name: &str, args: &ArgMatches, json: bool) -> Result<ExitCode> {
    let invocation = invocation(args)?;

    let mode = match name {
        "populate" => PassMode::Populate,
        "reposition" => PassMode::Reposition,
        "check" => {
            let summary = check(&invocation)?;
            print_check(&summary, json)?;
            return Ok(if summary.has_warnings() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            });
        }
        _ => return Ok(ExitCode::from(2)),
    };

    let summary = run_pass(mode, &invocation)?;
    if json {
        let text = serde_json::to_string_pretty(&summary).context("failed to encode summary")?;
        println!("{text}");
    } else {
        println!("{mode}: {summary}");
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn global_flags_reach_the_subcommand() {
        let matches = cli()
            .try_get_matches_from(["roadmap-canvas", "populate", "--vault", "notes", "--archive-folder", "done"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "populate");

        let invocation = invocation(args).unwrap();
        assert_eq!(invocation.vault, PathBuf::from("notes"));
        assert_eq!(invocation.canvas, PathBuf::from("notes").join("roadmap.canvas"));
        assert_eq!(invocation.config.archive_folder, "done");
    }
}
