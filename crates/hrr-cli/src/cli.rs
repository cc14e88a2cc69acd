//! Argument definitions

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn symbol_arg() -> Arg {
    Arg::new("symbol")
        .required(true)
        .help("Symbol identifier, e.g. proj/script/scr_move")
}

fn new_name_arg() -> Arg {
    Arg::new("new-name")
        .required(true)
        .help("Replacement name")
}

fn dry_run_arg() -> Arg {
    Arg::new("dry-run")
        .long("dry-run")
        .action(ArgAction::SetTrue)
        .help("Compute the resulting file contents without writing")
}

/// Build the `hrr` command
#[must_use]
pub fn build_cli() -> Command {
    Command::new("hrr")
        .version(hrr_core::VERSION)
        .about("Semantic-safe symbol renames with hot reload planning")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("manifest")
                .long("manifest")
                .short('m')
                .global(true)
                .default_value("hrr-manifest.json")
                .value_parser(value_parser!(PathBuf))
                .help("JSON project manifest answering semantic queries"),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .short('r')
                .global(true)
                .default_value(".")
                .value_parser(value_parser!(PathBuf))
                .help("Project root; every file access stays inside it"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .default_value("hrr.toml")
                .value_parser(value_parser!(PathBuf))
                .help("Engine configuration (defaults apply when missing)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug events to stderr"),
        )
        .subcommand(
            Command::new("plan")
                .about("Plan a rename without touching files")
                .arg(symbol_arg())
                .arg(new_name_arg()),
        )
        .subcommand(
            Command::new("apply")
                .about("Plan, validate and apply a rename, then prepare hot reload updates")
                .arg(symbol_arg())
                .arg(new_name_arg())
                .arg(dry_run_arg()),
        )
        .subcommand(
            Command::new("batch")
                .about("Plan several renames as one edit")
                .arg(
                    Arg::new("rename")
                        .long("rename")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_name("SYMBOL=NAME")
                        .help("Rename to include; repeat for each symbol"),
                )
                .arg(
                    Arg::new("apply")
                        .long("apply")
                        .action(ArgAction::SetTrue)
                        .help("Apply the merged edit after planning"),
                )
                .arg(dry_run_arg()),
        )
        .subcommand(
            Command::new("cascade")
                .about("Compute the hot reload cascade of changed symbols")
                .arg(
                    Arg::new("symbols")
                        .required(true)
                        .num_args(1..)
                        .help("Changed symbol identifiers"),
                ),
        )
        .subcommand(
            Command::new("safety")
                .about("Classify whether a rename can be hot reloaded")
                .arg(symbol_arg())
                .arg(new_name_arg()),
        )
        .subcommand(
            Command::new("impact")
                .about("Preview the impact of a rename")
                .arg(symbol_arg())
                .arg(new_name_arg()),
        )
        .subcommand(
            Command::new("verify")
                .about("Check edited files after a rename")
                .arg(symbol_arg())
                .arg(new_name_arg())
                .arg(
                    Arg::new("files")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf))
                        .help("Files the rename edited"),
                ),
        )
        .subcommand(
            Command::new("locate")
                .about("Find the symbol under a byte offset")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("offset")
                        .required(true)
                        .value_parser(value_parser!(usize)),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn global_flags_reach_subcommands() {
        let matches = build_cli()
            .try_get_matches_from(["hrr", "plan", "--manifest", "m.json", "a/script/b", "c"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "plan");
        assert_eq!(
            sub.get_one::<PathBuf>("manifest").unwrap(),
            &PathBuf::from("m.json")
        );
        assert_eq!(sub.get_one::<PathBuf>("root").unwrap(), &PathBuf::from("."));
    }

    #[test]
    fn batch_requires_a_rename() {
        assert!(build_cli().try_get_matches_from(["hrr", "batch"]).is_err());
    }
}
