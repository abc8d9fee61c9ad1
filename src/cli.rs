use camino::Utf8PathBuf;

use clap::{crate_version, value_parser, Arg, ArgAction, Command, ValueHint};

pub fn clap() -> clap::Command {
    Command::new("benchlog")
        .version(crate_version!())
        .author("Kaspar Schleiser <kaspar@schleiser.de>")
        .about("Extract benchmark metrics from a run log")
        .override_usage("benchlog [OPTIONS] <RUNLOG>")
        .arg(
            Arg::new("runlog")
                .help("run log file to parse")
                .value_name("RUNLOG")
                .required(false)
                .num_args(1)
                .value_parser(value_parser!(Utf8PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("format")
                .help("output format")
                .short('f')
                .long("format")
                .num_args(1)
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("metric")
                .help("only output these metrics")
                .short('m')
                .long("metric")
                .value_name("KEY")
                .action(ArgAction::Append)
                .value_delimiter(','),
        )
        .arg(
            Arg::new("verbose")
                .help("be verbose (repeat for more)")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count),
        )
}
