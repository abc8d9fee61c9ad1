use std::io::Write;

use anyhow::{Context as _, Result};
use camino::Utf8PathBuf;
use clap::ArgMatches;
use tracing_subscriber::EnvFilter;

use benchlog::Benchmark;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod cli;

fn main() {
    let result = try_main();
    match result {
        Err(e) => {
            eprintln!("benchlog: error: {e:#}");
            std::process::exit(1);
        }
        Ok(code) => std::process::exit(code),
    };
}

fn try_main() -> Result<i32> {
    let matches = cli::clap().get_matches();

    init_tracing(matches.get_count("verbose"));

    let stdout = std::io::stdout();
    run(&matches, &mut stdout.lock())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(matches: &ArgMatches, out: &mut impl Write) -> Result<i32> {
    let Some(runlog) = matches.get_one::<Utf8PathBuf>("runlog") else {
        writeln!(out, "Usage: benchlog <run log>")?;
        return Ok(1);
    };

    let lines = benchlog::read_lines(runlog)?;
    tracing::info!(runlog = %runlog, lines = lines.len(), "read run log");

    let mut benchmark = benchlog::parse_benchmark(Some(&lines[..]), runlog.as_str());

    if let Some(keys) = matches.get_many::<String>("metric") {
        let keys = keys.cloned().collect::<Vec<_>>();
        benchmark = benchmark.select(&keys);
    }

    if benchmark.is_unknown() {
        tracing::warn!(runlog = %runlog, "no benchmark metrics found");
    }

    let format = matches.get_one::<String>("format").map(String::as_str);
    match format {
        Some("json") => write_json(&benchmark, out)?,
        _ => {
            writeln!(out, "Parsing benchmark from {runlog}")?;
            writeln!(out, "{benchmark}")?;
        }
    }

    Ok(0)
}

fn write_json(benchmark: &Benchmark, out: &mut impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(benchmark).context("serializing benchmark")?;
    writeln!(out, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(args: &[&str]) -> (Result<i32>, String) {
        let matches = cli::clap()
            .try_get_matches_from(std::iter::once("benchlog").chain(args.iter().copied()))
            .unwrap();
        let mut out = Vec::new();
        let result = run(&matches, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn runlog(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_no_argument_prints_usage() {
        let (result, out) = run_with(&[]);
        assert_eq!(result.unwrap(), 1);
        assert_eq!(out, "Usage: benchlog <run log>\n");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("run.log");
        let (result, out) = run_with(&[missing.to_str().unwrap()]);

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<benchlog::RunLogError>(),
            Some(benchlog::RunLogError::NotFound { .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_text_output() {
        let file = runlog(
            "Running tests\nCSV, Abs_cycles, 100\ncsv,Add_cycles,200\nAll tests passed!\n",
        );
        let path = file.path().to_str().unwrap();
        let (result, out) = run_with(&[path]);

        assert_eq!(result.unwrap(), 0);
        assert_eq!(
            out,
            format!(
                "Parsing benchmark from {path}\n\
                 program type: nuclei_ai\n\
                 subtype:      ai_ops\n\
                 metrics:\n  \
                 Abs_cycles: 100\n  \
                 Add_cycles: 200\n"
            )
        );
    }

    #[test]
    fn test_unknown_result_exits_zero() {
        let file = runlog("nothing to see here\n");
        let (result, out) = run_with(&[file.path().to_str().unwrap()]);

        assert_eq!(result.unwrap(), 0);
        assert!(out.ends_with("metrics:      none\n"));
    }

    #[test]
    fn test_json_output() {
        let file = runlog("csv,a,1\ncsv,b,2\n");
        let (result, out) = run_with(&["--format", "json", file.path().to_str().unwrap()]);

        assert_eq!(result.unwrap(), 0);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "program_type": "nuclei_ai",
                "subtype": "ai_ops",
                "metrics": {"a": "1", "b": "2"}
            })
        );
    }

    #[test]
    fn test_metric_selection() {
        let file = runlog("csv,a,1\ncsv,b,2\ncsv,c,3\n");
        let (result, out) = run_with(&["-f", "json", "-m", "c,a", file.path().to_str().unwrap()]);

        assert_eq!(result.unwrap(), 0);
        assert!(!out.contains("\"b\""));
        let c = out.find("\"c\"").unwrap();
        let a = out.find("\"a\"").unwrap();
        assert!(c < a);
    }
}
