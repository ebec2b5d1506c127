use anyhow::Context;
use clap::Parser;

use ioccc_db::cli::Cli;
use ioccc_db::config::Config;
use ioccc_db::import::run_import;
use ioccc_db::progress::ImportProgress;
use ioccc_db::report::{LogReporter, Reporter};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::try_from(cli)?;
    let reporter = LogReporter;
    config.prepare_output(&reporter)?;

    reporter.info(format!("building DB: {}", config.output_file.display()));
    let progress = ImportProgress::new(config.verbose == 0);
    let summary = run_import(&config, &reporter, &progress)
        .with_context(|| format!("importing {}", config.winners_dir.display()))?;
    reporter.info(format!(
        "done! {} rows written, {} candidates dropped",
        summary.write.rows_written,
        summary.resolve.dropped_no_hint + summary.resolve.skipped_unparseable
    ));

    if config.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
