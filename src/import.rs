use crate::config::Config;
use crate::db::build_db;
use crate::error::Result;
use crate::index::WinnerIndex;
use crate::progress::ImportProgress;
use crate::report::Reporter;
use crate::resolver::WinnerEntries;
use crate::spoilers::SpoilerTable;
use crate::types::{ImportSummary, ResolveMode};

/// Runs spoiler loading, resolution and the database build for `config`.
///
/// Assumes the output path was already prepared (see [`Config::prepare_output`]).
pub fn run_import(
    config: &Config,
    reporter: &dyn Reporter,
    progress: &ImportProgress,
) -> Result<ImportSummary> {
    let spoilers = SpoilerTable::load(&config.spoilers_path(), config.on_parse_error, reporter)?;
    let mut entries = WinnerEntries::new(
        &config.winners_dir,
        &spoilers,
        config.on_parse_error,
        reporter,
    );

    let (write, duplicates_replaced) = match config.mode {
        ResolveMode::Stream => {
            let write = build_db(
                &mut entries,
                &config.output_file,
                config.hint_encoding,
                reporter,
                progress,
            )?;
            (write, 0)
        }
        ResolveMode::Indexed => {
            let index = WinnerIndex::build(&mut entries)?;
            let replaced = index.duplicates_replaced();
            if replaced > 0 {
                reporter.debug(format!("{replaced} entries replaced by a later duplicate"));
            }
            let write = build_db(
                index.into_entries().into_iter().map(Ok),
                &config.output_file,
                config.hint_encoding,
                reporter,
                progress,
            )?;
            (write, replaced)
        }
    };

    Ok(ImportSummary {
        output: config.output_file.clone(),
        mode: config.mode,
        spoilers_loaded: spoilers.len(),
        resolve: entries.stats().clone(),
        duplicates_replaced,
        write,
    })
}
