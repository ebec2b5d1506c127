use std::fs;
use std::path::PathBuf;

use crate::{
    cli::{Cli, DEFAULT_OUTPUT_FILE, DEFAULT_WINNERS_DIRECTORY},
    error::{ImportError, Result},
    report::Reporter,
    types::{HintEncoding, ParseErrorPolicy, ResolveMode},
};

#[derive(Debug, Clone, serde::Serialize)]
pub struct Config {
    pub winners_dir: PathBuf,
    pub output_file: PathBuf,
    pub force: bool,
    pub spoilers: Option<PathBuf>,
    pub mode: ResolveMode,
    pub on_parse_error: ParseErrorPolicy,
    pub hint_encoding: HintEncoding,
    pub json: bool,
    pub verbose: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            winners_dir: PathBuf::from(DEFAULT_WINNERS_DIRECTORY),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            force: false,
            spoilers: None,
            mode: ResolveMode::default(),
            on_parse_error: ParseErrorPolicy::default(),
            hint_encoding: HintEncoding::default(),
            json: false,
            verbose: 0,
        }
    }
}

impl Config {
    fn validate_winners_dir(&self) -> Result<()> {
        if !self.winners_dir.exists() {
            return Err(ImportError::MissingSourceDir(self.winners_dir.clone()));
        }
        Ok(())
    }

    fn validate_output(&self) -> Result<()> {
        if self.output_file.exists() && !self.force {
            return Err(ImportError::OutputExists(self.output_file.clone()));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_winners_dir()?;
        self.validate_output()?;
        Ok(())
    }

    pub fn spoilers_path(&self) -> PathBuf {
        self.spoilers
            .clone()
            .unwrap_or_else(|| self.winners_dir.join("all").join("summary.txt"))
    }

    /// Removes an existing output file when `force` is set, so the rebuild
    /// starts from an empty database instead of appending.
    pub fn prepare_output(&self, reporter: &dyn Reporter) -> Result<()> {
        if !self.output_file.exists() {
            return Ok(());
        }
        if !self.force {
            return Err(ImportError::OutputExists(self.output_file.clone()));
        }

        reporter.debug(format!(
            "file {} already exists! removing it...",
            self.output_file.display()
        ));
        fs::remove_file(&self.output_file).map_err(|e| ImportError::io(&self.output_file, e))
    }
}

impl TryFrom<Cli> for Config {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> std::result::Result<Self, Self::Error> {
        let config = Self {
            winners_dir: cli.ioccc_winners_directory,
            output_file: cli.output_file,
            force: cli.force,
            spoilers: cli.spoilers,
            mode: cli.mode,
            on_parse_error: cli.on_parse_error,
            hint_encoding: cli.hint_encoding,
            json: cli.json,
            verbose: cli.verbose,
        };

        config.validate()?;

        Ok(config)
    }
}
