//! Settings resolution: command-line flags on top of an optional `csvlocale.toml`.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use csvlocale::{ModuleExtension, OutputMode, RunOptions};
use serde::Deserialize;

use crate::{args::Args, logging::Verbosity, validation::validate_language_filters};

pub const CONFIG_FILE_NAME: &str = "csvlocale.toml";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Contents of a `csvlocale.toml`. Every field is optional.
///
/// ```toml
/// input = "locales"
/// output = "src/i18n"
/// mode = "nested"
/// exclude-lang = ["xx"]
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub mode: Option<String>,
    pub extension: Option<String>,
    pub watch: Option<bool>,
    pub poll_interval_ms: Option<u64>,
    pub include_lang: Vec<String>,
    pub exclude_lang: Vec<String>,
}

impl FileConfig {
    /// Reads a config file. Relative paths inside it are resolved against
    /// the file's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let mut config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.input = config.input.map(|p| base.join(p));
        config.output = config.output.map(|p| base.join(p));
        Ok(config)
    }

    /// Finds the config file for this invocation.
    ///
    /// An explicit `--config` must exist; the implicit `csvlocale.toml` in
    /// `cwd` is used only when present.
    pub fn locate(args: &Args, cwd: &Path) -> Result<Option<Self>> {
        if args.no_config {
            return Ok(None);
        }
        if let Some(path) = &args.config {
            return Self::load(path).map(Some);
        }

        let implicit = cwd.join(CONFIG_FILE_NAME);
        if implicit.is_file() {
            tracing::debug!(path = %implicit.display(), "using config file");
            return Self::load(&implicit).map(Some);
        }
        Ok(None)
    }
}

/// Everything one invocation needs, after merging flags and config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub run: RunOptions,
    pub watch: bool,
    pub poll_interval: Duration,
    pub verbosity: Verbosity,
}

impl Settings {
    /// Arguments that make a child process perform exactly one run with
    /// these settings.
    pub fn child_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--no-config".into(),
            "--input".into(),
            self.run.input.clone().into(),
            "--output".into(),
            self.run.output.clone().into(),
            "--mode".into(),
            self.run.mode.to_string().into(),
            "--extension".into(),
            self.run.module_extension.to_string().into(),
        ];
        if !self.run.include_languages.is_empty() {
            args.push("--include-lang".into());
            args.push(self.run.include_languages.join(",").into());
        }
        if !self.run.exclude_languages.is_empty() {
            args.push("--exclude-lang".into());
            args.push(self.run.exclude_languages.join(",").into());
        }
        if let Some(flag) = self.verbosity.flag() {
            args.push(flag.into());
        }
        args
    }
}

/// Merges flags over the config file. Flags win field by field; language
/// lists from the command line replace the file's lists entirely.
pub fn resolve(args: &Args, file: FileConfig) -> Result<Settings> {
    let input = args
        .input
        .clone()
        .or(file.input)
        .context("no input directory given; pass --input or set `input` in csvlocale.toml")?;
    let output = args
        .output
        .clone()
        .or(file.output)
        .context("no output directory given; pass --output or set `output` in csvlocale.toml")?;

    let mode = match args.mode.as_deref().or(file.mode.as_deref()) {
        Some(mode) => mode.parse::<OutputMode>()?,
        None => OutputMode::default(),
    };
    let extension = match args.extension.as_deref().or(file.extension.as_deref()) {
        Some(ext) => ext.parse::<ModuleExtension>()?,
        None => ModuleExtension::default(),
    };

    let include = if args.include_lang.is_empty() {
        file.include_lang
    } else {
        args.include_lang.clone()
    };
    let exclude = if args.exclude_lang.is_empty() {
        file.exclude_lang
    } else {
        args.exclude_lang.clone()
    };
    validate_language_filters(&include, &exclude).map_err(anyhow::Error::msg)?;

    let poll_interval_ms = args
        .poll_interval_ms
        .or(file.poll_interval_ms)
        .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
    if poll_interval_ms == 0 {
        bail!("poll interval must be greater than zero");
    }

    Ok(Settings {
        run: RunOptions::new(input, output)
            .with_mode(mode)
            .with_module_extension(extension)
            .with_include_languages(include)
            .with_exclude_languages(exclude),
        watch: args.watch || file.watch.unwrap_or(false),
        poll_interval: Duration::from_millis(poll_interval_ms),
        verbosity: Verbosity::from_flags(args.verbose, args.quiet),
    })
}

/// Locates the config file relative to the working directory and resolves settings.
pub fn load_settings(args: &Args) -> Result<Settings> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let file = FileConfig::locate(args, &cwd)?.unwrap_or_default();
    resolve(args, file)
}
