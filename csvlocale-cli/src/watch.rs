//! Watch mode.
//!
//! The input tree is polled; every observed change starts a fresh child
//! process that performs one full run. While a run is still going, further
//! changes are dropped rather than queued.

use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
    process::{Child, Command},
    thread,
    time::SystemTime,
};

use anyhow::{Context, Result};
use csvlocale::discover;
use tracing::{debug, error, info, warn};

use crate::config::Settings;

/// Size and modification time of every CSV file under a root.
pub type Fingerprint = BTreeMap<PathBuf, (u64, Option<SystemTime>)>;

/// Takes a snapshot of the CSV files under `root`.
///
/// Entries that vanish or cannot be read between discovery and `stat` are
/// left out; they show up again on the next poll if they come back.
pub fn fingerprint(root: &Path) -> Result<Fingerprint, csvlocale::Error> {
    let mut snapshot = BTreeMap::new();
    for path in discover(root)?.flatten() {
        if let Ok(meta) = fs::metadata(&path) {
            snapshot.insert(path, (meta.len(), meta.modified().ok()));
        }
    }
    Ok(snapshot)
}

/// Runs at most one child process at a time.
#[derive(Debug)]
pub struct Supervisor {
    program: PathBuf,
    args: Vec<OsString>,
    child: Option<Child>,
}

impl Supervisor {
    pub fn new(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Supervisor {
            program: program.into(),
            args,
            child: None,
        }
    }

    /// Returns `true` while the last started run has not exited. Reaps it otherwise.
    pub fn is_busy(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                if status.success() {
                    debug!("run finished");
                } else {
                    warn!(%status, "run exited with a failure status");
                }
                self.child = None;
                false
            }
            Err(e) => {
                warn!(error = %e, "cannot query the running build");
                self.child = None;
                false
            }
        }
    }

    /// Starts a run unless one is in progress. Returns whether a run was started.
    pub fn trigger(&mut self) -> io::Result<bool> {
        if self.is_busy() {
            return Ok(false);
        }
        let child = Command::new(&self.program).args(&self.args).spawn()?;
        self.child = Some(child);
        Ok(true)
    }

    /// Blocks until the current run, if any, has exited.
    pub fn wait(&mut self) -> io::Result<()> {
        if let Some(mut child) = self.child.take() {
            child.wait()?;
        }
        Ok(())
    }
}

/// Watches `settings.run.input` forever, rebuilding on every change.
///
/// # Errors
///
/// Fails when the input directory is not accessible at startup or the
/// executable cannot be located or started for the first run.
pub fn watch(settings: &Settings) -> Result<()> {
    let program = std::env::current_exe().context("cannot locate the csvlocale executable")?;
    let mut supervisor = Supervisor::new(program, settings.child_args());
    let mut last = fingerprint(&settings.run.input)?;

    info!(
        input = %settings.run.input.display(),
        output = %settings.run.output.display(),
        "watching for CSV changes"
    );
    supervisor
        .trigger()
        .context("cannot start the initial run")?;

    loop {
        thread::sleep(settings.poll_interval);
        supervisor.is_busy();

        let current = match fingerprint(&settings.run.input) {
            Ok(current) => current,
            Err(e) => {
                warn!(error = %e, "cannot scan the input directory");
                continue;
            }
        };
        if current == last {
            continue;
        }
        last = current;

        match supervisor.trigger() {
            Ok(true) => info!("change detected, rebuilding"),
            Ok(false) => debug!("change detected while a run is in progress; ignored"),
            Err(e) => error!(error = %e, "cannot start a run"),
        }
    }
}
