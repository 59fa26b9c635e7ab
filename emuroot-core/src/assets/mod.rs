use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

pub mod memory;

pub use memory::MemoryAssets;

const COPY_BUFFER_LEN: usize = 1024;

/// Read-only tree of bundled assets addressed by `/`-separated names.
pub trait AssetSource: Send + Sync {
    /// Entry names directly under `folder`. Empty for a file or a missing folder.
    fn list(&self, folder: &str) -> io::Result<Vec<String>>;

    fn open(&self, asset: &str) -> io::Result<Box<dyn Read + '_>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CopyStatus {
    Copied { bytes: u64 },
    Skipped,
    Failed { reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetOutcome {
    pub asset: String,
    pub output: PathBuf,
    pub status: CopyStatus,
}

/// Per-asset results of a best-effort copy.
#[derive(Clone, Debug, Default)]
pub struct CopyReport {
    pub outcomes: Vec<AssetOutcome>,
}

impl CopyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, asset: &str, output: &Path, status: CopyStatus) {
        self.outcomes.push(AssetOutcome {
            asset: asset.to_string(),
            output: output.to_path_buf(),
            status,
        });
    }

    pub fn copied(&self) -> impl Iterator<Item = &AssetOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, CopyStatus::Copied { .. }))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &AssetOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == CopyStatus::Skipped)
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssetOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, CopyStatus::Failed { .. }))
    }

    pub fn bytes_copied(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                CopyStatus::Copied { bytes } => bytes,
                _ => 0,
            })
            .sum()
    }
}

pub fn join_asset(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder.trim_end_matches('/'), name)
    }
}

/// Copies `folder` and everything below it into `output`.
///
/// The output folder is only created once the listing yields an entry. The
/// listing does not say which entries are folders, so each one is tried both
/// as a folder and as a file.
pub fn copy_asset_folder<S: AssetSource + ?Sized>(
    source: &S,
    folder: &str,
    output: &Path,
    overwrite: bool,
    report: &mut CopyReport,
) {
    tracing::debug!(folder, output = %output.display(), "copying asset folder");
    let entries = match source.list(folder) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(folder, error = %e, "failed to copy asset folder");
            report.record(folder, output, CopyStatus::Failed { reason: e.to_string() });
            return;
        }
    };

    let mut created = false;
    for name in entries {
        if !created {
            if let Err(e) = fs::create_dir(output) {
                if e.kind() != io::ErrorKind::AlreadyExists {
                    tracing::error!(folder, error = %e, "failed to copy asset folder");
                    report.record(folder, output, CopyStatus::Failed { reason: e.to_string() });
                    return;
                }
            }
            created = true;
        }
        let asset = join_asset(folder, &name);
        let target = output.join(&name);
        copy_asset_folder(source, &asset, &target, overwrite, report);
        copy_asset(source, &asset, &target, overwrite, report);
    }
}

/// Copies a single asset unless `output` exists and `overwrite` is off.
/// An existing directory at `output` is never replaced.
pub fn copy_asset<S: AssetSource + ?Sized>(
    source: &S,
    asset: &str,
    output: &Path,
    overwrite: bool,
    report: &mut CopyReport,
) {
    tracing::debug!(asset, output = %output.display(), "copying asset file");
    // A folder entry was already handled by the folder pass.
    if output.is_dir() || (output.exists() && !overwrite) {
        report.record(asset, output, CopyStatus::Skipped);
        return;
    }
    let status = match stream_asset(source, asset, output) {
        Ok(bytes) => CopyStatus::Copied { bytes },
        Err(e) => {
            tracing::error!(asset, error = %e, "failed to copy asset file");
            CopyStatus::Failed { reason: e.to_string() }
        }
    };
    report.record(asset, output, status);
}

fn stream_asset<S: AssetSource + ?Sized>(
    source: &S,
    asset: &str,
    output: &Path,
) -> io::Result<u64> {
    let mut input = source.open(asset)?;
    let mut out = fs::File::create(output)?;
    let mut buf = [0u8; COPY_BUFFER_LEN];
    let mut total = 0u64;
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        out.write_all(&buf[..n])?;
        total += n as u64;
    }
    out.flush()?;
    Ok(total)
}
