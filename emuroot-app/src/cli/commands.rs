use crate::cli::opts::*;

use anyhow::{bail, Context, Result};
use emuroot_core::{CopyReport, DirectoryInitializer, DirectoryState, Permissions};
use emuroot_fs::paths::{data_root, internal_user_path};
use emuroot_fs::util::delete_dir_recursively;
use emuroot_fs::{sysdir, DirAssets, DocumentTree, DriverParams, FsPermissions, NativeBootstrap};
use std::path::PathBuf;
use std::sync::Arc;

pub fn run_cli(args: Cli) -> Result<()> {
    match args.cmd.clone() {
        Command::Init(f) => init_cmd(&args, f),
        Command::CopyAssets(c) => copy_cmd(&args, c),
        Command::Status => status_cmd(&args),
        Command::Purge { yes } => purge_cmd(&args, yes),
    }
}

fn root_of(args: &Cli) -> PathBuf {
    args.root.clone().unwrap_or_else(data_root)
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn assets_of(args: &Cli) -> DirAssets {
    DirAssets::new(args.assets.clone().unwrap_or_else(|| exe_dir().join("assets")))
}

/// Runs directory initialization with the filesystem sinks and returns the
/// resolved root, or fails with the state that blocked it.
fn initialize(args: &Cli) -> Result<PathBuf> {
    let hook_dir = args.hook_lib_dir.clone().unwrap_or_else(exe_dir);
    tracing::debug!(root = %root_of(args).display(), "starting directory initialization");
    let init = DirectoryInitializer::new(Arc::new(FsPermissions::new(Some(root_of(args)))))
        .with_sink(Arc::new(DocumentTree::new()))
        .with_sink(Arc::new(NativeBootstrap::new()))
        .with_sink(Arc::new(DriverParams::new(hook_dir)));

    match init.start() {
        Some(DirectoryState::Initialized) => {}
        Some(other) => bail!("user directory not ready: {other}"),
        None => bail!("directory initialization already running"),
    }
    init.user_directory()?
        .context("initialized without a user directory")
}

fn print_report(report: &CopyReport) {
    println!(
        "copied {} file(s), {} byte(s); skipped {}",
        report.copied().count(),
        report.bytes_copied(),
        report.skipped().count()
    );
    for f in report.failures() {
        println!("failed\t{}\t{:?}", f.asset, f.status);
    }
}

fn init_cmd(args: &Cli, f: FolderArgs) -> Result<()> {
    let root = initialize(args)?;
    println!("state\t{}", DirectoryState::Initialized);
    println!("user_dir\t{}", root.display());

    let report = sysdir::materialize(&assets_of(args), &root, &f.folders, &args.version_tag);
    print_report(&report);
    Ok(())
}

fn copy_cmd(args: &Cli, c: CopyArgs) -> Result<()> {
    let root = initialize(args)?;
    let report = sysdir::copy_folders(&assets_of(args), &root, &c.folders.folders, c.overwrite);
    print_report(&report);
    Ok(())
}

fn status_cmd(args: &Cli) -> Result<()> {
    let perms = FsPermissions::new(Some(root_of(args)));
    let Some(root) = perms.root() else {
        bail!("no user directory configured");
    };
    println!("user_dir\t{}", root.display());
    println!("exists\t{}", root.is_dir());
    // Probing creates the root, so only probe an existing directory.
    let writable = root.is_dir() && perms.has_write_access();
    println!("writable\t{}", writable);
    match internal_user_path() {
        Ok(p) => println!("internal\t{}", p.display()),
        Err(e) => println!("internal\t- ({e})"),
    }
    match sysdir::read_stamp(root) {
        Some(s) => println!("assets\t{} ({})", s.version, s.written_at.to_rfc3339()),
        None => println!("assets\t-"),
    }
    Ok(())
}

fn purge_cmd(args: &Cli, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to delete without --yes");
    }
    let root = root_of(args);
    if !root.exists() {
        println!("nothing to delete");
        return Ok(());
    }
    delete_dir_recursively(&root);
    if root.exists() {
        bail!("could not delete everything under {}", root.display());
    }
    println!("deleted {}", root.display());
    Ok(())
}
