use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(name = "emuroot", version, about = "Emulator user directory setup")]
pub struct Cli {
    /// User directory root (defaults to the platform data dir)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Directory holding the bundled assets (defaults to `assets` next to the executable)
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Asset bundle version; a change forces assets to be copied again
    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    pub version_tag: String,

    /// Directory the GPU driver hooks are loaded from
    #[arg(long)]
    pub hook_lib_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Initialize the user directory and copy bundled assets
    Init(FolderArgs),
    /// Copy asset folders into an initialized user directory
    CopyAssets(CopyArgs),
    /// Show the resolved user directory and its state
    Status,
    /// Delete the user directory and everything in it
    Purge {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args, Clone)]
pub struct FolderArgs {
    /// Asset folder to copy (repeatable)
    #[arg(long = "folder", default_values = ["shaders", "config"])]
    pub folders: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct CopyArgs {
    #[command(flatten)]
    pub folders: FolderArgs,
    /// Replace files that already exist
    #[arg(long)]
    pub overwrite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_defaults_to_shaders_and_config() {
        let cli = Cli::try_parse_from(["emuroot", "--root", "/tmp/emu", "init"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/emu")));
        let Command::Init(f) = cli.cmd else { panic!("expected init") };
        assert_eq!(f.folders, vec!["shaders", "config"]);
    }

    #[test]
    fn copy_assets_takes_folders_and_overwrite() {
        let cli = Cli::try_parse_from([
            "emuroot", "copy-assets", "--folder", "sysdata", "--overwrite",
        ])
        .unwrap();
        let Command::CopyAssets(c) = cli.cmd else { panic!("expected copy-assets") };
        assert!(c.overwrite);
        assert_eq!(c.folders.folders, vec!["sysdata"]);
    }
}
