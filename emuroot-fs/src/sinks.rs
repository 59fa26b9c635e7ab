use crate::paths::{config_dir, log_dir};
use crate::util::write_atomic;
use chrono::Local;
use emuroot_core::BootstrapSink;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "emuroot_log.txt";
pub const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;

/// Holds the user directory as the document tree root.
#[derive(Default)]
pub struct DocumentTree {
    root: RwLock<Option<String>>,
}

impl DocumentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root as a `file://` URI, once resolved.
    pub fn root(&self) -> Option<String> {
        self.root.read().clone()
    }

    pub fn set_root(&self, uri: String) {
        *self.root.write() = Some(uri);
    }
}

pub fn file_uri(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    if s.starts_with('/') {
        format!("file://{s}")
    } else {
        format!("file:///{s}")
    }
}

impl BootstrapSink for DocumentTree {
    fn on_directory_resolved(&self, root: &Path) {
        self.set_root(file_uri(root));
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CoreSection {
    pub use_cpu_jit: bool,
    pub cpu_clock_percentage: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RendererSection {
    pub graphics_api: String,
    pub resolution_factor: u32,
    pub use_shader_jit: bool,
    pub async_shader_compilation: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DataSection {
    pub use_virtual_sd: bool,
}

/// Defaults written on first run; the emulator owns the file afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmulatorConfig {
    pub version: u32,
    pub core: CoreSection,
    pub renderer: RendererSection,
    pub data_storage: DataSection,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            core: CoreSection {
                use_cpu_jit: true,
                cpu_clock_percentage: 100,
            },
            renderer: RendererSection {
                graphics_api: "vulkan".to_string(),
                resolution_factor: 1,
                use_shader_jit: true,
                async_shader_compilation: false,
            },
            data_storage: DataSection { use_virtual_sd: true },
        }
    }
}

/// Logging and config bootstrap of the emulator core.
#[derive(Clone, Debug, Default)]
pub struct NativeBootstrap {
    defaults: EmulatorConfig,
}

impl NativeBootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh log file, replacing the previous session's.
    pub fn create_log_file(&self, root: &Path) -> Result<PathBuf, std::io::Error> {
        let dir = log_dir(root);
        fs::create_dir_all(&dir)?;
        let path = dir.join(LOG_FILE_NAME);
        let mut f = fs::File::create(&path)?;
        writeln!(f, "emuroot log started {}", Local::now().to_rfc3339())?;
        Ok(path)
    }

    pub fn log_user_directory(&self, root: &Path) -> Result<(), std::io::Error> {
        let path = log_dir(root).join(LOG_FILE_NAME);
        let mut f = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(f, "User Dir: {}", root.display())?;
        Ok(())
    }

    /// Writes the default config unless one already exists.
    pub fn create_config_file(&self, root: &Path) -> Result<PathBuf, std::io::Error> {
        let path = config_dir(root).join(CONFIG_FILE_NAME);
        if path.exists() {
            return Ok(path);
        }
        let json = serde_json::to_vec_pretty(&self.defaults)?;
        write_atomic(&path, &json)?;
        Ok(path)
    }
}

impl BootstrapSink for NativeBootstrap {
    fn on_directory_resolved(&self, root: &Path) {
        if let Err(e) = self.create_log_file(root) {
            tracing::error!(error = %e, "failed to create log file");
        }
        if let Err(e) = self.log_user_directory(root) {
            tracing::error!(error = %e, "failed to log user directory");
        }
        if let Err(e) = self.create_config_file(root) {
            tracing::error!(error = %e, "failed to create config file");
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriverParameters {
    pub hook_lib_dir: PathBuf,
    pub driver_install_dir: PathBuf,
    pub file_redirect_dir: PathBuf,
}

/// Prepares the GPU driver directories under the user root.
pub struct DriverParams {
    hook_lib_dir: PathBuf,
    params: RwLock<Option<DriverParameters>>,
}

impl DriverParams {
    pub fn new(hook_lib_dir: impl Into<PathBuf>) -> Self {
        Self {
            hook_lib_dir: hook_lib_dir.into(),
            params: RwLock::new(None),
        }
    }

    pub fn parameters(&self) -> Option<DriverParameters> {
        self.params.read().clone()
    }

    pub fn initialize(&self, root: &Path) -> Result<DriverParameters, std::io::Error> {
        let params = DriverParameters {
            hook_lib_dir: self.hook_lib_dir.clone(),
            driver_install_dir: root.join("gpu_drivers"),
            file_redirect_dir: root.join("gpu").join("vk_file_redirect"),
        };
        fs::create_dir_all(&params.driver_install_dir)?;
        fs::create_dir_all(&params.file_redirect_dir)?;
        *self.params.write() = Some(params.clone());
        Ok(params)
    }
}

impl BootstrapSink for DriverParams {
    fn on_directory_resolved(&self, root: &Path) {
        if let Err(e) = self.initialize(root) {
            tracing::error!(error = %e, "failed to initialize driver parameters");
        }
    }
}
