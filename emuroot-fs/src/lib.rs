pub mod assets;
pub mod paths;
pub mod permissions;
pub mod sinks;
pub mod sysdir;
pub mod util;

pub use assets::DirAssets;
pub use permissions::FsPermissions;
pub use sinks::{DocumentTree, DriverParameters, DriverParams, EmulatorConfig, NativeBootstrap};
