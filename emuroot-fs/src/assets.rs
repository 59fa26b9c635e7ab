use emuroot_core::AssetSource;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// Bundled assets laid out as a plain directory tree.
#[derive(Clone, Debug)]
pub struct DirAssets {
    base: PathBuf,
}

impl DirAssets {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        let mut path = self.base.clone();
        for part in name.split('/').filter(|s| !s.is_empty()) {
            if part == ".." || part == "." {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("asset name escapes the bundle: {name}"),
                ));
            }
            path.push(part);
        }
        Ok(path)
    }
}

impl AssetSource for DirAssets {
    fn list(&self, folder: &str) -> io::Result<Vec<String>> {
        let path = self.resolve(folder)?;
        if !path.is_dir() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = fs::read_dir(&path)?
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();
        Ok(names)
    }

    fn open(&self, asset: &str) -> io::Result<Box<dyn Read + '_>> {
        let path = self.resolve(asset)?;
        if path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("asset is a folder: {asset}"),
            ));
        }
        Ok(Box::new(fs::File::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_parent_components() {
        let a = DirAssets::new("/nonexistent");
        assert_eq!(a.list("../etc").unwrap_err().kind(), io::ErrorKind::InvalidInput);
        assert!(a.open("shaders/../../passwd").is_err());
    }

    #[test]
    fn missing_folder_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let a = DirAssets::new(dir.path());
        assert!(a.list("nothing").unwrap().is_empty());
    }
}
