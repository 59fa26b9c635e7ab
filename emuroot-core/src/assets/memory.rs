use crate::assets::AssetSource;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Cursor, Read};

/// Asset tree held in memory. Folders exist implicitly through file names.
#[derive(Default)]
pub struct MemoryAssets {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn insert(&self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.files
            .write()
            .insert(name.trim_matches('/').to_string(), bytes.into());
    }
}

impl AssetSource for MemoryAssets {
    fn list(&self, folder: &str) -> io::Result<Vec<String>> {
        let folder = folder.trim_matches('/');
        let prefix = if folder.is_empty() {
            String::new()
        } else {
            format!("{folder}/")
        };
        let names: BTreeSet<String> = self
            .files
            .read()
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('/').next())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        Ok(names.into_iter().collect())
    }

    fn open(&self, asset: &str) -> io::Result<Box<dyn Read + '_>> {
        let files = self.files.read();
        let Some(bytes) = files.get(asset.trim_matches('/')) else {
            return Err(io::Error::new(io::ErrorKind::NotFound, format!("no asset named {asset}")));
        };
        Ok(Box::new(Cursor::new(bytes.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_direct_children_only() {
        let a = MemoryAssets::new()
            .with_file("shaders/a.glsl", "a")
            .with_file("shaders/sub/b.glsl", "b")
            .with_file("readme.txt", "r");
        assert_eq!(a.list("").unwrap(), vec!["readme.txt", "shaders"]);
        assert_eq!(a.list("shaders").unwrap(), vec!["a.glsl", "sub"]);
        assert!(a.list("readme.txt").unwrap().is_empty());
        assert!(a.list("missing").unwrap().is_empty());
    }

    #[test]
    fn folders_cannot_be_opened() {
        let a = MemoryAssets::new().with_file("shaders/a.glsl", "a");
        assert!(a.open("shaders").is_err());
        let mut s = String::new();
        a.open("shaders/a.glsl").unwrap().read_to_string(&mut s).unwrap();
        assert_eq!(s, "a");
    }
}
