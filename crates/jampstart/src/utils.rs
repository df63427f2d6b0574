//! Utilities for hashing function assets.
use std::path::{Path, PathBuf};

use anyhow::Context;

fn sha256<R: std::io::Read>(
    context: &mut ring::digest::Context,
    mut reader: R,
) -> anyhow::Result<()> {
    let mut buffer = [0; 1024];
    loop {
        let count = reader.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        context.update(&buffer[..count]);
    }
    Ok(())
}

/// Returns the sha256 digest of the file at the given path *if it exists*.
/// If the file does _not_ exist it returns `Ok(None)`.
pub fn sha256_digest(path: impl AsRef<Path>) -> anyhow::Result<Option<String>> {
    let path = path.as_ref();
    log::trace!("determining sha256 of {}", path.display());
    if !path.exists() {
        return Ok(None);
    }

    let mut context = ring::digest::Context::new(&ring::digest::SHA256);
    let input = std::fs::File::open(path).with_context(|| format!("opening {path:?}"))?;
    sha256(&mut context, std::io::BufReader::new(input))?;
    Ok(Some(data_encoding::HEXLOWER.encode(context.finish().as_ref())))
}

fn collect_files(root: &Path, dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {dir:?}"))? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(root, &path, files)?;
        } else {
            files.push(path.strip_prefix(root)?.to_path_buf());
        }
    }
    Ok(())
}

/// Returns the sha256 digest of an asset *if it exists*.
///
/// A directory is hashed over its files' relative paths and contents, in
/// sorted order, so the digest only changes when the asset does.
pub fn asset_digest(path: impl AsRef<Path>) -> anyhow::Result<Option<String>> {
    let root = path.as_ref();
    if !root.is_dir() {
        return sha256_digest(root);
    }
    log::trace!("determining sha256 of directory {}", root.display());

    let mut files = vec![];
    collect_files(root, root, &mut files)?;
    files.sort();

    let mut context = ring::digest::Context::new(&ring::digest::SHA256);
    for relative in files.iter() {
        // '/' separators so the digest is the same on every platform
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        context.update(name.as_bytes());
        context.update(&[0]);
        let full = root.join(relative);
        let input = std::fs::File::open(&full).with_context(|| format!("opening {full:?}"))?;
        sha256(&mut context, std::io::BufReader::new(input))?;
        context.update(&[0]);
    }
    Ok(Some(data_encoding::HEXLOWER.encode(context.finish().as_ref())))
}

#[cfg(test)]
mod test {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("jampstart-test")
            .join(format!("{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_asset_is_none() {
        let dir = scratch("utils-missing");
        assert_eq!(None, asset_digest(dir.join("nope")).unwrap());
        assert_eq!(None, sha256_digest(dir.join("nope.zip")).unwrap());
    }

    #[test]
    fn directory_digest_tracks_contents_and_names() {
        let dir = scratch("utils-digest");
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("handler.py"), "def handler(event, context):\n    pass\n").unwrap();
        std::fs::write(dir.join("nested").join("util.py"), "X = 1\n").unwrap();

        let first = asset_digest(&dir).unwrap().unwrap();
        assert_eq!(64, first.len());
        assert_eq!(first, asset_digest(&dir).unwrap().unwrap());

        std::fs::write(dir.join("nested").join("util.py"), "X = 2\n").unwrap();
        let second = asset_digest(&dir).unwrap().unwrap();
        assert_ne!(first, second);

        std::fs::rename(dir.join("nested").join("util.py"), dir.join("nested").join("other.py"))
            .unwrap();
        let third = asset_digest(&dir).unwrap().unwrap();
        assert_ne!(second, third);
    }

    #[test]
    fn single_file_digest() {
        let dir = scratch("utils-file");
        let file = dir.join("empty");
        std::fs::write(&file, "").unwrap();
        assert_eq!(
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            sha256_digest(&file).unwrap().unwrap()
        );
    }
}
