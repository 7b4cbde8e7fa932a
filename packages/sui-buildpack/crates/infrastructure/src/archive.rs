use anyhow::{Context, Result};
use domain::error::BuildpackError;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tar::Archive;

/// Expand a `.tar.gz`, `.tgz` or `.tar` archive into `destination`,
/// dropping the first `strip_components` leading path components of every
/// entry. Entries left with no path, and entries that would escape
/// `destination`, are skipped.
pub fn extract(archive: &Path, destination: &Path, strip_components: usize) -> Result<()> {
    let file =
        File::open(archive).with_context(|| format!("unable to open {}", archive.display()))?;

    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let unpacked = if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        unpack(GzDecoder::new(file), destination, strip_components)
    } else if name.ends_with(".tar") {
        unpack(file, destination, strip_components)
    } else {
        return Err(BuildpackError::parse(
            archive.display().to_string(),
            "unsupported archive format",
        )
        .into());
    };
    unpacked.with_context(|| format!("unable to expand {}", archive.display()))
}

fn unpack<R: Read>(reader: R, destination: &Path, strip_components: usize) -> Result<()> {
    std::fs::create_dir_all(destination)
        .with_context(|| format!("unable to create {}", destination.display()))?;

    let mut tar = Archive::new(reader);
    for entry in tar.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();

        let Some(relative) = stripped(&path, strip_components) else {
            continue;
        };

        let target = destination.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        entry
            .unpack(&target)
            .with_context(|| format!("unable to write {}", target.display()))?;
    }

    Ok(())
}

/// Drop leading components, rejecting anything that is not a plain
/// relative path
fn stripped(path: &Path, strip_components: usize) -> Option<PathBuf> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if parts.len() <= strip_components {
        return None;
    }
    Some(parts[strip_components..].iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::error::{ErrorKind, ErrorKindExt};
    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn build_archive(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for (name, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *content).unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_extract_strips_one_component() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("sui-mainnet-v1.22.0-ubuntu-x86_64.tgz");
        build_archive(
            &archive,
            &[
                ("release/target/release/sui-ubuntu-x86_64", b"#!/bin/sh\n"),
                ("release/README.md", b"readme"),
            ],
        );

        let out = dir.path().join("out");
        extract(&archive, &out, 1).unwrap();

        assert!(out.join("target/release/sui-ubuntu-x86_64").is_file());
        assert_eq!(std::fs::read(out.join("README.md")).unwrap(), b"readme");
        assert!(!out.join("release").exists());
    }

    #[test]
    fn test_stripped_paths() {
        assert_eq!(
            stripped(Path::new("./sui/bin/sui"), 1),
            Some(PathBuf::from("bin/sui"))
        );
        assert_eq!(stripped(Path::new("top"), 1), None);
        assert_eq!(stripped(Path::new("top/../../etc/passwd"), 1), None);
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("sui.zip");
        std::fs::write(&archive, b"PK").unwrap();

        let err = extract(&archive, dir.path(), 1).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Parse));
    }
}
