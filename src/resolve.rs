//! Datasource resolution: a diag archive or an unpacked directory becomes a
//! single traversable root.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use log::debug;
use tar::Archive;

use crate::constants::EXTRACT_PATH;

/// Resolve the datasource target to an absolute directory root.
///
/// A regular file is treated as a packaged diag archive and unpacked under
/// the scratch root; a directory passes through unchanged. Anything else is
/// a fatal error, raised before any remote provisioning happens.
pub fn resolve_datasource(target: &Path) -> Result<PathBuf> {
    let root = if target.is_file() {
        extract_archive(target, Path::new(EXTRACT_PATH))?
    } else if target.is_dir() {
        target
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", target.display()))?
    } else {
        bail!(
            "invalid datasource: {} is neither a diag archive nor a directory",
            target.display()
        );
    };
    debug!("resolved datasource root: {}", root.display());
    Ok(root)
}

/// Unpack a diag archive under `scratch` and return scratch joined with the
/// common path prefix of the archive's entries (diag archives carry a
/// single `diag-<host>-<date>` root directory).
pub fn extract_archive(archive: &Path, scratch: &Path) -> Result<PathBuf> {
    let prefix = common_prefix(archive)?;
    open_archive(archive)?
        .unpack(scratch)
        .with_context(|| format!("failed to unpack {}", archive.display()))?;
    let root = scratch.join(prefix);
    root.canonicalize()
        .with_context(|| format!("extracted root missing under {}", scratch.display()))
}

/// Derive the host tag embedded in a diag file name
/// (`diag-<host>-<date>...`), falling back to the plain base name when the
/// pattern does not hold.
pub fn host_tag(target: &Path) -> String {
    let base = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match base.split('-').nth(1) {
        Some(host) if !host.is_empty() => host.to_string(),
        _ => base,
    }
}

/// Open a diag archive for reading, sniffing the gzip magic so both `.tar`
/// and `.tar.gz` diags work regardless of file extension.
fn open_archive(path: &Path) -> Result<Archive<Box<dyn Read>>> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut magic = [0u8; 2];
    let read = file
        .read(&mut magic)
        .with_context(|| format!("failed to read {}", path.display()))?;
    file.rewind()
        .with_context(|| format!("failed to rewind {}", path.display()))?;
    let reader: Box<dyn Read> = if read == 2 && magic == [0x1f, 0x8b] {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Archive::new(reader))
}

/// Compute the component-wise common path prefix of the archive's entries.
fn common_prefix(path: &Path) -> Result<PathBuf> {
    let mut archive = open_archive(path)?;
    let mut prefix: Option<PathBuf> = None;
    for entry in archive
        .entries()
        .with_context(|| format!("failed to list entries of {}", path.display()))?
    {
        let entry = entry.with_context(|| format!("bad entry in {}", path.display()))?;
        let entry_path = entry
            .path()
            .with_context(|| format!("bad entry path in {}", path.display()))?
            .into_owned();
        prefix = Some(match prefix {
            None => entry_path,
            Some(current) => shared_components(&current, &entry_path),
        });
    }
    Ok(prefix.unwrap_or_default())
}

fn shared_components(a: &Path, b: &Path) -> PathBuf {
    a.components()
        .zip(b.components())
        .take_while(|(left, right)| left == right)
        .map(|(left, _)| left.as_os_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    fn build_diag(dir: &Path) -> PathBuf {
        let archive_path = dir.join("diag-web01-2024-01-15.tar.gz");
        let file = File::create(&archive_path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for (entry, data) in [
            (
                "diag-web01-2024-01-15/etc/system/local/indexes.conf",
                &b"[main]\nhomePath = $SPLUNK_DB/main\n"[..],
            ),
            (
                "diag-web01-2024-01-15/users/bob/history/queries.csv",
                &b"time,search\n"[..],
            ),
        ] {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, entry, data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
        archive_path
    }

    #[test]
    fn archive_extracts_to_its_common_prefix() {
        let workdir = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let archive = build_diag(workdir.path());

        let root = extract_archive(&archive, scratch.path()).unwrap();
        assert!(root.ends_with("diag-web01-2024-01-15"));
        assert!(root.join("etc/system/local/indexes.conf").is_file());
        assert!(root.join("users/bob/history/queries.csv").is_file());
    }

    #[test]
    fn directory_targets_pass_through() {
        let dir = TempDir::new().unwrap();
        let root = resolve_datasource(dir.path()).unwrap();
        assert_eq!(root, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn missing_targets_are_fatal() {
        assert!(resolve_datasource(Path::new("/no/such/diag")).is_err());
    }

    #[test]
    fn host_tag_comes_from_the_diag_name() {
        assert_eq!(
            host_tag(Path::new("/tmp/diag-web01-2024-01-15.tar.gz")),
            "web01"
        );
        assert_eq!(host_tag(Path::new("/tmp/splunkhome")), "splunkhome");
    }
}
