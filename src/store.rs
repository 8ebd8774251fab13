//! Snapshot file persistence.
//!
//! The snapshot lives in a single pretty-printed JSON file. Writes go through a
//! temporary file in the same directory and are renamed into place, so a failed
//! run never leaves a truncated snapshot behind.

use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::FetchError;
use crate::model::Snapshot;

/// Reads the snapshot at `path`, or `None` if there is no file yet.
pub fn read_snapshot(path: &Path) -> Result<Option<Snapshot>, FetchError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(FetchError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let snapshot = serde_json::from_reader(BufReader::new(file))?;
    Ok(Some(snapshot))
}

/// Replaces the file at `path` with `snapshot`, creating parent directories.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), FetchError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err = |source: io::Error| FetchError::Write {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(write_err)?;
    let mut tmp = temp_file_for(path, dir).map_err(write_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, snapshot)
            .map_err(|err| write_err(err.into()))?;
        writer.write_all(b"\n").map_err(write_err)?;
        writer.flush().map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|err| write_err(err.error))?;
    Ok(())
}

/// Temporary file that takes over the mode of the file it replaces.
fn temp_file_for(path: &Path, dir: &Path) -> io::Result<NamedTempFile> {
    match fs::metadata(path) {
        Ok(metadata) => {
            let tmp = NamedTempFile::new_in(dir)?;
            tmp.as_file().set_permissions(metadata.permissions())?;
            Ok(tmp)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => new_temp_file(dir),
        Err(err) => Err(err),
    }
}

// 0666 before umask, like `File::create`
#[cfg(unix)]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}
