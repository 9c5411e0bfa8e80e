//! Atomic file replacement.
//!
//! A collection is written to a sibling temporary file with a fixed suffix,
//! flushed to disk, then renamed over the target. A crash before the rename
//! leaves the previously committed file intact.

use std::io::{self, Write};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::fs::{Dir, OpenOptions};

use crate::error::StoreError;

/// Suffix appended to a collection file name to form its staging file.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Returns the staging file name used while replacing `file_name`.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use record_store::temp_file_name;
///
/// assert_eq!(temp_file_name(Utf8Path::new("tickets.json")), "tickets.json.tmp");
/// ```
#[must_use]
pub fn temp_file_name(file_name: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{file_name}{TEMP_SUFFIX}"))
}

/// Writes `contents` to `path` inside `dir` atomically.
///
/// The staging file is truncated if a previous run left one behind.
///
/// # Errors
///
/// Returns [`StoreError::Write`] if `path` is not a plain file name, or if
/// the staging file cannot be written, synced or renamed.
pub(crate) fn write_atomic(dir: &Dir, path: &Utf8Path, contents: &str) -> Result<(), StoreError> {
    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(StoreError::Write {
            path: path.to_path_buf(),
            message: "collection path must be a file name".to_owned(),
        });
    };
    let tmp_name = temp_file_name(Utf8Path::new(file_name));

    write_to_temp_file(dir, &tmp_name, contents)?;
    rename_temp_to_target(dir, &tmp_name, file_name)?;
    sync_parent_directory(dir);

    Ok(())
}

fn write_to_temp_file(dir: &Dir, tmp_name: &Utf8Path, contents: &str) -> Result<(), StoreError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    let mut file = dir
        .open_with(tmp_name, &options)
        .map_err(|err| StoreError::Write {
            path: tmp_name.to_path_buf(),
            message: err.to_string(),
        })?;

    if let Err(err) = file.write_all(contents.as_bytes()).and_then(|()| file.sync_all()) {
        drop(file);
        drop(dir.remove_file(tmp_name));
        return Err(StoreError::Write {
            path: tmp_name.to_path_buf(),
            message: err.to_string(),
        });
    }

    Ok(())
}

fn rename_temp_to_target(dir: &Dir, tmp_name: &Utf8Path, target: &str) -> Result<(), StoreError> {
    if let Err(err) = rename_temp_to_target_impl(dir, tmp_name, target) {
        if dir.remove_file(tmp_name).is_err() {
            // Ignore cleanup failures.
        }
        return Err(StoreError::Write {
            path: Utf8PathBuf::from(target),
            message: err.to_string(),
        });
    }
    Ok(())
}

#[cfg(windows)]
fn rename_temp_to_target_impl(dir: &Dir, tmp_name: &Utf8Path, target: &str) -> io::Result<()> {
    // Windows rename fails if the target exists, so remove it first.
    match dir.remove_file(target) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target)
}

#[cfg(not(windows))]
fn rename_temp_to_target_impl(dir: &Dir, tmp_name: &Utf8Path, target: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target)
}

fn sync_parent_directory(parent: &Dir) {
    // Best-effort directory sync; ignore failures.
    if parent.open(".").and_then(|dir| dir.sync_all()).is_err() {
        // Ignore sync failures.
    }
}

#[cfg(test)]
mod tests {
    use cap_std::ambient_authority;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;

    struct Scratch {
        _guard: TempDir,
        dir: Dir,
    }

    #[fixture]
    fn scratch() -> Scratch {
        let guard = TempDir::new().expect("create temp dir");
        let dir = Dir::open_ambient_dir(guard.path(), ambient_authority()).expect("open temp dir");
        Scratch { _guard: guard, dir }
    }

    #[rstest]
    fn writes_target_and_removes_staging_file(scratch: Scratch) {
        write_atomic(&scratch.dir, Utf8Path::new("notes.json"), "[]").expect("write");

        assert_eq!(scratch.dir.read_to_string("notes.json").expect("read"), "[]");
        assert!(!scratch.dir.exists("notes.json.tmp"));
    }

    #[rstest]
    fn truncates_stale_staging_file(scratch: Scratch) {
        scratch
            .dir
            .write("notes.json.tmp", "a much longer leftover payload from a crash")
            .expect("seed stale temp file");

        write_atomic(&scratch.dir, Utf8Path::new("notes.json"), "[1]").expect("write");

        assert_eq!(scratch.dir.read_to_string("notes.json").expect("read"), "[1]");
    }

    #[rstest]
    #[case("nested/notes.json")]
    #[case("../notes.json")]
    #[case("")]
    fn rejects_paths_that_are_not_plain_file_names(scratch: Scratch, #[case] path: &str) {
        let err = write_atomic(&scratch.dir, Utf8Path::new(path), "[]").expect_err("must fail");

        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[rstest]
    fn failure_to_stage_leaves_target_untouched(scratch: Scratch) {
        scratch.dir.write("notes.json", "[\"kept\"]").expect("seed target");
        scratch
            .dir
            .create_dir("notes.json.tmp")
            .expect("block staging path");

        let err = write_atomic(&scratch.dir, Utf8Path::new("notes.json"), "[]").expect_err("fails");

        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(
            scratch.dir.read_to_string("notes.json").expect("read"),
            "[\"kept\"]"
        );
    }
}
