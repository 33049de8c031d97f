//! Filesystem helpers for walkscore artefacts, built on `cap-std`, `camino`
//! and `tempfile`.
//!
//! Inputs are opened through capability-based handles; outputs are written
//! to a temporary sibling and renamed into place on commit, so readers never
//! observe a truncated artefact.
#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use tempfile::NamedTempFile;

const TEMP_PREFIX: &str = ".walkscore-";
const TEMP_SUFFIX: &str = ".partial";

/// Open a UTF-8 file path using ambient authority.
///
/// # Errors
/// Propagates the I/O error when the file cannot be opened.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Return whether a path exists and is a regular file.
///
/// # Errors
/// Propagates I/O errors, including `NotFound` for missing paths.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let parent = parent_or_current(path);
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(file_name).map(|meta| meta.is_file())
}

/// Ensure the parent directory for `path` exists, handling absolute paths
/// safely for cap-std.
///
/// # Errors
/// Propagates I/O errors raised while creating directories.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base_dir, relative) = base_dir_and_relative(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

fn parent_or_current(path: &Utf8Path) -> &Utf8Path {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    }
}

/// Split a parent path into an ambient base directory and a relative suffix.
fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();

    let (base, relative) = match std_parent.components().next() {
        // Windows absolute path with a drive or UNC prefix.
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;

            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_parent.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from parent path"))?
                .to_path_buf();
            (base, relative)
        }
        // Unix-style absolute path.
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), std_parent.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative = Utf8PathBuf::from_path_buf(relative)
        .map_err(|_| io::Error::other("non-UTF-8 parent path"))?;

    Ok((dir, relative))
}

/// Buffered writer that only replaces its target on [`AtomicFile::commit`].
///
/// Data goes to a hidden temporary file in the target's directory. Dropping
/// the writer without committing removes the temporary file and leaves any
/// existing target untouched.
///
/// # Examples
/// ```
/// use std::io::Write;
/// use camino::Utf8PathBuf;
/// use walkscore_fs::AtomicFile;
///
/// # fn main() -> std::io::Result<()> {
/// let dir = tempfile::tempdir()?;
/// let target = Utf8PathBuf::from_path_buf(dir.path().join("table.json"))
///     .map_err(|_| std::io::Error::other("non-UTF-8 temp dir"))?;
/// let mut file = AtomicFile::create(&target)?;
/// file.write_all(b"{}")?;
/// file.commit()?;
/// assert_eq!(std::fs::read_to_string(target.as_std_path())?, "{}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AtomicFile {
    target: Utf8PathBuf,
    writer: BufWriter<NamedTempFile>,
}

impl AtomicFile {
    /// Create the parent directory if needed and open a temporary sibling of
    /// `target`.
    ///
    /// # Errors
    /// Propagates I/O errors from directory or temporary file creation.
    pub fn create(target: &Utf8Path) -> io::Result<Self> {
        ensure_parent_dir(target)?;
        let temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(parent_or_current(target).as_std_path())?;
        Ok(Self {
            target: target.to_path_buf(),
            writer: BufWriter::new(temp),
        })
    }

    /// Flush, sync and rename the temporary file over the target.
    ///
    /// # Errors
    /// Propagates flush, sync and rename failures; the target is left
    /// untouched when any of them fails.
    pub fn commit(self) -> io::Result<()> {
        let temp = self.writer.into_inner().map_err(io::Error::from)?;
        temp.as_file().sync_all()?;
        let _persisted: File = temp
            .persist(self.target.as_std_path())
            .map_err(|err| err.error)?;
        Ok(())
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
