use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use tempfile::NamedTempFile;

/// Data written and synced next to its destination, but not yet visible there
///
/// Dropping a staged file removes it. Staging every output of a build before committing
/// any of them means a failed write leaves all destinations untouched.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
    path: PathBuf,
    len: usize,
}

impl StagedFile {
    /// Writes `data` to a temporary file in the directory of `path`
    ///
    /// The temporary file gets the permissions of the file it will replace, or those of a
    /// newly created file if there is none.
    pub fn stage(path: &Path, data: &[u8]) -> io::Result<Self> {
        let existing = match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => {
                return Err(io::Error::new(
                    io::ErrorKind::IsADirectory,
                    format!("{} is a directory", path.display()),
                ));
            }
            Ok(meta) => Some(meta.permissions()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(err),
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut builder = tempfile::Builder::new();
        builder.prefix(".bootsmith-").suffix(".tmp");
        // Same mode as a plain create, the umask still applies
        #[cfg(unix)]
        builder.permissions(std::fs::Permissions::from_mode(0o666));
        let mut file = builder.tempfile_in(dir)?;
        log::trace!("Writing {}b to {}", data.len(), file.path().display());

        if let Some(permissions) = existing {
            file.as_file().set_permissions(permissions)?;
        }
        file.write_all(data)?;
        file.flush()?;
        file.as_file().sync_all()?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            len: data.len(),
        })
    }

    /// Where the data ends up once committed
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renames the temporary file over the destination
    pub fn commit(self) -> io::Result<()> {
        let Self { file, path, len } = self;
        file.persist(&path).map_err(|err| err.error)?;
        log::debug!("Written {len}b to {}", path.display());
        Ok(())
    }
}

/// Writes `data` to `path` through a temporary file in the same directory
///
/// The temporary file is flushed and synced before it is renamed over `path`, so readers
/// see either the old file or the complete new one. On error the temporary file is
/// removed and `path` is left untouched.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    StagedFile::stage(path, data)?.commit()
}
