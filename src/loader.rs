//! Gets a program image off disk and into memory at 0x200.
//!
//! The file is treated as raw bytes: no header, no validation. It either fits
//! and is copied in full, or the load fails and memory is left alone.
use crate::memory::MAX_PROGRAM_SIZE;
use crate::state::Chip8State;
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum LoadError {
    NotFound(PathBuf),
    PermissionDenied(PathBuf),
    /// `size` is how many bytes were offered (or at least how many were seen
    /// before giving up), `max` how many would have fitted
    ProgramTooLarge { size: usize, max: usize },
    IoFailure(io::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(p) => write!(f, "no program at {}", p.display()),
            LoadError::PermissionDenied(p) => {
                write!(f, "not allowed to read program {}", p.display())
            }
            LoadError::ProgramTooLarge { size, max } => write!(
                f,
                "program is {} bytes but only {} bytes are available",
                size, max
            ),
            LoadError::IoFailure(e) => write!(f, "failed reading program: {}", e),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::IoFailure(e) => Some(e),
            _ => None,
        }
    }
}

impl LoadError {
    // io::Error doesn't carry the path, so put it back
    fn at(e: io::Error, path: &Path) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => LoadError::PermissionDenied(path.to_path_buf()),
            _ => LoadError::IoFailure(e),
        }
    }
}

/// load the program at `path` into `state`'s memory at 0x200, returning how
/// many bytes went in. nothing else in `state` is touched
pub fn load_program(state: &mut Chip8State, path: impl AsRef<Path>) -> Result<usize, LoadError> {
    let path = path.as_ref();
    let mut f = File::open(path).map_err(|e| LoadError::at(e, path))?;

    // directories open fine on unix; only a regular file can be a program
    let meta = f.metadata().map_err(|e| LoadError::at(e, path))?;
    if !meta.is_file() {
        return Err(LoadError::IoFailure(io::Error::new(
            io::ErrorKind::Other,
            format!("{} is not a regular file", path.display()),
        )));
    }

    // turn away anything obviously too big before reading a byte of it
    let size = meta.len();
    if size > MAX_PROGRAM_SIZE as u64 {
        return Err(LoadError::ProgramTooLarge {
            size: usize::try_from(size).unwrap_or(usize::MAX),
            max: MAX_PROGRAM_SIZE,
        });
    }

    load_program_from(state, &mut f).map_err(|e| match e {
        LoadError::IoFailure(e) => LoadError::at(e, path),
        other => other,
    })
}

/// load a program from any reader. at most one byte more than will fit is
/// read, so an endless stream is rejected rather than slurped
pub fn load_program_from(
    state: &mut Chip8State,
    reader: &mut impl Read,
) -> Result<usize, LoadError> {
    let mut buf = Vec::with_capacity(MAX_PROGRAM_SIZE);
    reader
        .take(MAX_PROGRAM_SIZE as u64 + 1)
        .read_to_end(&mut buf)
        .map_err(LoadError::IoFailure)?;
    state.memory.load_program(&buf)?;
    Ok(buf.len())
}
