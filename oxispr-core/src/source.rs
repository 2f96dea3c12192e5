//! Archive input provider.
//!
//! Loads a whole archive into an addressable byte buffer. With the `mmap`
//! feature the file is mapped read-only instead of copied.
//!
//! # Example
//!
//! ```no_run
//! use oxispr_core::source::ArchiveSource;
//!
//! let source = ArchiveSource::open("Tibia.spr")?;
//! println!("{} bytes", source.len());
//! # Ok::<(), oxispr_core::error::SprError>(())
//! ```

use crate::error::Result;
#[cfg(feature = "mmap")]
use memmap2::Mmap;
use std::fs::File;
use std::ops::Deref;
use std::path::Path;

/// Immutable archive bytes, owned or memory-mapped.
#[derive(Debug)]
pub enum ArchiveSource {
    /// Contents copied into memory.
    Owned(Vec<u8>),
    /// Read-only mapping of the file.
    #[cfg(feature = "mmap")]
    Mapped(Mmap),
}

impl ArchiveSource {
    /// Load the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SprError::Io`](crate::error::SprError::Io) if the file cannot
    /// be opened, read or mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_file(file)
    }

    #[cfg(feature = "mmap")]
    fn from_file(file: File) -> Result<Self> {
        if file.metadata()?.len() == 0 {
            return Ok(Self::Owned(Vec::new()));
        }
        // SAFETY: the mapping is read-only; the caller must not modify the
        // file while the source is alive.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self::Mapped(mmap))
    }

    #[cfg(not(feature = "mmap"))]
    fn from_file(mut file: File) -> Result<Self> {
        use std::io::Read;

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(Self::Owned(data))
    }

    /// Archive bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Owned(data) => data,
            #[cfg(feature = "mmap")]
            Self::Mapped(mmap) => mmap,
        }
    }
}

impl From<Vec<u8>> for ArchiveSource {
    fn from(data: Vec<u8>) -> Self {
        Self::Owned(data)
    }
}

impl Deref for ArchiveSource {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for ArchiveSource {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_reads_whole_file() {
        let path = std::env::temp_dir().join(format!("oxispr_source_{}.spr", std::process::id()));
        {
            let mut file = File::create(&path).unwrap();
            file.write_all(&[1, 2, 3, 4, 5, 6]).unwrap();
        }
        let source = ArchiveSource::open(&path).unwrap();
        assert_eq!(source.as_bytes(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(source.len(), 6);
        drop(source);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = ArchiveSource::open("/nonexistent/oxispr/archive.spr").unwrap_err();
        assert!(matches!(err, crate::error::SprError::Io(_)));
    }

    #[test]
    fn test_from_vec() {
        let source = ArchiveSource::from(vec![9u8; 3]);
        assert_eq!(&source[..], &[9, 9, 9]);
    }
}
