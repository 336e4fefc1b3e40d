//! JSON-file-backed quote store.
//!
//! The file holds a single JSON array of strings. It is read on every access
//! and rewritten whole on append, so edits made by hand between commands are
//! picked up.

#![allow(clippy::expect_used, reason = "Mutex poisoning is unrecoverable")]

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use serde::{Deserialize, Serialize};

use super::{QuoteStore, StorageError};

/// On-disk layout: a bare array.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct QuoteFile {
    quotes: Vec<String>,
}

/// Quote store persisted as a JSON array.
///
/// A missing file reads as an empty store and is created by the first
/// `append`. Writes go to a sibling temporary file that is then renamed over
/// the quote file, so a crash never leaves a half-written array. Appends
/// through clones of one store are serialized; separate processes writing the
/// same file are not coordinated.
#[derive(Clone, Debug)]
pub struct JsonQuoteStore {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl JsonQuoteStore {
    /// Store backed by the file at `path`. The file need not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self { path: Arc::new(path.as_ref().to_path_buf()), write_lock: Arc::new(Mutex::new(())) }
    }

    /// Location of the quote file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<QuoteFile, StorageError> {
        match fs::read_to_string(self.path.as_path()) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "quote file missing, using empty store");
                Ok(QuoteFile::default())
            },
            Err(err) => Err(err.into()),
        }
    }

    fn write_file(&self, file: &QuoteFile) -> Result<(), StorageError> {
        let mut temp = self.path.as_os_str().to_owned();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        let contents = serde_json::to_vec(file)?;
        let written =
            fs::write(&temp, contents).and_then(|()| fs::rename(&temp, self.path.as_path()));
        if let Err(err) = written {
            if let Err(cleanup) = fs::remove_file(&temp)
                && cleanup.kind() != ErrorKind::NotFound
            {
                tracing::warn!(
                    path = %temp.display(),
                    error = %cleanup,
                    "temporary quote file left behind"
                );
            }
            return Err(err.into());
        }
        Ok(())
    }
}

impl QuoteStore for JsonQuoteStore {
    fn load(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.read_file()?.quotes)
    }

    fn append(&self, quote: String) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().expect("Mutex poisoned");

        let mut file = self.read_file()?;
        file.quotes.push(quote);
        self.write_file(&file)?;

        tracing::debug!(count = file.quotes.len(), "quote appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file
        let path = dir.path().join("quotes.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();
        let store = JsonQuoteStore::open(&path);

        let result = store.write_file(&QuoteFile { quotes: vec!["lost quote".to_string()] });

        assert!(matches!(result, Err(StorageError::Io(_))));
        assert!(!dir.path().join("quotes.json.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn successful_write_leaves_only_quote_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.json");
        let store = JsonQuoteStore::open(&path);

        store.write_file(&QuoteFile { quotes: vec!["kept quote".to_string()] }).unwrap();

        assert!(!dir.path().join("quotes.json.tmp").exists());
        assert_eq!(store.load().unwrap(), vec!["kept quote".to_string()]);
    }
}
