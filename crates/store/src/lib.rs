//! Song metadata storage.
//!
//! A single JSON file maps "BOOK NNN" keys to metadata records. The file is
//! read once at open and rewritten on every save, so a manually entered
//! record survives even when a later song aborts the run.

use songpro_core::{Result, SongId, SongMetadata};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

/// Metadata store backed by one JSON file.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    songs: BTreeMap<String, SongMetadata>,
}

impl Store {
    /// Open the store at `path`. A missing file is an empty store; the file
    /// is created on the first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let songs = if path.exists() {
            let file = File::open(&path)?;
            serde_json::from_reader(BufReader::new(file))?
        } else {
            BTreeMap::new()
        };
        log::debug!("opened store with {} songs: {}", songs.len(), path.display());
        Ok(Self { path, songs })
    }

    /// Look up the metadata for one song.
    pub fn lookup(&self, song: &SongId) -> Option<&SongMetadata> {
        self.songs.get(&song.to_string())
    }

    /// Insert or replace the record for `metadata`'s song and persist
    /// immediately. Saving the same record twice is a no-op on disk.
    pub fn save(&mut self, metadata: SongMetadata) -> Result<()> {
        self.songs.insert(metadata.id().to_string(), metadata);
        self.persist()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.songs)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
