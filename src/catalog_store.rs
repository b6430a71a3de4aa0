//! CSV-backed catalog persistence.
//!
//! The catalog serializes as a flat table with the header
//! `artist,title,proficiency,link,lyrics_link,chords_link`. Absent values
//! round-trip as blank cells; columns are mapped by header name on read so
//! externally reordered files still load.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use log::info;

use crate::protocol::SongRow;

/// Durable snapshot store for one song catalog file.
pub struct CatalogStore {
    songs_path: PathBuf,
}

impl CatalogStore {
    pub fn new(songs_path: PathBuf) -> Self {
        Self { songs_path }
    }

    pub fn songs_path(&self) -> &PathBuf {
        &self.songs_path
    }

    /// Loads the persisted row-set. A missing file is a fresh install and
    /// loads as an empty catalog.
    pub fn load(&self) -> Result<Vec<SongRow>, String> {
        if !self.songs_path.exists() {
            info!(
                "Catalog file not found, starting empty. path={}",
                self.songs_path.display()
            );
            return Ok(Vec::new());
        }
        let file = File::open(&self.songs_path).map_err(|err| {
            format!(
                "Failed to open catalog {}: {err}",
                self.songs_path.display()
            )
        })?;
        read_rows(file)
    }

    /// Overwrites the persisted snapshot with `rows`. Failures here are hard
    /// save failures; callers keep their in-memory row-set either way. Rows
    /// are staged in a sibling file and renamed over the target only after a
    /// successful flush, so a failed save leaves the previous snapshot intact.
    pub fn save(&self, rows: &[SongRow]) -> Result<(), String> {
        let staging_path = self.songs_path.with_extension("csv.tmp");
        let file = File::create(&staging_path).map_err(|err| {
            format!(
                "Failed to create catalog staging file {}: {err}",
                staging_path.display()
            )
        })?;
        if let Err(err) = write_rows(file, rows) {
            let _ = std::fs::remove_file(&staging_path);
            return Err(err);
        }
        std::fs::rename(&staging_path, &self.songs_path).map_err(|err| {
            let _ = std::fs::remove_file(&staging_path);
            format!(
                "Failed to replace catalog {}: {err}",
                self.songs_path.display()
            )
        })?;
        info!(
            "Saved {} rows to {}",
            rows.len(),
            self.songs_path.display()
        );
        Ok(())
    }
}

/// Reads catalog rows from any CSV source, mapping columns by header name.
pub fn read_rows<R: io::Read>(reader: R) -> Result<Vec<SongRow>, String> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (index, record) in csv_reader.deserialize::<SongRow>().enumerate() {
        let row =
            record.map_err(|err| format!("Failed to parse catalog row {}: {err}", index + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Writes catalog rows as a headed CSV table; absent values become blank cells.
pub fn write_rows<W: io::Write>(writer: W, rows: &[SongRow]) -> Result<(), String> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);
    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|err| format!("Failed to serialize catalog row: {err}"))?;
    }
    csv_writer
        .flush()
        .map_err(|err| format!("Failed to flush catalog: {err}"))
}
