//! Navigation of a song document library on disk.
//!
//! Documents are named "BOOK NNN - Title" with the container extension.
//! Some older exports drop the space after the book code, so lookups try
//! both shapes.

use songpro_core::{Book, Result, SongId, SongMetadata};
use std::path::{Path, PathBuf};

/// Extension shared by all slide documents in a library.
pub const DOCUMENT_EXTENSION: &str = ".slides.json";

/// Find the documents matching one song, sorted by filename for stable
/// candidate ordering.
pub fn find_song_documents(dir: &Path, song: &SongId) -> Result<Vec<PathBuf>> {
    let padded = format!("{} ", song);
    let compact = format!("{}{:03} ", song.book, song.number);

    let mut matches = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.ends_with(DOCUMENT_EXTENSION) {
            continue;
        }
        if name.starts_with(&padded) || name.starts_with(&compact) {
            matches.push(entry.path());
        }
    }
    matches.sort();
    Ok(matches)
}

/// Highest song number present in `dir` for `book`, if any. Used as the
/// range end when the caller does not give one.
pub fn max_song_number(dir: &Path, book: Book) -> Result<Option<u32>> {
    let mut max = None;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.ends_with(DOCUMENT_EXTENSION) {
            continue;
        }
        let Some(rest) = name.strip_prefix(book.code()) else {
            continue;
        };
        let digits: String = rest
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if let Ok(number) = digits.parse::<u32>() {
            max = Some(max.map_or(number, |m: u32| m.max(number)));
        }
    }
    Ok(max)
}

/// Output filename for a processed song: "BOOK NNN - Title" with question
/// marks stripped (they are not filename-safe everywhere).
pub fn output_filename(song: &SongMetadata) -> String {
    format!(
        "{} - {}{}",
        song.id(),
        song.title.replace('?', ""),
        DOCUMENT_EXTENSION
    )
}

/// Best-effort title taken from a document filename, used as the default
/// during manual metadata entry.
pub fn title_from_filename(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(DOCUMENT_EXTENSION)?;
    let (_, title) = stem.split_once(" - ")?;
    Some(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "{}").unwrap();
    }

    #[test]
    fn test_find_song_documents_matches_both_name_shapes() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "DDS 042 - Den signede dag.slides.json");
        touch(dir.path(), "DDS042 - Den signede dag (gammel).slides.json");
        touch(dir.path(), "DDS 043 - En anden sang.slides.json");
        touch(dir.path(), "notes.txt");

        let song = SongId::new(Book::Dds, 42);
        let matches = find_song_documents(dir.path(), &song).unwrap();
        assert_eq!(matches.len(), 2);
        // Sorted for stable prompting.
        assert!(matches[0].file_name().unwrap().to_str().unwrap().starts_with("DDS 042"));
    }

    #[test]
    fn test_find_song_documents_does_not_match_prefix_numbers() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "DDS 042 - Den signede dag.slides.json");

        let song = SongId::new(Book::Dds, 4);
        assert!(find_song_documents(dir.path(), &song).unwrap().is_empty());
    }

    #[test]
    fn test_max_song_number() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "DDS 042 - A.slides.json");
        touch(dir.path(), "DDS 391 - B.slides.json");
        touch(dir.path(), "SOS 500 - C.slides.json");

        assert_eq!(max_song_number(dir.path(), Book::Dds).unwrap(), Some(391));
        assert_eq!(max_song_number(dir.path(), Book::Fs4).unwrap(), None);
    }

    #[test]
    fn test_output_filename_strips_question_marks() {
        let mut song = SongMetadata::new(Book::Sos, 7, "Hvem er han?");
        song.authors = vec!["A. Author".to_string()];
        assert_eq!(
            output_filename(&song),
            "SOS 007 - Hvem er han.slides.json"
        );
    }

    #[test]
    fn test_title_from_filename() {
        let path = Path::new("/lib/DDS 042 - Den signede dag.slides.json");
        assert_eq!(
            title_from_filename(path),
            Some("Den signede dag".to_string())
        );
        assert_eq!(title_from_filename(Path::new("/lib/other.txt")), None);
    }
}
