//! Reading and writing the slide document container.
//!
//! The container is a JSON rendering of the in-memory slide tree. Loading
//! gives the engine a tree to mutate; saving writes the whole tree back in
//! one step.

use songpro_core::{Result, SlideDocument};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Load a slide document from `path`.
pub fn load_document(path: &Path) -> Result<SlideDocument> {
    let file = File::open(path)?;
    let document = serde_json::from_reader(BufReader::new(file))?;
    log::debug!("loaded document: {}", path.display());
    Ok(document)
}

/// Write `document` to `path`, replacing any existing file.
pub fn save_document(document: &SlideDocument, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    log::debug!("saved document: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use songpro_core::{FontAttrs, Slide, SlideGroup};

    fn sample_document() -> SlideDocument {
        let font = FontAttrs::new("Arial", 90);
        SlideDocument::new(
            "DDS 042 - Den signede dag",
            vec![SlideGroup::new(vec![
                Slide::from_lines(&["Den signede dag med fryd vi ser"], &font),
                Slide::from_lines(&["af havet til os opkomme"], &font),
            ])],
        )
    }

    #[test]
    fn test_round_trip_preserves_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.slides.json");

        let document = sample_document();
        save_document(&document, &path).unwrap();
        let loaded = load_document(&path).unwrap();

        assert_eq!(loaded, document);
    }

    #[test]
    fn test_save_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.slides.json");
        let b = dir.path().join("b.slides.json");

        let document = sample_document();
        save_document(&document, &a).unwrap();
        save_document(&document, &b).unwrap();

        assert_eq!(
            std::fs::read(&a).unwrap(),
            std::fs::read(&b).unwrap()
        );
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("absent.slides.json")).unwrap_err();
        assert!(matches!(err, songpro_core::Error::Io(_)));
    }

    #[test]
    fn test_load_malformed_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.slides.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, songpro_core::Error::Json(_)));
    }
}
