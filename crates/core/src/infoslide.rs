//! Infoslide construction.
//!
//! The infoslide precedes a song's lyrics and shows songbook + number,
//! title, and the author/melody info lines. Its layout comes from a
//! template describing one text-box slot per field.

use crate::error::{Error, Result};
use crate::types::{Book, FontAttrs, Slide, SongMetadata, TextBox, DEFAULT_FONT_FAMILY};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// First line of an infoslide: a book code followed by the song number.
static SIGNATURE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let codes: Vec<&str> = Book::all().iter().map(Book::code).collect();
    Regex::new(&format!(r"^(?:{})\s*\d{{1,3}}$", codes.join("|"))).unwrap()
});

/// The fields an infoslide template maps to text boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    /// "DDS 42" line.
    BookNumber,
    /// Song title line.
    Title,
    /// Author/melody/history info lines.
    Details,
}

impl SlotKind {
    fn name(&self) -> &'static str {
        match self {
            SlotKind::BookNumber => "book-number",
            SlotKind::Title => "title",
            SlotKind::Details => "details",
        }
    }
}

/// One text-box slot with its default formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSlot {
    pub kind: SlotKind,
    pub font: FontAttrs,
}

/// Expected text-box layout of an infoslide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideTemplate {
    pub slots: Vec<TemplateSlot>,
}

impl SlideTemplate {
    /// The standard template: book/number largest, title below it, info
    /// lines in italic underneath.
    pub fn standard() -> Self {
        Self {
            slots: vec![
                TemplateSlot {
                    kind: SlotKind::BookNumber,
                    font: FontAttrs::new(DEFAULT_FONT_FAMILY, 75),
                },
                TemplateSlot {
                    kind: SlotKind::Title,
                    font: FontAttrs::new(DEFAULT_FONT_FAMILY, 50),
                },
                TemplateSlot {
                    kind: SlotKind::Details,
                    font: FontAttrs::new(DEFAULT_FONT_FAMILY, 35).italic(),
                },
            ],
        }
    }

    fn slot(&self, kind: SlotKind) -> Result<&TemplateSlot> {
        self.slots
            .iter()
            .find(|s| s.kind == kind)
            .ok_or_else(|| Error::TemplateMismatch(format!("missing {} slot", kind.name())))
    }
}

/// Whether a slide matches the infoslide signature: a book/number line in
/// the leading position with a title line below it. Only meaningful for the
/// first slide of a group.
pub fn is_infoslide(slide: &Slide) -> bool {
    let lines: Vec<&str> = slide
        .boxes
        .iter()
        .flat_map(|b| b.runs.iter())
        .map(|r| r.text.trim())
        .filter(|t| !t.is_empty())
        .collect();

    match lines.first() {
        Some(first) => SIGNATURE_REGEX.is_match(first) && lines.len() >= 2,
        None => false,
    }
}

/// Build a fresh infoslide for `metadata` using `template`.
///
/// Deterministic. Absent optional metadata renders as an empty details
/// box, never as a placeholder string.
pub fn build(metadata: &SongMetadata, template: &SlideTemplate) -> Result<Slide> {
    let book_slot = template.slot(SlotKind::BookNumber)?;
    let title_slot = template.slot(SlotKind::Title)?;
    let details_slot = template.slot(SlotKind::Details)?;

    let id_line = format!("{} {}", metadata.book, metadata.number);
    let boxes = vec![
        TextBox::from_lines(&[id_line], &book_slot.font),
        TextBox::from_lines(&[metadata.title.as_str()], &title_slot.font),
        TextBox::from_lines(&metadata.info_lines(), &details_slot.font),
    ];
    Ok(Slide::new(boxes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_metadata() -> SongMetadata {
        let mut meta = SongMetadata::new(Book::Dds, 42, "Example");
        meta.authors = vec!["A. Author".to_string()];
        meta
    }

    #[test]
    fn test_build_contains_all_fields() {
        let slide = build(&example_metadata(), &SlideTemplate::standard()).unwrap();
        let text = slide
            .boxes
            .iter()
            .flat_map(|b| b.runs.iter())
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        assert!(text.contains("DDS"));
        assert!(text.contains("42"));
        assert!(text.contains("Example"));
        assert!(text.contains("A. Author"));
        // No placeholder tokens for the absent melody/history fields.
        assert!(!text.contains("{"));
        assert!(!text.to_lowercase().contains("unknown"));
        assert!(!text.to_lowercase().contains("n/a"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let template = SlideTemplate::standard();
        let meta = example_metadata();
        assert_eq!(build(&meta, &template).unwrap(), build(&meta, &template).unwrap());
    }

    #[test]
    fn test_absent_fields_render_as_empty_region() {
        let meta = SongMetadata::new(Book::Fs4, 3, "Bare");
        let slide = build(&meta, &SlideTemplate::standard()).unwrap();
        assert_eq!(slide.boxes.len(), 3);
        assert!(slide.boxes[2].runs.is_empty());
    }

    #[test]
    fn test_missing_slot_is_template_mismatch() {
        let mut template = SlideTemplate::standard();
        template.slots.retain(|s| s.kind != SlotKind::Title);

        let err = build(&example_metadata(), &template).unwrap_err();
        assert!(matches!(err, Error::TemplateMismatch(_)));
    }

    #[test]
    fn test_built_slide_matches_signature() {
        let slide = build(&example_metadata(), &SlideTemplate::standard()).unwrap();
        assert!(is_infoslide(&slide));
    }

    #[test]
    fn test_template_fonts_applied_per_slot() {
        let slide = build(&example_metadata(), &SlideTemplate::standard()).unwrap();
        assert_eq!(slide.boxes[0].runs[0].font.size, 75);
        assert_eq!(slide.boxes[1].runs[0].font.size, 50);
        assert_eq!(slide.boxes[2].runs[0].font.size, 35);
        assert!(slide.boxes[2].runs[0].font.italic);
    }

    #[test]
    fn test_is_infoslide_rejects_lyric_slides() {
        let font = FontAttrs::new("Arial", 90);
        let lyric = Slide::from_lines(&["Amazing grace how sweet the sound"], &font);
        assert!(!is_infoslide(&lyric));

        // A bare book/number line without a title is not an infoslide.
        let bare = Slide::from_lines(&["DDS 42"], &font);
        assert!(!is_infoslide(&bare));

        let padded = Slide::from_lines(&["SOS 007", "Some title"], &font);
        assert!(is_infoslide(&padded));
    }
}
