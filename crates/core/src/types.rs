//! Domain types for song metadata and the slide document tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported songbook sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Book {
    /// Den Danske Salmebog.
    Dds,
    /// Syng med os.
    Sos,
    /// Frikirkesange 4.
    Fs4,
}

impl Book {
    /// Canonical uppercase book code as used in filenames and slide text.
    pub fn code(&self) -> &'static str {
        match self {
            Book::Dds => "DDS",
            Book::Sos => "SOS",
            Book::Fs4 => "FS4",
        }
    }

    /// All supported books, in display order.
    pub fn all() -> &'static [Book] {
        &[Book::Dds, Book::Sos, Book::Fs4]
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Book {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DDS" => Ok(Book::Dds),
            "SOS" => Ok(Book::Sos),
            "FS4" => Ok(Book::Fs4),
            other => Err(format!("unknown songbook: {}", other)),
        }
    }
}

/// Identity of a song within the library: songbook plus number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SongId {
    pub book: Book,
    pub number: u32,
}

impl SongId {
    pub fn new(book: Book, number: u32) -> Self {
        Self { book, number }
    }
}

impl fmt::Display for SongId {
    /// Zero-padded form used in filenames, slide text, and log lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:03}", self.book, self.number)
    }
}

/// Song metadata as delivered by the metadata store (or manual entry).
///
/// Identity is `(book, number)`. The slide engine only reads this; the CLI
/// hands manually entered records back to the store for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMetadata {
    pub book: Book,
    pub number: u32,
    pub title: String,
    /// Author/composer names, possibly empty.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Melody attribution ("Mel.: ..." on the infoslide).
    #[serde(default)]
    pub melody: Option<String>,
    /// Historical note about the song.
    #[serde(default)]
    pub history: Option<String>,
    /// Bible references, possibly empty.
    #[serde(default)]
    pub bible_refs: Vec<String>,
}

impl SongMetadata {
    pub fn new(book: Book, number: u32, title: impl Into<String>) -> Self {
        Self {
            book,
            number,
            title: title.into(),
            authors: Vec::new(),
            melody: None,
            history: None,
            bible_refs: Vec::new(),
        }
    }

    pub fn id(&self) -> SongId {
        SongId::new(self.book, self.number)
    }

    /// Secondary infoslide lines derived from the optional fields.
    ///
    /// Absent fields produce no line at all, never a placeholder.
    pub fn info_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.authors.is_empty() {
            lines.push(self.authors.join(", "));
        }
        if !self.bible_refs.is_empty() {
            lines.push(self.bible_refs.join(". "));
        }
        if let Some(history) = &self.history {
            lines.push(history.clone());
        }
        if let Some(melody) = &self.melody {
            lines.push(format!("Mel.: {}", melody));
        }
        lines
    }
}

impl fmt::Display for SongMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id(), self.title)?;
        for line in self.info_lines() {
            write!(f, "\n  {}", line)?;
        }
        Ok(())
    }
}

/// Font family applied when a slide carries no usable font of its own.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Font attributes carried by a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontAttrs {
    pub family: String,
    /// Size in points.
    pub size: u32,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl FontAttrs {
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

/// One rendered line of text with its formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub font: FontAttrs,
}

impl Run {
    pub fn new(text: impl Into<String>, font: FontAttrs) -> Self {
        Self {
            text: text.into(),
            font,
        }
    }
}

/// A text box on a slide. Runs are structural lines, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub runs: Vec<Run>,
}

impl TextBox {
    pub fn new(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Build a text box where every line shares one font.
    pub fn from_lines<S: AsRef<str>>(lines: &[S], font: &FontAttrs) -> Self {
        Self {
            runs: lines
                .iter()
                .map(|l| Run::new(l.as_ref(), font.clone()))
                .collect(),
        }
    }

    pub fn lines(&self) -> Vec<&str> {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }
}

/// A single slide. Lyric slides carry one text box by convention; the
/// infoslide carries one box per template slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub boxes: Vec<TextBox>,
}

impl Slide {
    pub fn new(boxes: Vec<TextBox>) -> Self {
        Self { boxes }
    }

    /// Build a one-box lyric slide.
    pub fn from_lines<S: AsRef<str>>(lines: &[S], font: &FontAttrs) -> Self {
        Self {
            boxes: vec![TextBox::from_lines(lines, font)],
        }
    }

    /// Lines of the primary (first) text box. Extra boxes are authoring
    /// noise and are ignored, matching how the source documents are read.
    pub fn body_lines(&self) -> Vec<String> {
        self.boxes
            .first()
            .map(|b| b.runs.iter().map(|r| r.text.clone()).collect())
            .unwrap_or_default()
    }

    /// First non-empty line across all boxes, if any.
    pub fn first_line(&self) -> Option<&str> {
        self.boxes
            .iter()
            .flat_map(|b| b.runs.iter())
            .map(|r| r.text.trim())
            .find(|t| !t.is_empty())
    }

    /// Font attributes of the first run, used as the slide's nominal font.
    pub fn primary_font(&self) -> Option<&FontAttrs> {
        self.boxes
            .first()
            .and_then(|b| b.runs.first())
            .map(|r| &r.font)
    }

    /// All run font sizes on this slide.
    pub fn font_sizes(&self) -> Vec<u32> {
        self.boxes
            .iter()
            .flat_map(|b| b.runs.iter())
            .map(|r| r.font.size)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.iter().all(|b| b.is_empty())
    }
}

/// The ordered slides belonging to one song.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideGroup {
    pub slides: Vec<Slide>,
}

impl SlideGroup {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Atomically replace the whole slide sequence. The editor computes the
    /// full replacement before this is called, so a group is never left
    /// half-written.
    pub fn replace_slides(&mut self, slides: Vec<Slide>) {
        self.slides = slides;
    }
}

/// An in-memory presentation document: named, with one group per song.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideDocument {
    pub name: String,
    pub groups: Vec<SlideGroup>,
}

impl SlideDocument {
    pub fn new(name: impl Into<String>, groups: Vec<SlideGroup>) -> Self {
        Self {
            name: name.into(),
            groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_roundtrip() {
        for book in Book::all() {
            assert_eq!(book.code().parse::<Book>().unwrap(), *book);
        }
        assert_eq!("dds".parse::<Book>().unwrap(), Book::Dds);
        assert!("XYZ".parse::<Book>().is_err());
    }

    #[test]
    fn test_song_id_display_zero_pads() {
        assert_eq!(SongId::new(Book::Dds, 7).to_string(), "DDS 007");
        assert_eq!(SongId::new(Book::Sos, 123).to_string(), "SOS 123");
    }

    #[test]
    fn test_info_lines_order_and_absence() {
        let mut meta = SongMetadata::new(Book::Sos, 12, "Example");
        assert!(meta.info_lines().is_empty());

        meta.authors = vec!["A. Author".to_string(), "B. Author".to_string()];
        meta.bible_refs = vec!["Rom 10, 1-8".to_string()];
        meta.melody = Some("Old folk tune".to_string());
        assert_eq!(
            meta.info_lines(),
            vec![
                "A. Author, B. Author",
                "Rom 10, 1-8",
                "Mel.: Old folk tune"
            ]
        );
    }

    #[test]
    fn test_slide_body_lines_uses_first_box_only() {
        let font = FontAttrs::new("Arial", 90);
        let slide = Slide::new(vec![
            TextBox::from_lines(&["main line"], &font),
            TextBox::from_lines(&["stray note"], &font),
        ]);
        assert_eq!(slide.body_lines(), vec!["main line"]);
    }

    #[test]
    fn test_slide_font_sizes_cover_all_boxes() {
        let slide = Slide::new(vec![
            TextBox::new(vec![Run::new("a", FontAttrs::new("Arial", 90))]),
            TextBox::new(vec![Run::new("b", FontAttrs::new("Arial", 72))]),
        ]);
        assert_eq!(slide.font_sizes(), vec![90, 72]);
    }

    #[test]
    fn test_replace_slides_swaps_sequence() {
        let font = FontAttrs::new("Arial", 90);
        let mut group = SlideGroup::new(vec![Slide::from_lines(&["old"], &font)]);
        group.replace_slides(vec![
            Slide::from_lines(&["new one"], &font),
            Slide::from_lines(&["new two"], &font),
        ]);
        assert_eq!(group.len(), 2);
        assert_eq!(group.slides[0].body_lines(), vec!["new one"]);
    }
}
