//! Lyric text cleanup.
//!
//! Handles mis-encoding repair, whitespace normalization, clutter removal
//! (copyright lines, verse markers, word-explanation annotations), and
//! duplicate-line collapsing. Line breaks are structural and preserved.

use crate::error::{Error, Result};
use crate::types::SongMetadata;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse multiple whitespace characters into one.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// A line that is nothing but a bare verse ordinal ("2" or "2.").
static LONE_ORDINAL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,2}\.?$").unwrap());

/// A line that is a bracketed word explanation ("[thee: you]").
static BRACKET_ANNOTATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[^\]]*\]$").unwrap());

/// Continuation marker used when a verse spills across slides.
pub const CONTINUATION_MARK: &str = "...";

/// Clutter patterns are songbook-source dependent, so they live in a config
/// value rather than in the engine. The default set covers the three
/// built-in books; a new source can supply its own rules file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClutterRules {
    /// A line starting with one of these is a copyright notice.
    #[serde(default = "default_copyright_prefixes")]
    pub copyright_prefixes: Vec<String>,

    /// A line starting with one of these is a word-explanation annotation;
    /// the marker itself is stripped wherever it appears mid-line.
    #[serde(default = "default_annotation_markers")]
    pub annotation_markers: Vec<String>,

    /// Full-line regex for worded verse markers ("Verse 2", "Vers 2").
    /// Bare ordinals are handled structurally, not by this pattern.
    #[serde(default = "default_verse_marker_pattern")]
    pub verse_marker_pattern: String,

    /// Known mis-encoding sequences and their intended replacements.
    #[serde(default = "default_encoding_repairs")]
    pub encoding_repairs: Vec<(String, String)>,
}

fn default_copyright_prefixes() -> Vec<String> {
    vec!["©".to_string(), "(c)".to_string(), "Copyright".to_string()]
}

fn default_annotation_markers() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_verse_marker_pattern() -> String {
    r"(?i)^verse?\s*\d+\.?$".to_string()
}

fn default_encoding_repairs() -> Vec<(String, String)> {
    // UTF-8 read as Latin-1, as seen in the older songbook exports, plus
    // stray Unicode line/paragraph separators.
    [
        ("\u{c3}\u{a6}", "æ"),
        ("\u{c3}\u{b8}", "ø"),
        ("\u{c3}\u{a5}", "å"),
        ("\u{c3}\u{86}", "Æ"),
        ("\u{c3}\u{98}", "Ø"),
        ("\u{c3}\u{85}", "Å"),
        ("\u{c3}\u{a9}", "é"),
        ("\u{e2}\u{80}\u{99}", "\u{2019}"),
        ("\u{2028}", ""),
        ("\u{2029}", ""),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

impl Default for ClutterRules {
    fn default() -> Self {
        Self {
            copyright_prefixes: default_copyright_prefixes(),
            annotation_markers: default_annotation_markers(),
            verse_marker_pattern: default_verse_marker_pattern(),
            encoding_repairs: default_encoding_repairs(),
        }
    }
}

/// Text normalizer for lyric slides.
#[derive(Debug, Clone)]
pub struct Normalizer {
    copyright_prefixes: Vec<String>,
    annotation_markers: Vec<String>,
    verse_marker: Regex,
    repairs: Vec<(String, String)>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Normalizer with the built-in clutter rules.
    pub fn new() -> Self {
        Self::from_rules(&ClutterRules::default()).expect("built-in clutter rules compile")
    }

    /// Normalizer with rules supplied by a songbook source.
    pub fn from_rules(rules: &ClutterRules) -> Result<Self> {
        let verse_marker = Regex::new(&rules.verse_marker_pattern)
            .map_err(|e| Error::InvalidRules(e.to_string()))?;
        Ok(Self {
            copyright_prefixes: rules.copyright_prefixes.clone(),
            annotation_markers: rules.annotation_markers.clone(),
            verse_marker,
            repairs: rules.encoding_repairs.clone(),
        })
    }

    /// Normalize a block of text. Pure and total: unprocessable sequences
    /// pass through unchanged, and the same input always yields the same
    /// output.
    ///
    /// Rules, in order: mis-encoding repair, whitespace collapsing, per-line
    /// trimming, clutter-line removal, consecutive-duplicate collapsing.
    pub fn normalize(&self, raw: &str) -> String {
        let lines: Vec<String> = raw
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .split('\n')
            .map(|l| self.normalize_line(l))
            .collect();

        let mut kept: Vec<String> = Vec::with_capacity(lines.len());
        for line in lines {
            if self.is_clutter(&line) {
                continue;
            }
            if kept.last() == Some(&line) {
                continue;
            }
            kept.push(line);
        }
        kept.join("\n")
    }

    /// Repair + whitespace rules for a single line (no clutter removal).
    pub fn normalize_line(&self, line: &str) -> String {
        let repaired = self.repair_encoding(line);
        let collapsed = WHITESPACE_COLLAPSE_REGEX.replace_all(&repaired, " ");
        collapsed.trim().to_string()
    }

    /// Decode known mis-encoding sequences, then compose to NFC. Unknown
    /// sequences are left alone.
    pub fn repair_encoding(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (from, to) in &self.repairs {
            if result.contains(from.as_str()) {
                result = result.replace(from.as_str(), to);
            }
        }
        result.nfc().collect()
    }

    /// Whether a line is a verse marker: a worded marker ("Verse 2") or a
    /// bare ordinal ("2.").
    pub fn is_verse_marker(&self, line: &str) -> bool {
        self.verse_marker.is_match(line) || LONE_ORDINAL_REGEX.is_match(line)
    }

    /// Whether a line is clutter to be dropped: copyright notices, worded
    /// verse markers, and annotation lines.
    pub fn is_clutter(&self, line: &str) -> bool {
        if self
            .copyright_prefixes
            .iter()
            .any(|p| line.starts_with(p.as_str()))
        {
            return true;
        }
        if self
            .annotation_markers
            .iter()
            .any(|m| line.starts_with(m.as_str()))
        {
            return true;
        }
        if BRACKET_ANNOTATION_REGEX.is_match(line) {
            return true;
        }
        self.verse_marker.is_match(line)
    }

    /// Normalize a slide's lines without removing clutter: repair, collapse,
    /// trim, drop empties. Used to see what a slide "visibly" contains
    /// before any filtering decision.
    pub fn basic_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        lines
            .iter()
            .map(|l| self.normalize_line(l.as_ref()))
            .filter(|l| !l.is_empty())
            .collect()
    }

    /// Full cleanup for one lyric slide's lines.
    ///
    /// On top of [`normalize`](Self::normalize): strips annotation markers
    /// mid-line, removes lines duplicating the song's own info, trims
    /// filler from the slide edges, merges a lone leading verse ordinal
    /// into the following line, and balances a continuation mark with a
    /// blank line on the opposite edge.
    pub fn clean_slide_lines<S: AsRef<str>>(
        &self,
        lines: &[S],
        song: Option<&SongMetadata>,
    ) -> Vec<String> {
        let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
        for raw in lines {
            let line = self.normalize_line(raw.as_ref());
            if self.is_clutter(&line) {
                continue;
            }
            let mut line = line;
            for marker in &self.annotation_markers {
                if line.contains(marker.as_str()) {
                    line = line.replace(marker.as_str(), "");
                }
            }
            let line = line.trim().to_string();
            if let Some(song) = song {
                if self.duplicates_song_info(&line, song) {
                    continue;
                }
            }
            // Collapse consecutive duplicates.
            if cleaned.last() == Some(&line) {
                continue;
            }
            cleaned.push(line);
        }

        // Trim filler from the slide edges.
        while cleaned.first().is_some_and(|l| l.is_empty() || l == ".") {
            cleaned.remove(0);
        }
        while cleaned
            .last()
            .is_some_and(|l| l.is_empty() || l == "-" || l == ".")
        {
            cleaned.pop();
        }

        if cleaned.is_empty() {
            return cleaned;
        }

        // A lone verse ordinal on the first line moves down into the next.
        if cleaned.len() > 1 && LONE_ORDINAL_REGEX.is_match(&cleaned[0]) {
            let ordinal = cleaned.remove(0);
            cleaned[0] = format!("{}. {}", ordinal.trim_end_matches('.'), cleaned[0]);
        }

        // Balance a continuation mark with a blank line on the other edge.
        let first_cont = cleaned[0] == CONTINUATION_MARK;
        let last_cont = cleaned[cleaned.len() - 1] == CONTINUATION_MARK;
        if first_cont && !last_cont {
            cleaned.push(String::new());
        } else if last_cont && !first_cont {
            cleaned.insert(0, String::new());
        }

        cleaned
    }

    /// Whether a cleaned line merely repeats the song's identity or one of
    /// its info lines (some source slides have the metadata pasted in).
    fn duplicates_song_info(&self, line: &str, song: &SongMetadata) -> bool {
        let lower = line.to_lowercase();
        let padded = format!("{} {:03}", song.book, song.number).to_lowercase();
        let plain = format!("{} {}", song.book, song.number).to_lowercase();
        if lower.starts_with(&padded) || lower.starts_with(&plain) {
            return true;
        }
        let info: Vec<String> = song.info_lines().iter().map(|l| l.to_lowercase()).collect();
        info.contains(&lower) || info.contains(&lower.replace(", ", ". "))
    }
}
