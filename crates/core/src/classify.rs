//! Slide classification.
//!
//! Labels every slide in a song's group so the editor can decide what to
//! keep, drop, or put to the user. Duplicate detection compares against the
//! previous slide that would be kept, so the pass threads that state
//! through the stream instead of labeling slides independently.

use crate::infoslide;
use crate::normalize::Normalizer;
use crate::types::{SlideGroup, SongMetadata};

/// Classification of one slide within its group. Recomputed on every run,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideLabel {
    /// First slide, matching the infoslide signature.
    ExistingInfoslide,
    /// Nothing but a verse marker.
    VerseMarkerOnly,
    /// No text after cleanup, or same text as the previous kept slide.
    EmptyOrDuplicate,
    /// Exactly one non-empty line after cleanup; the user decides its fate.
    SingleLineLyric,
    /// A regular lyric slide.
    NormalLyric,
}

/// A slide's label together with its cleaned lyric lines. The lines are
/// empty for labels that never reach the output.
#[derive(Debug, Clone)]
pub struct LabeledSlide {
    pub label: SlideLabel,
    pub lines: Vec<String>,
}

impl LabeledSlide {
    fn dropped(label: SlideLabel) -> Self {
        Self {
            label,
            lines: Vec::new(),
        }
    }

    /// First non-empty cleaned line, for prompts and logging.
    pub fn first_line(&self) -> &str {
        self.lines
            .iter()
            .find(|l| !l.is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Label every slide of `group` in order.
///
/// `song` enables removal of metadata lines pasted into lyric slides; pass
/// `None` when no metadata is available.
pub fn classify_group(
    group: &SlideGroup,
    normalizer: &Normalizer,
    song: Option<&SongMetadata>,
) -> Vec<LabeledSlide> {
    let mut labeled = Vec::with_capacity(group.len());
    let mut prev_kept: Option<String> = None;

    for (index, slide) in group.slides.iter().enumerate() {
        if index == 0 && infoslide::is_infoslide(slide) {
            labeled.push(LabeledSlide::dropped(SlideLabel::ExistingInfoslide));
            continue;
        }

        let body = slide.body_lines();

        // Check the visible content before clutter removal: a slide that is
        // nothing but a marker is labeled as such, not as empty.
        let visible = normalizer.basic_lines(&body);
        if visible.len() == 1 && normalizer.is_verse_marker(&visible[0]) {
            labeled.push(LabeledSlide::dropped(SlideLabel::VerseMarkerOnly));
            continue;
        }

        let cleaned = normalizer.clean_slide_lines(&body, song);
        let non_empty = cleaned.iter().filter(|l| !l.is_empty()).count();
        if non_empty == 0 {
            labeled.push(LabeledSlide::dropped(SlideLabel::EmptyOrDuplicate));
            continue;
        }

        // Cleanup can reduce a slide to a bare ordinal; that is still a
        // marker, not a one-line lyric.
        if non_empty == 1 {
            let only = cleaned.iter().find(|l| !l.is_empty());
            if only.is_some_and(|l| normalizer.is_verse_marker(l)) {
                labeled.push(LabeledSlide::dropped(SlideLabel::VerseMarkerOnly));
                continue;
            }
        }

        let key = cleaned.join("\n");
        if prev_kept.as_deref() == Some(key.as_str()) {
            labeled.push(LabeledSlide::dropped(SlideLabel::EmptyOrDuplicate));
            continue;
        }

        let label = if non_empty == 1 {
            SlideLabel::SingleLineLyric
        } else {
            SlideLabel::NormalLyric
        };
        prev_kept = Some(key);
        labeled.push(LabeledSlide {
            label,
            lines: cleaned,
        });
    }

    labeled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Book, FontAttrs, Slide};

    fn group_of(texts: &[&[&str]]) -> SlideGroup {
        let font = FontAttrs::new("Arial", 90);
        SlideGroup::new(texts.iter().map(|t| Slide::from_lines(t, &font)).collect())
    }

    fn labels(group: &SlideGroup) -> Vec<SlideLabel> {
        classify_group(group, &Normalizer::new(), None)
            .iter()
            .map(|l| l.label)
            .collect()
    }

    #[test]
    fn test_normal_lyric_slides() {
        let group = group_of(&[
            &["Amazing grace how sweet the sound", "That saved a wretch like me"],
            &["I once was lost but now am found", "Was blind but now I see"],
        ]);
        assert_eq!(
            labels(&group),
            vec![SlideLabel::NormalLyric, SlideLabel::NormalLyric]
        );
    }

    #[test]
    fn test_first_slide_infoslide_signature() {
        let group = group_of(&[
            &["DDS 42", "Den signede dag"],
            &["Den signede dag med fryd vi ser", "af havet til os opkomme"],
        ]);
        assert_eq!(
            labels(&group),
            vec![SlideLabel::ExistingInfoslide, SlideLabel::NormalLyric]
        );
    }

    #[test]
    fn test_infoslide_signature_only_matches_first_position() {
        let group = group_of(&[
            &["Lyric one", "Lyric two"],
            &["DDS 42", "Den signede dag"],
        ]);
        // In second position the same text is just a lyric slide.
        assert_eq!(
            labels(&group),
            vec![SlideLabel::NormalLyric, SlideLabel::NormalLyric]
        );
    }

    #[test]
    fn test_verse_marker_only() {
        let group = group_of(&[&["Verse 2"], &["2."], &["A real lyric", "line here"]]);
        assert_eq!(
            labels(&group),
            vec![
                SlideLabel::VerseMarkerOnly,
                SlideLabel::VerseMarkerOnly,
                SlideLabel::NormalLyric
            ]
        );
    }

    #[test]
    fn test_empty_slide() {
        let group = group_of(&[&["", "  "], &["Lyric", "line"]]);
        assert_eq!(
            labels(&group),
            vec![SlideLabel::EmptyOrDuplicate, SlideLabel::NormalLyric]
        );
    }

    #[test]
    fn test_consecutive_duplicate_collapse() {
        // [A, A, B]: the second A is a duplicate of the previous kept slide.
        let group = group_of(&[&["Amen."], &["Amen."], &["Verse 2"]]);
        assert_eq!(
            labels(&group),
            vec![
                SlideLabel::SingleLineLyric,
                SlideLabel::EmptyOrDuplicate,
                SlideLabel::VerseMarkerOnly
            ]
        );
    }

    #[test]
    fn test_duplicate_detection_uses_kept_stream_not_raw_neighbor() {
        // A, <empty>, A: the empty slide must not reset the comparison.
        let group = group_of(&[&["Amen.", "Amen again."], &[""], &["Amen.", "Amen again."]]);
        assert_eq!(
            labels(&group),
            vec![
                SlideLabel::NormalLyric,
                SlideLabel::EmptyOrDuplicate,
                SlideLabel::EmptyOrDuplicate
            ]
        );
    }

    #[test]
    fn test_non_adjacent_duplicates_are_kept() {
        let group = group_of(&[
            &["Amen.", "Amen again."],
            &["Something else", "entirely"],
            &["Amen.", "Amen again."],
        ]);
        assert_eq!(
            labels(&group),
            vec![
                SlideLabel::NormalLyric,
                SlideLabel::NormalLyric,
                SlideLabel::NormalLyric
            ]
        );
    }

    #[test]
    fn test_slide_reduced_to_bare_ordinal_is_marker() {
        // The copyright line is clutter; what is left is just an ordinal.
        let group = group_of(&[&["© 1953 Some Publisher", "3."]]);
        assert_eq!(labels(&group), vec![SlideLabel::VerseMarkerOnly]);
    }

    #[test]
    fn test_single_line_lyric() {
        let group = group_of(&[&["Amen."]]);
        assert_eq!(labels(&group), vec![SlideLabel::SingleLineLyric]);
    }

    #[test]
    fn test_slide_reduced_to_one_line_is_single_line() {
        // Two raw lines, but one is clutter: cleanup leaves one real line.
        let group = group_of(&[&["Verse 3", "Amen."]]);
        assert_eq!(labels(&group), vec![SlideLabel::SingleLineLyric]);
    }

    #[test]
    fn test_pasted_metadata_ignored_in_comparison() {
        let mut song = SongMetadata::new(Book::Dds, 42, "Den signede dag");
        song.authors = vec!["N. F. S. Grundtvig".to_string()];

        let group = group_of(&[
            &["Den signede dag med fryd vi ser", "af havet til os opkomme"],
            &["DDS 042", "Den signede dag med fryd vi ser", "af havet til os opkomme"],
        ]);
        let labeled = classify_group(&group, &Normalizer::new(), Some(&song));
        assert_eq!(labeled[0].label, SlideLabel::NormalLyric);
        // After dropping the pasted id line, slide 2 duplicates slide 1.
        assert_eq!(labeled[1].label, SlideLabel::EmptyOrDuplicate);
    }
}
