//! The slide-group editor.
//!
//! Turns one song's slide group into its final slide sequence: infoslide
//! first, then the kept lyric slides, cleaned and set in one font size.
//! The whole replacement sequence is computed before the group is touched,
//! so a failing song leaves the document exactly as it was.

use crate::classify::{classify_group, SlideLabel};
use crate::error::{Error, Result};
use crate::fontsize::{self, FontDecision, DEFAULT_FONT_SIZE};
use crate::infoslide::{self, SlideTemplate};
use crate::interact::{InfoslideChoice, InteractionGateway, SlideChoice};
use crate::normalize::{Normalizer, CONTINUATION_MARK};
use crate::types::{FontAttrs, Slide, SlideGroup, SongMetadata, DEFAULT_FONT_FAMILY};

/// Result of processing one group: the replacement slide sequence and the
/// font decision that was applied (absent when an existing infoslide was
/// kept and the group only got cosmetic cleanup).
#[derive(Debug, Clone)]
pub struct ProcessedGroup {
    pub slides: Vec<Slide>,
    pub font: Option<FontDecision>,
}

/// Per-song slide editor. Holds the collaborators; all per-song state lives
/// on the stack of [`process`](Self::process), so songs are isolated and a
/// run is repeatable.
pub struct GroupEditor<'a> {
    normalizer: &'a Normalizer,
    template: &'a SlideTemplate,
    gateway: &'a dyn InteractionGateway,
}

impl<'a> GroupEditor<'a> {
    pub fn new(
        normalizer: &'a Normalizer,
        template: &'a SlideTemplate,
        gateway: &'a dyn InteractionGateway,
    ) -> Self {
        Self {
            normalizer,
            template,
            gateway,
        }
    }

    /// Compute the replacement slide sequence for `group` without mutating
    /// it. Errors leave the group untouched by construction.
    pub fn process(&self, group: &SlideGroup, song: &SongMetadata) -> Result<ProcessedGroup> {
        let id = song.id();

        if group.is_empty() {
            return Err(Error::StructuralAnomaly {
                song: id,
                reason: "slide group has no slides".to_string(),
            });
        }

        let labeled = classify_group(group, self.normalizer, Some(song));

        // An existing infoslide is kept or replaced, the user's call.
        let has_existing = labeled
            .first()
            .is_some_and(|l| l.label == SlideLabel::ExistingInfoslide);
        if has_existing {
            match self.gateway.confirm_replace_infoslide(&id)? {
                InfoslideChoice::Keep => {
                    log::info!("{} - keeping existing infoslide", id);
                    return Ok(self.pass_through(group, song));
                }
                InfoslideChoice::Replace => {
                    log::info!("{} - replacing existing infoslide", id);
                }
            }
        }

        let infoslide = infoslide::build(song, self.template)?;

        // One font size for the whole group, gathered from the lyric runs.
        let mut sizes = Vec::new();
        for (slide, l) in group.slides.iter().zip(&labeled) {
            if matches!(
                l.label,
                SlideLabel::NormalLyric | SlideLabel::SingleLineLyric
            ) {
                sizes.extend(slide.font_sizes());
            }
        }
        let font = fontsize::resolve(&sizes, &id, self.gateway)?;

        // Filter and rewrite, preserving the relative order of kept slides.
        let mut kept: Vec<(Vec<String>, String)> = Vec::new();
        for (number, (slide, l)) in group.slides.iter().zip(&labeled).enumerate() {
            match l.label {
                SlideLabel::ExistingInfoslide => {
                    // Being replaced; drop the old one.
                }
                SlideLabel::VerseMarkerOnly | SlideLabel::EmptyOrDuplicate => {
                    log::debug!("{} - slide {} dropped ({:?})", id, number + 1, l.label);
                }
                SlideLabel::SingleLineLyric => {
                    match self
                        .gateway
                        .confirm_remove_single_line(&id, l.first_line())?
                    {
                        SlideChoice::Remove => {
                            log::info!("{} - slide {} removed on request", id, number + 1);
                        }
                        SlideChoice::Keep => kept.push((l.lines.clone(), slide_family(slide))),
                    }
                }
                SlideLabel::NormalLyric => kept.push((l.lines.clone(), slide_family(slide))),
            }
        }

        if kept.is_empty() {
            log::warn!("{} - no lyric slides left after cleanup", id);
        }

        // The last slide carries the closing dash.
        if let Some((lines, _)) = kept.last_mut() {
            apply_closing_marks(lines);
        }

        let mut slides = Vec::with_capacity(kept.len() + 1);
        slides.push(infoslide);
        for (lines, family) in kept {
            let attrs = FontAttrs::new(family, font.size);
            slides.push(Slide::from_lines(&lines, &attrs));
        }

        Ok(ProcessedGroup {
            slides,
            font: Some(font),
        })
    }

    /// Process and commit in one step: the group's slide sequence is
    /// replaced atomically on success.
    pub fn apply(&self, group: &mut SlideGroup, song: &SongMetadata) -> Result<Option<FontDecision>> {
        let ProcessedGroup { slides, font } = self.process(group, song)?;
        group.replace_slides(slides);
        Ok(font)
    }

    /// KeepInfoslide path: the infoslide passes through untouched and the
    /// remaining slides get text cleanup only - no filtering, no font
    /// changes.
    fn pass_through(&self, group: &SlideGroup, song: &SongMetadata) -> ProcessedGroup {
        let mut slides = Vec::with_capacity(group.len());
        slides.push(group.slides[0].clone());

        for slide in &group.slides[1..] {
            let cleaned = self
                .normalizer
                .clean_slide_lines(&slide.body_lines(), Some(song));
            let attrs = slide
                .primary_font()
                .cloned()
                .unwrap_or_else(|| FontAttrs::new(DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE));
            slides.push(Slide::from_lines(&cleaned, &attrs));
        }

        ProcessedGroup { slides, font: None }
    }
}

fn slide_family(slide: &Slide) -> String {
    slide
        .primary_font()
        .map(|f| f.family.clone())
        .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string())
}

/// Closing marks for the song's last slide: a trailing dash, and a leading
/// blank line to keep the text centered, unless the slide opens with a
/// continuation mark (then the balancing line it already has becomes the
/// dash).
fn apply_closing_marks(lines: &mut Vec<String>) {
    if lines.is_empty() {
        return;
    }
    if lines[0] == CONTINUATION_MARK {
        if let Some(last) = lines.last_mut() {
            *last = "-".to_string();
        }
    } else {
        lines.insert(0, String::new());
        lines.push("-".to_string());
    }
}
