//! Font size resolution for a slide group.
//!
//! Lyric slides in one song should share a single size. When the runs
//! disagree the user picks one; the candidates are presented most-used
//! first.

use crate::error::Result;
use crate::interact::InteractionGateway;
use crate::types::SongId;
use std::collections::BTreeMap;

/// Size applied when a group carries no font information at all.
pub const DEFAULT_FONT_SIZE: u32 = 90;

/// How a group's target font size was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSource {
    /// Every run agreed.
    Unanimous,
    /// The user picked among disagreeing sizes.
    UserChosen,
    /// No sizes present; the fixed fallback applies.
    Default,
}

/// The size to enforce on a group's lyric runs, with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontDecision {
    pub size: u32,
    pub source: FontSource,
}

/// Resolve one target size from the sizes observed across a group's lyric
/// runs. Consults the gateway only when the sizes disagree, and at most
/// once per group.
pub fn resolve(
    sizes: &[u32],
    song: &SongId,
    gateway: &dyn InteractionGateway,
) -> Result<FontDecision> {
    if sizes.is_empty() {
        return Ok(FontDecision {
            size: DEFAULT_FONT_SIZE,
            source: FontSource::Default,
        });
    }

    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for &size in sizes {
        *counts.entry(size).or_default() += 1;
    }

    if counts.len() == 1 {
        return Ok(FontDecision {
            size: sizes[0],
            source: FontSource::Unanimous,
        });
    }

    // Descending frequency, ties broken by descending size.
    let mut candidates: Vec<u32> = counts.keys().copied().collect();
    candidates.sort_by(|a, b| counts[b].cmp(&counts[a]).then(b.cmp(a)));

    log::warn!("{} - slides use multiple font sizes: {:?}", song, candidates);
    let size = gateway.choose_font_size(song, &candidates)?;
    Ok(FontDecision {
        size,
        source: FontSource::UserChosen,
    })
}
