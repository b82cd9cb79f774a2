//! Slide-processing engine: classification, text cleanup, infoslide
//! building, and the per-song slide-group editor.

pub mod classify;
pub mod editor;
pub mod error;
pub mod fontsize;
pub mod infoslide;
pub mod interact;
pub mod normalize;
pub mod types;

pub use classify::{classify_group, LabeledSlide, SlideLabel};
pub use editor::{GroupEditor, ProcessedGroup};
pub use error::{Error, Result};
pub use fontsize::{FontDecision, FontSource, DEFAULT_FONT_SIZE};
pub use infoslide::{SlideTemplate, SlotKind, TemplateSlot};
pub use interact::{
    DecisionKind, InfoslideChoice, InteractionGateway, ScriptedGateway, SlideChoice,
};
pub use normalize::{ClutterRules, Normalizer};
pub use types::{
    Book, FontAttrs, Run, Slide, SlideDocument, SlideGroup, SongId, SongMetadata, TextBox,
};
