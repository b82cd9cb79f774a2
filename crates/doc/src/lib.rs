//! Document container I/O, library navigation, and template provisioning.

pub mod document;
pub mod library;
pub mod template;

pub use document::{load_document, save_document};
pub use library::{
    find_song_documents, max_song_number, output_filename, title_from_filename,
    DOCUMENT_EXTENSION,
};
pub use template::{builtin_template, load_clutter_rules, load_template};
