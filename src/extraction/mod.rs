//! Heuristic text-to-record extraction for résumés

pub mod entries;
pub mod fields;
pub mod resume;
pub mod sections;
pub mod text;

pub use resume::TextExtractor;
pub use sections::{is_section_header, Section};
