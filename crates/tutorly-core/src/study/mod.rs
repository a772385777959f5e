//! Study-session helpers that are pure string work: YouTube id extraction
//! and standalone HTML export of notes.

pub mod export;
pub mod youtube;
