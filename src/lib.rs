//! Manjari - Multilingual Transliteration Pipeline
//!
//! A batch pipeline for provisioning multilingual spiritual-media content:
//! it transliterates Devanagari source text into several Indic and Roman
//! target scripts, splits verse lines at balanced syllable boundaries, and
//! preserves structured metadata headers embedded in the content files.

pub mod cli;
pub mod cluster;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod sandhi;
pub mod syllable;
pub mod translit;
pub mod tweaks;
pub mod workflow;
