//! Configuration access port trait.
//!
//! Values come back as raw strings; typed parsing and defaults live in
//! `domain::config_validation` so a malformed value is an error, never a
//! silent fallback.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Whether the section exists at all.
    fn has_section(&self, section: &str) -> bool;
}
