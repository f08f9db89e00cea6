//! Reader for the host's INI dialect
//!
//! The format is the one LinuxCNC machine configurations use: `[SECTION]`
//! headers followed by `KEY = VALUE` lines. Lines starting with `#` or `;`
//! are comments. Keys before the first header and lines without `=` are
//! ignored. Values keep any further `=` characters.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IniError {
    #[error("line {line}: unterminated section header {text:?}")]
    UnterminatedSection { line: usize, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
}

impl IniSection {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First value stored under `key`, compared case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniFile {
    sections: Vec<IniSection>,
}

impl IniFile {
    pub fn parse(content: &str) -> Result<Self, IniError> {
        let mut sections: Vec<IniSection> = Vec::new();
        // Index into `sections` for the header currently in effect.
        let mut current: Option<usize> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let Some(end) = rest.find(']') else {
                    return Err(IniError::UnterminatedSection {
                        line: idx + 1,
                        text: line.to_string(),
                    });
                };
                let name = rest[..end].trim();
                // Repeated headers continue the earlier section.
                current = match sections.iter().position(|s| s.name.eq_ignore_ascii_case(name)) {
                    Some(existing) => Some(existing),
                    None => {
                        sections.push(IniSection { name: name.to_string(), entries: Vec::new() });
                        Some(sections.len() - 1)
                    }
                };
                continue;
            }

            let (Some(section), Some((key, value))) = (current, line.split_once('=')) else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            sections[section].entries.push((key.to_string(), value.trim().to_string()));
        }

        Ok(IniFile { sections })
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Look up `[section]key`, returning the first occurrence.
    pub fn find(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    pub fn sections(&self) -> impl Iterator<Item = &IniSection> {
        self.sections.iter()
    }
}
