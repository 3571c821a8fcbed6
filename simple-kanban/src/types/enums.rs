//! Code/label enumerations
//!
//! The tracker configures its status, priority and severity enumerations as
//! strings of the form `"10:new,20:feedback,..."`. [`EnumLabels`] parses that
//! format and keeps the entries in their configured order, which is also the
//! column order of the board.

use serde::{Deserialize, Serialize};

/// An ordered enumeration of `(code, label)` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumLabels {
    entries: Vec<(u32, String)>,
}

impl EnumLabels {
    /// Parse a tracker enum string.
    ///
    /// Malformed segments are skipped. If nothing parses, the caller should
    /// fall back to one of the built-in defaults below.
    pub fn parse(enum_string: &str) -> Self {
        let mut entries = Vec::new();
        for part in enum_string.split(',') {
            let part = part.trim();
            let Some((code, label)) = part.split_once(':') else {
                continue;
            };
            if let Ok(code) = code.trim().parse::<u32>() {
                let label = label.trim();
                if !label.is_empty() {
                    entries.push((code, label.to_string()));
                }
            }
        }
        Self { entries }
    }

    /// Parse, falling back to `fallback` when the string yields no entries.
    pub fn parse_or(enum_string: &str, fallback: EnumLabels) -> Self {
        let parsed = Self::parse(enum_string);
        if parsed.entries.is_empty() {
            tracing::warn!(enum_string, "enum string yielded no entries, using fallback");
            fallback
        } else {
            parsed
        }
    }

    /// The standard ten-status workflow
    pub fn status_default() -> Self {
        Self::parse(
            "10:new,20:feedback,30:acknowledged,40:confirmed,50:assigned,\
             60:in progress,70:ready to test,75:testing,80:resolved,90:closed",
        )
    }

    /// The standard priority scale
    pub fn priority_default() -> Self {
        Self::parse("10:none,20:low,30:normal,40:high,50:urgent,60:immediate")
    }

    /// The standard severity scale
    pub fn severity_default() -> Self {
        Self::parse("10:feature,20:trivial,30:text,40:tweak,50:minor,60:major,70:crash,80:block")
    }

    /// The label for a code, if the code is recognized
    pub fn label(&self, code: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, l)| l.as_str())
    }

    /// The label for a code, or the tracker's `@code@` placeholder
    pub fn label_or_placeholder(&self, code: u32) -> String {
        match self.label(code) {
            Some(label) => label.to_string(),
            None => format!("@{}@", code),
        }
    }

    /// True if the code is part of this enumeration
    pub fn contains(&self, code: u32) -> bool {
        self.label(code).is_some()
    }

    /// Codes in configured order
    pub fn codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    /// `(code, label)` pairs in configured order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(c, l)| (*c, l.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the enumeration is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order() {
        let labels = EnumLabels::parse("10:new,20:feedback,75:testing");
        let codes: Vec<u32> = labels.codes().collect();
        assert_eq!(codes, vec![10, 20, 75]);
        assert_eq!(labels.label(75), Some("testing"));
    }

    #[test]
    fn test_parse_skips_malformed_segments() {
        let labels = EnumLabels::parse("10:new, garbage ,x:y,20:feedback,30:");
        let codes: Vec<u32> = labels.codes().collect();
        assert_eq!(codes, vec![10, 20]);
    }

    #[test]
    fn test_parse_or_falls_back_when_empty() {
        let labels = EnumLabels::parse_or("nonsense", EnumLabels::status_default());
        assert_eq!(labels.len(), 10);
        assert_eq!(labels.label(50), Some("assigned"));
    }

    #[test]
    fn test_label_placeholder_for_unknown_code() {
        let labels = EnumLabels::status_default();
        assert_eq!(labels.label_or_placeholder(85), "@85@");
        assert_eq!(labels.label_or_placeholder(90), "closed");
    }

    #[test]
    fn test_status_default_is_complete() {
        let labels = EnumLabels::status_default();
        assert_eq!(labels.len(), 10);
        assert!(labels.contains(75));
        assert_eq!(labels.label(10), Some("new"));
        assert_eq!(labels.label(90), Some("closed"));
    }
}
