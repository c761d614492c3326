//! Policy driven destination auto-selection rule.

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use printpreview_protocols::PrinterType;

use super::entity::Destination;

#[derive(Debug, Error)]
pub enum MatchRuleError {
    #[error("Unable to parse selection rules: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unsupported printer kind: {0}")]
    UnsupportedKind(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionRules {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    id_pattern: Option<String>,
    #[serde(default)]
    name_pattern: Option<String>,
}

/// Matches destinations against optional id and display name patterns.
///
/// Virtual PDF destinations never match.
#[derive(Debug, Clone, Default)]
pub struct DestinationMatch {
    id_regex: Option<Regex>,
    display_name_regex: Option<Regex>,
}

impl DestinationMatch {
    pub fn new(id_regex: Option<Regex>, display_name_regex: Option<Regex>) -> Self {
        Self {
            id_regex,
            display_name_regex,
        }
    }

    /// Build a match from the serialized default destination selection
    /// rules. Malformed input is logged and yields `None`; an invalid
    /// pattern is logged and dropped.
    pub fn from_rules(rules: &str) -> Option<Self> {
        if rules.trim().is_empty() {
            return None;
        }
        match Self::parse_rules(rules) {
            Ok(matcher) => Some(matcher),
            Err(e) => {
                warn!("Ignoring default destination selection rules: {}", e);
                None
            }
        }
    }

    fn parse_rules(rules: &str) -> Result<Self, MatchRuleError> {
        let rules: SelectionRules = serde_json::from_str(rules)?;
        if let Some(kind) = rules.kind.filter(|k| k != "local") {
            return Err(MatchRuleError::UnsupportedKind(kind));
        }
        Ok(Self::new(
            compile_pattern("idPattern", rules.id_pattern),
            compile_pattern("namePattern", rules.name_pattern),
        ))
    }

    pub fn matches(&self, destination: &Destination) -> bool {
        if destination.printer_type() == PrinterType::Pdf {
            return false;
        }
        if let Some(ref re) = self.id_regex {
            if !re.is_match(destination.id()) {
                return false;
            }
        }
        if let Some(ref re) = self.display_name_regex {
            if !re.is_match(destination.display_name()) {
                return false;
            }
        }
        true
    }

    /// Source types that can contain a matching destination.
    pub fn printer_types(&self) -> Vec<PrinterType> {
        vec![PrinterType::Local]
    }
}

fn compile_pattern(field: &str, pattern: Option<String>) -> Option<Regex> {
    let pattern = pattern.filter(|p| !p.is_empty())?;
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Failed to parse {} '{}': {}", field, pattern, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::entity::SAVE_AS_PDF_ID;
    use printpreview_protocols::DestinationOrigin;

    fn dest(id: &str, name: &str) -> Destination {
        Destination::new(id, DestinationOrigin::Local, name)
    }

    #[test]
    fn test_empty_match_accepts_all_but_pdf() {
        let matcher = DestinationMatch::default();
        assert!(matcher.matches(&dest("a", "A")));
        assert!(!matcher.matches(&dest(SAVE_AS_PDF_ID, "Save as PDF")));
    }

    #[test]
    fn test_patterns_must_all_match() {
        let matcher = DestinationMatch::new(
            Some(Regex::new("^lab-").unwrap()),
            Some(Regex::new("Color").unwrap()),
        );
        assert!(matcher.matches(&dest("lab-1", "Big Color Laser")));
        assert!(!matcher.matches(&dest("lab-1", "Mono Laser")));
        assert!(!matcher.matches(&dest("office-1", "Color Laser")));
    }

    #[test]
    fn test_unanchored_search() {
        let matcher = DestinationMatch::new(None, Some(Regex::new("Jet").unwrap()));
        assert!(matcher.matches(&dest("x", "HP OfficeJet Pro")));
    }

    #[test]
    fn test_from_rules() {
        let matcher =
            DestinationMatch::from_rules(r#"{"kind": "local", "namePattern": "Canon"}"#).unwrap();
        assert!(matcher.matches(&dest("c1", "Canon MX")));
        assert!(!matcher.matches(&dest("h1", "HP")));
        assert_eq!(matcher.printer_types(), vec![PrinterType::Local]);
    }

    #[test]
    fn test_from_rules_degrades() {
        assert!(DestinationMatch::from_rules("").is_none());
        assert!(DestinationMatch::from_rules("{broken").is_none());
        assert!(DestinationMatch::from_rules(r#"{"kind": "cloud"}"#).is_none());
    }

    #[test]
    fn test_invalid_pattern_dropped() {
        let matcher =
            DestinationMatch::from_rules(r#"{"idPattern": "(", "namePattern": "HP"}"#).unwrap();
        assert!(matcher.matches(&dest("anything", "HP Laser")));
        assert!(!matcher.matches(&dest("anything", "Canon")));
    }
}
