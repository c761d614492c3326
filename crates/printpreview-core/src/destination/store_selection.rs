//! Initial destination selection priority.

use super::store::StoreState;

/// Outcome of one selection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum InitialSelection {
    /// Select the destination with this key.
    Select(String),
    /// A pending search may still produce a better candidate.
    Wait,
    /// Nothing usable is known; search every source type.
    LoadAll,
}

impl StoreState {
    fn contains(&self, key: &str) -> bool {
        self.destinations.contains_key(key)
    }

    /// Walk the selection priority list against what is known right now.
    ///
    /// Priority: system default (when policy prefers it), recent
    /// destinations in order, the match rule, the system default, the PDF
    /// destination, then the first known destination. While a search is
    /// pending a miss on the preferred system default, a recent destination
    /// or the match rule stops the walk.
    pub(super) fn choose_initial_destination(&self) -> InitialSelection {
        let search_in_progress = !self.types_to_search.is_empty() && !self.timeout_expired;

        if self.use_system_default_as_default {
            if let Some(key) = self.system_default_key.as_ref().filter(|k| self.contains(k)) {
                return InitialSelection::Select(key.clone());
            }
            if search_in_progress {
                return InitialSelection::Wait;
            }
        }

        for key in &self.recent_keys {
            if self.contains(key) {
                return InitialSelection::Select(key.clone());
            }
            if search_in_progress {
                return InitialSelection::Wait;
            }
        }

        if let Some(ref rule) = self.match_rule {
            let matched = self
                .keys
                .iter()
                .filter_map(|key| self.destinations.get(key))
                .find(|destination| rule.matches(destination));
            if let Some(destination) = matched {
                return InitialSelection::Select(destination.key().to_string());
            }
            if search_in_progress {
                return InitialSelection::Wait;
            }
        }

        if let Some(key) = self.system_default_key.as_ref().filter(|k| self.contains(k)) {
            return InitialSelection::Select(key.clone());
        }

        if search_in_progress {
            return InitialSelection::Wait;
        }

        if self.pdf_printer_enabled {
            let pdf_key = super::store::DestinationStore::pdf_destination_key();
            if self.contains(&pdf_key) {
                return InitialSelection::Select(pdf_key);
            }
        }

        match self.keys.first() {
            Some(key) => InitialSelection::Select(key.clone()),
            None => InitialSelection::LoadAll,
        }
    }
}
