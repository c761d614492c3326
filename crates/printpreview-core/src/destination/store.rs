//! Destination discovery, storage and selection.
//!
//! The store owns every known destination, keyed by `"{id}/{origin}/"` and
//! kept in discovery order. Discovery runs one spawned task per printer
//! source type; capability fetches run as spawned tasks too. Results are
//! re-validated against the current state after every await, so responses
//! for destinations that are no longer selected are dropped.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use printpreview_config::Platform;
use printpreview_protocols::{
    CapabilitiesResponse, DestinationOrigin, PrinterService, PrinterType, ServiceError,
};

use super::entity::{
    create_destination_key, Destination, RecentDestination, SAVE_AS_PDF_ID,
    SAVE_TO_DRIVE_CROS_ID,
};
use super::matcher::DestinationMatch;
use super::store_selection::InitialSelection;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Error reported through [`DestinationStoreEvent::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationErrorType {
    /// Capabilities of the selected destination could not be fetched.
    Invalid,
    /// Every search finished and nothing could be selected.
    NoDestinations,
}

/// Store notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationStoreEvent {
    DestinationSearchDone(PrinterType),
    DestinationSelect(String),
    DestinationsInserted,
    Error(DestinationErrorType),
    SelectedDestinationCapabilitiesReady(String),
}

/// Discovery progress for one printer source type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchStatus {
    #[default]
    NotStarted,
    Searching,
    Done,
}

/// Inputs to [`DestinationStore::init`].
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub pdf_printer_disabled: bool,
    pub save_to_drive_disabled: bool,
    pub system_default_destination_id: Option<String>,
    pub default_destination_selection_rules: Option<String>,
    pub recent_destinations: Vec<RecentDestination>,
    pub use_system_default_as_default: bool,
}

#[derive(Default)]
pub(super) struct StoreState {
    pub(super) keys: Vec<String>,
    pub(super) destinations: HashMap<String, Destination>,
    pub(super) selected: Option<String>,
    pub(super) recent_keys: Vec<String>,
    pub(super) system_default_key: Option<String>,
    pub(super) match_rule: Option<DestinationMatch>,
    pub(super) use_system_default_as_default: bool,
    pub(super) pdf_printer_enabled: bool,
    pub(super) types_to_search: BTreeSet<PrinterType>,
    pub(super) search_status: HashMap<PrinterType, SearchStatus>,
    pub(super) timeout_expired: bool,
    pub(super) initial_destination_selected: bool,
    pub(super) no_destinations_reported: bool,
}

impl StoreState {
    fn insert(&mut self, destination: Destination) -> bool {
        let key = destination.key().to_string();
        if self.destinations.contains_key(&key) {
            return false;
        }
        self.keys.push(key.clone());
        self.destinations.insert(key, destination);
        true
    }

    fn remove(&mut self, key: &str) -> Option<Destination> {
        let removed = self.destinations.remove(key)?;
        self.keys.retain(|k| k != key);
        if self.selected.as_deref() == Some(key) {
            self.selected = None;
        }
        Some(removed)
    }

    pub(super) fn is_search_in_progress(&self) -> bool {
        self.search_status
            .values()
            .any(|status| *status == SearchStatus::Searching)
    }
}

/// Shared destination collection.
pub struct DestinationStore {
    service: Arc<dyn PrinterService>,
    platform: Platform,
    search_timeout: Duration,
    state: Mutex<StoreState>,
    sender: broadcast::Sender<DestinationStoreEvent>,
}

impl DestinationStore {
    pub fn new(
        service: Arc<dyn PrinterService>,
        platform: Platform,
        search_timeout: Duration,
    ) -> Arc<Self> {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            service,
            platform,
            search_timeout,
            state: Mutex::new(StoreState::default()),
            sender,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DestinationStoreEvent> {
        self.sender.subscribe()
    }

    fn emit(&self, event: DestinationStoreEvent) {
        let _ = self.sender.send(event);
    }

    /// Key of the virtual PDF destination.
    pub fn pdf_destination_key() -> String {
        create_destination_key(SAVE_AS_PDF_ID, DestinationOrigin::Local)
    }

    /// Record selection inputs, synthesize virtual destinations and start
    /// discovery for every source type an initial candidate may come from.
    ///
    /// Must be called from within a tokio runtime.
    pub fn init(self: &Arc<Self>, options: InitOptions) {
        let (inserted, to_search) = {
            let mut state = self.state.lock();
            state.pdf_printer_enabled = !options.pdf_printer_disabled;
            state.use_system_default_as_default = options.use_system_default_as_default;

            if let Some(id) = options
                .system_default_destination_id
                .as_deref()
                .filter(|id| !id.is_empty())
            {
                let is_pdf = id == SAVE_AS_PDF_ID;
                let origin = if is_pdf || !self.platform.is_chrome_os() {
                    DestinationOrigin::Local
                } else {
                    DestinationOrigin::ChromeOs
                };
                state.system_default_key = Some(create_destination_key(id, origin));
                state.types_to_search.insert(if is_pdf {
                    PrinterType::Pdf
                } else {
                    PrinterType::Local
                });
            }

            state.recent_keys = options
                .recent_destinations
                .iter()
                .filter(|recent| !recent.origin.is_unsupported())
                .map(RecentDestination::key)
                .collect();
            for recent in &options.recent_destinations {
                if !recent.origin.is_unsupported() {
                    state.types_to_search.insert(recent.printer_type());
                }
            }

            state.match_rule = options
                .default_destination_selection_rules
                .as_deref()
                .and_then(DestinationMatch::from_rules);
            let rule_types = state
                .match_rule
                .as_ref()
                .map(DestinationMatch::printer_types)
                .unwrap_or_default();
            state.types_to_search.extend(rule_types);

            let mut inserted = false;
            if state.pdf_printer_enabled {
                inserted |= state.insert(Destination::new(
                    SAVE_AS_PDF_ID,
                    DestinationOrigin::Local,
                    "Save as PDF",
                ));
            }
            if self.platform.is_chrome_os() && !options.save_to_drive_disabled {
                inserted |= state.insert(Destination::new(
                    SAVE_TO_DRIVE_CROS_ID,
                    DestinationOrigin::Local,
                    "Save to Google Drive",
                ));
            }
            state.types_to_search.remove(&PrinterType::Pdf);

            let to_search: Vec<PrinterType> = state.types_to_search.iter().copied().collect();
            (inserted, to_search)
        };

        info!(
            "Destination store initialized, searching {} source types",
            to_search.len()
        );
        if inserted {
            self.emit(DestinationStoreEvent::DestinationsInserted);
        }

        if to_search.is_empty() {
            self.try_to_select_initial_destination();
            return;
        }

        for printer_type in to_search {
            self.start_load_destinations(printer_type);
        }

        let store = Arc::clone(self);
        let timeout = self.search_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            store.on_search_timeout();
        });
    }

    fn on_search_timeout(self: &Arc<Self>) {
        {
            let mut state = self.state.lock();
            if state.initial_destination_selected {
                return;
            }
            state.timeout_expired = true;
        }
        warn!(
            "Destination search timed out after {:?}, selecting from known destinations",
            self.search_timeout
        );
        self.try_to_select_initial_destination();
    }

    /// Start discovery for every source type that has not been searched.
    pub fn start_load_all_destinations(self: &Arc<Self>) {
        for printer_type in [PrinterType::Local, PrinterType::Extension] {
            self.start_load_destinations(printer_type);
        }
    }

    fn start_load_destinations(self: &Arc<Self>, printer_type: PrinterType) {
        {
            let mut state = self.state.lock();
            let status = state.search_status.entry(printer_type).or_default();
            if *status != SearchStatus::NotStarted {
                return;
            }
            *status = SearchStatus::Searching;
        }
        debug!("Searching {} destinations", printer_type);

        let store = Arc::clone(self);
        tokio::spawn(async move {
            let result = store.service.list_printers(printer_type).await;
            match result {
                Ok(printers) => {
                    let chrome_os = store.platform.is_chrome_os();
                    let destinations = printers
                        .iter()
                        .map(|p| Destination::from_descriptor(p, printer_type, chrome_os))
                        .collect();
                    store.insert_destinations(destinations);
                }
                Err(e) => warn!("Failed to list {} printers: {}", printer_type, e),
            }
            store.on_destination_search_done(printer_type);
        });
    }

    fn on_destination_search_done(self: &Arc<Self>, printer_type: PrinterType) {
        {
            let mut state = self.state.lock();
            state.search_status.insert(printer_type, SearchStatus::Done);
            state.types_to_search.remove(&printer_type);
        }
        debug!("Search for {} destinations done", printer_type);
        self.emit(DestinationStoreEvent::DestinationSearchDone(printer_type));
        self.try_to_select_initial_destination();
    }

    fn try_to_select_initial_destination(self: &Arc<Self>) {
        let outcome = {
            let mut state = self.state.lock();
            if state.initial_destination_selected {
                return;
            }
            let outcome = state.choose_initial_destination();
            if matches!(outcome, InitialSelection::Select(_)) {
                state.initial_destination_selected = true;
            }
            outcome
        };

        match outcome {
            InitialSelection::Select(key) => {
                debug!("Selecting initial destination {}", key);
                self.select_destination(&key, false);
                return;
            }
            InitialSelection::LoadAll => {
                self.start_load_all_destinations();
            }
            InitialSelection::Wait => {}
        }

        let report = {
            let mut state = self.state.lock();
            let report = !state.no_destinations_reported
                && !state.is_search_in_progress()
                && state.types_to_search.is_empty();
            if report {
                state.no_destinations_reported = true;
            }
            report
        };
        if report {
            warn!("No destinations available");
            self.emit(DestinationStoreEvent::Error(
                DestinationErrorType::NoDestinations,
            ));
        }
    }

    /// Make `key` the selected destination.
    ///
    /// Re-selecting the current destination is a no-op unless `refresh` is
    /// set. Capabilities are fetched when missing.
    ///
    /// # Panics
    ///
    /// Panics when the destination is provisional.
    pub fn select_destination(self: &Arc<Self>, key: &str, refresh: bool) {
        let fetch = {
            let mut state = self.state.lock();
            if state.selected.as_deref() == Some(key) && !refresh {
                return;
            }
            let Some(destination) = state.destinations.get(key) else {
                warn!("Cannot select unknown destination {}", key);
                return;
            };
            assert!(
                !destination.is_provisional(),
                "Unable to select provisional destination {}",
                key
            );
            let fetch = destination
                .capabilities()
                .is_none()
                .then(|| (destination.id().to_string(), destination.printer_type()));
            state.selected = Some(key.to_string());
            fetch
        };

        self.emit(DestinationStoreEvent::DestinationSelect(key.to_string()));

        let Some((id, printer_type)) = fetch else {
            self.emit(DestinationStoreEvent::SelectedDestinationCapabilitiesReady(
                key.to_string(),
            ));
            return;
        };

        let store = Arc::clone(self);
        let key = key.to_string();
        tokio::spawn(async move {
            let result = store.service.get_capabilities(&id, printer_type).await;
            match result {
                Ok(response) => store.on_capabilities_set(&key, response),
                Err(e) => store.on_get_capabilities_fail(&key, e),
            }
        });
    }

    fn on_capabilities_set(&self, key: &str, response: CapabilitiesResponse) {
        let Some(mut destination) = self.get(key) else {
            debug!("Dropping capabilities for removed destination {}", key);
            return;
        };
        if let Some(status) = response
            .printer
            .as_ref()
            .and_then(|printer| printer.printer_status.as_ref())
        {
            destination.set_printer_status_reason(Some(
                crate::printer_status::get_status_reason_from_printer_status(status),
            ));
        }
        destination.set_capabilities(response.capabilities.map(Arc::new));
        self.update_destination(destination);
    }

    fn on_get_capabilities_fail(&self, key: &str, error: ServiceError) {
        let selected = self.state.lock().selected.as_deref() == Some(key);
        if selected {
            warn!("Failed to get capabilities for {}: {}", key, error);
            self.emit(DestinationStoreEvent::Error(DestinationErrorType::Invalid));
        } else {
            debug!("Ignoring capability failure for unselected {}: {}", key, error);
        }
    }

    /// Overwrite a stored destination in place.
    ///
    /// Capabilities already present are kept, so a late response cannot
    /// clobber the first one.
    pub fn update_destination(&self, mut destination: Destination) {
        let key = destination.key().to_string();
        let selected = {
            let mut state = self.state.lock();
            let Some(existing) = state.destinations.get_mut(&key) else {
                debug!("Ignoring update for unknown destination {}", key);
                return;
            };
            if existing.capabilities().is_some() {
                destination.set_capabilities(existing.capabilities().cloned());
            }
            *existing = destination;
            state.selected.as_deref() == Some(key.as_str())
        };
        if selected {
            self.emit(DestinationStoreEvent::SelectedDestinationCapabilitiesReady(key));
        }
    }

    /// Insert one destination. Returns false when the key already exists.
    pub fn insert_destination(&self, destination: Destination) -> bool {
        self.insert_destinations(vec![destination]) == 1
    }

    /// Insert destinations, skipping keys that already exist. Returns the
    /// number inserted.
    pub fn insert_destinations(&self, destinations: Vec<Destination>) -> usize {
        let mut inserted = 0;
        {
            let mut state = self.state.lock();
            for destination in destinations {
                let key = destination.key().to_string();
                if state.insert(destination) {
                    inserted += 1;
                } else {
                    debug!("Skipping duplicate destination {}", key);
                }
            }
        }
        if inserted > 0 {
            self.emit(DestinationStoreEvent::DestinationsInserted);
        }
        inserted
    }

    /// Ask for access to a provisional destination and replace it with the
    /// resolved printer. The provisional entry is removed either way.
    pub async fn resolve_provisional_destination(&self, key: &str) -> Option<Destination> {
        let id = {
            let state = self.state.lock();
            let destination = state.destinations.get(key)?;
            if !destination.is_provisional() {
                warn!("Destination {} is not provisional", key);
                return None;
            }
            destination.id().to_string()
        };

        let result = self.service.grant_extension_printer_access(&id).await;
        self.state.lock().remove(key);

        match result {
            Ok(descriptor) => {
                let resolved = Destination::from_descriptor(
                    &descriptor,
                    PrinterType::Extension,
                    self.platform.is_chrome_os(),
                );
                self.insert_destination(resolved.clone());
                info!("Resolved provisional destination {}", key);
                Some(resolved)
            }
            Err(e) => {
                warn!("Failed to resolve provisional destination {}: {}", key, e);
                None
            }
        }
    }

    /// All destinations in discovery order.
    pub fn destinations(&self) -> Vec<Destination> {
        let state = self.state.lock();
        state
            .keys
            .iter()
            .filter_map(|key| state.destinations.get(key).cloned())
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<Destination> {
        self.state.lock().destinations.get(key).cloned()
    }

    pub fn selected_destination(&self) -> Option<Destination> {
        let state = self.state.lock();
        state
            .selected
            .as_ref()
            .and_then(|key| state.destinations.get(key).cloned())
    }

    pub fn is_print_destination_search_in_progress(&self) -> bool {
        self.state.lock().is_search_in_progress()
    }

    pub fn search_status(&self, printer_type: PrinterType) -> SearchStatus {
        self.state
            .lock()
            .search_status
            .get(&printer_type)
            .copied()
            .unwrap_or_default()
    }

    pub fn initial_destination_selected(&self) -> bool {
        self.state.lock().initial_destination_selected
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
