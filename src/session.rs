//! One print preview session: discovery, settings and the ticket.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use printpreview_config::Config;
use printpreview_core::destination::make_recent_destination;
use printpreview_core::{
    Destination, DestinationErrorType, DestinationStore, DestinationStoreEvent, InitOptions,
    PrintError, PrintPreviewModel, PrintState, PrintTicket, PrintWorkflow, RecentDestination,
    SettingName,
};
use printpreview_protocols::{Policies, PrinterService};

/// Recent destinations kept in the sticky settings.
const MAX_RECENT_DESTINATIONS: usize = 5;

/// Extra time allowed after the search timeout for the capability fetch.
const CAPABILITIES_GRACE: Duration = Duration::from_secs(5);

/// Read the persisted sticky settings, if any.
pub(crate) fn read_sticky_settings(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!("Failed to read sticky settings {}: {}", path.display(), e);
            None
        }
    }
}

pub(crate) fn write_sticky_settings(path: &Path, blob: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, blob)
        .with_context(|| format!("failed to write sticky settings {}", path.display()))?;
    debug!("Saved sticky settings to {}", path.display());
    Ok(())
}

/// Parse `name=value`. The value is read as JSON when it parses, else as a
/// plain string, so `copies=2` and `scaling=90` both work.
pub(crate) fn parse_assignment(assignment: &str) -> anyhow::Result<(SettingName, Value)> {
    let (name, raw) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{}'", assignment))?;
    let name: SettingName = name.trim().parse().map_err(|e: String| anyhow!(e))?;
    let raw = raw.trim();
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name, value))
}

pub(crate) struct Session {
    config: Config,
    store: Arc<DestinationStore>,
    events: broadcast::Receiver<DestinationStoreEvent>,
    model: PrintPreviewModel,
    workflow: PrintWorkflow,
}

impl Session {
    pub(crate) fn new(
        config: Config,
        service: Arc<dyn PrinterService>,
        policies: Option<&Policies>,
        sticky_settings: Option<&str>,
    ) -> Self {
        let platform = config.platform.kind;
        let store = DestinationStore::new(
            service,
            platform,
            Duration::from_millis(config.destinations.search_timeout_ms),
        );
        let events = store.subscribe();

        let mut model = PrintPreviewModel::new(platform);
        if let Some(policies) = policies {
            model.set_policy_settings(policies);
        }
        model.set_sticky_settings(sticky_settings);

        Self {
            config,
            store,
            events,
            model,
            workflow: PrintWorkflow::new(),
        }
    }

    pub(crate) fn model(&self) -> &PrintPreviewModel {
        &self.model
    }

    pub(crate) fn state(&self) -> PrintState {
        self.workflow.state()
    }

    pub(crate) fn destinations(&self) -> Vec<Destination> {
        self.store.destinations()
    }

    fn wait_limit(&self) -> Duration {
        Duration::from_millis(self.config.destinations.search_timeout_ms) + CAPABILITIES_GRACE
    }

    fn recent_destinations(&self) -> Vec<RecentDestination> {
        let recents = self.model.get_setting_value(SettingName::RecentDestinations);
        match serde_json::from_value(recents) {
            Ok(recents) => recents,
            Err(e) => {
                warn!("Ignoring unreadable recent destinations: {}", e);
                Vec::new()
            }
        }
    }

    async fn next_event(&mut self, deadline: Instant) -> anyhow::Result<DestinationStoreEvent> {
        loop {
            match tokio::time::timeout_at(deadline, self.events.recv()).await {
                Err(_) => bail!("timed out waiting for print destinations"),
                Ok(Ok(event)) => return Ok(event),
                Ok(Err(RecvError::Lagged(missed))) => {
                    warn!("Missed {} destination store events", missed);
                }
                Ok(Err(RecvError::Closed)) => bail!("destination store shut down"),
            }
        }
    }

    fn fail(&self, error: PrintError) {
        self.workflow.set_error(error);
        if self.workflow.can_transit_to(PrintState::Error) {
            self.workflow.transit_to(PrintState::Error);
        }
    }

    /// Wait until `key` is selected with capabilities.
    async fn wait_for_capabilities(&mut self, key: &str) -> anyhow::Result<Destination> {
        let deadline = Instant::now() + self.wait_limit();
        loop {
            match self.next_event(deadline).await? {
                DestinationStoreEvent::SelectedDestinationCapabilitiesReady(ready) if ready == key => {
                    return self
                        .store
                        .get(key)
                        .ok_or_else(|| anyhow!("destination {} disappeared", key));
                }
                DestinationStoreEvent::Error(DestinationErrorType::Invalid) => {
                    self.fail(PrintError::InvalidPrinter);
                    bail!("printer {} is unavailable", key);
                }
                DestinationStoreEvent::Error(DestinationErrorType::NoDestinations) => {
                    self.fail(PrintError::NoDestinations);
                    bail!("no print destinations available");
                }
                _ => {}
            }
        }
    }

    /// Run discovery and wait for the automatically chosen destination.
    pub(crate) async fn start(&mut self) -> anyhow::Result<Destination> {
        let destinations = &self.config.destinations;
        let options = InitOptions {
            pdf_printer_disabled: destinations.pdf_printer_disabled,
            save_to_drive_disabled: destinations.save_to_drive_disabled,
            system_default_destination_id: destinations.system_default_printer.clone(),
            default_destination_selection_rules: destinations
                .default_destination_selection_rules
                .clone(),
            recent_destinations: self.recent_destinations(),
            use_system_default_as_default: destinations.use_system_default_printer,
        };
        self.store.init(options);

        let deadline = Instant::now() + self.wait_limit();
        loop {
            match self.next_event(deadline).await? {
                DestinationStoreEvent::SelectedDestinationCapabilitiesReady(key) => {
                    if let Some(selected) = self.store.selected_destination() {
                        if selected.key() == key {
                            info!("Selected destination {}", key);
                            return Ok(selected);
                        }
                    }
                }
                DestinationStoreEvent::Error(DestinationErrorType::Invalid) => {
                    self.fail(PrintError::InvalidPrinter);
                    bail!("selected printer is unavailable");
                }
                DestinationStoreEvent::Error(DestinationErrorType::NoDestinations) => {
                    self.fail(PrintError::NoDestinations);
                    bail!("no print destinations available");
                }
                _ => {}
            }
        }
    }

    /// Search every printer source and wait for all of them to finish.
    pub(crate) async fn load_all(&mut self) -> anyhow::Result<()> {
        self.store.start_load_all_destinations();
        let deadline = Instant::now() + self.wait_limit();
        while self.store.is_print_destination_search_in_progress() {
            self.next_event(deadline).await?;
        }
        Ok(())
    }

    /// Switch to the destination with the given id.
    pub(crate) async fn select(&mut self, id: &str) -> anyhow::Result<Destination> {
        self.load_all().await?;
        let destination = self
            .store
            .destinations()
            .into_iter()
            .find(|d| d.id() == id)
            .ok_or_else(|| anyhow!("unknown destination: {}", id))?;

        let destination = if destination.is_provisional() {
            self.store
                .resolve_provisional_destination(destination.key())
                .await
                .ok_or_else(|| anyhow!("access to printer {} was not granted", id))?
        } else {
            destination
        };

        let key = destination.key().to_string();
        if let Some(selected) = self.store.selected_destination() {
            if selected.key() == key {
                return Ok(selected);
            }
        }
        self.store.select_destination(&key, false);
        self.wait_for_capabilities(&key).await
    }

    /// Configure the settings model for a destination with capabilities.
    pub(crate) fn configure(&mut self, destination: Destination) {
        let recent = make_recent_destination(&destination);
        self.model.set_destination(destination);
        if !self.model.initialized() {
            self.model.apply_sticky_settings();
        }
        self.model.apply_policies_on_destination_update();
        self.remember(recent);

        if self.workflow.can_transit_to(PrintState::Ready) {
            self.workflow.transit_to(PrintState::Ready);
        }
    }

    /// Move a destination to the front of the recent list.
    fn remember(&mut self, recent: RecentDestination) {
        let key = recent.key();
        let mut recents = self.recent_destinations();
        recents.retain(|r| r.key() != key);
        recents.insert(0, recent);
        recents.truncate(MAX_RECENT_DESTINATIONS);
        match serde_json::to_value(&recents) {
            Ok(value) => self
                .model
                .set_setting(SettingName::RecentDestinations, value, false),
            Err(e) => warn!("Failed to record recent destination: {}", e),
        }
    }

    pub(crate) fn apply_assignments(&mut self, assignments: &[String]) -> anyhow::Result<()> {
        for assignment in assignments {
            let (name, value) = parse_assignment(assignment)?;
            let setting = self.model.get_setting(name);
            if !setting.available {
                warn!("Setting {} is not available for this destination", name);
            }
            if setting.set_by_policy {
                warn!("Setting {} is managed by policy", name);
            }
            self.model.set_setting(name, value, false);
        }
        Ok(())
    }

    /// Build the ticket for the configured destination and close the session.
    pub(crate) fn print(
        &mut self,
        open_pdf_in_preview: bool,
        show_system_dialog: bool,
    ) -> anyhow::Result<PrintTicket> {
        let destination = self
            .model
            .destination()
            .cloned()
            .ok_or_else(|| anyhow!("no destination configured"))?;
        if destination.capabilities().is_none() {
            self.fail(PrintError::InvalidTicket);
            bail!("destination {} has no capabilities", destination.key());
        }

        let next = if show_system_dialog {
            PrintState::SystemDialog
        } else {
            PrintState::Printing
        };
        if !self.workflow.can_transit_to(next) {
            bail!("cannot print from state {:?}", self.workflow.state());
        }
        self.workflow.transit_to(next);

        let ticket = self.model.create_print_ticket(
            &destination,
            open_pdf_in_preview,
            show_system_dialog,
        );
        self.workflow.transit_to(PrintState::Closing);
        Ok(ticket)
    }

    pub(crate) fn sticky_settings(&self) -> String {
        self.model.get_sticky_settings()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
