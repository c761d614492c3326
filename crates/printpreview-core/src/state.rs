//! Print workflow state machine.
//!
//! Guards the preview/print lifecycle. Transitions are checked against a
//! fixed table of allowed predecessors; an illegal transition is a caller
//! bug and panics.

use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::broadcast;
use tracing::debug;

/// Workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PrintState {
    NotReady = 0,
    Ready = 1,
    Hidden = 2,
    Printing = 3,
    SystemDialog = 4,
    Error = 5,
    FatalError = 6,
    Closing = 7,
}

impl From<u8> for PrintState {
    fn from(v: u8) -> Self {
        match v {
            0 => PrintState::NotReady,
            1 => PrintState::Ready,
            2 => PrintState::Hidden,
            3 => PrintState::Printing,
            4 => PrintState::SystemDialog,
            5 => PrintState::Error,
            6 => PrintState::FatalError,
            7 => PrintState::Closing,
            _ => PrintState::NotReady,
        }
    }
}

impl std::fmt::Display for PrintState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrintState::NotReady => write!(f, "not-ready"),
            PrintState::Ready => write!(f, "ready"),
            PrintState::Hidden => write!(f, "hidden"),
            PrintState::Printing => write!(f, "printing"),
            PrintState::SystemDialog => write!(f, "system-dialog"),
            PrintState::Error => write!(f, "error"),
            PrintState::FatalError => write!(f, "fatal-error"),
            PrintState::Closing => write!(f, "closing"),
        }
    }
}

impl PrintState {
    /// Whether `self` may be entered from `from`.
    pub fn can_enter_from(self, from: PrintState) -> bool {
        use PrintState::*;
        match self {
            NotReady => matches!(from, NotReady | Ready | Error),
            Ready => matches!(from, Error | NotReady | Printing),
            Hidden => from == Ready,
            Printing => matches!(from, Ready | Hidden),
            SystemDialog => !matches!(from, Hidden | Printing | Closing),
            Error => matches!(from, Error | NotReady | Ready),
            Closing => from != Hidden,
            FatalError => true,
        }
    }
}

/// Why the workflow is in an error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PrintError {
    None = 0,
    InvalidTicket = 1,
    InvalidPrinter = 2,
    NoDestinations = 3,
    PreviewFailed = 4,
    PrintFailed = 5,
}

impl From<u8> for PrintError {
    fn from(v: u8) -> Self {
        match v {
            1 => PrintError::InvalidTicket,
            2 => PrintError::InvalidPrinter,
            3 => PrintError::NoDestinations,
            4 => PrintError::PreviewFailed,
            5 => PrintError::PrintFailed,
            _ => PrintError::None,
        }
    }
}

/// Current workflow state plus error code.
pub struct PrintWorkflow {
    state: AtomicU8,
    error: AtomicU8,
    sender: broadcast::Sender<PrintState>,
}

impl PrintWorkflow {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            state: AtomicU8::new(PrintState::NotReady as u8),
            error: AtomicU8::new(PrintError::None as u8),
            sender,
        }
    }

    pub fn state(&self) -> PrintState {
        PrintState::from(self.state.load(Ordering::SeqCst))
    }

    pub fn error(&self) -> PrintError {
        PrintError::from(self.error.load(Ordering::SeqCst))
    }

    pub fn can_transit_to(&self, new_state: PrintState) -> bool {
        new_state.can_enter_from(self.state())
    }

    /// Move to `new_state`.
    ///
    /// # Panics
    ///
    /// Panics when `new_state` may not be entered from the current state.
    pub fn transit_to(&self, new_state: PrintState) {
        let current = self.state();
        assert!(
            new_state.can_enter_from(current),
            "Illegal print state transition: {} -> {}",
            current,
            new_state
        );

        self.state.store(new_state as u8, Ordering::SeqCst);
        if !matches!(new_state, PrintState::Error | PrintState::FatalError) {
            self.error.store(PrintError::None as u8, Ordering::SeqCst);
        }
        debug!("Print state {} -> {}", current, new_state);
        let _ = self.sender.send(new_state);
    }

    pub fn set_error(&self, error: PrintError) {
        self.error.store(error as u8, Ordering::SeqCst);
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> broadcast::Receiver<PrintState> {
        self.sender.subscribe()
    }
}

impl Default for PrintWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
