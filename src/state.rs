use std::fmt;

/// Which of the two diagram states is shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaultState {
    /// Layers are continuous across the fault
    #[default]
    Flat,
    /// The east block has slipped down along the fault
    Displaced,
}

impl FaultState {
    pub fn from_moved(moved: bool) -> Self {
        if moved {
            FaultState::Displaced
        } else {
            FaultState::Flat
        }
    }

    /// The state after one button activation
    pub fn toggled(self) -> Self {
        match self {
            FaultState::Flat => FaultState::Displaced,
            FaultState::Displaced => FaultState::Flat,
        }
    }
}

impl fmt::Display for FaultState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultState::Flat => f.write_str("flat"),
            FaultState::Displaced => f.write_str("displaced"),
        }
    }
}

/// Session state owned by the host
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    /// The "moved" flag passed to every render
    pub fault: FaultState,
    /// Enable debug mode
    pub debug: bool,
}

impl AppState {
    pub fn new(moved: bool) -> Self {
        AppState {
            fault: FaultState::from_moved(moved),
            debug: false,
        }
    }

    /// Flip the fault between its two states
    pub fn toggle(&mut self) {
        let next = self.fault.toggled();
        log::info!("fault state {} -> {}", self.fault, next);
        self.fault = next;
    }

    /// Return to the initial, undisturbed state
    pub fn reset(&mut self) {
        self.fault = FaultState::Flat;
    }
}
