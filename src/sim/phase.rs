//! Run lifecycle state machine
//!
//! ```text
//! Menu -> Lobby <-> Tutorial
//! Lobby -> Playing (deploy)         Playing <-> Paused
//! Playing -> ExtractionReady        ExtractionReady <-> Extracting
//! Extracting -> Report (won)        {Playing, ExtractionReady, Extracting} -> Report (lost)
//! Report -> Lobby                   {Lobby, Paused} -> Menu
//! ```

use serde::{Deserialize, Serialize};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Menu,
    Tutorial,
    Lobby,
    Playing,
    Paused,
    /// Countdown expired, zone is open
    ExtractionReady,
    /// Player is inside the zone
    Extracting,
    /// Run over, showing the outcome
    Report,
}

impl GamePhase {
    /// Phases in which the simulation advances
    pub fn is_active(self) -> bool {
        matches!(
            self,
            GamePhase::Playing | GamePhase::ExtractionReady | GamePhase::Extracting
        )
    }

    /// Resolve the phase after `event`, or `None` if the event does not apply
    pub fn next(self, event: PhaseEvent) -> Option<GamePhase> {
        use GamePhase::*;
        use PhaseEvent::*;

        match (self, event) {
            (Menu, OpenLobby) => Some(Lobby),
            (Menu | Lobby, OpenTutorial) => Some(Tutorial),
            (Tutorial, CloseTutorial) => Some(Lobby),
            (Lobby | Paused, ReturnToMenu) => Some(Menu),
            (Lobby, Deploy) => Some(Playing),
            (Playing, Pause) => Some(Paused),
            (Paused, Resume) => Some(Playing),
            (Playing, CountdownExpired) => Some(ExtractionReady),
            (ExtractionReady | Extracting, EnterZone) => Some(Extracting),
            (Extracting, LeaveZone) => Some(ExtractionReady),
            (Extracting, Extracted) => Some(Report),
            (Playing | ExtractionReady | Extracting, Died) => Some(Report),
            (Report, Continue) => Some(Lobby),
            _ => None,
        }
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseEvent {
    OpenLobby,
    OpenTutorial,
    CloseTutorial,
    ReturnToMenu,
    Deploy,
    Pause,
    Resume,
    CountdownExpired,
    EnterZone,
    LeaveZone,
    Extracted,
    Died,
    Continue,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}
