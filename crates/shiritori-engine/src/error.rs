//! Error types for the engine layer.

use shiritori_protocol::TurnEpoch;

/// Why a command was refused.
///
/// A refused command never changes the game. Turn outcomes such as
/// "too short" are *not* errors: they resolve the turn and show up in
/// the history instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Gameplay command before the game was started.
    #[error("game has not started")]
    NotStarted,

    /// `StartGame` on a game that is already running.
    #[error("game already started")]
    AlreadyStarted,

    /// Gameplay command after the game ended.
    #[error("game has ended")]
    GameEnded,

    /// A word is already being checked for this turn.
    #[error("a word is already being validated")]
    ValidationPending,

    /// The start letter can only be re-rolled before the first valid word.
    #[error("chain already started")]
    ChainAlreadyStarted,

    /// The submission was made for a turn that has already resolved.
    #[error("command issued for turn {issued} but turn {live} is live")]
    StaleCommand { issued: TurnEpoch, live: TurnEpoch },

    /// Player names can't be blank.
    #[error("player name is empty")]
    EmptyName,

    /// The engine task has stopped.
    #[error("engine is unavailable")]
    Unavailable,
}

impl EngineError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::AlreadyStarted => "already_started",
            Self::GameEnded => "game_ended",
            Self::ValidationPending => "validation_pending",
            Self::ChainAlreadyStarted => "chain_already_started",
            Self::StaleCommand { .. } => "stale_command",
            Self::EmptyName => "empty_name",
            Self::Unavailable => "unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_snake_case() {
        assert_eq!(EngineError::ChainAlreadyStarted.code(), "chain_already_started");
        assert_eq!(EngineError::NotStarted.code(), "not_started");
    }

    #[test]
    fn test_stale_command_message() {
        let err = EngineError::StaleCommand {
            issued: TurnEpoch(1),
            live: TurnEpoch(2),
        };
        assert_eq!(err.to_string(), "command issued for turn E-1 but turn E-2 is live");
    }
}
