//! Wire payloads for the Fintopio API

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Response from `GET /auth/telegram`.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Profile snapshot from `GET /referrals/data`.
///
/// Display only — the farming loop never branches on it. The balance comes
/// back as a decimal string; unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub balance: String,
}

/// Server-reported farming phase.
///
/// Unknown values are preserved rather than rejected: the loop takes no
/// action on them but still logs what the server said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FarmState {
    Farmed,
    Idling,
    Farming,
    Other(String),
}

impl<'de> Deserialize<'de> for FarmState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "farmed" => FarmState::Farmed,
            "idling" => FarmState::Idling,
            "farming" => FarmState::Farming,
            _ => FarmState::Other(raw),
        })
    }
}

impl fmt::Display for FarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FarmState::Farmed => f.write_str("farmed"),
            FarmState::Idling => f.write_str("idling"),
            FarmState::Farming => f.write_str("farming"),
            FarmState::Other(raw) => f.write_str(raw),
        }
    }
}

/// Cycle timestamps. `finish` is epoch milliseconds; absence means no
/// active cycle.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Timings {
    #[serde(default)]
    pub finish: Option<u64>,
}

/// Response from `GET /farming/state` — the sole driver of the state machine.
#[derive(Debug, Clone, Deserialize)]
pub struct FarmingState {
    pub state: FarmState,
    #[serde(default)]
    pub timings: Timings,
}

impl FarmingState {
    pub fn finish(&self) -> Option<u64> {
        self.timings.finish
    }
}

/// Response from `POST /farming/farm`.
#[derive(Debug, Deserialize)]
pub struct FarmResponse {
    #[serde(default)]
    pub timings: Timings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farming_state_deserializes_known_states() {
        let json = r#"{"state":"farming","timings":{"finish":1724630400000}}"#;
        let state: FarmingState = serde_json::from_str(json).unwrap();
        assert_eq!(state.state, FarmState::Farming);
        assert_eq!(state.finish(), Some(1724630400000));
    }

    #[test]
    fn farming_state_tolerates_missing_timings() {
        let json = r#"{"state":"idling"}"#;
        let state: FarmingState = serde_json::from_str(json).unwrap();
        assert_eq!(state.state, FarmState::Idling);
        assert_eq!(state.finish(), None);
    }

    #[test]
    fn farming_state_empty_timings_has_no_finish() {
        let json = r#"{"state":"farming","timings":{}}"#;
        let state: FarmingState = serde_json::from_str(json).unwrap();
        assert_eq!(state.finish(), None);
    }

    #[test]
    fn unknown_state_preserved_verbatim() {
        let json = r#"{"state":"maintenance","timings":{}}"#;
        let state: FarmingState = serde_json::from_str(json).unwrap();
        assert_eq!(state.state, FarmState::Other("maintenance".into()));
        assert_eq!(state.state.to_string(), "maintenance");
    }

    #[test]
    fn profile_ignores_unknown_fields() {
        let json = r#"{"balance":"1234.56","referralCount":7}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.balance, "1234.56");
    }

    #[test]
    fn profile_defaults_missing_balance() {
        let profile: Profile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile.balance, "");
    }

    #[test]
    fn auth_response_deserializes() {
        let auth: AuthResponse = serde_json::from_str(r#"{"token":"jwt-abc"}"#).unwrap();
        assert_eq!(auth.token, "jwt-abc");
    }
}
