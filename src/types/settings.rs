//! Game settings, persisted as one flat keyed record

use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::types::{Frame, GameError, SymbolStyle};
use crate::MIN_DEPTH;

/// Which relational frames may be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveModes {
    #[serde(rename = "modeLinear")]
    pub linear: bool,
    #[serde(rename = "modeDistinction")]
    pub distinction: bool,
    #[serde(rename = "modeSpatial2d")]
    pub spatial_2d: bool,
    #[serde(rename = "modeSpatial3d")]
    pub spatial_3d: bool,
    #[serde(rename = "modeHierarchy")]
    pub hierarchy: bool,
}

impl Default for ActiveModes {
    fn default() -> Self {
        Self {
            linear: true,
            distinction: true,
            spatial_2d: true,
            spatial_3d: false,
            hierarchy: true,
        }
    }
}

impl ActiveModes {
    pub fn is_enabled(&self, frame: Frame) -> bool {
        match frame {
            Frame::Linear => self.linear,
            Frame::Distinction => self.distinction,
            Frame::Hierarchy => self.hierarchy,
            Frame::Spatial2D => self.spatial_2d,
            Frame::Spatial3D => self.spatial_3d,
        }
    }

    pub fn set(&mut self, frame: Frame, on: bool) {
        match frame {
            Frame::Linear => self.linear = on,
            Frame::Distinction => self.distinction = on,
            Frame::Hierarchy => self.hierarchy = on,
            Frame::Spatial2D => self.spatial_2d = on,
            Frame::Spatial3D => self.spatial_3d = on,
        }
    }

    /// Enabled frames in canonical order
    pub fn enabled(&self) -> Vec<Frame> {
        Frame::ALL.into_iter().filter(|f| self.is_enabled(*f)).collect()
    }
}

/// How a movement round builds its query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementQueryPolicy {
    /// 50/50 true/false sampling, same as standard and deictic rounds
    #[default]
    Symmetric,
    /// Ask any bearing; the answer is whether it equals the true one
    Equality,
}

/// Optional layers on top of a frame, as recorded in session history
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modifier {
    Blind,
    Deictic,
    Movement,
    Transformation,
    Cipher,
    Interference,
}

/// Player-facing configuration. Changes apply from the next round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameSettings {
    #[serde(flatten)]
    pub active_modes: ActiveModes,
    pub num_premises: usize,
    pub auto_progress: bool,
    pub use_question_timer: bool,
    /// Seconds
    pub question_time_limit: u32,
    pub session_length_minutes: u32,
    pub disable_session_timer: bool,
    pub blind_mode: bool,
    pub symbol_mode: SymbolStyle,
    pub enable_deictic: bool,
    pub enable_movement: bool,
    pub enable_transformation: bool,
    pub enable_cipher: bool,
    pub enable_interference: bool,
    pub movement_query_policy: MovementQueryPolicy,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            active_modes: ActiveModes::default(),
            num_premises: MIN_DEPTH,
            auto_progress: true,
            use_question_timer: false,
            question_time_limit: 30,
            session_length_minutes: 5,
            disable_session_timer: false,
            blind_mode: false,
            symbol_mode: SymbolStyle::default(),
            enable_deictic: false,
            enable_movement: false,
            enable_transformation: false,
            enable_cipher: false,
            enable_interference: false,
            movement_query_policy: MovementQueryPolicy::default(),
        }
    }
}

impl GameSettings {
    /// Reject values no round could run with
    pub fn validate(&self) -> Result<(), GameError> {
        if self.num_premises < MIN_DEPTH {
            return Err(GameError::configuration(format!(
                "numPremises must be at least {}, got {}",
                MIN_DEPTH, self.num_premises
            )));
        }
        if self.use_question_timer && self.question_time_limit == 0 {
            return Err(GameError::configuration(
                "questionTimeLimit must be positive when the question timer is on",
            ));
        }
        if !self.disable_session_timer && self.session_length_minutes == 0 {
            return Err(GameError::configuration(
                "sessionLengthMinutes must be positive when the session timer is on",
            ));
        }
        Ok(())
    }

    pub fn enabled_frames(&self) -> Vec<Frame> {
        self.active_modes.enabled()
    }

    /// Modifiers switched on, for the session record
    pub fn active_modifiers(&self) -> Vec<Modifier> {
        [
            (self.blind_mode, Modifier::Blind),
            (self.enable_deictic, Modifier::Deictic),
            (self.enable_movement, Modifier::Movement),
            (self.enable_transformation, Modifier::Transformation),
            (self.enable_cipher, Modifier::Cipher),
            (self.enable_interference, Modifier::Interference),
        ]
        .into_iter()
        .filter_map(|(on, m)| on.then_some(m))
        .collect()
    }

    /// Flat keyed view, as stored on disk
    pub fn to_record(&self) -> Result<serde_json::Map<String, Value>, GameError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(GameError::configuration("settings did not serialize to a record")),
        }
    }

    /// Rebuild from a flat keyed record; missing keys take defaults
    pub fn from_record(record: serde_json::Map<String, Value>) -> Result<Self, GameError> {
        let settings: GameSettings = serde_json::from_value(Value::Object(record))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Update a single flat key from its text form, e.g. `numPremises=4`
    pub fn set_key(&mut self, key: &str, raw: &str) -> Result<(), GameError> {
        let mut record = self.to_record()?;
        let current = record
            .get(key)
            .ok_or_else(|| GameError::configuration(format!("unknown setting '{key}'")))?;

        let parsed = match current {
            Value::Bool(_) => Value::Bool(parse_bool(raw).ok_or_else(|| {
                GameError::configuration(format!("'{key}' expects true/false, got '{raw}'"))
            })?),
            Value::Number(_) => {
                let n: u64 = raw.trim().parse().map_err(|_| {
                    GameError::configuration(format!("'{key}' expects a number, got '{raw}'"))
                })?;
                Value::from(n)
            }
            _ => Value::String(raw.trim().to_ascii_uppercase()),
        };
        record.insert(key.to_string(), parsed);

        let updated: GameSettings = serde_json::from_value(Value::Object(record))
            .map_err(|e| GameError::configuration(format!("invalid value for '{key}': {e}")))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
