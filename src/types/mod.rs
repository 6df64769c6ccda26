//! Core types for relframe

mod keyword;
mod symbol;
mod cipher;
mod geometry;
mod round;
mod settings;
mod state;
mod session;
mod reason;
mod output;
mod error;

pub use keyword::RelationKeyword;
pub use symbol::{Symbol, SymbolId, SymbolKind, SymbolStyle, PolygonShape};
pub use cipher::{CipherMap, Legend, display_token};
pub use geometry::{Position, Heading};
pub use round::{Frame, SpatialMode, Premise, Instruction, Query, Observer, Walk, SpatialDetail, RoundModifiers, RoundState};
pub use settings::{GameSettings, ActiveModes, MovementQueryPolicy, Modifier};
pub use state::Phase;
pub use session::{SessionState, RoundRecord, SessionRecord, SessionEndCause};
pub use reason::ReasonCode;
pub use output::Transition;
pub use error::GameError;
