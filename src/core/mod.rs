//! Core modules for relframe

pub mod symbols;
pub mod cipher;
pub mod geometry;
pub mod transform;
pub mod generator;
pub mod linear;
pub mod distinction;
pub mod hierarchy;
pub mod spatial;
pub mod adaptive;
pub mod interference;
pub mod timers;
pub mod controller;
pub mod storage;
pub mod analytics;
pub mod input;
pub mod driver;

pub use symbols::SymbolProvider;
pub use cipher::{CipherEngine, KeyUpdate};
pub use generator::{generator_for, RelationGenerator, RoundGenerator, RoundRequest};
pub use spatial::SpatialGenerator;
pub use adaptive::DepthChange;
pub use interference::{InterferenceEpisode, SignalOutcome};
pub use timers::{TimerHandle, TimerKind, TimerSet};
pub use controller::{Event, SessionController};
pub use storage::{HistoryRecorder, JsonFileStore, MemoryStore, SettingsStore};
pub use analytics::HistorySummary;
pub use input::{parse_line, Command};
pub use driver::TimerDriver;
