//! Input source: one command per line
//!
//! | line                   | command            |
//! |------------------------|--------------------|
//! | `start`                | start session      |
//! | `ready`, empty line    | ready              |
//! | `y`, `yes`, `true`     | answer yes         |
//! | `n`, `no`, `false`     | answer no          |
//! | `signal`, `s`          | interference signal|
//! | `abort`                | abort session      |
//! | `set <key>=<value>`    | change a setting   |
//! | `quit`, `exit`         | leave the program  |

use lazy_static::lazy_static;
use regex::Regex;
use crate::core::controller::Event;
use crate::types::{GameError, GameSettings};

lazy_static! {
    static ref RE_START: Regex = Regex::new(r"(?i)^(start|begin)$").unwrap();
    static ref RE_READY: Regex = Regex::new(r"(?i)^(ready|r|next)?$").unwrap();
    static ref RE_YES: Regex = Regex::new(r"(?i)^(y|yes|true)$").unwrap();
    static ref RE_NO: Regex = Regex::new(r"(?i)^(n|no|false)$").unwrap();
    static ref RE_SIGNAL: Regex = Regex::new(r"(?i)^(signal|s)$").unwrap();
    static ref RE_ABORT: Regex = Regex::new(r"(?i)^abort$").unwrap();
    static ref RE_QUIT: Regex = Regex::new(r"(?i)^(quit|exit|q)$").unwrap();
    static ref RE_SET: Regex = Regex::new(r"(?i)^set\s+([A-Za-z0-9]+)\s*=\s*(\S+)$").unwrap();
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(Event),
    Set { key: String, value: String },
    Quit,
}

impl Command {
    /// Resolve into a controller event; `set` is applied on top of `current`
    pub fn into_event(self, current: &GameSettings) -> Result<Option<Event>, GameError> {
        match self {
            Command::Event(event) => Ok(Some(event)),
            Command::Set { key, value } => {
                let mut settings = current.clone();
                settings.set_key(&key, &value)?;
                Ok(Some(Event::SettingsChanged(settings)))
            }
            Command::Quit => Ok(None),
        }
    }
}

/// Parse one line of input
pub fn parse_line(line: &str) -> Result<Command, GameError> {
    let line = line.trim();
    let command = if RE_READY.is_match(line) {
        Command::Event(Event::Ready)
    } else if RE_START.is_match(line) {
        Command::Event(Event::StartSession)
    } else if RE_YES.is_match(line) {
        Command::Event(Event::Answer(Some(true)))
    } else if RE_NO.is_match(line) {
        Command::Event(Event::Answer(Some(false)))
    } else if RE_SIGNAL.is_match(line) {
        Command::Event(Event::InterferenceSignal)
    } else if RE_ABORT.is_match(line) {
        Command::Event(Event::Abort)
    } else if RE_QUIT.is_match(line) {
        Command::Quit
    } else if let Some(caps) = RE_SET.captures(line) {
        Command::Set {
            key: caps[1].to_string(),
            value: caps[2].to_string(),
        }
    } else {
        return Err(GameError::invalid_event(format!("unrecognised input '{line}'")));
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_and_phase_commands() {
        assert_eq!(parse_line("Y").unwrap(), Command::Event(Event::Answer(Some(true))));
        assert_eq!(parse_line(" no ").unwrap(), Command::Event(Event::Answer(Some(false))));
        assert_eq!(parse_line("").unwrap(), Command::Event(Event::Ready));
        assert_eq!(parse_line("s").unwrap(), Command::Event(Event::InterferenceSignal));
        assert_eq!(parse_line("start").unwrap(), Command::Event(Event::StartSession));
        assert_eq!(parse_line("abort").unwrap(), Command::Event(Event::Abort));
        assert_eq!(parse_line("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_set_builds_settings_event() {
        let cmd = parse_line("set numPremises = 4").unwrap();
        assert_eq!(
            cmd,
            Command::Set { key: "numPremises".into(), value: "4".into() }
        );
        let event = cmd.into_event(&GameSettings::default()).unwrap().unwrap();
        match event {
            Event::SettingsChanged(s) => assert_eq!(s.num_premises, 4),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_line_is_invalid_event() {
        let err = parse_line("jump").unwrap_err();
        assert!(matches!(err, GameError::InvalidEvent(_)));
        assert!(parse_line("set").is_err());
    }

    #[test]
    fn test_bad_setting_value_is_configuration_error() {
        let cmd = parse_line("set blindMode=perhaps").unwrap();
        assert!(cmd.into_event(&GameSettings::default()).unwrap_err().is_configuration());
    }
}
