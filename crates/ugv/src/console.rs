//! Operator session: one vehicle, its waypoints and the motion engine.
//!
//! Commands arrive one line at a time. A drive only starts the motion
//! engine; the host advances it by calling [`Console::tick`] once per frame
//! while [`Console::is_driving`] holds.

use crate::{config::Config, overlay::TracingOverlay};
use std::{fmt::Write as _, str::FromStr};
use thiserror::Error;
use tracing::info;
use ugv_core::{
    geo::LatLng,
    motion::{DriveError, DriveOutcome, Frame, MotionEngine, Termination},
    observer::{DriveObserver, Notifier},
    vehicle::VehicleState,
};
use ugv_waypoints::{KeyValueStore, Persisted, Waypoint, WaypointError, WaypointStore};

pub const HELP: &str = "\
commands:
  engine on|off               start or stop the engine
  add <name> <lat> <lng> [id] save a waypoint
  remove <id>                 delete a waypoint
  rename <id> <name>          rename a waypoint
  list                        show saved waypoints
  drive <id>                  drive to a waypoint
  stop                        abandon the current drive
  status                      show the vehicle state
  help                        show this message
  quit                        leave the console
names containing spaces go in double quotes: rename h \"north pier\"";

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),
    #[error("unterminated quote")]
    UnterminatedQuote,
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid coordinate {0:?}")]
    InvalidCoordinate(String),
    #[error("no waypoint with id {0:?}")]
    UnknownWaypoint(String),
    #[error(transparent)]
    Drive(#[from] DriveError),
    #[error(transparent)]
    Waypoint(#[from] WaypointError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Engine(bool),
    Add {
        name: String,
        location: LatLng,
        id: Option<String>,
    },
    Remove(String),
    Rename {
        id: String,
        name: String,
    },
    List,
    Drive(String),
    Stop,
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words = split_words(line)?;
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        let Some((&verb, args)) = words.split_first() else {
            return Err(CommandError::Empty);
        };

        let command = match (verb.to_lowercase().as_str(), args) {
            ("engine", ["on"]) => Command::Engine(true),
            ("engine", ["off"]) => Command::Engine(false),
            ("engine", _) => return Err(CommandError::Usage("engine on|off")),
            ("add", [name, lat, lng, rest @ ..]) if rest.len() <= 1 => Command::Add {
                name: name.to_string(),
                location: LatLng::new(coordinate(lat)?, coordinate(lng)?),
                id: rest.first().map(|id| id.to_string()),
            },
            ("add", _) => return Err(CommandError::Usage("add <name> <lat> <lng> [id]")),
            ("remove", [id]) => Command::Remove(id.to_string()),
            ("remove", _) => return Err(CommandError::Usage("remove <id>")),
            ("rename", [id, name]) => Command::Rename {
                id: id.to_string(),
                name: name.to_string(),
            },
            ("rename", _) => return Err(CommandError::Usage("rename <id> <name>")),
            ("list", []) => Command::List,
            ("drive", [id]) => Command::Drive(id.to_string()),
            ("drive", _) => return Err(CommandError::Usage("drive <id>")),
            ("stop", []) => Command::Stop,
            ("status", []) => Command::Status,
            ("help", _) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(CommandError::Unknown(line.trim().to_string())),
        };
        Ok(command)
    }
}

/// Split on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut word: Option<String> = None;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                word.get_or_insert_with(String::new);
            }
            c if c.is_whitespace() && !quoted => words.extend(word.take()),
            c => word.get_or_insert_with(String::new).push(c),
        }
    }
    if quoted {
        return Err(CommandError::UnterminatedQuote);
    }
    words.extend(word);
    Ok(words)
}

fn coordinate(word: &str) -> Result<f64, CommandError> {
    word.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandError::InvalidCoordinate(word.to_string()))
}

#[derive(Debug, PartialEq)]
pub enum Reply {
    Message(String),
    Quit,
}

pub struct Console<B, N, O = TracingOverlay> {
    vehicle: VehicleState,
    motion: MotionEngine,
    waypoints: WaypointStore<B>,
    notifier: N,
    overlay: O,
}

impl<B: KeyValueStore, N: Notifier> Console<B, N> {
    /// Session as configured: vehicle at the start location, engine off,
    /// waypoints loaded from `backend`.
    pub fn from_config(config: &Config, backend: B, notifier: N) -> Self {
        Console::new(
            VehicleState::new(config.vehicle.start),
            MotionEngine::new(config.motion_config()),
            WaypointStore::load(backend),
            notifier,
            TracingOverlay::new(u64::from(config.frames.rate_hz)),
        )
    }
}

impl<B: KeyValueStore, N: Notifier, O: DriveObserver> Console<B, N, O> {
    pub fn new(
        vehicle: VehicleState,
        motion: MotionEngine,
        waypoints: WaypointStore<B>,
        notifier: N,
        overlay: O,
    ) -> Self {
        Self {
            vehicle,
            motion,
            waypoints,
            notifier,
            overlay,
        }
    }

    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    pub fn waypoints(&self) -> &WaypointStore<B> {
        &self.waypoints
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn is_driving(&self) -> bool {
        self.motion.is_driving()
    }

    /// Advance the active drive by one frame.
    pub fn tick(&mut self) -> Frame {
        self.motion.frame(&mut self.vehicle, &mut self.overlay)
    }

    /// Parse and run one line of input.
    pub fn execute_line(&mut self, line: &str) -> Result<Reply, CommandError> {
        let command = line.parse()?;
        self.execute(command)
    }

    pub fn execute(&mut self, command: Command) -> Result<Reply, CommandError> {
        let message = match command {
            Command::Engine(on) => {
                self.vehicle.set_engine_enabled(on);
                info!(on, "engine toggled");
                format!("engine {}", if on { "on" } else { "off" })
            }
            Command::Add { name, location, id } => {
                let waypoint = match id {
                    Some(id) => Waypoint::new(id, name, location),
                    None => Waypoint::with_generated_id(name, location),
                };
                let id = waypoint.id.clone();
                let persisted = self.waypoints.add(waypoint)?;
                self.report(persisted);
                format!("added {id}")
            }
            Command::Remove(id) => {
                let persisted = self.waypoints.remove(&id);
                let removed = !matches!(persisted, Persisted::Unchanged);
                self.report(persisted);
                if removed {
                    format!("removed {id}")
                } else {
                    format!("no waypoint {id}")
                }
            }
            Command::Rename { id, name } => {
                let persisted = self.waypoints.rename(&id, name)?;
                self.report(persisted);
                format!("renamed {id}")
            }
            Command::List => self.list(),
            Command::Drive(id) => self.drive(&id)?,
            Command::Stop => {
                if self.motion.cancel(&mut self.vehicle, &mut self.overlay) {
                    "drive abandoned".to_string()
                } else {
                    "not driving".to_string()
                }
            }
            Command::Status => self.status(),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Message(message))
    }

    fn drive(&mut self, id: &str) -> Result<String, CommandError> {
        let waypoint = self
            .waypoints
            .get(id)
            .ok_or_else(|| CommandError::UnknownWaypoint(id.to_string()))?;
        let (name, target) = (waypoint.name.clone(), waypoint.location);

        if let Err(err) = self.motion.start(&self.vehicle, target, &mut self.overlay) {
            if err == DriveError::EngineNotStarted {
                self.notifier.warn(&err.to_string());
            }
            return Err(err.into());
        }
        info!(id, name = %name, to = %target, "driving to waypoint");
        Ok(format!("driving to {name} {target}"))
    }

    fn list(&self) -> String {
        if self.waypoints.is_empty() {
            return "no waypoints".to_string();
        }
        let mut out = String::new();
        for (i, w) in self.waypoints.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{}  {}  {}", w.id, w.name, w.location);
        }
        out
    }

    pub fn status(&self) -> String {
        let v = &self.vehicle;
        let mut out = format!(
            "at {} speed {:.3} engine {}",
            v.location,
            v.speed,
            if v.engine_enabled() { "on" } else { "off" }
        );
        if let Some(target) = self.motion.target() {
            let _ = write!(out, " driving to {target}");
        }
        out
    }

    fn report(&mut self, persisted: Persisted) {
        if let Some(err) = persisted.warning() {
            self.notifier.warn(&format!("waypoints not saved: {err}"));
        }
    }
}

/// Human-readable summary of a finished drive
pub fn describe_outcome(outcome: &DriveOutcome, vehicle: &VehicleState) -> String {
    match outcome.termination {
        Termination::Arrived => format!(
            "arrived at {} after {} frames",
            vehicle.location, outcome.frames
        ),
        Termination::Cancelled => format!(
            "drive cancelled at {} after {} frames",
            vehicle.location, outcome.frames
        ),
        Termination::Stalled => format!(
            "drive stalled at {} after {} frames, motion.step is too small",
            vehicle.location, outcome.frames
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!("engine on".parse::<Command>(), Ok(Command::Engine(true)));
        assert_eq!("  ENGINE   off ".parse::<Command>(), Ok(Command::Engine(false)));
        assert_eq!(
            "add dock 59.44 24.76".parse::<Command>(),
            Ok(Command::Add {
                name: "dock".to_string(),
                location: LatLng::new(59.44, 24.76),
                id: None
            })
        );
        assert_eq!(
            "add dock -1 2 d1".parse::<Command>(),
            Ok(Command::Add {
                name: "dock".to_string(),
                location: LatLng::new(-1.0, 2.0),
                id: Some("d1".to_string())
            })
        );
        assert_eq!("remove d1".parse::<Command>(), Ok(Command::Remove("d1".to_string())));
        assert_eq!(
            "rename d1 pier".parse::<Command>(),
            Ok(Command::Rename {
                id: "d1".to_string(),
                name: "pier".to_string()
            })
        );
        assert_eq!("drive d1".parse::<Command>(), Ok(Command::Drive("d1".to_string())));
        assert_eq!("list".parse::<Command>(), Ok(Command::List));
        assert_eq!("stop".parse::<Command>(), Ok(Command::Stop));
        assert_eq!("status".parse::<Command>(), Ok(Command::Status));
        assert_eq!("help me".parse::<Command>(), Ok(Command::Help));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn quoted_names_keep_spaces() {
        assert_eq!(
            r#"add "north pier" 59.44 24.76 np"#.parse::<Command>(),
            Ok(Command::Add {
                name: "north pier".to_string(),
                location: LatLng::new(59.44, 24.76),
                id: Some("np".to_string())
            })
        );
        assert_eq!(
            r#"rename np "old  harbour""#.parse::<Command>(),
            Ok(Command::Rename {
                id: "np".to_string(),
                name: "old  harbour".to_string()
            })
        );
        assert_eq!(
            r#"rename np """#.parse::<Command>(),
            Ok(Command::Rename {
                id: "np".to_string(),
                name: String::new()
            })
        );
        assert_eq!(
            r#"rename np "pier"#.parse::<Command>(),
            Err(CommandError::UnterminatedQuote)
        );
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "fly away".parse::<Command>(),
            Err(CommandError::Unknown("fly away".to_string()))
        );
        assert_eq!(
            "engine maybe".parse::<Command>(),
            Err(CommandError::Usage("engine on|off"))
        );
        assert_eq!(
            "add dock north 24.76".parse::<Command>(),
            Err(CommandError::InvalidCoordinate("north".to_string()))
        );
        assert_eq!(
            "add dock NaN 24.76".parse::<Command>(),
            Err(CommandError::InvalidCoordinate("NaN".to_string()))
        );
        assert!(matches!(
            "add dock 1 2 id extra".parse::<Command>(),
            Err(CommandError::Usage(_))
        ));
        assert!(matches!(
            "drive".parse::<Command>(),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn engine_not_started_message() {
        let err = CommandError::from(DriveError::EngineNotStarted);
        assert_eq!(err.to_string(), "engine not started");
    }
}
