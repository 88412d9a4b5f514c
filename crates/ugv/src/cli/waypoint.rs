use anyhow::Result;
use clap::{Args, Subcommand};
use ugv::{config::Config, overlay::TerminalNotifier};
use ugv_core::{geo::LatLng, observer::Notifier};
use ugv_waypoints::{FileStore, Persisted, Waypoint, WaypointStore};

#[derive(Args)]
pub struct WaypointArgs {
    #[command(subcommand)]
    command: WaypointCommand,
}

#[derive(Subcommand)]
enum WaypointCommand {
    /// Save a new waypoint.
    Add(AddArgs),
    /// Delete a waypoint by id.
    Remove {
        id: String,
    },
    /// Print saved waypoints as JSON.
    List,
}

#[derive(Args)]
struct AddArgs {
    /// Display name.
    #[arg(long)]
    name: String,

    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    #[arg(long, allow_negative_numbers = true)]
    lng: f64,

    /// Waypoint id. A random one is generated when omitted.
    #[arg(long)]
    id: Option<String>,
}

impl WaypointArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        let mut store = WaypointStore::load(FileStore::new(&config.storage.dir));

        match &self.command {
            WaypointCommand::Add(args) => {
                let location = LatLng::new(args.lat, args.lng);
                let waypoint = match &args.id {
                    Some(id) => Waypoint::new(id.clone(), args.name.clone(), location),
                    None => Waypoint::with_generated_id(args.name.clone(), location),
                };
                let id = waypoint.id.clone();
                warn_unsaved(store.add(waypoint)?);
                println!("Added waypoint {id}");
            }
            WaypointCommand::Remove { id } => match store.remove(id) {
                Persisted::Unchanged => println!("No waypoint {id}"),
                persisted => {
                    warn_unsaved(persisted);
                    println!("Removed waypoint {id}");
                }
            },
            WaypointCommand::List => {
                println!("{}", serde_json::to_string_pretty(store.as_slice())?);
            }
        }

        Ok(())
    }
}

fn warn_unsaved(persisted: Persisted) {
    if let Some(err) = persisted.warning() {
        TerminalNotifier.warn(&format!("waypoints not saved: {err}"));
    }
}
