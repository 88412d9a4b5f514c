use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use ugv::{
    config::Config, console::describe_outcome, frames::IntervalFrames, overlay::TracingOverlay,
};
use ugv_core::{geo::LatLng, motion::MotionEngine, vehicle::VehicleState};
use ugv_waypoints::{FileStore, WaypointStore};

#[derive(Args)]
pub struct DriveArgs {
    /// Id of the waypoint to drive to.
    pub waypoint: String,
}

impl DriveArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        let store = WaypointStore::load(FileStore::new(&config.storage.dir));
        let waypoint = store
            .get(&self.waypoint)
            .cloned()
            .with_context(|| format!("no waypoint with id {:?}", self.waypoint))?;

        drive(config, waypoint.location)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn drive(config: &Config, target: LatLng) -> Result<()> {
    let mut vehicle = VehicleState::new(config.vehicle.start);
    let switch = vehicle.engine_switch();
    switch.start();

    // Ctrl-C switches the engine off; the drive stops on the next frame
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, switching engine off");
            switch.stop();
        }
    });

    let rate_hz = config.frames.rate_hz;
    let mut engine = MotionEngine::new(config.motion_config());
    let outcome = engine
        .drive(
            &mut vehicle,
            target,
            IntervalFrames::new(rate_hz),
            TracingOverlay::new(u64::from(rate_hz)),
        )
        .await?;

    println!("{}", describe_outcome(&outcome, &vehicle));
    Ok(())
}
