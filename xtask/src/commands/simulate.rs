use anyhow::{Result, bail};
use clap::Args;
use xshell::{Shell, cmd};

const EXAMPLE_CONFIG: &str = "ugv.example.toml";
const EXAMPLE_STORAGE: &str = r#"dir = "./ugv-data""#;

#[derive(Args)]
pub struct Simulate {
    /// Target latitude
    #[arg(long, default_value_t = 59.440, allow_negative_numbers = true)]
    lat: f64,

    /// Target longitude
    #[arg(long, default_value_t = 24.760, allow_negative_numbers = true)]
    lng: f64,
}

impl Simulate {
    /// Save one waypoint and drive to it with the example config, keeping
    /// the waypoint file in a throwaway directory.
    pub fn run(&self, sh: &Shell) -> Result<()> {
        let tmp = sh.create_temp_dir()?;
        let data = tmp.path().join("data");

        let example = sh.read_file(EXAMPLE_CONFIG)?;
        if !example.contains(EXAMPLE_STORAGE) {
            bail!("{EXAMPLE_CONFIG} no longer contains `{EXAMPLE_STORAGE}`");
        }
        let storage = format!("dir = '{}'", data.display());
        let config = tmp.path().join("ugv.toml");
        sh.write_file(&config, example.replace(EXAMPLE_STORAGE, &storage))?;

        let lat = self.lat.to_string();
        let lng = self.lng.to_string();
        eprintln!("Simulating a drive to ({lat}, {lng})...");
        cmd!(
            sh,
            "cargo run --quiet -p ugv -- --config {config} waypoint add --id sim --name simulated --lat {lat} --lng {lng}"
        )
        .run()?;
        cmd!(sh, "cargo run --quiet -p ugv -- --config {config} drive sim").run()?;
        Ok(())
    }
}
