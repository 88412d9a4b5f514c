use anyhow::Result;
use clap::Parser;
use std::path::Path;
use xshell::Shell;

mod commands;

#[derive(Parser)]
#[command(name = "xtask", about = "Development tasks for the UGV simulator workspace")]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    // run from the workspace root regardless of where cargo was invoked
    if let Some(root) = Path::new(env!("CARGO_MANIFEST_DIR")).parent() {
        sh.change_dir(root);
    }

    cli.command.run(&sh)
}
