//! `smoke doctor` — Check that `pack` and `docker` are installed.

use clap::Args;
use smoke_common::constants::{DOCKER_BINARY, PACK_BINARY};
use smoke_runner::tool;

/// Arguments for the `doctor` command.
#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Image builder CLI to look for.
    #[arg(long, default_value = PACK_BINARY)]
    pub pack: String,

    /// Container runtime CLI to look for.
    #[arg(long, default_value = DOCKER_BINARY)]
    pub docker: String,
}

/// Executes the `doctor` command.
///
/// # Errors
///
/// Returns an error if any tool is missing.
pub fn execute(args: &DoctorArgs) -> anyhow::Result<()> {
    let mut missing = Vec::new();
    for program in [&args.pack, &args.docker] {
        match tool::locate_tool(program) {
            Ok(path) => println!("  {program:<8} {}", path.display()),
            Err(_) => {
                println!("  {program:<8} not found");
                missing.push(program.as_str());
            }
        }
    }
    if !missing.is_empty() {
        anyhow::bail!("missing tools: {}", missing.join(", "));
    }
    Ok(())
}
