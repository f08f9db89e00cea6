//! vcp-launch: bootstrap a LinuxCNC Virtual Control Panel
//!
//! Resolves command-line options against the machine INI file, verifies that
//! LinuxCNC is running and publishes the environment a VCP expects before its
//! GUI starts.

use anyhow::Result;

fn main() -> Result<()> {
    vcp_launch::cli::run()
}
