//! vitals - live process utilization from the command line.

use anyhow::Result;

fn main() -> Result<()> {
    vitals_cli::run()
}
