//! `larafast version` command handler

use anyhow::Result;

use crate::cli::VersionArgs;
use crate::version::VersionInfo;

pub fn run(args: VersionArgs) -> Result<()> {
    let info = VersionInfo::current();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    for line in info.details() {
        println!("{}", line);
    }

    Ok(())
}
