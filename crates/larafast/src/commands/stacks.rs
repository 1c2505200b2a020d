//! `larafast stacks` command handler

use anyhow::Result;
use larafast_installer::StackChoice;
use serde::Serialize;

use crate::cli::StacksArgs;
use crate::output;

#[derive(Debug, Serialize)]
struct StackEntry {
    name: &'static str,
    description: &'static str,
    ssh_url: String,
    https_url: String,
}

impl From<StackChoice> for StackEntry {
    fn from(stack: StackChoice) -> Self {
        Self {
            name: stack.as_str(),
            description: stack.description(),
            ssh_url: stack.ssh_url(),
            https_url: stack.https_url(),
        }
    }
}

pub fn run(args: StacksArgs) -> Result<()> {
    let entries: Vec<StackEntry> = StackChoice::all().into_iter().map(Into::into).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    output::header("Available stacks");
    for entry in &entries {
        output::kv(entry.name, entry.description);
        println!("      {}", entry.https_url);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_stack() {
        let entry = StackEntry::from(StackChoice::Api);
        assert_eq!(entry.name, "api");
        assert_eq!(
            entry.https_url,
            "https://github.com/karakhanyans-tools/larafast-rest-api.git"
        );
    }
}
