//! Tag command handlers

use anyhow::Result;

use nekolinks_core::Store;

use crate::output::Output;

/// List all tags with usage counts
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let tags = store.links().tags_with_counts();
    output.print_tags(&tags);
    Ok(())
}
