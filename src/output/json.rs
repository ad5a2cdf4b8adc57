//! JSON output formatting

use std::io;

use super::display::DisplayNode;

/// Print the display tree as pretty-printed JSON to stdout.
pub fn print_json(node: &DisplayNode) -> io::Result<()> {
    let json = serde_json::to_string_pretty(node).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}
