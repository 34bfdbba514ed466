//! Map framing and file output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

use super::actor::Actor;

pub const MAP_HEADER: &str = "Begin Map\nBegin Level NAME=PersistentLevel\n";
pub const MAP_FOOTER: &str = "End Level\nBegin Surface\nEnd Surface\nEnd Map";

/// Render a complete map document.
pub fn render_map(actors: &[Actor]) -> String {
    let mut out = String::from(MAP_HEADER);
    for actor in actors {
        out.push_str(&actor.render());
    }
    out.push_str(MAP_FOOTER);
    out
}

/// Write the map to `path`, truncating any existing file.
pub fn write_t3d(path: &Path, actors: &[Actor]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(MAP_HEADER.as_bytes())?;
    for actor in actors {
        write!(writer, "{actor}")?;
    }
    writer.write_all(MAP_FOOTER.as_bytes())?;
    writer.flush()?;

    log::debug!("wrote {} actors to {}", actors.len(), path.display());
    Ok(())
}
