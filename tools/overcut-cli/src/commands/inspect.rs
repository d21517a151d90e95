//! Show the contents of a composition document.

use std::path::PathBuf;

use overcut_overlay_model::{CompositionDescription, RecordKind};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let composition = CompositionDescription::from_json(&json)
        .map_err(|e| anyhow::anyhow!("Failed to parse composition: {e}"))?;

    println!("Composition: {}", path.display());
    println!("  Format version: {}", composition.version);
    match composition.duration {
        Some(d) => println!("  Duration: {d:.2}s"),
        None => println!("  Duration: unknown"),
    }
    println!("  Overlays: {}", composition.overlays.len());
    println!();

    for record in &composition.overlays {
        let payload = match record.kind {
            RecordKind::Text => record.text.as_deref().unwrap_or(""),
            RecordKind::Image => record.source.as_deref().unwrap_or(""),
        };
        println!(
            "  [z {}] {:?} #{}: {:?}",
            record.z, record.kind, record.id, payload
        );
        println!(
            "      at ({}, {}) {}x{}, visible {:.2}s..{:.2}s",
            record.x, record.y, record.w, record.h, record.start, record.end
        );
    }

    Ok(())
}
