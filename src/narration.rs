// Saving the narration to disk. The service returns an origin-relative
// path such as `/audio/<id>`; we fetch it and store it as an mp3.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::api::StoryService;

/// File name used for the narration behind `url`: `storylens-<id>.mp3`,
/// where `<id>` is the last path segment.
pub fn narration_file_name(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let id = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .map(|seg| seg.trim_end_matches(".mp3"))
        .filter(|seg| !seg.is_empty() && !seg.contains(':'))
        .unwrap_or("narration");
    format!("storylens-{id}.mp3")
}

/// Download the narration at `url` into `dir`, creating the directory when
/// needed. Returns the path written.
pub fn save_narration<S: StoryService>(service: &S, url: &str, dir: &Path) -> Result<PathBuf> {
    let bytes = service
        .fetch_narration(url)
        .context("Failed to download narration")?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(narration_file_name(url));
    fs::write(&path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "Narration saved");
    Ok(path)
}
