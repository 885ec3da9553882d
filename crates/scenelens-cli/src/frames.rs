//! Loading decoded frames from a directory of images.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use scenelens_models::FrameImage;
use tracing::debug;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files in `dir`, ordered by file name.
pub fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read frame directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Decode every frame image in `dir`, in file name order.
///
/// The directory is treated as a video's consecutive frames.
pub fn load_frames(dir: &Path) -> Result<Vec<FrameImage>> {
    let paths = frame_paths(dir)?;
    if paths.is_empty() {
        bail!("No frame images found in {}", dir.display());
    }

    let frames = paths
        .iter()
        .map(|path| {
            image::open(path)
                .map(|decoded| FrameImage::new(decoded.to_rgb8()))
                .with_context(|| format!("Failed to decode {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(dir = %dir.display(), frames = frames.len(), "Loaded frames");

    Ok(frames)
}
