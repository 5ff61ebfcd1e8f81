use std::path::{Path, PathBuf};

use crate::error::{ExtractError, Result};

/// Recursively collect the `.rs` files under `folder_path`, sorted by path
pub fn collect_files(folder_path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_into(folder_path, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_into(folder_path: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let io_error = |source| ExtractError::Io {
        path: folder_path.to_path_buf(),
        source,
    };
    for entry in std::fs::read_dir(folder_path).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            collect_into(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    Ok(())
}

/// Module path segments of `file` relative to `base_path`; `mod.rs` collapses into its folder
pub fn file_to_segments(file: &Path, base_path: &Path) -> Vec<String> {
    let file = file.display().to_string().replace('\\', "/");
    let base = base_path.display().to_string().replace('\\', "/");
    let relative = file
        .strip_prefix(base.trim_end_matches('/'))
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        .unwrap_or(file.as_str());
    let relative = relative.trim_end_matches(".rs");
    let mut segments: Vec<String> = relative
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(last) = segments.last()
        && (last == "mod" || last == "lib")
    {
        segments.pop();
    }
    segments
}

/// Module path of a file: `prefix` followed by its segments
pub fn module_path(prefix: &str, segments: &[String]) -> String {
    std::iter::once(prefix)
        .chain(segments.iter().map(String::as_str))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("::")
}
