//! Source tree scanning

use crate::error::{Error, Result};
use crate::types::SourceFile;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

fn build_matcher(root: &Path, exclude: &[String]) -> Result<Gitignore> {
    let mut builder = GitignoreBuilder::new(root);
    for pattern in exclude {
        builder.add_line(None, pattern).map_err(|e| {
            Error::config(format!("invalid exclude pattern '{}': {}", pattern, e))
        })?;
    }
    builder
        .build()
        .map_err(|e| Error::config(format!("building exclude matcher: {}", e)))
}

fn walk_error(e: jwalk::Error) -> Error {
    Error::io(
        "walking source tree",
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
    )
}

/// Scan the source path into the list of files to upload.
///
/// A file source yields exactly one entry named after the file. A
/// directory source is walked in parallel and every regular file below
/// it becomes an entry named by its forward-slash relative path, sorted
/// by name. Exclude patterns use gitignore syntax against relative paths
/// and apply to directory walks only. Walk errors propagate; a partial
/// listing is never returned.
pub async fn walk_source(root: &Path, exclude: &[String]) -> Result<Vec<SourceFile>> {
    let metadata = match tokio::fs::metadata(root).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound {
                path: root.to_path_buf(),
            })
        }
        Err(e) => return Err(Error::io("reading source metadata", e)),
    };

    if metadata.is_file() {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::config(format!("cannot derive an object name from '{}'", root.display()))
            })?;
        return Ok(vec![SourceFile {
            path: root.to_path_buf(),
            name,
            size: metadata.len(),
        }]);
    }

    let matcher = build_matcher(root, exclude)?;
    let root_owned = root.to_path_buf();

    // jwalk in a blocking task for parallel directory walking
    let mut files = tokio::task::spawn_blocking(move || -> Result<Vec<SourceFile>> {
        let mut results = Vec::new();

        for entry in jwalk::WalkDir::new(&root_owned)
            .skip_hidden(false)
            .follow_links(false)
            .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()))
        {
            let entry = entry.map_err(walk_error)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(&root_owned).unwrap_or(path.as_path());
            if relative.as_os_str().is_empty() {
                continue;
            }

            if matcher
                .matched_path_or_any_parents(relative, false)
                .is_ignore()
            {
                continue;
            }

            let metadata = entry.metadata().map_err(walk_error)?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            results.push(SourceFile {
                path: path.clone(),
                name,
                size: metadata.len(),
            });
        }

        Ok(results)
    })
    .await
    .map_err(|e| {
        Error::io(
            "spawn_blocking",
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
        )
    })??;

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}
