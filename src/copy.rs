use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{CreateError, Result};

/// Decides, from an entry's original file name, whether to leave it out.
pub type SkipFn = Box<dyn Fn(&str) -> bool>;

/// Rename map and exclusion predicates governing a template copy.
#[derive(Default)]
pub struct CopyOptions {
    /// Exact file name to replacement file name.
    pub rename: BTreeMap<String, String>,
    pub skips: Vec<SkipFn>,
}

impl CopyOptions {
    pub fn is_skipped(&self, name: &str) -> bool {
        self.skips.iter().any(|skip| skip(name))
    }

    pub fn renamed<'a>(&'a self, name: &'a str) -> &'a str {
        self.rename.get(name).map_or(name, String::as_str)
    }
}

/// An entry that would be materialized by a copy.
#[derive(Debug, Clone)]
pub struct PlannedEntry {
    pub source: PathBuf,
    /// Destination path relative to the target directory, after renaming.
    pub relative_path: PathBuf,
    pub is_dir: bool,
}

/// The result of planning a copy without writing to disk.
#[derive(Debug, Default)]
pub struct CopyPlan {
    pub entries: Vec<PlannedEntry>,
}

impl CopyPlan {
    pub fn files(&self) -> impl Iterator<Item = &PlannedEntry> {
        self.entries.iter().filter(|e| !e.is_dir)
    }
}

/// Walk `source_dir` and collect the entries that survive `options`.
///
/// A skipped directory is dropped together with everything below it.
pub fn plan_copy(source_dir: &Path, options: &CopyOptions) -> Result<CopyPlan> {
    if !source_dir.is_dir() {
        return Err(CreateError::TemplateDirectoryMissing {
            path: source_dir.to_path_buf(),
        });
    }

    let mut entries = Vec::new();
    let walker = WalkDir::new(source_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            let skip = options.is_skipped(&name);
            if skip {
                tracing::trace!(entry = %entry.path().display(), "skipped");
            }
            !skip
        });

    for entry in walker {
        let entry = entry.map_err(|e| CreateError::Io {
            context: format!("walking {}", source_dir.display()),
            source: e.into(),
        })?;
        let rel_path = entry
            .path()
            .strip_prefix(source_dir)
            .expect("entry must be under source_dir");

        let relative_path: PathBuf = rel_path
            .components()
            .map(|c| {
                let part = c.as_os_str().to_string_lossy();
                options.renamed(&part).to_string()
            })
            .collect();

        entries.push(PlannedEntry {
            source: entry.path().to_path_buf(),
            relative_path,
            is_dir: entry.file_type().is_dir(),
        });
    }

    Ok(CopyPlan { entries })
}

/// Materialize a plan under `dest_dir`, returning the files written.
///
/// Any I/O error aborts the copy; entries already written stay on disk.
pub fn execute_copy(plan: &CopyPlan, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    create_dir(dest_dir)?;

    let mut written = Vec::new();
    for entry in &plan.entries {
        let dest_path = dest_dir.join(&entry.relative_path);
        if entry.is_dir {
            create_dir(&dest_path)?;
            continue;
        }
        if let Some(parent) = dest_path.parent() {
            create_dir(parent)?;
        }
        std::fs::copy(&entry.source, &dest_path).map_err(|e| CreateError::Io {
            context: format!(
                "copying {} to {}",
                entry.source.display(),
                dest_path.display()
            ),
            source: e,
        })?;
        written.push(entry.relative_path.clone());
    }

    Ok(written)
}

/// Copy `source_dir` into `dest_dir`, applying the rename map and skips.
pub fn copy_tree(source_dir: &Path, dest_dir: &Path, options: &CopyOptions) -> Result<Vec<PathBuf>> {
    let plan = plan_copy(source_dir, options)?;
    execute_copy(&plan, dest_dir)
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| CreateError::Io {
        context: format!("creating directory {}", path.display()),
        source: e,
    })
}
