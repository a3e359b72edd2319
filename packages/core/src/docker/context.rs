//! Build context collection and archiving
//!
//! Walks the context directory, drops entries matched by `.dockerignore`,
//! and packs the rest into a gzipped tar together with the rendered recipe.

use super::DockerError;
use super::recipe::{ImageRecipe, RECIPE_FILE_NAME};
use flate2::Compression;
use flate2::write::GzEncoder;
use glob::{MatchOptions, Pattern};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tar::Builder as TarBuilder;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Ignore file honoured at the context root
pub const IGNORE_FILE_NAME: &str = ".dockerignore";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
struct IgnoreRule {
    pattern: Pattern,
    negated: bool,
}

/// Parsed `.dockerignore` rules
///
/// Later rules win. A rule matching a directory also matches everything
/// beneath it.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
    source: String,
}

impl IgnoreRules {
    pub fn parse(contents: &str) -> Result<Self, DockerError> {
        let mut rules = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (negated, raw) = match line.strip_prefix('!') {
                Some(rest) => (true, rest.trim()),
                None => (false, line),
            };
            let normalized = raw.trim_start_matches('/').trim_end_matches('/');
            let normalized = normalized.strip_prefix("./").unwrap_or(normalized);
            if normalized.is_empty() {
                continue;
            }
            let pattern = Pattern::new(normalized).map_err(|e| {
                DockerError::Context(format!("Invalid {IGNORE_FILE_NAME} pattern '{raw}': {e}"))
            })?;
            rules.push(IgnoreRule { pattern, negated });
        }
        Ok(Self {
            rules,
            source: contents.to_string(),
        })
    }

    /// Load rules from `<root>/.dockerignore`, empty if the file is absent
    pub fn load(root: &Path) -> Result<Self, DockerError> {
        let path = root.join(IGNORE_FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(DockerError::Context(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    /// Whether `relative` (slash separated) is excluded
    pub fn is_excluded(&self, relative: &str) -> bool {
        let mut excluded = false;
        for rule in &self.rules {
            if rule_matches(&rule.pattern, relative) {
                excluded = !rule.negated;
            }
        }
        excluded
    }
}

fn rule_matches(pattern: &Pattern, relative: &str) -> bool {
    if pattern.matches_with(relative, MATCH_OPTIONS) {
        return true;
    }
    // Any ancestor directory match excludes the entry too
    relative
        .match_indices('/')
        .any(|(idx, _)| pattern.matches_with(&relative[..idx], MATCH_OPTIONS))
}

/// Kind of entry collected from the context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
}

/// One collected context entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
    /// Slash-separated path relative to the context root
    pub relative: String,
    pub kind: EntryKind,
}

/// The application tree that will be copied into the image
#[derive(Debug, Clone)]
pub struct BuildContext {
    root: PathBuf,
    entries: Vec<ContextEntry>,
    ignore: IgnoreRules,
}

fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

impl BuildContext {
    /// Walk `root` and collect every entry not excluded by `.dockerignore`
    pub fn collect(root: &Path) -> Result<Self, DockerError> {
        let metadata = fs::metadata(root).map_err(|e| {
            DockerError::Context(format!("Cannot read build context {}: {e}", root.display()))
        })?;
        if !metadata.is_dir() {
            return Err(DockerError::Context(format!(
                "Build context {} is not a directory",
                root.display()
            )));
        }

        let ignore = IgnoreRules::load(root)?;
        let mut entries = Vec::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| {
                DockerError::Context(format!("Failed to read build context: {e}"))
            })?;
            let Some(relative) = relative_slash_path(root, entry.path()) else {
                continue;
            };
            if ignore.is_excluded(&relative) {
                trace!("Ignoring {}", relative);
                continue;
            }
            let file_type = entry.file_type();
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            entries.push(ContextEntry { relative, kind });
        }

        debug!(
            "Collected {} entries from build context {}",
            entries.len(),
            root.display()
        );
        Ok(Self {
            root: root.to_path_buf(),
            entries,
            ignore,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    /// Relative paths of regular files and symlinks
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.kind != EntryKind::Dir)
            .map(|entry| entry.relative.as_str())
    }

    pub fn contains(&self, relative: &str) -> bool {
        self.entries.iter().any(|entry| entry.relative == relative)
    }

    /// Ignore file shipped to the daemon
    ///
    /// The daemon reads the recipe from the archive but must not copy it
    /// into the image, so the recipe name is appended to the user's rules.
    /// Without user rules the ignore file also hides itself.
    fn archived_ignore_file(&self) -> String {
        let mut contents = self.ignore.source.clone();
        if !contents.is_empty() && !contents.ends_with('\n') {
            contents.push('\n');
        }
        if !self.contains(IGNORE_FILE_NAME) {
            contents.push_str(IGNORE_FILE_NAME);
            contents.push('\n');
        }
        contents.push_str(RECIPE_FILE_NAME);
        contents.push('\n');
        contents
    }

    /// Gzipped tar of the tree, the rendered recipe, and the ignore file
    pub fn to_archive(&self, recipe: &ImageRecipe) -> Result<Vec<u8>, DockerError> {
        self.write_archive(recipe).map_err(|e| {
            DockerError::Context(format!(
                "Failed to archive build context {}: {e}",
                self.root.display()
            ))
        })
    }

    fn write_archive(&self, recipe: &ImageRecipe) -> Result<Vec<u8>, io::Error> {
        let mut archive_buffer = Vec::new();

        {
            let encoder = GzEncoder::new(&mut archive_buffer, Compression::default());
            let mut tar = TarBuilder::new(encoder);
            tar.follow_symlinks(false);

            for entry in &self.entries {
                if entry.relative == IGNORE_FILE_NAME {
                    continue;
                }
                let source = self.root.join(&entry.relative);
                match entry.kind {
                    EntryKind::Dir => tar.append_dir(&entry.relative, &source)?,
                    EntryKind::File | EntryKind::Symlink => {
                        tar.append_path_with_name(&source, &entry.relative)?
                    }
                }
            }

            append_bytes(&mut tar, IGNORE_FILE_NAME, self.archived_ignore_file().as_bytes())?;
            append_bytes(&mut tar, RECIPE_FILE_NAME, recipe.render().as_bytes())?;

            tar.finish()?;
            let encoder = tar.into_inner()?;
            encoder.finish()?;
        }

        Ok(archive_buffer)
    }
}

fn append_bytes<W: io::Write>(
    tar: &mut TarBuilder<W>,
    name: &str,
    bytes: &[u8],
) -> Result<(), io::Error> {
    let mut header = tar::Header::new_gnu();
    header.set_path(name)?;
    header.set_size(bytes.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    tar.append(&header, bytes)
}
