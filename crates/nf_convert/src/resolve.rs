//! Dependency identifier resolution.
//!
//! Two stages, in order:
//! 1. `map`: substitute the identifier (scoped, wildcard, then flat entries).
//! 2. `paths`: resolve the result against the path table and re-derive an
//!    identifier whose form follows the raw identifier (`../`, `./`, `/`, bare).
//!
//! All path handling is lexical; the filesystem is never consulted.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use nf_ast::{is_magic, ConvertError, ConvertOptions, SubstitutionTable};

/// Resolves raw dependency identifiers for one conversion.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    map: Option<&'a SubstitutionTable>,
    module_id: Option<&'a str>,
    paths: Option<PathTable>,
}

#[derive(Debug, Clone)]
struct PathTable {
    /// Longest prefix first.
    entries: Vec<(String, String)>,
    base_dir: PathBuf,
    rel_dir: PathBuf,
}

impl<'a> Resolver<'a> {
    /// Build a resolver, reading the current directory only when the path
    /// table needs it to anchor `baseDir` or `relDir`.
    pub fn new(
        options: &'a ConvertOptions,
        module_id: Option<&'a str>,
    ) -> Result<Self, ConvertError> {
        let anchored = |dir: &Option<PathBuf>| dir.as_ref().is_some_and(|d| d.is_absolute());
        let needs_cwd = options.paths.is_some()
            && !(anchored(&options.base_dir)
                && (options.rel_dir.is_none() || anchored(&options.rel_dir)));

        let cwd = if needs_cwd {
            std::env::current_dir().map_err(|e| ConvertError::Resolution {
                id: ".".to_string(),
                reason: format!("cannot read the current directory: {e}"),
            })?
        } else {
            PathBuf::new()
        };
        Ok(Self::with_cwd(options, module_id, &cwd))
    }

    /// Build a resolver that anchors relative directories at `cwd`.
    pub fn with_cwd(options: &'a ConvertOptions, module_id: Option<&'a str>, cwd: &Path) -> Self {
        let paths = options.paths.as_ref().map(|table| {
            let anchor = |dir: &Path| normalize(&cwd.join(dir));
            let base_dir = options
                .base_dir
                .as_deref()
                .map_or_else(|| normalize(cwd), anchor);
            let rel_dir = options
                .rel_dir
                .as_deref()
                .map_or_else(|| base_dir.clone(), anchor);

            let mut entries: Vec<(String, String)> = table
                .iter()
                .map(|(prefix, dir)| (prefix.trim_end_matches('/').to_string(), dir.clone()))
                .collect();
            entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

            PathTable {
                entries,
                base_dir,
                rel_dir,
            }
        });

        Self {
            map: options.map.as_ref().filter(|m| !m.is_empty()),
            module_id,
            paths,
        }
    }

    /// Whether any table is configured at all.
    pub fn is_active(&self) -> bool {
        self.map.is_some() || self.paths.is_some()
    }

    /// Resolve `raw` into the identifier emitted in the `require(...)` call.
    pub fn resolve(&self, raw: &str) -> Result<String, ConvertError> {
        let id = self
            .map
            .and_then(|map| map.lookup(self.module_id, raw))
            .unwrap_or(raw);

        let Some(paths) = &self.paths else {
            return Ok(id.to_string());
        };
        if id.is_empty() || is_magic(id) || id.contains('!') {
            return Ok(id.to_string());
        }

        let resolved = paths.resolve(id)?;
        let emitted = if raw.starts_with("../") {
            to_slash(&paths.relative(id, &resolved)?)
        } else if raw.starts_with("./") {
            format!("./{}", to_slash(&paths.relative(id, &resolved)?))
        } else if raw.starts_with('/') {
            to_slash(&resolved)
        } else {
            match resolved.strip_prefix(&paths.base_dir) {
                Ok(rest) => to_slash(rest),
                Err(_) => to_slash(&resolved),
            }
        };

        tracing::debug!(raw, id, resolved = %resolved.display(), emitted, "resolved dependency");
        Ok(emitted)
    }
}

impl PathTable {
    fn resolve(&self, id: &str) -> Result<PathBuf, ConvertError> {
        for (prefix, dir) in &self.entries {
            let Some(rest) = strip_segment_prefix(id, prefix) else {
                continue;
            };
            if dir.is_empty() {
                return Err(ConvertError::Resolution {
                    id: id.to_string(),
                    reason: format!("path entry `{prefix}` maps to an empty directory"),
                });
            }
            let mut path = self.base_dir.join(dir);
            if !rest.is_empty() {
                path.push(rest);
            }
            return Ok(normalize(&path));
        }

        let path = if id.starts_with("./") || id.starts_with("../") {
            self.rel_dir.join(id)
        } else {
            self.base_dir.join(id)
        };
        Ok(normalize(&path))
    }

    fn relative(&self, id: &str, to: &Path) -> Result<PathBuf, ConvertError> {
        relative_path(&self.rel_dir, to).ok_or_else(|| ConvertError::Resolution {
            id: id.to_string(),
            reason: format!(
                "{} is not reachable from {}",
                to.display(),
                self.rel_dir.display()
            ),
        })
    }
}

/// `foo/bar` matches prefix `foo` with rest `bar`; `foobar` does not.
fn strip_segment_prefix<'i>(id: &'i str, prefix: &str) -> Option<&'i str> {
    if id == prefix {
        return Some("");
    }
    id.strip_prefix(prefix)?.strip_prefix('/')
}

/// Remove `.` and fold `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path from directory `from` to `to`, both normalized. `None` when they
/// share no root (different drives).
fn relative_path(from: &Path, to: &Path) -> Option<PathBuf> {
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();
    if from.first() != to.first() {
        return None;
    }

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let mut out = PathBuf::new();
    for _ in common..from.len() {
        out.push("..");
    }
    for component in &to[common..] {
        out.push(component.as_os_str());
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    Some(out)
}

fn to_slash(path: &Path) -> String {
    let text = path.to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(MAIN_SEPARATOR, "/")
    }
}
