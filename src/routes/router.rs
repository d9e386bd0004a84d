//! File-tree router.
//!
//! Routes are derived from the files under a directory, Next.js style: the
//! route is the relative path without its extension, and a trailing `index`
//! segment maps to its parent directory.
//!
//! ```text
//! public/index.html        ->  /            (also /index.html)
//! public/styles/style.css  ->  /styles/style (also /styles/style.css)
//! public/docs/index.html   ->  /docs        (also /docs/index.html)
//! ```

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Normalized route the request matched, e.g. `/styles/style`.
    pub route: String,
    /// File backing the route.
    pub file_path: PathBuf,
}

#[derive(Debug, Default, Clone)]
pub struct FileRouter {
    routes: HashMap<String, PathBuf>,
}

impl FileRouter {
    /// Walks `dir` and registers every file whose extension is in `extensions`.
    pub fn scan(dir: &Path, extensions: &[String]) -> Result<Self> {
        let mut router = Self::default();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let allowed = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext));
            if !allowed {
                debug!(file = %path.display(), "Skipping file with unrouted extension");
                continue;
            }

            let relative = path
                .strip_prefix(dir)
                .with_context(|| format!("{} is outside {}", path.display(), dir.display()))?;
            router.insert(relative, path.to_path_buf());
        }

        info!(dir = %dir.display(), routes = router.len(), "Routes loaded");
        Ok(router)
    }

    /// Registers `file_path` under the routes derived from `relative`.
    pub fn insert(&mut self, relative: &Path, file_path: PathBuf) {
        let Some((route, full_name)) = routes_for(relative) else {
            warn!(file = %relative.display(), "Cannot derive a route for file");
            return;
        };

        for key in [route, full_name] {
            if let Some(existing) = self.routes.get(&key) {
                warn!(
                    route = %key,
                    kept = %existing.display(),
                    ignored = %file_path.display(),
                    "Duplicate route"
                );
                continue;
            }
            self.routes.insert(key, file_path.clone());
        }
    }

    /// Resolves a request-target to a route.
    ///
    /// Accepts origin-form and absolute-URI targets; the query string and
    /// fragment are ignored, as is a trailing slash.
    pub fn match_path(&self, target: &str) -> Option<RouteMatch> {
        let route = normalize_target(target)?;
        self.routes.get(&route).map(|file_path| RouteMatch {
            route,
            file_path: file_path.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn normalize_target(target: &str) -> Option<String> {
    let path = if target.starts_with("http://") || target.starts_with("https://") {
        url::Url::parse(target).ok()?.path().to_string()
    } else {
        target
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string()
    };

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Some("/".to_string());
    }
    if !trimmed.starts_with('/') {
        return None;
    }
    Some(trimmed.to_string())
}

/// Returns the extensionless route and the full-name route for a relative file path.
fn routes_for(relative: &Path) -> Option<(String, String)> {
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_str()?.to_string()),
            _ => return None,
        }
    }

    let file_name = segments.pop()?;
    let full_name = format!("/{}", join(&segments, &file_name));

    let stem = Path::new(&file_name).file_stem()?.to_str()?.to_string();
    let route = if stem == "index" {
        format!("/{}", segments.join("/"))
    } else {
        format!("/{}", join(&segments, &stem))
    };

    Some((route, full_name))
}

fn join(dirs: &[String], last: &str) -> String {
    if dirs.is_empty() {
        last.to_string()
    } else {
        format!("{}/{}", dirs.join("/"), last)
    }
}
