//! # Allow-list de paths estáticos
//! src/fallback/allow_list.rs
//!
//! Conjunto fijo de paths que el fallback puede servir. Por defecto son los
//! archivos del sitio de ejemplo; también se puede cargar desde un JSON:
//!
//! ```json
//! { "paths": ["/index.html", "/styles.css"] }
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Paths del sitio de ejemplo que se sirven si no se configura otra lista
pub const DEFAULT_PATHS: [&str; 11] = [
    "/index.html",
    "/spring.svg",
    "/spring.png",
    "/resources.html",
    "/styles.css",
    "/app.js",
    "/links.html",
    "/forms.html",
    "/classic.html",
    "/events.html",
    "/events.js",
];

#[derive(Debug, Error)]
pub enum AllowListError {
    #[error("cannot read allow-list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid allow-list JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Entradas que no empiezan con `/` o que contienen un segmento `..`
    #[error("invalid allow-list entry {0:?}: must start with '/' and must not contain '..'")]
    InvalidPath(String),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AllowListFile {
    paths: Vec<String>,
}

/// Conjunto de paths permitidos para el fallback estático
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    paths: HashSet<String>,
}

impl AllowList {
    /// Crea la lista validando cada entrada
    pub fn new<I, S>(paths: I) -> Result<Self, AllowListError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths = paths
            .into_iter()
            .map(Into::into)
            .map(validate)
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(Self { paths })
    }

    /// Carga la lista desde un archivo JSON
    pub fn load(path: &Path) -> Result<Self, AllowListError> {
        let text = fs::read_to_string(path).map_err(|source| AllowListError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parsea la lista desde el texto JSON
    pub fn from_json(text: &str) -> Result<Self, AllowListError> {
        let file: AllowListFile = serde_json::from_str(text)?;
        Self::new(file.paths)
    }

    /// Comparación exacta, igual que en el router
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self {
            paths: DEFAULT_PATHS.iter().map(|path| path.to_string()).collect(),
        }
    }
}

fn validate(path: String) -> Result<String, AllowListError> {
    let escapes_root = path.split('/').any(|segment| segment == "..");
    if !path.starts_with('/') || escapes_root {
        return Err(AllowListError::InvalidPath(path));
    }
    Ok(path)
}
