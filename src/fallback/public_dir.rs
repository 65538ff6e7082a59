//! # Directorio público
//! src/fallback/public_dir.rs
//!
//! Resuelve un path del request a un archivo dentro del directorio raíz
//! (`./public` por defecto) y adivina su Content-Type por la extensión.

use std::fs::File;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// Content-Type cuando la extensión no dice nada
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Raíz desde donde se sirven los archivos estáticos
#[derive(Debug, Clone)]
pub struct PublicDir {
    root: PathBuf,
}

/// Un archivo listo para enviarse
#[derive(Debug)]
pub struct StaticFile {
    pub file: File,
    pub length: u64,
    pub content_type: String,
}

impl PublicDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ruta local para un path del request: `/a/b.css` → `<root>/a/b.css`
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    /// Abre el archivo que corresponde al path
    ///
    /// Retorna `Ok(None)` si no existe o no es un archivo regular. Cualquier
    /// otra falla es de I/O.
    pub fn open(&self, path: &str) -> io::Result<Option<StaticFile>> {
        let local = self.resolve(path);

        let file = match File::open(&local) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Ok(None);
        }

        Ok(Some(StaticFile {
            file,
            length: metadata.len(),
            content_type: content_type(&local),
        }))
    }
}

/// Content-Type según la extensión del archivo
pub fn content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}
