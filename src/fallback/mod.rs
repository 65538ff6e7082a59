//! # Fallback estático
//! src/fallback/mod.rs
//!
//! Cuando ningún handler coincide con el request, el fallback:
//!
//! 1. Verifica el path contra la [`AllowList`]; si no está, responde 404.
//! 2. Abre el archivo en el [`PublicDir`]; si no existe, responde 404.
//! 3. Responde 200 con `Content-Type`, `Content-Length` igual al largo del
//!    archivo y el contenido exacto del archivo como body.

pub mod allow_list;
pub mod public_dir;

pub use allow_list::{AllowList, AllowListError, DEFAULT_PATHS};
pub use public_dir::{PublicDir, StaticFile};

use crate::http::{Response, StatusCode};
use std::io::{self, ErrorKind, Read, Write};

/// Resultado de servir un path estático
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticOutcome {
    /// Se envió el archivo completo
    Served { bytes: u64 },

    /// El path no está en la allow-list (404)
    NotAllowed,

    /// El path está permitido pero el archivo no existe (404)
    MissingFile,
}

impl StaticOutcome {
    pub fn status(&self) -> StatusCode {
        match self {
            StaticOutcome::Served { .. } => StatusCode::Ok,
            StaticOutcome::NotAllowed | StaticOutcome::MissingFile => StatusCode::NotFound,
        }
    }
}

/// Allow-list más directorio público
#[derive(Debug, Clone)]
pub struct StaticFallback {
    allow_list: AllowList,
    public_dir: PublicDir,
}

impl StaticFallback {
    pub fn new(allow_list: AllowList, public_dir: PublicDir) -> Self {
        Self {
            allow_list,
            public_dir,
        }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn public_dir(&self) -> &PublicDir {
        &self.public_dir
    }

    /// Sirve el path y hace flush de la respuesta
    ///
    /// Un error después de enviar los headers deja la respuesta incompleta:
    /// la conexión se aborta.
    pub fn serve(&self, path: &str, out: &mut dyn Write) -> io::Result<StaticOutcome> {
        if !self.allow_list.contains(path) {
            Response::not_found().write_to(out)?;
            return Ok(StaticOutcome::NotAllowed);
        }

        let Some(found) = self.public_dir.open(path)? else {
            Response::not_found().write_to(out)?;
            return Ok(StaticOutcome::MissingFile);
        };

        Response::new(StatusCode::Ok)
            .with_header("Content-Type", &found.content_type)
            .with_content_length(found.length)
            .write_head(out)?;

        // Nunca más bytes que los anunciados, aunque el archivo crezca
        let sent = io::copy(&mut (&found.file).take(found.length), out)?;
        if sent != found.length {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "{} shrank while sending: {} of {} bytes",
                    path, sent, found.length
                ),
            ));
        }
        out.flush()?;

        Ok(StaticOutcome::Served { bytes: sent })
    }
}
