//! Upload-Kollaborateur: Bild-Blobs prüfen und an einen Transport übergeben.
//!
//! Die Prüfung läuft in der Anwendung, der Transport beim Host. Die Anwendung
//! konsumiert nur die zurückgegebene URL.

use crate::errors::UploadError;
use anyhow::Context;
use image::ImageFormat;
use std::fmt;
use std::path::Path;

/// Vom Nutzer gewählte Bilddatei.
#[derive(Clone, PartialEq)]
pub struct ImageBlob {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBlob")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl ImageBlob {
    pub fn new(file_name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        }
    }

    /// Liest eine Datei; der MIME-Typ wird aus der Dateiendung abgeleitet.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Bilddatei nicht lesbar: {}", path.display()))?;
        let mime_type = ImageFormat::from_path(path)
            .map(|format| format.to_mime_type())
            .unwrap_or("application/octet-stream");
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self {
            file_name,
            mime_type: mime_type.to_string(),
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Prüft Größe, MIME-Typ und Magic-Bytes eines Blobs.
///
/// Der erkannte Inhalt muss zum deklarierten MIME-Typ passen.
pub fn validate(blob: &ImageBlob, max_bytes: u64) -> Result<ImageFormat, UploadError> {
    if blob.size() > max_bytes {
        return Err(UploadError::TooLarge {
            size: blob.size(),
            limit: max_bytes,
        });
    }
    let declared = blob.mime_type.to_ascii_lowercase();
    if !declared.starts_with("image/") {
        return Err(UploadError::UnsupportedMime(blob.mime_type.clone()));
    }
    let format = image::guess_format(&blob.bytes).map_err(|_| UploadError::NotAnImage)?;
    let detected = format.to_mime_type();
    // image/jpg ist ein verbreiteter Alias
    if declared != detected && !(declared == "image/jpg" && format == ImageFormat::Jpeg) {
        return Err(UploadError::MimeMismatch {
            declared: blob.mime_type.clone(),
            detected,
        });
    }
    Ok(format)
}

/// Transport, der ein geprüftes Bild speichert und eine abrufbare URL liefert.
pub trait ImageUploader {
    fn upload(&mut self, blob: &ImageBlob) -> Result<String, UploadError>;
}

/// In-Memory-Transport (URLs `memory://uploads/<n>/<name>`).
#[derive(Debug, Default)]
pub struct MemoryUploader {
    stored: Vec<(String, ImageBlob)>,
    failure: Option<String>,
}

impl MemoryUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jeder Upload schlägt mit dieser Meldung fehl.
    pub fn failing(message: &str) -> Self {
        Self {
            stored: Vec::new(),
            failure: Some(message.to_string()),
        }
    }

    pub fn get(&self, url: &str) -> Option<&ImageBlob> {
        self.stored
            .iter()
            .find(|(stored_url, _)| stored_url == url)
            .map(|(_, blob)| blob)
    }

    pub fn len(&self) -> usize {
        self.stored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }
}

impl ImageUploader for MemoryUploader {
    fn upload(&mut self, blob: &ImageBlob) -> Result<String, UploadError> {
        if let Some(message) = &self.failure {
            return Err(UploadError::Transport(message.clone()));
        }
        let url = format!(
            "memory://uploads/{}/{}",
            self.stored.len() + 1,
            blob.file_name
        );
        self.stored.push((url.clone(), blob.clone()));
        log::debug!("Bild gespeichert unter {}", url);
        Ok(url)
    }
}
