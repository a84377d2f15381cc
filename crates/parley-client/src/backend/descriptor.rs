//! Connection descriptors: what a session is opened against.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Which backend contract a session follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Database,
    Document,
}

/// Body of the `/connect` request.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseDescriptor {
    pub db_type: String,
    pub connection_string: String,
    pub database_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl DatabaseDescriptor {
    pub fn new(
        db_type: impl Into<String>,
        connection_string: impl Into<String>,
        database_name: impl Into<String>,
    ) -> Self {
        Self {
            db_type: db_type.into(),
            connection_string: connection_string.into(),
            database_name: database_name.into(),
            username: None,
            password: None,
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

impl fmt::Debug for DatabaseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseDescriptor")
            .field("db_type", &self.db_type)
            .field("connection_string", &"[REDACTED]")
            .field("database_name", &self.database_name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A document to upload as the body of a document session.
#[derive(Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its file name for the upload.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        Ok(Self { file_name, bytes })
    }
}

impl fmt::Debug for DocumentUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentUpload")
            .field("file_name", &self.file_name)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// Opaque connection configuration carried by a session.
#[derive(Debug, Clone)]
pub enum ConnectionDescriptor {
    Database(DatabaseDescriptor),
    Document(DocumentUpload),
}

impl ConnectionDescriptor {
    pub fn kind(&self) -> SessionKind {
        match self {
            ConnectionDescriptor::Database(_) => SessionKind::Database,
            ConnectionDescriptor::Document(_) => SessionKind::Document,
        }
    }

    /// Human-readable name for notifications.
    pub fn label(&self) -> String {
        match self {
            ConnectionDescriptor::Database(db) => format!("{} database", db.db_type),
            ConnectionDescriptor::Document(doc) => doc.file_name.clone(),
        }
    }
}
