use std::path::PathBuf;

/// Errors produced while reading workflow documents and resolving lineage.
///
/// Absent XML attributes are never errors; they surface as `None` in the model
/// and as the `N/A` marker in rendered output. These variants cover the cases
/// where no useful partial result exists.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("workflow document not found: {}", .path.display())]
    DocumentNotFound { path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed workflow document: {message}")]
    MalformedDocument { message: String },
    #[error("mapping {mapping}: field {field} is not declared by transformation {transformation}")]
    UnresolvableField {
        mapping: String,
        transformation: String,
        field: String,
    },
}

impl ExtractError {
    pub fn malformed<T: Into<String>>(message: T) -> Self {
        ExtractError::MalformedDocument {
            message: message.into(),
        }
    }
}

impl From<quick_xml::Error> for ExtractError {
    fn from(e: quick_xml::Error) -> Self {
        ExtractError::MalformedDocument {
            message: e.to_string(),
        }
    }
}
