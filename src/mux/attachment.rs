//! Attachment model.
//!
//! Attachments ride along in the output container; fonts for ASS subtitle
//! tracks are the usual case.

use std::path::{Path, PathBuf};

use crate::models::MkvResult;

/// One file to attach to the output.
#[derive(Debug, Clone)]
pub struct Attachment {
    file: PathBuf,
    name: String,
    mime_type: Option<String>,
}

impl Attachment {
    /// Create an attachment. The display name defaults to the file's base
    /// name; the mime type is optional and mkvmerge will guess when it is
    /// omitted.
    pub fn new(
        file: impl Into<PathBuf>,
        name: Option<String>,
        mime_type: Option<String>,
    ) -> Self {
        let file = file.into();
        let name = name.unwrap_or_else(|| {
            file.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        Self {
            file,
            name,
            mime_type,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Emit this attachment's option fragment.
    pub fn emit_options(&self) -> MkvResult<Vec<String>> {
        let mut args = vec![
            "--attachment-name".to_string(),
            self.name.clone(),
            "--attach-file".to_string(),
            std::path::absolute(&self.file)?.display().to_string(),
        ];

        if let Some(mime) = &self.mime_type {
            args.push("--attachment-mime-type".to_string());
            args.push(mime.clone());
        }

        Ok(args)
    }
}
