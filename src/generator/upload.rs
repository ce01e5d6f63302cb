use axum::{
    debug_handler,
    extract::Multipart,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::{AppError, AppResult, include_res, session::USER_ID};

use super::draft;

pub const MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;
const ALLOWED_EXTENSIONS: [&str; 4] = [".pdf", ".docx", ".pptx", ".txt"];

/// Acknowledgment of an accepted course-material upload. Only the name and
/// size are kept; the content is never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
}

impl UploadedFile {
    pub fn accept(name: &str, size: u64) -> Result<UploadedFile, AppError> {
        let extension = name.rfind('.').map(|at| name[at..].to_ascii_lowercase());
        if !extension.as_deref().is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext)) {
            return Err(AppError::Validation(format!(
                "Invalid file type. Please upload one of the following: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        if size > MAX_FILE_BYTES {
            return Err(AppError::Validation(
                "File is too large. Maximum size is 20MB.".into(),
            ));
        }
        Ok(UploadedFile { name: name.to_owned(), size })
    }

    /// Title suggested from the file stem, underscores read as spaces.
    pub fn suggested_title(&self) -> String {
        let stem = match self.name.rfind('.') {
            Some(at) => &self.name[..at],
            None => &self.name,
        };
        stem.replace('_', " ")
    }
}

#[debug_handler]
pub(crate) async fn upload_page(session: Session) -> AppResult<Response> {
    if session.get::<String>(USER_ID).await?.is_none() {
        return Ok(Redirect::to("/login?return_url=/g").into_response());
    }

    let draft = draft::load(&session).await?;
    Ok(Html(
        include_res!(str, "/pages/generator/upload.html")
            .replace("{title}", &draft.title)
            .replace("{description}", &draft.description),
    )
    .into_response())
}

#[debug_handler]
pub(crate) async fn upload(session: Session, mut multipart: Multipart) -> AppResult<Response> {
    if session.get::<String>(USER_ID).await?.is_none() {
        return Err(AppError::Unauthenticated);
    }

    let mut title = String::new();
    let mut description = String::new();
    let mut file = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "title" => title = field.text().await?,
            "description" => description = field.text().await?,
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                if file_name.is_empty() {
                    continue;
                }
                // size only; the content is dropped unread
                let mut size = 0u64;
                while let Some(chunk) = field.chunk().await? {
                    size += chunk.len() as u64;
                }
                file = Some(UploadedFile::accept(&file_name, size)?);
            }
            _ => {}
        }
    }

    let Some(file) = file else {
        return Err(AppError::Validation("Please select a file to upload".into()));
    };
    if title.trim().is_empty() {
        title = file.suggested_title();
    }
    if title.trim().is_empty() {
        return Err(AppError::Validation("Please enter a quiz title".into()));
    }

    let mut draft = draft::load(&session).await?;
    draft.title = title;
    draft.description = description;
    draft.file = Some(file);
    draft::store(&session, &draft).await?;

    Ok(Redirect::to("/g/customize").into_response())
}
