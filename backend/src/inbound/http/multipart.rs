//! Streaming reader for the bug submission and edit forms.
//!
//! Text fields are capped at [`TEXT_FIELD_MAX`] bytes and each upload at
//! the configured limit; the stream is abandoned as soon as either is
//! exceeded. Unknown fields are drained and ignored.

use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;

use crate::domain::{AttachmentKind, Error, UploadedFile};

use super::validation::{file_too_large_error, malformed_form_error};

/// Largest accepted text field, in bytes.
pub const TEXT_FIELD_MAX: usize = 64 * 1024;

/// Raw fields of a report form before domain validation. Absent fields
/// stay `None`.
#[derive(Debug, Default)]
pub(crate) struct BugForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub screenshot: Option<UploadedFile>,
    pub screen_recording: Option<UploadedFile>,
}

impl BugForm {
    fn text_slot(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "title" => Some(&mut self.title),
            "description" => Some(&mut self.description),
            "severity" => Some(&mut self.severity),
            "status" => Some(&mut self.status),
            _ => None,
        }
    }

    fn file_slot(&mut self, name: &str) -> Option<&mut Option<UploadedFile>> {
        if name == AttachmentKind::Screenshot.field_name() {
            Some(&mut self.screenshot)
        } else if name == AttachmentKind::ScreenRecording.field_name() {
            Some(&mut self.screen_recording)
        } else {
            None
        }
    }
}

/// Read every field of `payload` into a [`BugForm`].
pub(crate) async fn read_bug_form(
    mut payload: Multipart,
    max_upload_bytes: usize,
) -> Result<BugForm, Error> {
    let mut form = BugForm::default();
    while let Some(field) = payload
        .try_next()
        .await
        .map_err(|err| malformed_form_error("form", err))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        if let Some(slot) = form.file_slot(&name) {
            *slot = read_file(field, &name, max_upload_bytes).await?;
        } else if let Some(slot) = form.text_slot(&name) {
            let bytes = read_limited(field, &name, TEXT_FIELD_MAX).await?;
            let text =
                String::from_utf8(bytes).map_err(|err| malformed_form_error(&name, err))?;
            *slot = Some(text);
        } else {
            drain(field, &name).await?;
        }
    }
    Ok(form)
}

/// A file input left empty arrives with no file name and no bytes.
async fn read_file(
    field: Field,
    name: &str,
    max_bytes: usize,
) -> Result<Option<UploadedFile>, Error> {
    let file_name = field
        .content_disposition()
        .and_then(|disposition| disposition.get_filename())
        .unwrap_or_default()
        .to_owned();
    let bytes = read_limited(field, name, max_bytes).await?;
    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(UploadedFile { file_name, bytes }))
}

async fn read_limited(mut field: Field, name: &str, max_bytes: usize) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|err| malformed_form_error(name, err))?
    {
        if buffer.len() + chunk.len() > max_bytes {
            return Err(file_too_large_error(name, max_bytes));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

async fn drain(mut field: Field, name: &str) -> Result<(), Error> {
    while field
        .try_next()
        .await
        .map_err(|err| malformed_form_error(name, err))?
        .is_some()
    {}
    Ok(())
}
