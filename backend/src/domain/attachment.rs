//! Attachment names and uploads.
//!
//! Uploaded files are stored flat in one directory under a sanitised name.
//! Sanitising strips every directory component, so a stored name can never
//! escape the upload directory.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// Maximum stored file name length, matching the report columns.
pub const ATTACHMENT_NAME_MAX: usize = 255;

/// Length of the `<32 hex digits>_` prefix added to stored names.
const UNIQUE_PREFIX_LEN: usize = 33;

const WINDOWS_DEVICE_NAMES: [&str; 22] = [
    "CON", "AUX", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8", "COM9", "LPT1",
    "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9", "PRN", "NUL",
];

/// Which attachment slot of a report a file fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// Still image of the defect.
    Screenshot,
    /// Video capture of the defect.
    ScreenRecording,
}

impl AttachmentKind {
    /// Form field carrying this attachment.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Screenshot => "screenshot",
            Self::ScreenRecording => "screen_recording",
        }
    }
}

/// Errors raised while sanitising an uploaded file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentNameError {
    /// Nothing usable remained after sanitising.
    #[error("file name has no usable characters")]
    Empty,
    /// The sanitised name is longer than storage allows.
    #[error("file name must be at most {max} characters")]
    TooLong { max: usize },
}

/// A file name that is safe to join onto the upload directory.
///
/// # Examples
/// ```
/// use bugtracker::domain::AttachmentName;
///
/// let name = AttachmentName::sanitize("../../etc/passwd").expect("usable name");
/// assert_eq!(name.as_ref(), "etc_passwd");
///
/// let name = AttachmentName::sanitize("My cool movie.mov").expect("usable name");
/// assert_eq!(name.as_ref(), "My_cool_movie.mov");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttachmentName(String);

impl AttachmentName {
    /// Reduce an arbitrary client-supplied name to a safe flat file name.
    ///
    /// Accented letters are folded to their ASCII base through NFKD. Path
    /// separators become spaces, whitespace runs become `_`, anything
    /// outside `[A-Za-z0-9_.-]` is dropped, and leading or trailing `.`/`_`
    /// are trimmed. Windows device names are prefixed with `_`.
    pub fn sanitize(raw: &str) -> Result<Self, AttachmentNameError> {
        let folded: String = raw.nfkd().filter(char::is_ascii).collect();
        let separated = folded.replace(['/', '\\'], " ");
        let joined = separated.split_whitespace().collect::<Vec<_>>().join("_");
        let filtered: String = joined
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-'))
            .collect();
        let trimmed = filtered.trim_matches(|ch| ch == '.' || ch == '_');
        if trimmed.is_empty() {
            return Err(AttachmentNameError::Empty);
        }

        let stem = trimmed.split('.').next().unwrap_or_default();
        let name = if WINDOWS_DEVICE_NAMES.contains(&stem.to_ascii_uppercase().as_str()) {
            format!("_{trimmed}")
        } else {
            trimmed.to_owned()
        };

        if name.len() > ATTACHMENT_NAME_MAX {
            return Err(AttachmentNameError::TooLong {
                max: ATTACHMENT_NAME_MAX,
            });
        }
        Ok(Self(name))
    }

    /// Prefix the name with `token` so uploads sharing a client file name
    /// never share a stored file.
    ///
    /// When the result would exceed [`ATTACHMENT_NAME_MAX`] the start of the
    /// original name is dropped, keeping its extension.
    ///
    /// # Examples
    /// ```
    /// use bugtracker::domain::AttachmentName;
    /// use uuid::Uuid;
    ///
    /// let name = AttachmentName::sanitize("crash.png").expect("usable name");
    /// let stored = name.with_unique_prefix(Uuid::nil());
    /// assert_eq!(stored.as_ref(), "00000000000000000000000000000000_crash.png");
    /// ```
    #[must_use]
    pub fn with_unique_prefix(&self, token: Uuid) -> Self {
        let keep = ATTACHMENT_NAME_MAX - UNIQUE_PREFIX_LEN;
        let skip = self.0.chars().count().saturating_sub(keep);
        let tail: String = self.0.chars().skip(skip).collect();
        Self(format!("{}_{tail}", token.simple()))
    }

    /// Accept `raw` only when it is already in sanitised form.
    ///
    /// Used for names arriving in request paths, where silently rewriting the
    /// name could address a different file.
    pub fn parse_exact(raw: &str) -> Option<Self> {
        Self::sanitize(raw).ok().filter(|name| name.0 == raw)
    }
}

impl AsRef<str> for AttachmentName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AttachmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AttachmentName> for String {
    fn from(value: AttachmentName) -> Self {
        value.0
    }
}

impl TryFrom<String> for AttachmentName {
    type Error = AttachmentNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::sanitize(&value)
    }
}

/// Raw upload received from a client.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name as sent by the client; not yet sanitised.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Public path prefix under which stored attachments are served.
pub const UPLOADS_PATH: &str = "/uploads";

/// Pointer to a stored attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    /// Stored file name.
    pub file_name: AttachmentName,
    /// Path the file can be downloaded from.
    pub url: String,
}

impl From<AttachmentName> for AttachmentRef {
    fn from(file_name: AttachmentName) -> Self {
        let url = format!("{UPLOADS_PATH}/{file_name}");
        Self { file_name, url }
    }
}

/// A report together with references to its files. Either slot may be
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BugAttachments {
    /// Report the attachments belong to.
    pub bug: super::BugReport,
    /// Screenshot reference.
    pub screenshot: Option<AttachmentRef>,
    /// Screen recording reference.
    pub screen_recording: Option<AttachmentRef>,
}

impl From<&super::BugReport> for BugAttachments {
    fn from(report: &super::BugReport) -> Self {
        Self {
            bug: report.clone(),
            screenshot: report.screenshot.clone().map(AttachmentRef::from),
            screen_recording: report.screen_recording.clone().map(AttachmentRef::from),
        }
    }
}
