//! Document upload: file selection, in-flight lock, and attaching the result
//! to the session it was started for.

use shared::{
    ApiError, ChatBackend, ChatMode, ChatSession, KeyValueStorage, SessionStore, StoreError,
    UploadResponse,
};

use super::sessions::ensure_active_session;
use super::{ChatContext, UploadState};

/// Inline status shown on the file chip when an upload fails
pub const UPLOAD_ERROR_STATUS: &str = "Error uploading PDF";

/// An upload that has been started and must be resolved with `finish_upload`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub chat_id: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Session updated with the new attachment
    Attached(ChatSession),
    Failed,
    /// The session was deleted while the upload was in flight
    SessionGone,
}

/// Handle a file selection.
///
/// Returns the upload to perform, or `None` when nothing should be sent:
/// the active session is not in pdf mode, or another upload is running.
/// The chip goes straight from idle to uploading; a selection that is not
/// uploaded leaves it idle.
pub fn begin_upload<S: KeyValueStorage>(
    ctx: &mut ChatContext,
    store: &SessionStore<S>,
    file_name: &str,
) -> Result<Option<PendingUpload>, StoreError> {
    if ctx.upload.is_uploading() {
        log::warn!("Ignoring {}: another upload is in flight", file_name);
        return Ok(None);
    }

    let session = ensure_active_session(ctx, store)?;
    if session.mode != ChatMode::Pdf {
        log::debug!("Chat {} is not in pdf mode, skipping upload", session.chat_id);
        ctx.upload = UploadState::Idle;
        return Ok(None);
    }

    ctx.upload = UploadState::Uploading {
        file_name: file_name.to_string(),
        chat_id: session.chat_id.clone(),
    };
    Ok(Some(PendingUpload {
        chat_id: session.chat_id,
        file_name: file_name.to_string(),
    }))
}

/// Send the attachment for a pending upload
pub async fn perform_upload<B: ChatBackend>(
    backend: &B,
    pending: &PendingUpload,
    attachment: B::Attachment,
) -> Result<UploadResponse, ApiError> {
    backend.upload(&pending.chat_id, attachment).await
}

/// Apply the backend's answer and release the send lock.
pub fn finish_upload<S: KeyValueStorage>(
    ctx: &mut ChatContext,
    store: &SessionStore<S>,
    pending: &PendingUpload,
    result: Result<UploadResponse, ApiError>,
) -> Result<UploadOutcome, StoreError> {
    let still_active = ctx.is_active(&pending.chat_id);
    // Release the lock first so a store failure cannot leave sending blocked
    ctx.upload = UploadState::Idle;

    let succeeded = match result {
        Ok(response) if response.is_success() => true,
        Ok(response) => {
            log::error!(
                "Upload of {} rejected: {}",
                pending.file_name,
                response.error.as_deref().unwrap_or("no message in response")
            );
            false
        }
        Err(e) => {
            log::error!("Upload of {} failed: {}", pending.file_name, e);
            false
        }
    };

    if !succeeded {
        if still_active {
            ctx.upload = UploadState::Failed {
                file_name: pending.file_name.clone(),
                error: UPLOAD_ERROR_STATUS.to_string(),
            };
        }
        return Ok(UploadOutcome::Failed);
    }

    let Some(session) = store.update(&pending.chat_id, |s| s.attach_file(&pending.file_name))?
    else {
        log::warn!(
            "Chat {} was deleted before {} finished uploading",
            pending.chat_id,
            pending.file_name
        );
        return Ok(UploadOutcome::SessionGone);
    };

    log::info!("Attached {} to chat {}", pending.file_name, pending.chat_id);
    if still_active {
        ctx.upload = UploadState::Attached {
            file_name: pending.file_name.clone(),
        };
    }
    Ok(UploadOutcome::Attached(session))
}

/// The remove button on the chip. Session attachment fields are left as
/// they are; an in-flight upload cannot be removed.
pub fn remove_file(ctx: &mut ChatContext) {
    ctx.hide_preview();
}
