//! gloo-net implementation of the chat backend API

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::api::endpoints;
use shared::{
    ApiClientConfig, ApiError, ChatBackend, ChatMode, ChatQuery, ChatReply, UploadResponse,
};
use web_sys::{File, FormData};

#[derive(Debug, Clone, PartialEq)]
pub struct HttpChatBackend {
    config: ApiClientConfig,
}

impl HttpChatBackend {
    pub fn new(config: ApiClientConfig) -> Self {
        Self { config }
    }
}

/// Decode a JSON body. The backend answers errors with JSON too, so the
/// status only matters when the body is unreadable.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    match response.json::<T>().await {
        Ok(body) => Ok(body),
        Err(e) if !response.ok() => Err(ApiError::Server {
            status: response.status(),
            message: e.to_string(),
        }),
        Err(e) => Err(ApiError::Parse(e.to_string())),
    }
}

impl ChatBackend for HttpChatBackend {
    type Attachment = File;

    async fn upload(&self, chat_id: &str, file: File) -> Result<UploadResponse, ApiError> {
        let form = FormData::new().map_err(|e| ApiError::Parse(format!("{:?}", e)))?;
        form.append_with_blob_and_filename(endpoints::UPLOAD_FIELD, &file, &file.name())
            .map_err(|e| ApiError::Parse(format!("{:?}", e)))?;

        let url = self.config.url(&endpoints::upload(chat_id));
        let response = Request::post(&url)
            .body(form)
            .map_err(|e| ApiError::Parse(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        read_json(response).await
    }

    async fn ask(
        &self,
        mode: ChatMode,
        chat_id: &str,
        query: &str,
    ) -> Result<ChatReply, ApiError> {
        let url = self.config.url(&endpoints::chat(mode, chat_id));
        let body = ChatQuery {
            query: query.to_string(),
        };
        let response = Request::post(&url)
            .json(&body)
            .map_err(|e| ApiError::Parse(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        read_json(response).await
    }
}
