use super::ApiClient;
use crate::error::Result;
use reqwest::multipart::{Form, Part};
use taller_common::UploadResponse;
use tracing::info;

impl ApiClient {
    /// 画像をアップロード（multipartの `file` フィールド1つ）
    ///
    /// 戻り値の `url` はバックエンド上の相対パス。
    pub async fn upload_image(&self, file_name: &str, mime: &str, bytes: Vec<u8>) -> Result<UploadResponse> {
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part("file", part);

        let request = self.http.post(self.url("/api/upload-image")).multipart(form);
        let uploaded: UploadResponse = self.fetch_json(request).await?;
        info!(file_name, size, url = %uploaded.url, "Image uploaded");
        Ok(uploaded)
    }
}
