//! バックエンドAPIクライアント
//!
//! 1操作につき1メソッド。リトライ・キャッシュ・同一リクエストの重複排除は行わない。
//! 非成功ステータスはすべて `TallerError::Status` として呼び出し元に返す。

mod defects;
mod owners;
mod receipts;
mod service_history;
mod uploads;
mod vehicles;

use crate::config::Config;
use crate::error::{Result, TallerError};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use taller_common::{ApiErrorBody, BaseUrl};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: BaseUrl,
}

impl ApiClient {
    /// 設定からクライアントを作成
    ///
    /// # Errors
    ///
    /// APIのURLが不正な場合、またはHTTPクライアントを作成できない場合
    pub fn new(config: &Config) -> Result<Self> {
        let base = config.api_base()?;
        let http = Client::builder().build()?;
        debug!(base = %base, "API client ready");
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &BaseUrl {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        self.base.join(path)
    }

    /// 送信してステータスを検査
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "API transport failure");
            TallerError::from(e)
        })?;
        Self::check(response).await
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let detail = ApiErrorBody::extract(&body);
        warn!(status = status.as_u16(), url = %url, detail = ?detail, "API request failed");

        Err(TallerError::Status {
            status: status.as_u16(),
            detail,
        })
    }

    /// 送信してJSONをデシリアライズ
    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let data = response.json::<T>().await.map_err(|e| {
            warn!(error = %e, "API response could not be decoded");
            TallerError::from(e)
        })?;
        Ok(data)
    }
}
