use super::ApiClient;
use crate::error::Result;
use taller_common::Id;
use tracing::info;

impl ApiClient {
    /// 入庫受付票（PDF）を生成
    ///
    /// 中身は解釈せずバイト列のまま返す。
    pub async fn generate_receipt(&self, vehicle_id: Id) -> Result<Vec<u8>> {
        let request = self
            .http
            .post(self.url(&format!("/api/generate-receipt/{}", vehicle_id)));
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        info!(vehicle_id, size = bytes.len(), "Receipt generated");
        Ok(bytes.to_vec())
    }
}
