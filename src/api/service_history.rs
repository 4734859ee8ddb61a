use super::ApiClient;
use crate::error::Result;
use taller_common::{Id, ServiceHistory, ServiceHistoryCreate};
use tracing::info;

impl ApiClient {
    pub async fn create_service_record(&self, service: &ServiceHistoryCreate) -> Result<ServiceHistory> {
        let request = self.http.post(self.url("/api/service-history")).json(service);
        let created: ServiceHistory = self.fetch_json(request).await?;
        info!(id = created.id, vehiculo_id = created.vehiculo_id, "Service record added");
        Ok(created)
    }

    /// 車両の整備履歴（新しい順はサーバ側で並べ替え済み）
    pub async fn list_vehicle_service_history(&self, vehicle_id: Id) -> Result<Vec<ServiceHistory>> {
        let request = self
            .http
            .get(self.url(&format!("/api/service-history/vehicle/{}", vehicle_id)));
        self.fetch_json(request).await
    }
}
