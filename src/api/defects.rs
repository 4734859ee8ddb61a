use super::ApiClient;
use crate::error::Result;
use taller_common::{Defect, DefectCreate, Id};
use tracing::info;

impl ApiClient {
    pub async fn create_defect(&self, defect: &DefectCreate) -> Result<Defect> {
        let request = self.http.post(self.url("/api/defects")).json(defect);
        let created: Defect = self.fetch_json(request).await?;
        info!(id = created.id, vehiculo_id = created.vehiculo_id, "Defect registered");
        Ok(created)
    }

    /// 車両の不具合一覧
    pub async fn list_vehicle_defects(&self, vehicle_id: Id) -> Result<Vec<Defect>> {
        let request = self.http.get(self.url(&format!("/api/defects/vehicle/{}", vehicle_id)));
        self.fetch_json(request).await
    }
}
