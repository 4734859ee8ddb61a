use super::ApiClient;
use crate::error::Result;
use taller_common::{Id, ListParams, Vehicle, VehicleCreate, VehicleUpdate};
use tracing::{debug, info};

impl ApiClient {
    /// 車両一覧
    ///
    /// `activos` が None なら全件、Some(true) なら入庫中、Some(false) なら完了のみ。
    /// 分割はサーバ側で行う。
    pub async fn list_vehicles(&self, activos: Option<bool>, params: ListParams) -> Result<Vec<Vehicle>> {
        let mut request = self.http.get(self.url("/api/vehicles")).query(&params);
        if let Some(flag) = activos {
            request = request.query(&[("activos", flag)]);
        }

        let vehicles: Vec<Vehicle> = self.fetch_json(request).await?;
        debug!(activos = ?activos, count = vehicles.len(), "Vehicles fetched");
        Ok(vehicles)
    }

    /// 車両を1件取得（所有者・不具合・整備履歴を含む）
    pub async fn get_vehicle(&self, id: Id) -> Result<Vehicle> {
        let request = self.http.get(self.url(&format!("/api/vehicles/{}", id)));
        self.fetch_json(request).await
    }

    pub async fn create_vehicle(&self, vehicle: &VehicleCreate) -> Result<Vehicle> {
        let request = self.http.post(self.url("/api/vehicles")).json(vehicle);
        let created: Vehicle = self.fetch_json(request).await?;
        info!(id = created.id, placas = %created.placas, "Vehicle registered");
        Ok(created)
    }

    /// 部分更新
    pub async fn update_vehicle(&self, id: Id, update: &VehicleUpdate) -> Result<Vehicle> {
        let request = self.http.put(self.url(&format!("/api/vehicles/{}", id))).json(update);
        let updated: Vehicle = self.fetch_json(request).await?;
        info!(id, "Vehicle updated");
        Ok(updated)
    }

    pub async fn delete_vehicle(&self, id: Id) -> Result<()> {
        let request = self.http.delete(self.url(&format!("/api/vehicles/{}", id)));
        self.send(request).await?;
        info!(id, "Vehicle deleted");
        Ok(())
    }
}
