use super::ApiClient;
use crate::error::Result;
use taller_common::{Id, ListParams, Owner, OwnerCreate};
use tracing::info;

impl ApiClient {
    /// 所有者一覧
    pub async fn list_owners(&self, params: ListParams) -> Result<Vec<Owner>> {
        let request = self.http.get(self.url("/api/owners")).query(&params);
        self.fetch_json(request).await
    }

    /// 所有者を1件取得
    pub async fn get_owner(&self, id: Id) -> Result<Owner> {
        let request = self.http.get(self.url(&format!("/api/owners/{}", id)));
        self.fetch_json(request).await
    }

    pub async fn create_owner(&self, owner: &OwnerCreate) -> Result<Owner> {
        let request = self.http.post(self.url("/api/owners")).json(owner);
        let created: Owner = self.fetch_json(request).await?;
        info!(id = created.id, "Owner created");
        Ok(created)
    }
}
