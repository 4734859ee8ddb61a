//! 車両詳細画面
//!
//! - 読み込み: 取得失敗と「見つからない」を区別する
//! - 受付票: PDFを取得して `comprobante_<placas>.pdf` として保存
//! - 不具合追加: 写真があれば先にアップロードし、返ったURLで不具合を登録
//! - 完了: 確認後に完了日時を設定（取り消し操作はない）

use super::Phase;
use crate::api::ApiClient;
use crate::download;
use crate::error::{Result, TallerError};
use crate::preview::ImagePreview;
use chrono::Utc;
use std::path::{Path, PathBuf};
use taller_common::{
    Defect, DefectDraft, Generation, Id, ServiceDraft, ServiceHistory, Ticket, Vehicle, VehicleUpdate,
};
use tracing::{debug, info, warn};

pub const LOAD_ERROR: &str = "Error al cargar el vehículo";
pub const NOT_FOUND: &str = "Vehículo no encontrado";
pub const RECEIPT_ERROR: &str = "Error al generar el PDF";
pub const DEFECT_ERROR: &str = "Error al agregar el defecto";
pub const COMPLETE_ERROR: &str = "Error al actualizar el vehículo";
pub const SERVICE_ERROR: &str = "Error al agregar el servicio";

/// 表示用の状態
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailStatus<'a> {
    Loading,
    NotFound,
    Failed(&'a str),
    Loaded(&'a Vehicle),
}

#[derive(Debug)]
pub struct VehicleDetailView {
    id: Id,
    vehicle: Option<Vehicle>,
    phase: Phase,
    generating_receipt: bool,
    show_defect_form: bool,
    defect_draft: DefectDraft,
    defect_image: Option<ImagePreview>,
    generation: Generation,
}

impl VehicleDetailView {
    pub fn new(id: Id) -> Self {
        Self {
            id,
            vehicle: None,
            phase: Phase::Idle,
            generating_receipt: false,
            show_defect_form: false,
            defect_draft: DefectDraft::default(),
            defect_image: None,
            generation: Generation::new(),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        self.vehicle.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn status(&self) -> DetailStatus<'_> {
        match &self.phase {
            Phase::Idle | Phase::Loading => DetailStatus::Loading,
            Phase::Failed(message) => DetailStatus::Failed(message),
            Phase::Ready => match &self.vehicle {
                Some(vehicle) => DetailStatus::Loaded(vehicle),
                None => DetailStatus::NotFound,
            },
        }
    }

    pub fn is_generating_receipt(&self) -> bool {
        self.generating_receipt
    }

    pub fn is_defect_form_visible(&self) -> bool {
        self.show_defect_form
    }

    pub fn defect_draft(&self) -> &DefectDraft {
        &self.defect_draft
    }

    pub fn defect_draft_mut(&mut self) -> &mut DefectDraft {
        &mut self.defect_draft
    }

    pub fn defect_image(&self) -> Option<&ImagePreview> {
        self.defect_image.as_ref()
    }

    /// ルートパラメータの変更（以前の応答は破棄）
    pub fn set_id(&mut self, id: Id) -> bool {
        if self.id == id {
            return false;
        }
        self.id = id;
        self.vehicle = None;
        self.phase = Phase::Idle;
        self.generation.invalidate();
        true
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.phase = Phase::Loading;
        self.generation.begin()
    }

    /// 取得結果を反映。古いTicketの結果は捨ててfalseを返す
    pub fn finish_load(&mut self, ticket: Ticket, result: Result<Vehicle>) -> bool {
        if !self.generation.is_current(ticket) {
            debug!(id = self.id, "Discarding stale vehicle response");
            return false;
        }

        match result {
            Ok(vehicle) => {
                self.vehicle = Some(vehicle);
                self.phase = Phase::Ready;
            }
            Err(e) if e.is_not_found() => {
                self.vehicle = None;
                self.phase = Phase::Ready;
            }
            Err(e) => {
                warn!(error = %e, id = self.id, "Vehicle load failed");
                self.phase = Phase::Failed(LOAD_ERROR.to_string());
            }
        }
        true
    }

    pub async fn load(&mut self, api: &ApiClient) -> bool {
        let ticket = self.begin_load();
        let result = api.get_vehicle(self.id).await;
        self.finish_load(ticket, result)
    }

    pub fn unmount(&mut self) {
        self.generation.invalidate();
    }

    fn loaded(&self) -> Result<&Vehicle> {
        match self.status() {
            DetailStatus::Loaded(vehicle) => Ok(vehicle),
            _ => Err(TallerError::NotLoaded),
        }
    }

    /// 受付票を生成して保存
    ///
    /// 実行中に再度呼ぶと `Busy`。
    pub async fn generate_receipt(&mut self, api: &ApiClient, dir: &Path) -> Result<PathBuf> {
        if self.generating_receipt {
            return Err(TallerError::Busy);
        }
        let (id, placas) = {
            let vehicle = self.loaded()?;
            (vehicle.id, vehicle.placas.clone())
        };

        self.generating_receipt = true;
        let result = async {
            let bytes = api.generate_receipt(id).await?;
            download::save_receipt(dir, &placas, &bytes).await
        }
        .await;
        self.generating_receipt = false;

        match &result {
            Ok(path) => info!(id, path = %path.display(), "Receipt downloaded"),
            Err(e) => warn!(id, error = %e, "Receipt generation failed"),
        }
        result
    }

    /// 不具合フォームの表示切替
    pub fn toggle_defect_form(&mut self) -> bool {
        self.show_defect_form = !self.show_defect_form;
        self.show_defect_form
    }

    /// フォームを閉じる（下書きは保持）
    pub fn hide_defect_form(&mut self) {
        self.show_defect_form = false;
    }

    /// 写真を選択してプレビューを生成
    pub async fn select_defect_image(&mut self, path: &Path) -> Result<()> {
        let preview = ImagePreview::load(path).await?;
        self.defect_image = Some(preview);
        Ok(())
    }

    pub fn clear_defect_image(&mut self) {
        self.defect_image = None;
    }

    /// 不具合を登録
    ///
    /// 写真がある場合はアップロード → 登録の順。アップロードに失敗したら登録しない。
    /// 成功したらフォームを閉じて下書きをリセットし、車両を読み直す。
    pub async fn add_defect(&mut self, api: &ApiClient) -> Result<Defect> {
        let vehicle_id = self.loaded()?.id;
        self.defect_draft.validate()?;

        let result = async {
            let imagen_url = match &self.defect_image {
                Some(image) => {
                    let uploaded = api
                        .upload_image(&image.file_name, &image.mime, image.bytes.clone())
                        .await?;
                    Some(uploaded.url)
                }
                None => None,
            };

            api.create_defect(&self.defect_draft.to_request(vehicle_id, imagen_url))
                .await
        }
        .await;

        let defect = result.map_err(|e| {
            warn!(vehicle_id, error = %e, "Adding defect failed");
            e
        })?;

        self.show_defect_form = false;
        self.defect_draft = DefectDraft::default();
        self.defect_image = None;
        self.load(api).await;

        Ok(defect)
    }

    /// 完了にする
    ///
    /// `confirm` がfalseを返した場合、または既に完了している場合は何もしない。
    pub async fn mark_completed<F>(&mut self, api: &ApiClient, confirm: F) -> Result<bool>
    where
        F: FnOnce(&Vehicle) -> Result<bool>,
    {
        let vehicle = self.loaded()?;
        if vehicle.is_completed() {
            return Ok(false);
        }
        if !confirm(vehicle)? {
            return Ok(false);
        }

        let id = vehicle.id;
        api.update_vehicle(id, &VehicleUpdate::completed_at(Utc::now()))
            .await
            .map_err(|e| {
                warn!(id, error = %e, "Marking vehicle completed failed");
                e
            })?;

        self.load(api).await;
        Ok(true)
    }

    /// 整備履歴を追加して読み直す
    pub async fn add_service(&mut self, api: &ApiClient, draft: &ServiceDraft) -> Result<ServiceHistory> {
        let vehicle_id = self.loaded()?.id;
        draft.validate()?;

        let created = api
            .create_service_record(&draft.to_request(vehicle_id))
            .await
            .map_err(|e| {
                warn!(vehicle_id, error = %e, "Adding service record failed");
                e
            })?;

        self.load(api).await;
        Ok(created)
    }
}
