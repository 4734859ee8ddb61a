//! 入庫フォーム画面
//!
//! 所有者と車両の項目を型付きの下書きに集め、必須項目が埋まっていれば送信する。
//! 成功したら一定時間後に新しい車両の詳細画面へ遷移する。

use crate::api::ApiClient;
use crate::error::{Result, TallerError};
use crate::preview::ImagePreview;
use std::path::Path;
use std::time::Duration;
use taller_common::{Id, IntakeDraft, OwnerField, Route, Vehicle, VehicleField};
use tracing::warn;

pub const SUBMIT_ERROR: &str = "Error al registrar el vehículo";
pub const SUCCESS_MESSAGE: &str = "¡Vehículo registrado exitosamente! Redirigiendo...";

/// 登録成功後の遷移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub route: Route,
    pub after: Duration,
}

#[derive(Debug)]
pub struct IntakeFormView {
    draft: IntakeDraft,
    submitting: bool,
    error: Option<String>,
    success: bool,
    photo: Option<ImagePreview>,
    redirect_delay: Duration,
}

impl IntakeFormView {
    pub fn new(redirect_delay: Duration) -> Self {
        Self::with_draft(IntakeDraft::for_today(), redirect_delay)
    }

    pub fn with_draft(draft: IntakeDraft, redirect_delay: Duration) -> Self {
        Self {
            draft,
            submitting: false,
            error: None,
            success: false,
            photo: None,
            redirect_delay,
        }
    }

    pub fn draft(&self) -> &IntakeDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// 車両の写真（表示専用、送信しない）
    pub fn photo(&self) -> Option<&ImagePreview> {
        self.photo.as_ref()
    }

    pub fn set_vehicle_field(&mut self, field: VehicleField, value: &str) -> Result<()> {
        Ok(self.draft.set_vehicle_field(field, value)?)
    }

    pub fn set_owner_field(&mut self, field: OwnerField, value: &str) {
        self.draft.set_owner_field(field, value);
    }

    /// 既存の所有者に紐付ける（Noneで新規作成に戻す）
    pub fn set_existing_owner(&mut self, owner_id: Option<Id>) {
        self.draft.existing_owner = owner_id;
    }

    pub async fn select_photo(&mut self, path: &Path) -> Result<()> {
        self.photo = Some(ImagePreview::load(path).await?);
        Ok(())
    }

    pub fn clear_photo(&mut self) {
        self.photo = None;
    }

    /// 送信
    ///
    /// 必須項目が空ならネットワークに出ずにエラーを返す。
    /// サーバのエラーは `detail` があればそれを、なければ汎用メッセージを表示する。
    pub async fn submit(&mut self, api: &ApiClient) -> Result<(Vehicle, Redirect)> {
        if self.submitting {
            return Err(TallerError::Busy);
        }
        if let Err(e) = self.draft.validate() {
            let e = TallerError::from(e);
            self.error = Some(e.user_message(SUBMIT_ERROR));
            return Err(e);
        }

        self.submitting = true;
        self.error = None;
        let result = api.create_vehicle(&self.draft.to_request()).await;
        self.submitting = false;

        match result {
            Ok(vehicle) => {
                self.success = true;
                let redirect = Redirect {
                    route: Route::VehicleDetail(vehicle.id),
                    after: self.redirect_delay,
                };
                Ok((vehicle, redirect))
            }
            Err(e) => {
                warn!(error = %e, placas = %self.draft.vehicle.placas, "Vehicle registration failed");
                self.error = Some(e.user_message(SUBMIT_ERROR));
                Err(e)
            }
        }
    }
}
