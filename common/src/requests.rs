//! リクエスト/レスポンスのペイロード定義

use crate::types::{DefectKind, Id};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 所有者の新規作成
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnerCreate {
    pub nombre_completo: String,
    pub telefono: String,
}

/// 車両に紐付ける所有者（既存IDまたは新規作成）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerAssignment {
    Existing { propietario_id: Id },
    New { propietario: OwnerCreate },
}

/// 車両の新規登録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleCreate {
    pub marca: String,
    pub modelo: String,
    pub anio: i32,
    pub color: String,
    pub placas: String,
    pub problema_ingreso: String,
    #[serde(flatten)]
    pub owner: OwnerAssignment,
}

/// 車両の部分更新
///
/// `fecha_salida` を `null` で送る手段は意図的に持たない（完了は取り消さない）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marca: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modelo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anio: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problema_ingreso: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_salida: Option<DateTime<Utc>>,
}

impl VehicleUpdate {
    /// 完了日時のみを設定する更新
    pub fn completed_at(at: DateTime<Utc>) -> Self {
        Self {
            fecha_salida: Some(at),
            ..Default::default()
        }
    }
}

/// 不具合の登録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectCreate {
    pub vehiculo_id: Id,
    pub descripcion: String,
    pub tipo: DefectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ubicacion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagen_url: Option<String>,
}

/// 整備履歴の登録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHistoryCreate {
    pub vehiculo_id: Id,
    pub descripcion_servicio: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub costo: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mecanico: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
}

/// 画像アップロードのレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// バックエンド上の相対パス（例: /uploads/images/20240501_foto.jpg）
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

/// 一覧取得のページング（未指定ならサーバのデフォルト）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// エラーレスポンス本体（`{ "detail": ... }`）
///
/// バリデーションエラーでは `detail` が配列になるため、文字列の場合のみ採用する。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// レスポンス本文から構造化エラーを抽出
    pub fn extract(body: &str) -> Option<String> {
        serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.message())
    }
}
