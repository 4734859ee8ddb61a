//! データモデルの型定義
//!
//! バックエンドが返すエンティティ（CLI・テスト用フェイクサーバで共有）:
//! - Owner: 所有者
//! - Vehicle: 入庫車両（所有者・不具合・整備履歴を内包）
//! - Defect: 不具合（傷・凹み等）
//! - ServiceHistory: 整備履歴

use crate::timestamp;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// バックエンドが払い出すID
pub type Id = i64;

/// 所有者
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: Id,
    pub nombre_completo: String,
    pub telefono: String,
    #[serde(with = "timestamp::flexible")]
    pub created_at: NaiveDateTime,
}

/// 入庫車両
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Id,
    pub marca: String,
    pub modelo: String,
    pub anio: i32,
    pub color: String,
    pub placas: String,
    pub problema_ingreso: String,
    pub propietario_id: Id,

    #[serde(with = "timestamp::flexible")]
    pub fecha_ingreso: NaiveDateTime,

    /// 完了日時（None = 入庫中）
    #[serde(default, with = "timestamp::flexible_option")]
    pub fecha_salida: Option<NaiveDateTime>,

    pub propietario: Owner,

    #[serde(default)]
    pub defectos: Vec<Defect>,

    #[serde(default)]
    pub historial: Vec<ServiceHistory>,
}

impl Vehicle {
    pub fn status(&self) -> VehicleStatus {
        if self.fecha_salida.is_some() {
            VehicleStatus::Completed
        } else {
            VehicleStatus::Active
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status() == VehicleStatus::Completed
    }

    /// "Toyota Corolla"
    pub fn title(&self) -> String {
        format!("{} {}", self.marca, self.modelo)
    }
}

/// 車両の状態（完了日時の有無で決まる）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleStatus {
    Active,
    Completed,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "activo",
            VehicleStatus::Completed => "finalizado",
        }
    }

    /// バッジ表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "En taller",
            VehicleStatus::Completed => "Finalizado",
        }
    }
}

/// 不具合の種類
///
/// ワイヤ上はスペイン語の文字列。自動検出は自由な文字列を返すことがあるため、
/// 未知の値は捨てずに `Unrecognized` として保持する。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DefectKind {
    #[default]
    Impact,
    Scratch,
    Dent,
    Paint,
    Glass,
    Other,
    Unrecognized(String),
}

impl DefectKind {
    /// フォームで選択できる種類
    pub const SELECTABLE: [DefectKind; 6] = [
        DefectKind::Impact,
        DefectKind::Scratch,
        DefectKind::Dent,
        DefectKind::Paint,
        DefectKind::Glass,
        DefectKind::Other,
    ];

    pub fn from_wire(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "golpe" => DefectKind::Impact,
            "rayón" | "rayon" => DefectKind::Scratch,
            "abolladura" => DefectKind::Dent,
            "pintura" => DefectKind::Paint,
            "cristal" => DefectKind::Glass,
            "otro" => DefectKind::Other,
            _ => DefectKind::Unrecognized(s.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            DefectKind::Impact => "golpe",
            DefectKind::Scratch => "rayón",
            DefectKind::Dent => "abolladura",
            DefectKind::Paint => "pintura",
            DefectKind::Glass => "cristal",
            DefectKind::Other => "otro",
            DefectKind::Unrecognized(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DefectKind::Impact => "Golpe",
            DefectKind::Scratch => "Rayón",
            DefectKind::Dent => "Abolladura",
            DefectKind::Paint => "Pintura",
            DefectKind::Glass => "Cristal",
            DefectKind::Other => "Otro",
            DefectKind::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for DefectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DefectKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_wire(s))
    }
}

impl Serialize for DefectKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for DefectKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

/// 不具合の検出方法
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Detection {
    #[default]
    Manual,
    /// AI検出（バウンディングボックス・スコア等のメタデータ付き）
    Automatic { data: Option<Value> },
}

impl Detection {
    pub fn is_automatic(&self) -> bool {
        matches!(self, Detection::Automatic { .. })
    }
}

/// 不具合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DefectWire", into = "DefectWire")]
pub struct Defect {
    pub id: Id,
    pub vehiculo_id: Id,
    pub descripcion: String,
    pub tipo: DefectKind,
    pub ubicacion: Option<String>,
    pub imagen_url: Option<String>,
    pub detection: Detection,
    pub fecha_registro: NaiveDateTime,
}

/// ワイヤ上の不具合（0/1フラグ + 任意のメタデータ）
#[derive(Serialize, Deserialize)]
struct DefectWire {
    id: Id,
    vehiculo_id: Id,
    descripcion: String,
    tipo: DefectKind,
    #[serde(default)]
    ubicacion: Option<String>,
    #[serde(default)]
    imagen_url: Option<String>,
    #[serde(default)]
    detectado_automaticamente: i64,
    #[serde(default)]
    deteccion_data: Option<Value>,
    #[serde(with = "timestamp::flexible")]
    fecha_registro: NaiveDateTime,
}

impl From<DefectWire> for Defect {
    fn from(wire: DefectWire) -> Self {
        // フラグが立っていない場合のメタデータは無視
        let detection = if wire.detectado_automaticamente != 0 {
            Detection::Automatic { data: wire.deteccion_data }
        } else {
            Detection::Manual
        };

        Self {
            id: wire.id,
            vehiculo_id: wire.vehiculo_id,
            descripcion: wire.descripcion,
            tipo: wire.tipo,
            ubicacion: wire.ubicacion,
            imagen_url: wire.imagen_url,
            detection,
            fecha_registro: wire.fecha_registro,
        }
    }
}

impl From<Defect> for DefectWire {
    fn from(defect: Defect) -> Self {
        let (flag, data) = match defect.detection {
            Detection::Manual => (0, None),
            Detection::Automatic { data } => (1, data),
        };

        Self {
            id: defect.id,
            vehiculo_id: defect.vehiculo_id,
            descripcion: defect.descripcion,
            tipo: defect.tipo,
            ubicacion: defect.ubicacion,
            imagen_url: defect.imagen_url,
            detectado_automaticamente: flag,
            deteccion_data: data,
            fecha_registro: defect.fecha_registro,
        }
    }
}

/// 整備履歴
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHistory {
    pub id: Id,
    pub vehiculo_id: Id,
    pub descripcion_servicio: String,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub costo: Option<Decimal>,

    #[serde(with = "timestamp::flexible")]
    pub fecha_servicio: NaiveDateTime,

    #[serde(default)]
    pub mecanico: Option<String>,

    #[serde(default)]
    pub notas: Option<String>,
}
