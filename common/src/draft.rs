//! 入力フォームの下書き
//!
//! 入庫フォーム・不具合フォーム・整備履歴フォームの状態を型付きで保持する。
//! 必須項目チェックは空文字かどうかのみ。空白だけの値も入力ありとみなし、
//! プレート書式なども検証しない。

use crate::error::{Error, Result};
use crate::requests::{DefectCreate, OwnerAssignment, OwnerCreate, ServiceHistoryCreate, VehicleCreate};
use crate::types::{DefectKind, Id};
use chrono::Datelike;
use rust_decimal::Decimal;

/// 年式の選択肢数
pub const YEAR_OPTION_COUNT: i32 = 50;

/// 車両側の入力項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleField {
    Marca,
    Modelo,
    Anio,
    Color,
    Placas,
    ProblemaIngreso,
}

impl VehicleField {
    pub const ALL: [VehicleField; 6] = [
        VehicleField::Marca,
        VehicleField::Modelo,
        VehicleField::Anio,
        VehicleField::Color,
        VehicleField::Placas,
        VehicleField::ProblemaIngreso,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            VehicleField::Marca => "marca",
            VehicleField::Modelo => "modelo",
            VehicleField::Anio => "anio",
            VehicleField::Color => "color",
            VehicleField::Placas => "placas",
            VehicleField::ProblemaIngreso => "problema_ingreso",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleField::Marca => "Marca",
            VehicleField::Modelo => "Modelo",
            VehicleField::Anio => "Año",
            VehicleField::Color => "Color",
            VehicleField::Placas => "Placas",
            VehicleField::ProblemaIngreso => "Problema de ingreso",
        }
    }
}

/// 所有者側の入力項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerField {
    NombreCompleto,
    Telefono,
}

impl OwnerField {
    pub const ALL: [OwnerField; 2] = [OwnerField::NombreCompleto, OwnerField::Telefono];

    pub fn name(&self) -> &'static str {
        match self {
            OwnerField::NombreCompleto => "nombre_completo",
            OwnerField::Telefono => "telefono",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OwnerField::NombreCompleto => "Nombre completo",
            OwnerField::Telefono => "Teléfono",
        }
    }
}

/// 車両側の値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleFields {
    pub marca: String,
    pub modelo: String,
    pub anio: i32,
    pub color: String,
    pub placas: String,
    pub problema_ingreso: String,
}

/// 入庫フォームの下書き
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeDraft {
    pub vehicle: VehicleFields,
    pub owner: OwnerCreate,
    /// 既存の所有者に紐付ける場合のID（Noneなら新規作成）
    pub existing_owner: Option<Id>,
}

impl IntakeDraft {
    /// 年式を指定して空の下書きを作成
    pub fn new(current_year: i32) -> Self {
        Self {
            vehicle: VehicleFields {
                marca: String::new(),
                modelo: String::new(),
                anio: current_year,
                color: String::new(),
                placas: String::new(),
                problema_ingreso: String::new(),
            },
            owner: OwnerCreate::default(),
            existing_owner: None,
        }
    }

    /// 今年を年式の初期値にした空の下書き
    pub fn for_today() -> Self {
        Self::new(chrono::Local::now().year())
    }

    /// 車両側の項目を更新（年式は整数として解釈）
    pub fn set_vehicle_field(&mut self, field: VehicleField, value: &str) -> Result<()> {
        let v = &mut self.vehicle;
        match field {
            VehicleField::Marca => v.marca = value.to_string(),
            VehicleField::Modelo => v.modelo = value.to_string(),
            VehicleField::Anio => {
                v.anio = value
                    .trim()
                    .parse()
                    .map_err(|_| Error::InvalidYear(value.to_string()))?;
            }
            VehicleField::Color => v.color = value.to_string(),
            VehicleField::Placas => v.placas = value.to_string(),
            VehicleField::ProblemaIngreso => v.problema_ingreso = value.to_string(),
        }
        Ok(())
    }

    /// 所有者側の項目を更新
    pub fn set_owner_field(&mut self, field: OwnerField, value: &str) {
        match field {
            OwnerField::NombreCompleto => self.owner.nombre_completo = value.to_string(),
            OwnerField::Telefono => self.owner.telefono = value.to_string(),
        }
    }

    pub fn vehicle_value(&self, field: VehicleField) -> String {
        let v = &self.vehicle;
        match field {
            VehicleField::Marca => v.marca.clone(),
            VehicleField::Modelo => v.modelo.clone(),
            VehicleField::Anio => v.anio.to_string(),
            VehicleField::Color => v.color.clone(),
            VehicleField::Placas => v.placas.clone(),
            VehicleField::ProblemaIngreso => v.problema_ingreso.clone(),
        }
    }

    pub fn owner_value(&self, field: OwnerField) -> &str {
        match field {
            OwnerField::NombreCompleto => &self.owner.nombre_completo,
            OwnerField::Telefono => &self.owner.telefono,
        }
    }

    /// 未入力の必須項目
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.existing_owner.is_none() {
            for field in OwnerField::ALL {
                if self.owner_value(field).is_empty() {
                    missing.push(field.name());
                }
            }
        }

        for field in VehicleField::ALL {
            if field != VehicleField::Anio && self.vehicle_value(field).is_empty() {
                missing.push(field.name());
            }
        }

        missing
    }

    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingFields(missing))
        }
    }

    /// 送信用ペイロードに変換
    pub fn to_request(&self) -> VehicleCreate {
        let v = &self.vehicle;
        let owner = match self.existing_owner {
            Some(propietario_id) => OwnerAssignment::Existing { propietario_id },
            None => OwnerAssignment::New {
                propietario: self.owner.clone(),
            },
        };

        VehicleCreate {
            marca: v.marca.clone(),
            modelo: v.modelo.clone(),
            anio: v.anio,
            color: v.color.clone(),
            placas: v.placas.clone(),
            problema_ingreso: v.problema_ingreso.clone(),
            owner,
        }
    }
}

/// 年式の選択肢（今年から50年分、新しい順）
pub fn year_options(current_year: i32) -> Vec<i32> {
    (0..YEAR_OPTION_COUNT).map(|i| current_year - i).collect()
}

/// 不具合フォームの下書き
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefectDraft {
    pub descripcion: String,
    pub tipo: DefectKind,
    pub ubicacion: String,
}

impl DefectDraft {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.ubicacion.is_empty() {
            missing.push("ubicacion");
        }
        if self.descripcion.is_empty() {
            missing.push("descripcion");
        }
        missing
    }

    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingFields(missing))
        }
    }

    pub fn to_request(&self, vehiculo_id: Id, imagen_url: Option<String>) -> DefectCreate {
        let ubicacion = self.ubicacion.trim();
        DefectCreate {
            vehiculo_id,
            descripcion: self.descripcion.clone(),
            tipo: self.tipo.clone(),
            ubicacion: (!ubicacion.is_empty()).then(|| ubicacion.to_string()),
            imagen_url,
        }
    }
}

/// 整備履歴フォームの下書き
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDraft {
    pub descripcion_servicio: String,
    pub costo: Option<Decimal>,
    pub mecanico: String,
    pub notas: String,
}

impl ServiceDraft {
    /// 金額を入力文字列から設定（空文字は「なし」）
    pub fn set_cost(&mut self, raw: &str) -> Result<()> {
        let raw = raw.trim().trim_start_matches('$').replace(',', "");
        self.costo = if raw.is_empty() {
            None
        } else {
            Some(raw.parse().map_err(|_| Error::InvalidCost(raw.clone()))?)
        };
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.descripcion_servicio.is_empty() {
            return Err(Error::MissingFields(vec!["descripcion_servicio"]));
        }
        Ok(())
    }

    pub fn to_request(&self, vehiculo_id: Id) -> ServiceHistoryCreate {
        let optional = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        ServiceHistoryCreate {
            vehiculo_id,
            descripcion_servicio: self.descripcion_servicio.clone(),
            costo: self.costo,
            mecanico: optional(&self.mecanico),
            notas: optional(&self.notas),
        }
    }
}
