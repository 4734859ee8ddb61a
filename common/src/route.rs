//! ルートテーブル
//!
//! - `/`                → 車両一覧
//! - `/nuevo-vehiculo`  → 入庫フォーム
//! - `/vehiculo/:id`    → 車両詳細

use crate::error::{Error, Result};
use crate::types::Id;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    NewVehicle,
    VehicleDetail(Id),
}

impl Route {
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');

        match normalized {
            "" => return Ok(Route::Home),
            "/nuevo-vehiculo" => return Ok(Route::NewVehicle),
            _ => {}
        }

        if let Some(id) = normalized.strip_prefix("/vehiculo/") {
            return id
                .parse::<Id>()
                .ok()
                .filter(|id| *id > 0)
                .map(Route::VehicleDetail)
                .ok_or_else(|| Error::InvalidRoute(trimmed.to_string()));
        }

        Err(Error::InvalidRoute(trimmed.to_string()))
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::NewVehicle => "/nuevo-vehiculo".to_string(),
            Route::VehicleDetail(id) => format!("/vehiculo/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl std::str::FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
