//! 車両一覧のフィルタ
//!
//! - StatusTab: サーバ側で分割する状態タブ（全件/入庫中/完了）
//! - VehicleFilter: 取得済み一覧に対するローカル絞り込み（ブランド + 検索語）
//! - TabCounts / brand_options: 取得済み一覧から算出する表示用の値

use crate::types::Vehicle;
use std::collections::BTreeSet;

/// 状態タブ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusTab {
    All,
    #[default]
    Active,
    Completed,
}

impl StatusTab {
    /// `activos` クエリの値（None = 全件）
    pub fn active_flag(&self) -> Option<bool> {
        match self {
            StatusTab::All => None,
            StatusTab::Active => Some(true),
            StatusTab::Completed => Some(false),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusTab::All => "Todos",
            StatusTab::Active => "Activos",
            StatusTab::Completed => "Finalizados",
        }
    }

    /// 表示順（Activos, Todos, Finalizados）
    pub const ORDER: [StatusTab; 3] = [StatusTab::Active, StatusTab::All, StatusTab::Completed];
}

impl std::str::FromStr for StatusTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todos" | "all" => Ok(StatusTab::All),
            "activos" | "active" => Ok(StatusTab::Active),
            "finalizados" | "completed" => Ok(StatusTab::Completed),
            _ => Err(format!("Unknown tab: {}. Use activos, todos, or finalizados", s)),
        }
    }
}

impl std::fmt::Display for StatusTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// ローカル絞り込み条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleFilter {
    /// 検索語（モデル・プレート・所有者名の部分一致）
    pub search: String,
    /// ブランド（大文字小文字を無視した完全一致、空なら無効）
    pub brand: String,
}

impl VehicleFilter {
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || !self.brand.is_empty()
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.brand.clear();
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if !self.brand.is_empty() && vehicle.marca.to_lowercase() != self.brand.to_lowercase() {
            return false;
        }

        if !self.search.is_empty() {
            let term = self.search.to_lowercase();
            let hit = vehicle.modelo.to_lowercase().contains(&term)
                || vehicle.placas.to_lowercase().contains(&term)
                || vehicle.propietario.nombre_completo.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }

        true
    }

    /// 条件を満たす車両を元の順序のまま抽出
    pub fn apply(&self, vehicles: &[Vehicle]) -> Vec<Vehicle> {
        vehicles.iter().filter(|v| self.matches(v)).cloned().collect()
    }
}

/// タブごとの件数（取得済み一覧から算出）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabCounts {
    pub active: usize,
    pub all: usize,
    pub completed: usize,
}

impl TabCounts {
    pub fn from_vehicles(vehicles: &[Vehicle]) -> Self {
        let completed = vehicles.iter().filter(|v| v.is_completed()).count();
        Self {
            active: vehicles.len() - completed,
            all: vehicles.len(),
            completed,
        }
    }

    pub fn get(&self, tab: StatusTab) -> usize {
        match tab {
            StatusTab::All => self.all,
            StatusTab::Active => self.active,
            StatusTab::Completed => self.completed,
        }
    }
}

/// ブランド選択肢（重複除去・ソート済み）
pub fn brand_options(vehicles: &[Vehicle]) -> Vec<String> {
    vehicles
        .iter()
        .map(|v| v.marca.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 一覧が空のときのメッセージ
pub fn empty_message(filter: &VehicleFilter) -> &'static str {
    if filter.is_active() {
        "No se encontraron vehículos con esos filtros"
    } else {
        "No hay vehículos registrados"
    }
}
