//! 車両一覧画面
//!
//! 状態タブが変わるたびにサーバから取り直し、検索語・ブランドの絞り込みは
//! 取得済み一覧に対してローカルで再計算する。

use super::Phase;
use crate::api::ApiClient;
use crate::error::Result;
use taller_common::{
    brand_options, empty_message, Generation, ListParams, StatusTab, TabCounts, Ticket, Vehicle,
    VehicleFilter,
};
use tracing::{debug, warn};

pub const LOAD_ERROR: &str = "Error al cargar los vehículos";

#[derive(Debug, Default)]
pub struct VehicleListView {
    tab: StatusTab,
    params: ListParams,
    vehicles: Vec<Vehicle>,
    visible: Vec<Vehicle>,
    filter: VehicleFilter,
    phase: Phase,
    generation: Generation,
}

impl VehicleListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab(tab: StatusTab) -> Self {
        Self {
            tab,
            ..Self::default()
        }
    }

    pub fn with_params(mut self, params: ListParams) -> Self {
        self.params = params;
        self
    }

    pub fn tab(&self) -> StatusTab {
        self.tab
    }

    /// 取得済みの一覧（タブで分割済み、ローカル絞り込み前）
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// 絞り込み後の一覧
    pub fn visible(&self) -> &[Vehicle] {
        &self.visible
    }

    pub fn filter(&self) -> &VehicleFilter {
        &self.filter
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.phase.error()
    }

    /// タブの件数（取得済み一覧から算出、絞り込みの影響を受けない）
    pub fn counts(&self) -> TabCounts {
        TabCounts::from_vehicles(&self.vehicles)
    }

    pub fn brand_options(&self) -> Vec<String> {
        brand_options(&self.vehicles)
    }

    pub fn empty_message(&self) -> &'static str {
        empty_message(&self.filter)
    }

    /// 取得開始（以前のTicketは無効になる）
    pub fn begin_load(&mut self) -> Ticket {
        self.phase = Phase::Loading;
        self.generation.begin()
    }

    /// 取得結果を反映。古いTicketの結果は捨ててfalseを返す
    pub fn finish_load(&mut self, ticket: Ticket, result: Result<Vec<Vehicle>>) -> bool {
        if !self.generation.is_current(ticket) {
            debug!(tab = %self.tab, "Discarding stale vehicle list response");
            return false;
        }

        match result {
            Ok(vehicles) => {
                self.vehicles = vehicles;
                self.phase = Phase::Ready;
                self.recompute();
            }
            Err(e) => {
                warn!(error = %e, tab = %self.tab, "Vehicle list load failed");
                self.phase = Phase::Failed(LOAD_ERROR.to_string());
            }
        }
        true
    }

    pub async fn load(&mut self, api: &ApiClient) -> bool {
        let ticket = self.begin_load();
        let result = api.list_vehicles(self.tab.active_flag(), self.params).await;
        self.finish_load(ticket, result)
    }

    /// タブを切り替える。変わった場合のみtrue（呼び出し側で再取得する）
    pub fn set_tab(&mut self, tab: StatusTab) -> bool {
        if self.tab == tab {
            return false;
        }
        self.tab = tab;
        true
    }

    /// タブを切り替えて再取得
    pub async fn select_tab(&mut self, tab: StatusTab, api: &ApiClient) -> bool {
        if !self.set_tab(tab) {
            return false;
        }
        self.load(api).await
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.recompute();
    }

    pub fn set_brand(&mut self, brand: impl Into<String>) {
        self.filter.brand = brand.into();
        self.recompute();
    }

    /// 検索語とブランドを同時にリセット
    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.recompute();
    }

    /// 画面を離れる（応答待ちの結果はすべて破棄される）
    pub fn unmount(&mut self) {
        self.generation.invalidate();
    }

    fn recompute(&mut self) {
        self.visible = self.filter.apply(&self.vehicles);
    }
}
