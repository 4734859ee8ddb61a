//! 画面（ヘッドレス）
//!
//! 各画面は自分の状態だけを持ち、マウント時・パラメータ変更時に自分で取得する。
//! 画面間で共有するキャッシュはない。状態遷移は idle → loading → (ready | failed) のみで、
//! 失敗しても自動リトライはしない。

pub mod detail;
pub mod intake;
pub mod list;

pub use detail::{DetailStatus, VehicleDetailView};
pub use intake::{IntakeFormView, Redirect};
pub use list::VehicleListView;

/// 読み込み状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }
}
