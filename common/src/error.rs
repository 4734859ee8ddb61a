//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 不正なURL（http/https以外、空文字など）
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// ルートテーブルに存在しないパス
    #[error("Ruta no válida: {0}")]
    InvalidRoute(String),

    /// 年式が整数として解釈できない
    #[error("Año no válido: {0}")]
    InvalidYear(String),

    /// 金額が数値として解釈できない
    #[error("Costo no válido: {0}")]
    InvalidCost(String),

    /// 必須項目が未入力
    #[error("Campos obligatorios vacíos: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
