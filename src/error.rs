use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallerError {
    #[error("Error de configuración: {0}")]
    Config(String),

    /// 通信そのものの失敗（接続不可・タイムアウト等）
    #[error("Error de conexión: {0}")]
    Transport(#[from] reqwest::Error),

    /// 非成功ステータス（`detail` はサーバが返した構造化メッセージ）
    #[error("La API respondió {status}{}", .detail.as_deref().map(|d| format!(": {}", d)).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },

    #[error("Error al leer la imagen: {0}")]
    ImageLoad(String),

    #[error("Ya hay una operación en curso")]
    Busy,

    /// 詳細画面で車両がまだ読み込まれていない
    #[error("El vehículo no está cargado")]
    NotLoaded,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] taller_common::Error),

    #[error("Error de entrada: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl TallerError {
    /// サーバが返した構造化メッセージ
    pub fn detail(&self) -> Option<&str> {
        match self {
            TallerError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TallerError::Status { status: 404, .. })
    }

    /// 利用者向けメッセージ（構造化メッセージがなければfallback）
    ///
    /// ローカルの入力エラーはそのまま表示する。
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            TallerError::Status { detail: Some(detail), .. } => detail.clone(),
            TallerError::Common(e) => e.to_string(),
            TallerError::Busy => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TallerError>;
