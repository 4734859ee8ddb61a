use crate::error::{Result, TallerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use taller_common::BaseUrl;
use tracing::warn;

/// ローカル開発用のAPIオリジン
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const API_URL_ENV: &str = "TALLER_API_URL";
const ASSET_ORIGIN_ENV: &str = "TALLER_ASSET_ORIGIN";

/// 起動時に一度だけ組み立て、APIクライアントと各画面に渡す設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    /// 画像URLのオリジン（未設定ならAPIと同じ）
    pub asset_origin: Option<String>,
    /// 受付票の保存先（未設定ならカレントディレクトリ）
    pub download_dir: Option<PathBuf>,
    /// 登録成功から詳細画面へ遷移するまでの待ち時間
    pub redirect_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            asset_origin: None,
            download_dir: None,
            redirect_delay_ms: 1500,
        }
    }
}

impl Config {
    /// 設定ファイル → 環境変数 の順に読み込む
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Ok(Self::from_file(&config_path)?.with_env())
    }

    /// 設定ファイルを読み込む
    ///
    /// ファイルがない、または解釈できない場合は既定値（`taller config` で上書きして直せる）。
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Config file is malformed, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TallerError::Config("No se encontró el directorio personal".into()))?;
        Ok(home.join(".config").join("taller-autos").join("config.json"))
    }

    /// 環境変数を優先
    fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_url = url;
            }
        }
        if let Ok(origin) = std::env::var(ASSET_ORIGIN_ENV) {
            if !origin.trim().is_empty() {
                self.asset_origin = Some(origin);
            }
        }
        self
    }

    /// CLI引数による上書き
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self
    }

    pub fn api_base(&self) -> Result<BaseUrl> {
        Ok(BaseUrl::parse(&self.api_url)?)
    }

    /// 画像URLの解決に使うベース
    pub fn asset_base(&self) -> Result<BaseUrl> {
        match &self.asset_origin {
            Some(origin) => Ok(BaseUrl::parse(origin)?),
            None => self.api_base(),
        }
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        BaseUrl::parse(&url)?;
        self.api_url = url;
        self.save()
    }
}
