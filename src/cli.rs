use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use taller_common::{DefectKind, Id, Route, StatusTab};

#[derive(Parser)]
#[command(name = "taller")]
#[command(about = "Taller Autos: ingreso de vehículos, defectos y comprobantes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// APIのオリジン（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話シェルを開く
    Open {
        /// 開始ルート（/, /nuevo-vehiculo, /vehiculo/<id>）
        #[arg(default_value = "/")]
        route: Route,
    },

    /// 車両一覧
    List {
        /// 状態タブ (activos/todos/finalizados)
        #[arg(short, long, default_value = "activos")]
        tab: StatusTab,

        /// 検索語（モデル・プレート・所有者名）
        #[arg(short, long)]
        search: Option<String>,

        /// ブランドで絞り込み
        #[arg(short, long)]
        marca: Option<String>,

        /// 先頭から飛ばす件数
        #[arg(long)]
        skip: Option<u32>,

        /// 最大件数
        #[arg(long)]
        limit: Option<u32>,
    },

    /// 車両詳細
    Show {
        #[arg(required = true)]
        id: Id,
    },

    /// 車両を入庫登録（項目を省略すると対話フォーム）
    New {
        /// 所有者の氏名
        #[arg(long)]
        nombre: Option<String>,

        /// 所有者の電話番号
        #[arg(long)]
        telefono: Option<String>,

        /// 既存の所有者ID（指定時は氏名・電話は不要）
        #[arg(long, conflicts_with_all = ["nombre", "telefono"])]
        propietario_id: Option<Id>,

        #[arg(long)]
        marca: Option<String>,

        #[arg(long)]
        modelo: Option<String>,

        /// 年式（省略時は今年）
        #[arg(long)]
        anio: Option<i32>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        placas: Option<String>,

        /// 入庫理由
        #[arg(long)]
        problema: Option<String>,
    },

    /// 不具合を追加
    Defect {
        #[arg(required = true)]
        id: Id,

        /// 種類 (golpe/rayon/abolladura/pintura/cristal/otro)
        #[arg(short, long, default_value = "golpe", value_parser = parse_defect_kind)]
        tipo: DefectKind,

        /// 位置（例: puerta delantera izquierda）
        #[arg(short, long)]
        ubicacion: String,

        #[arg(short, long)]
        descripcion: String,

        /// 写真ファイル
        #[arg(short, long)]
        foto: Option<PathBuf>,
    },

    /// 受付票PDFを生成して保存
    Receipt {
        #[arg(required = true)]
        id: Id,

        /// 保存先ディレクトリ（省略時は設定値）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 車両を完了にする
    Complete {
        #[arg(required = true)]
        id: Id,

        /// 確認を省略
        #[arg(short, long)]
        yes: bool,
    },

    /// 整備履歴を追加
    Service {
        #[arg(required = true)]
        id: Id,

        #[arg(short, long)]
        descripcion: String,

        /// 金額
        #[arg(short, long)]
        costo: Option<Decimal>,

        /// 担当整備士
        #[arg(short, long)]
        mecanico: Option<String>,

        #[arg(short, long)]
        notas: Option<String>,
    },

    /// 所有者一覧
    Owners {
        #[arg(long)]
        skip: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// 設定を表示/編集
    Config {
        /// APIのオリジンを保存
        #[arg(long)]
        set_api_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

impl Commands {
    /// 入庫登録の項目が1つも指定されていないか
    pub fn is_interactive_intake(&self) -> bool {
        match self {
            Commands::New {
                nombre,
                telefono,
                propietario_id,
                marca,
                modelo,
                anio,
                color,
                placas,
                problema,
            } => {
                nombre.is_none()
                    && telefono.is_none()
                    && propietario_id.is_none()
                    && marca.is_none()
                    && modelo.is_none()
                    && anio.is_none()
                    && color.is_none()
                    && placas.is_none()
                    && problema.is_none()
            }
            _ => false,
        }
    }
}

/// 選択肢にある種類だけを受け付ける
fn parse_defect_kind(s: &str) -> Result<DefectKind, String> {
    match DefectKind::from_wire(s) {
        DefectKind::Unrecognized(_) => Err(format!(
            "Unknown defect kind: {}. Use golpe, rayon, abolladura, pintura, cristal, or otro",
            s
        )),
        kind => Ok(kind),
    }
}
