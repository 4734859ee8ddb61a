//! 入庫受付票（PDF）の命名

/// `comprobante_<placas>.pdf`
///
/// プレートにパス区切り文字が含まれる場合は `_` に置き換える。
pub fn receipt_file_name(placas: &str) -> String {
    let safe: String = placas
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("comprobante_{}.pdf", safe)
}
