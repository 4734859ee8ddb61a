//! 車両詳細画面テスト
//!
//! 不具合登録（アップロード → 登録の順序）、完了処理、受付票の保存を検証

mod support;

use support::{FakeServer, PNG_PIXEL};
use taller_autos::error::TallerError;
use taller_autos::render;
use taller_autos::views::detail::{LOAD_ERROR, NOT_FOUND};
use taller_autos::views::{DetailStatus, VehicleDetailView, VehicleListView};
use taller_common::{BaseUrl, DefectKind, ServiceDraft, StatusTab};
use tempfile::tempdir;

async fn loaded_view(server: &FakeServer, id: i64) -> VehicleDetailView {
    let mut view = VehicleDetailView::new(id);
    view.load(&server.client()).await;
    assert!(matches!(view.status(), DetailStatus::Loaded(_)));
    view
}

fn fill_defect(view: &mut VehicleDetailView) {
    let draft = view.defect_draft_mut();
    draft.tipo = DefectKind::Dent;
    draft.ubicacion = "Puerta trasera".to_string();
    draft.descripcion = "Abolladura leve".to_string();
}

#[tokio::test]
async fn test_not_found_and_failure_are_distinct() {
    let server = FakeServer::start().await;
    let api = server.client();

    let mut view = VehicleDetailView::new(42);
    view.load(&api).await;
    assert_eq!(view.status(), DetailStatus::NotFound);

    server.set_fail_all(Some(500));
    view.load(&api).await;
    assert_eq!(view.status(), DetailStatus::Failed(LOAD_ERROR));

    let assets = BaseUrl::parse(&server.base_url).unwrap();
    assert!(render::detail_screen(&view, &assets).contains(LOAD_ERROR));
    server.set_fail_all(None);
    view.load(&api).await;
    assert!(render::detail_screen(&view, &assets).contains(NOT_FOUND));
}

/// 写真付きの不具合はアップロード → 登録の順で送られ、返ったURLが使われる
#[tokio::test]
async fn test_add_defect_uploads_before_create() {
    let server = FakeServer::start().await;
    let id = server.seed_vehicle("Toyota", "Corolla", "ABC-123", "Juan Pérez", false);
    let api = server.client();
    let mut view = loaded_view(&server, id).await;

    let dir = tempdir().expect("Failed to create temp dir");
    let photo = dir.path().join("golpe.png");
    std::fs::write(&photo, PNG_PIXEL).unwrap();

    view.toggle_defect_form();
    fill_defect(&mut view);
    view.select_defect_image(&photo).await.expect("写真の読み込み失敗");
    assert!(view.defect_image().unwrap().data_url.starts_with("data:image/png;base64,"));
    server.clear_calls();

    let defect = view.add_defect(&api).await.expect("登録失敗");
    assert_eq!(defect.imagen_url.as_deref(), Some("/uploads/1_golpe.png"));

    let paths = server.call_paths();
    assert_eq!(
        paths,
        vec![
            "POST /api/upload-image".to_string(),
            "POST /api/defects".to_string(),
            format!("GET /api/vehicles/{}", id),
        ]
    );

    // 成功後はフォームを閉じて下書きを初期化し、読み直した車両に反映される
    assert!(!view.is_defect_form_visible());
    assert!(view.defect_image().is_none());
    assert!(view.defect_draft().descripcion.is_empty());
    assert_eq!(view.vehicle().unwrap().defectos.len(), 1);

    // 表示時は画像URLをオリジン付きに解決する
    let assets = BaseUrl::parse(&server.base_url).unwrap();
    let screen = render::detail_screen(&view, &assets);
    assert!(screen.contains(&format!("{}/uploads/1_golpe.png", server.base_url)));
    assert!(screen.contains("Abolladura"));
}

/// アップロードに失敗したら不具合は登録しない
#[tokio::test]
async fn test_upload_failure_skips_create() {
    let server = FakeServer::start().await;
    let id = server.seed_vehicle("Toyota", "Corolla", "ABC-123", "Juan Pérez", false);
    let api = server.client();
    let mut view = loaded_view(&server, id).await;

    let dir = tempdir().expect("Failed to create temp dir");
    let photo = dir.path().join("rayon.png");
    std::fs::write(&photo, PNG_PIXEL).unwrap();

    fill_defect(&mut view);
    view.select_defect_image(&photo).await.unwrap();
    server.set_fail_upload(true);
    server.clear_calls();

    let err = view.add_defect(&api).await.unwrap_err();
    assert!(matches!(err, TallerError::Status { status: 500, .. }));
    assert_eq!(server.call_paths(), vec!["POST /api/upload-image".to_string()]);

    // 下書きと写真は残る
    assert_eq!(view.defect_draft().ubicacion, "Puerta trasera");
    assert!(view.defect_image().is_some());
    assert!(server.vehicle(id).unwrap().defectos.is_empty());
}

/// 写真なしならimagen_urlは送らない
#[tokio::test]
async fn test_add_defect_without_photo() {
    let server = FakeServer::start().await;
    let id = server.seed_vehicle("Toyota", "Corolla", "ABC-123", "Juan Pérez", false);
    let api = server.client();
    let mut view = loaded_view(&server, id).await;

    fill_defect(&mut view);
    server.clear_calls();
    let defect = view.add_defect(&api).await.unwrap();

    assert!(defect.imagen_url.is_none());
    let create = &server.calls()[0];
    assert_eq!(create.path(), "/api/defects");
    let body = create.body.clone().unwrap();
    assert!(body.get("imagen_url").map_or(true, |v| v.is_null()));
    assert_eq!(body["tipo"], "abolladura");
}

/// 必須項目が空ならネットワークに出ない
#[tokio::test]
async fn test_add_defect_requires_location_and_description() {
    let server = FakeServer::start().await;
    let id = server.seed_vehicle("Toyota", "Corolla", "ABC-123", "Juan Pérez", false);
    let api = server.client();
    let mut view = loaded_view(&server, id).await;
    server.clear_calls();

    let err = view.add_defect(&api).await.unwrap_err();
    assert!(matches!(
        err,
        TallerError::Common(taller_common::Error::MissingFields(_))
    ));
    assert!(server.calls().is_empty());
}

/// 完了にすると入庫中一覧から外れ、完了一覧に現れる
#[tokio::test]
async fn test_mark_completed_moves_vehicle_between_tabs() {
    let server = FakeServer::start().await;
    let id = server.seed_vehicle("Toyota", "Corolla", "ABC-123", "Juan Pérez", false);
    let api = server.client();
    let mut view = loaded_view(&server, id).await;

    let done = view.mark_completed(&api, |_| Ok(true)).await.unwrap();
    assert!(done);
    assert!(view.vehicle().unwrap().is_completed());

    let mut active = VehicleListView::new();
    active.load(&api).await;
    assert!(active.visible().iter().all(|v| v.id != id));

    let mut completed = VehicleListView::with_tab(StatusTab::Completed);
    completed.load(&api).await;
    assert!(completed.visible().iter().any(|v| v.id == id));

    // 完了済みには何もしない
    server.clear_calls();
    assert!(!view.mark_completed(&api, |_| Ok(true)).await.unwrap());
    assert!(server.calls().is_empty());
}

/// 確認で拒否した場合は更新しない
#[tokio::test]
async fn test_mark_completed_cancelled() {
    let server = FakeServer::start().await;
    let id = server.seed_vehicle("Toyota", "Corolla", "ABC-123", "Juan Pérez", false);
    let api = server.client();
    let mut view = loaded_view(&server, id).await;
    server.clear_calls();

    let done = view.mark_completed(&api, |_| Ok(false)).await.unwrap();
    assert!(!done);
    assert!(server.calls().is_empty());
    assert!(!server.vehicle(id).unwrap().is_completed());
}

/// 受付票は `comprobante_<placas>.pdf` として保存
#[tokio::test]
async fn test_generate_receipt_saves_pdf() {
    let server = FakeServer::start().await;
    let id = server.seed_vehicle("Toyota", "Corolla", "ABC-123", "Juan Pérez", false);
    let api = server.client();
    let mut view = loaded_view(&server, id).await;

    let dir = tempdir().expect("Failed to create temp dir");
    let path = view.generate_receipt(&api, dir.path()).await.expect("保存失敗");

    assert_eq!(path, dir.path().join("comprobante_ABC-123.pdf"));
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    assert!(!view.is_generating_receipt());
}

/// 生成に失敗してもファイルは残らない
#[tokio::test]
async fn test_generate_receipt_failure_leaves_no_file() {
    let server = FakeServer::start().await;
    let id = server.seed_vehicle("Toyota", "Corolla", "ABC-123", "Juan Pérez", false);
    let api = server.client();
    let mut view = loaded_view(&server, id).await;
    server.set_fail_all(Some(500));

    let dir = tempdir().expect("Failed to create temp dir");
    assert!(view.generate_receipt(&api, dir.path()).await.is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(!view.is_generating_receipt());
}

#[tokio::test]
async fn test_actions_require_loaded_vehicle() {
    let server = FakeServer::start().await;
    let api = server.client();
    let mut view = VehicleDetailView::new(5);

    let dir = tempdir().expect("Failed to create temp dir");
    assert!(matches!(
        view.generate_receipt(&api, dir.path()).await,
        Err(TallerError::NotLoaded)
    ));
    assert!(server.calls().is_empty());
}

#[tokio::test]
async fn test_add_service_reloads_vehicle() {
    let server = FakeServer::start().await;
    let id = server.seed_vehicle("Toyota", "Corolla", "ABC-123", "Juan Pérez", false);
    let api = server.client();
    let mut view = loaded_view(&server, id).await;

    let mut draft = ServiceDraft {
        descripcion_servicio: "Cambio de balatas".to_string(),
        mecanico: "Pedro".to_string(),
        ..ServiceDraft::default()
    };
    draft.set_cost("1500").unwrap();

    view.add_service(&api, &draft).await.unwrap();
    assert_eq!(view.vehicle().unwrap().historial.len(), 1);

    let assets = BaseUrl::parse(&server.base_url).unwrap();
    let screen = render::detail_screen(&view, &assets);
    assert!(screen.contains("Cambio de balatas"));
    assert!(screen.contains("$1,500"));
}
