//! テスト用フェイクバックエンド
//!
//! 127.0.0.1の空きポートで起動するインメモリのAPI。呼び出し順を記録し、
//! アップロード失敗・全リクエスト失敗を切り替えられる。

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use taller_autos::api::ApiClient;
use taller_autos::config::Config;
use taller_common::{
    Defect, DefectCreate, Detection, Id, Owner, OwnerAssignment, OwnerCreate, ServiceHistory,
    ServiceHistoryCreate, Vehicle, VehicleCreate, VehicleUpdate,
};

/// 記録されたリクエスト
#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    /// パス + クエリ
    pub uri: String,
    pub body: Option<Value>,
}

impl Call {
    pub fn path(&self) -> &str {
        self.uri.split('?').next().unwrap_or(&self.uri)
    }
}

#[derive(Debug, Default)]
pub struct Backend {
    next_id: Id,
    pub owners: Vec<Owner>,
    pub vehicles: Vec<Vehicle>,
    pub uploads: Vec<(String, Vec<u8>)>,
    pub calls: Vec<Call>,
    /// アップロードを500で失敗させる
    pub fail_upload: bool,
    /// 全リクエストをこのステータスで失敗させる（detailなし）
    pub fail_all: Option<u16>,
}

impl Backend {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn vehicle_mut(&mut self, id: Id) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.id == id)
    }
}

#[derive(Clone)]
pub struct FakeServer {
    pub base_url: String,
    state: Arc<Mutex<Backend>>,
}

impl FakeServer {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(Backend::default()));
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake backend stopped");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            api_url: self.base_url.clone(),
            redirect_delay_ms: 0,
            ..Config::default()
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config()).expect("Failed to build API client")
    }

    pub fn backend(&self) -> MutexGuard<'_, Backend> {
        self.state.lock().expect("Backend lock poisoned")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.backend().calls.clone()
    }

    /// 呼び出されたパス（メソッド付き、例: "POST /api/defects"）
    pub fn call_paths(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| format!("{} {}", c.method, c.path()))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.backend().calls.clear();
    }

    pub fn set_fail_upload(&self, fail: bool) {
        self.backend().fail_upload = fail;
    }

    pub fn set_fail_all(&self, status: Option<u16>) {
        self.backend().fail_all = status;
    }

    /// 所有者付きの車両を直接登録
    pub fn seed_vehicle(&self, marca: &str, modelo: &str, placas: &str, owner: &str, completed: bool) -> Id {
        let mut backend = self.backend();
        let now = Utc::now().naive_utc();

        let owner_id = backend.next_id();
        let owner = Owner {
            id: owner_id,
            nombre_completo: owner.to_string(),
            telefono: "5551234".to_string(),
            created_at: now,
        };
        backend.owners.push(owner.clone());

        let id = backend.next_id();
        backend.vehicles.push(Vehicle {
            id,
            marca: marca.to_string(),
            modelo: modelo.to_string(),
            anio: 2020,
            color: "Rojo".to_string(),
            placas: placas.to_string(),
            problema_ingreso: "Revisión general".to_string(),
            propietario_id: owner_id,
            fecha_ingreso: now,
            fecha_salida: if completed { Some(now) } else { None },
            propietario: owner,
            defectos: Vec::new(),
            historial: Vec::new(),
        });
        id
    }

    pub fn vehicle(&self, id: Id) -> Option<Vehicle> {
        self.backend().vehicles.iter().find(|v| v.id == id).cloned()
    }
}

type Shared = Arc<Mutex<Backend>>;

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/owners", get(list_owners).post(create_owner))
        .route("/api/owners/:id", get(get_owner))
        .route("/api/vehicles", get(list_vehicles).post(create_vehicle))
        .route(
            "/api/vehicles/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
        .route("/api/defects", post(create_defect))
        .route("/api/defects/vehicle/:id", get(list_defects))
        .route("/api/upload-image", post(upload_image))
        .route("/api/generate-receipt/:id", post(generate_receipt))
        .route("/api/service-history", post(create_service))
        .route("/api/service-history/vehicle/:id", get(list_services))
        .with_state(state)
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

/// 呼び出しを記録し、全失敗モードならそのステータスを返す
fn record<'a>(state: &'a Shared, method: Method, uri: &Uri, body: Option<Value>) -> Result<MutexGuard<'a, Backend>, Response> {
    let mut backend = state.lock().expect("Backend lock poisoned");
    backend.calls.push(Call {
        method,
        uri: uri.to_string(),
        body,
    });
    match backend.fail_all {
        Some(status) => Err(StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response()),
        None => Ok(backend),
    }
}

fn paginate<T: Clone>(items: &[T], query: &HashMap<String, String>) -> Vec<T> {
    let skip = query.get("skip").and_then(|s| s.parse().ok()).unwrap_or(0);
    let limit = query.get("limit").and_then(|s| s.parse().ok()).unwrap_or(100);
    items.iter().skip(skip).take(limit).cloned().collect()
}

async fn list_owners(State(state): State<Shared>, uri: Uri, Query(query): Query<HashMap<String, String>>) -> Response {
    let backend = match record(&state, Method::GET, &uri, None) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    Json(paginate(&backend.owners, &query)).into_response()
}

async fn get_owner(State(state): State<Shared>, uri: Uri, Path(id): Path<Id>) -> Response {
    let backend = match record(&state, Method::GET, &uri, None) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    match backend.owners.iter().find(|o| o.id == id) {
        Some(owner) => Json(owner.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Propietario no encontrado"),
    }
}

async fn create_owner(State(state): State<Shared>, uri: Uri, Json(body): Json<Value>) -> Response {
    let mut backend = match record(&state, Method::POST, &uri, Some(body.clone())) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    let Ok(request) = serde_json::from_value::<OwnerCreate>(body) else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "Datos del propietario no válidos");
    };
    let owner = Owner {
        id: backend.next_id(),
        nombre_completo: request.nombre_completo,
        telefono: request.telefono,
        created_at: Utc::now().naive_utc(),
    };
    backend.owners.push(owner.clone());
    Json(owner).into_response()
}

async fn list_vehicles(State(state): State<Shared>, uri: Uri, Query(query): Query<HashMap<String, String>>) -> Response {
    let backend = match record(&state, Method::GET, &uri, None) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    let activos = query.get("activos").map(|v| v == "true");
    let matching: Vec<Vehicle> = backend
        .vehicles
        .iter()
        .filter(|v| match activos {
            Some(true) => v.fecha_salida.is_none(),
            Some(false) => v.fecha_salida.is_some(),
            None => true,
        })
        .cloned()
        .collect();
    Json(paginate(&matching, &query)).into_response()
}

async fn get_vehicle(State(state): State<Shared>, uri: Uri, Path(id): Path<Id>) -> Response {
    let backend = match record(&state, Method::GET, &uri, None) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    match backend.vehicles.iter().find(|v| v.id == id) {
        Some(vehicle) => Json(vehicle.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Vehículo no encontrado"),
    }
}

async fn create_vehicle(State(state): State<Shared>, uri: Uri, Json(body): Json<Value>) -> Response {
    let mut backend = match record(&state, Method::POST, &uri, Some(body.clone())) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    let Ok(request) = serde_json::from_value::<VehicleCreate>(body) else {
        return detail(
            StatusCode::BAD_REQUEST,
            "Debe proporcionar propietario_id o datos del propietario",
        );
    };
    if backend.vehicles.iter().any(|v| v.placas == request.placas) {
        return detail(StatusCode::BAD_REQUEST, "Ya existe un vehículo con esas placas");
    }

    let owner = match request.owner {
        OwnerAssignment::Existing { propietario_id } => {
            match backend.owners.iter().find(|o| o.id == propietario_id) {
                Some(owner) => owner.clone(),
                None => return detail(StatusCode::NOT_FOUND, "Propietario no encontrado"),
            }
        }
        OwnerAssignment::New { propietario } => {
            let owner = Owner {
                id: backend.next_id(),
                nombre_completo: propietario.nombre_completo,
                telefono: propietario.telefono,
                created_at: Utc::now().naive_utc(),
            };
            backend.owners.push(owner.clone());
            owner
        }
    };

    let vehicle = Vehicle {
        id: backend.next_id(),
        marca: request.marca,
        modelo: request.modelo,
        anio: request.anio,
        color: request.color,
        placas: request.placas,
        problema_ingreso: request.problema_ingreso,
        propietario_id: owner.id,
        fecha_ingreso: Utc::now().naive_utc(),
        fecha_salida: None,
        propietario: owner,
        defectos: Vec::new(),
        historial: Vec::new(),
    };
    backend.vehicles.push(vehicle.clone());
    Json(vehicle).into_response()
}

async fn update_vehicle(State(state): State<Shared>, uri: Uri, Path(id): Path<Id>, Json(body): Json<Value>) -> Response {
    let mut backend = match record(&state, Method::PUT, &uri, Some(body.clone())) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    let Ok(update) = serde_json::from_value::<VehicleUpdate>(body) else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "Datos no válidos");
    };
    let Some(vehicle) = backend.vehicle_mut(id) else {
        return detail(StatusCode::NOT_FOUND, "Vehículo no encontrado");
    };

    if let Some(marca) = update.marca {
        vehicle.marca = marca;
    }
    if let Some(modelo) = update.modelo {
        vehicle.modelo = modelo;
    }
    if let Some(anio) = update.anio {
        vehicle.anio = anio;
    }
    if let Some(color) = update.color {
        vehicle.color = color;
    }
    if let Some(placas) = update.placas {
        vehicle.placas = placas;
    }
    if let Some(problema) = update.problema_ingreso {
        vehicle.problema_ingreso = problema;
    }
    if let Some(salida) = update.fecha_salida {
        vehicle.fecha_salida = Some(salida.naive_utc());
    }
    Json(vehicle.clone()).into_response()
}

async fn delete_vehicle(State(state): State<Shared>, uri: Uri, Path(id): Path<Id>) -> Response {
    let mut backend = match record(&state, Method::DELETE, &uri, None) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    let before = backend.vehicles.len();
    backend.vehicles.retain(|v| v.id != id);
    if backend.vehicles.len() == before {
        return detail(StatusCode::NOT_FOUND, "Vehículo no encontrado");
    }
    Json(json!({ "message": "Vehículo eliminado" })).into_response()
}

async fn create_defect(State(state): State<Shared>, uri: Uri, Json(body): Json<Value>) -> Response {
    let mut backend = match record(&state, Method::POST, &uri, Some(body.clone())) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    let Ok(request) = serde_json::from_value::<DefectCreate>(body) else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "Datos del defecto no válidos");
    };
    let id = backend.next_id();
    let Some(vehicle) = backend.vehicle_mut(request.vehiculo_id) else {
        return detail(StatusCode::NOT_FOUND, "Vehículo no encontrado");
    };

    let defect = Defect {
        id,
        vehiculo_id: request.vehiculo_id,
        descripcion: request.descripcion,
        tipo: request.tipo,
        ubicacion: request.ubicacion,
        imagen_url: request.imagen_url,
        detection: Detection::Manual,
        fecha_registro: Utc::now().naive_utc(),
    };
    vehicle.defectos.push(defect.clone());
    Json(defect).into_response()
}

async fn list_defects(State(state): State<Shared>, uri: Uri, Path(id): Path<Id>) -> Response {
    let backend = match record(&state, Method::GET, &uri, None) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    let defects: Vec<Defect> = backend
        .vehicles
        .iter()
        .filter(|v| v.id == id)
        .flat_map(|v| v.defectos.clone())
        .collect();
    Json(defects).into_response()
}

async fn upload_image(State(state): State<Shared>, uri: Uri, mut multipart: Multipart) -> Response {
    let mut file: Option<(String, Bytes)> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("imagen").to_string();
        match field.bytes().await {
            Ok(bytes) => file = Some((name, bytes)),
            Err(_) => return detail(StatusCode::BAD_REQUEST, "Archivo no válido"),
        }
    }

    let summary = file
        .as_ref()
        .map(|(name, bytes)| json!({ "filename": name, "size": bytes.len() }));
    let mut backend = match record(&state, Method::POST, &uri, summary) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    if backend.fail_upload {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Error al subir la imagen");
    }
    let Some((name, bytes)) = file else {
        return detail(StatusCode::BAD_REQUEST, "No se envió ningún archivo");
    };

    let stored = format!("{}_{}", backend.uploads.len() + 1, name);
    backend.uploads.push((stored.clone(), bytes.to_vec()));
    Json(json!({
        "success": true,
        "filename": stored,
        "url": format!("/uploads/{}", stored),
    }))
    .into_response()
}

async fn generate_receipt(State(state): State<Shared>, uri: Uri, Path(id): Path<Id>) -> Response {
    let backend = match record(&state, Method::POST, &uri, None) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    match backend.vehicles.iter().find(|v| v.id == id) {
        Some(vehicle) => (
            [(header::CONTENT_TYPE, "application/pdf")],
            format!("%PDF-1.4 comprobante {}", vehicle.placas).into_bytes(),
        )
            .into_response(),
        None => detail(StatusCode::NOT_FOUND, "Vehículo no encontrado"),
    }
}

async fn create_service(State(state): State<Shared>, uri: Uri, Json(body): Json<Value>) -> Response {
    let mut backend = match record(&state, Method::POST, &uri, Some(body.clone())) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    let Ok(request) = serde_json::from_value::<ServiceHistoryCreate>(body) else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "Datos del servicio no válidos");
    };
    let id = backend.next_id();
    let Some(vehicle) = backend.vehicle_mut(request.vehiculo_id) else {
        return detail(StatusCode::NOT_FOUND, "Vehículo no encontrado");
    };

    let service = ServiceHistory {
        id,
        vehiculo_id: request.vehiculo_id,
        descripcion_servicio: request.descripcion_servicio,
        costo: request.costo,
        fecha_servicio: Utc::now().naive_utc(),
        mecanico: request.mecanico,
        notas: request.notas,
    };
    vehicle.historial.push(service.clone());
    Json(service).into_response()
}

async fn list_services(State(state): State<Shared>, uri: Uri, Path(id): Path<Id>) -> Response {
    let backend = match record(&state, Method::GET, &uri, None) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    let services: Vec<ServiceHistory> = backend
        .vehicles
        .iter()
        .filter(|v| v.id == id)
        .flat_map(|v| v.historial.clone())
        .collect();
    Json(services).into_response()
}

/// 1x1のPNG
pub const PNG_PIXEL: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

