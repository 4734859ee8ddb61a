//! 画面の文字列描画
//!
//! 画面の状態を受け取ってターミナル表示用の文字列を返すだけで、入出力はしない。

use crate::views::{DetailStatus, IntakeFormView, VehicleDetailView, VehicleListView};
use rust_decimal::Decimal;
use std::fmt::Write as _;
use taller_common::{timestamp, BaseUrl, Defect, Route, ServiceHistory, StatusTab, Vehicle};

pub const BRAND: &str = "🚗 Taller Autos";
const RULE: &str = "────────────────────────────────────────";

/// ナビゲーションバー（現在の画面に印を付ける）
pub fn nav_bar(current: &Route) -> String {
    let home = if *current == Route::Home { "[Inicio]" } else { "Inicio" };
    let new = if *current == Route::NewVehicle {
        "[+ Nuevo Ingreso]"
    } else {
        "+ Nuevo Ingreso"
    };
    format!("{}    {}  |  {}\n{}", BRAND, home, new, RULE)
}

pub fn footer() -> String {
    format!("{}\n© Taller Autos · Sistema de gestión de taller", RULE)
}

/// 金額表示（"$1,500" / "$1,500.50"）
pub fn format_cost(cost: Decimal) -> String {
    let sign = if cost.is_sign_negative() { "-" } else { "" };
    let fixed = format!("{:.2}", cost.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac == "00" {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{}", sign, grouped, frac)
    }
}

/// 一覧の1件分
pub fn vehicle_card(vehicle: &Vehicle) -> String {
    format!(
        "#{:<4} {} {} ({})  [{}]\n      Placas: {} · Color: {}\n      Propietario: {} · Ingreso: {}",
        vehicle.id,
        vehicle.title(),
        vehicle.anio,
        vehicle.status().as_str(),
        vehicle.status().label(),
        vehicle.placas,
        vehicle.color,
        vehicle.propietario.nombre_completo,
        timestamp::display(&vehicle.fecha_ingreso),
    )
}

/// 一覧画面
pub fn list_screen(view: &VehicleListView) -> String {
    let mut out = String::new();
    let counts = view.counts();

    let tabs: Vec<String> = StatusTab::ORDER
        .iter()
        .map(|tab| {
            let label = format!("{} ({})", tab.label(), counts.get(*tab));
            if *tab == view.tab() {
                format!("[{}]", label)
            } else {
                label
            }
        })
        .collect();
    let _ = writeln!(out, "Vehículos en taller\n{}", tabs.join("  "));

    let filter = view.filter();
    if filter.is_active() {
        let _ = writeln!(
            out,
            "Filtros: búsqueda \"{}\" · marca \"{}\"",
            filter.search, filter.brand
        );
    }

    if let Some(error) = view.error() {
        let _ = writeln!(out, "⚠ {}", error);
    }

    if view.phase().is_loading() {
        let _ = writeln!(out, "Cargando...");
        return out;
    }

    if view.visible().is_empty() {
        let _ = writeln!(out, "{}", view.empty_message());
        return out;
    }

    for vehicle in view.visible() {
        let _ = writeln!(out, "{}", vehicle_card(vehicle));
    }
    out
}

fn defect_line(defect: &Defect, assets: &BaseUrl) -> String {
    let mut line = format!("• [{}] {}", defect.tipo.label(), defect.descripcion);
    if let Some(ubicacion) = defect.ubicacion.as_deref().filter(|u| !u.is_empty()) {
        let _ = write!(line, " · {}", ubicacion);
    }
    if defect.detection.is_automatic() {
        line.push_str("  🤖 IA");
    }
    let _ = write!(line, "\n    {}", timestamp::display(&defect.fecha_registro));
    if let Some(url) = &defect.imagen_url {
        let _ = write!(line, "\n    Foto: {}", assets.asset(url));
    }
    line
}

fn service_line(service: &ServiceHistory) -> String {
    let mut line = format!(
        "• {} ({})",
        service.descripcion_servicio,
        timestamp::display(&service.fecha_servicio)
    );
    if let Some(costo) = service.costo {
        let _ = write!(line, " · {}", format_cost(costo));
    }
    if let Some(mecanico) = service.mecanico.as_deref().filter(|m| !m.is_empty()) {
        let _ = write!(line, " · Mecánico: {}", mecanico);
    }
    if let Some(notas) = service.notas.as_deref().filter(|n| !n.is_empty()) {
        let _ = write!(line, "\n    {}", notas);
    }
    line
}

/// 詳細画面（画像URLは `assets` で解決する）
pub fn detail_screen(view: &VehicleDetailView, assets: &BaseUrl) -> String {
    let vehicle = match view.status() {
        DetailStatus::Loading => return "Cargando...\n".to_string(),
        DetailStatus::NotFound => return format!("{}\n", crate::views::detail::NOT_FOUND),
        DetailStatus::Failed(message) => return format!("⚠ {}\n", message),
        DetailStatus::Loaded(vehicle) => vehicle,
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} {}  [{}]", vehicle.title(), vehicle.anio, vehicle.status().label());
    let _ = writeln!(out, "Placas: {}   Color: {}", vehicle.placas, vehicle.color);
    let _ = writeln!(out, "Ingreso: {}", timestamp::display(&vehicle.fecha_ingreso));
    if let Some(salida) = &vehicle.fecha_salida {
        let _ = writeln!(out, "Salida: {}", timestamp::display(salida));
    }
    let _ = writeln!(out, "Problema reportado: {}", vehicle.problema_ingreso);

    let _ = writeln!(out, "\nPropietario");
    let _ = writeln!(out, "  {}", vehicle.propietario.nombre_completo);
    let _ = writeln!(out, "  Tel: {}", vehicle.propietario.telefono);

    let _ = writeln!(out, "\nDefectos ({})", vehicle.defectos.len());
    if vehicle.defectos.is_empty() {
        let _ = writeln!(out, "  No hay defectos registrados");
    }
    for defect in &vehicle.defectos {
        let _ = writeln!(out, "{}", defect_line(defect, assets));
    }

    let _ = writeln!(out, "\nHistorial de servicios ({})", vehicle.historial.len());
    if vehicle.historial.is_empty() {
        let _ = writeln!(out, "  Sin servicios registrados");
    }
    for service in &vehicle.historial {
        let _ = writeln!(out, "{}", service_line(service));
    }

    if view.is_generating_receipt() {
        let _ = writeln!(out, "\nGenerando PDF...");
    }
    out
}

/// 入庫フォーム（現在の入力値と未入力項目）
pub fn intake_screen(view: &IntakeFormView) -> String {
    use taller_common::{OwnerField, VehicleField};

    let draft = view.draft();
    let mut out = String::from("Nuevo ingreso de vehículo\n");

    let _ = writeln!(out, "\nDatos del propietario");
    match draft.existing_owner {
        Some(id) => {
            let _ = writeln!(out, "  Propietario existente #{}", id);
        }
        None => {
            for field in OwnerField::ALL {
                let _ = writeln!(out, "  {}: {}", field.label(), draft.owner_value(field));
            }
        }
    }

    let _ = writeln!(out, "\nDatos del vehículo");
    for field in VehicleField::ALL {
        let _ = writeln!(out, "  {}: {}", field.label(), draft.vehicle_value(field));
    }

    if let Some(photo) = view.photo() {
        let _ = writeln!(out, "\nFoto: {} ({} bytes)", photo.file_name, photo.size());
    }

    let missing = draft.missing_fields();
    if !missing.is_empty() {
        let _ = writeln!(out, "\nFaltan: {}", missing.join(", "));
    }
    if let Some(error) = view.error() {
        let _ = writeln!(out, "\n⚠ {}", error);
    }
    if view.is_success() {
        let _ = writeln!(out, "\n✔ {}", crate::views::intake::SUCCESS_MESSAGE);
    }
    out
}
