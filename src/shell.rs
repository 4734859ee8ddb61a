//! 対話シェル
//!
//! ルートごとに画面を1つだけマウントし、遷移時に前の画面をアンマウントする。
//! 画面内のエラーは表示するだけでループは抜けない（入力端末のエラーのみ終了）。

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{Result, TallerError};
use crate::render;
use crate::views::detail::{COMPLETE_ERROR, DEFECT_ERROR, RECEIPT_ERROR, SERVICE_ERROR};
use crate::views::intake::{SUBMIT_ERROR, SUCCESS_MESSAGE};
use crate::views::{IntakeFormView, VehicleDetailView, VehicleListView};
use chrono::Datelike;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use taller_common::{
    year_options, BaseUrl, DefectKind, ListParams, OwnerField, Route, ServiceDraft, StatusTab,
    VehicleField,
};
use tracing::{debug, warn};

/// マウント中の画面
#[derive(Debug)]
pub enum Screen {
    List(VehicleListView),
    Detail(VehicleDetailView),
    Intake(IntakeFormView),
}

impl Screen {
    pub fn mount(route: Route, config: &Config) -> Self {
        match route {
            Route::Home => Screen::List(VehicleListView::new()),
            Route::NewVehicle => Screen::Intake(IntakeFormView::new(config.redirect_delay())),
            Route::VehicleDetail(id) => Screen::Detail(VehicleDetailView::new(id)),
        }
    }

    /// 取得中の応答を無効化する
    pub fn unmount(&mut self) {
        match self {
            Screen::List(view) => view.unmount(),
            Screen::Detail(view) => view.unmount(),
            Screen::Intake(_) => {}
        }
    }
}

enum Next {
    Stay,
    Go(Route),
    Quit,
}

pub struct Shell<'a> {
    api: &'a ApiClient,
    config: &'a Config,
    assets: BaseUrl,
    theme: ColorfulTheme,
    route: Route,
    screen: Screen,
}

impl<'a> Shell<'a> {
    pub fn new(api: &'a ApiClient, config: &'a Config, start: Route) -> Result<Self> {
        Ok(Self {
            api,
            config,
            assets: config.asset_base()?,
            theme: ColorfulTheme::default(),
            route: start,
            screen: Screen::mount(start, config),
        })
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// 画面遷移。同じルートなら画面を作り直さずfalse
    pub fn navigate(&mut self, route: Route) -> bool {
        if self.route == route {
            return false;
        }
        debug!(from = %self.route, to = %route, "Navigating");
        self.screen.unmount();
        self.screen = Screen::mount(route, self.config);
        self.route = route;
        true
    }

    /// 表示中の画面を取り直す
    pub async fn refresh(&mut self) {
        match &mut self.screen {
            Screen::List(view) => {
                view.load(self.api).await;
            }
            Screen::Detail(view) => {
                view.load(self.api).await;
            }
            Screen::Intake(_) => {}
        }
    }

    pub fn draw(&self) -> String {
        let body = match &self.screen {
            Screen::List(view) => render::list_screen(view),
            Screen::Detail(view) => render::detail_screen(view, &self.assets),
            Screen::Intake(view) => render::intake_screen(view),
        };
        format!("\n{}\n{}\n{}", render::nav_bar(&self.route), body, render::footer())
    }

    pub async fn run(mut self) -> Result<()> {
        self.refresh().await;

        loop {
            println!("{}", self.draw());

            let next = match &mut self.screen {
                Screen::List(view) => list_step(view, self.api, &self.theme).await,
                Screen::Detail(view) => detail_step(view, self.api, self.config, &self.theme).await,
                Screen::Intake(view) => intake_step(view, self.api, &self.theme).await,
            }?;

            match next {
                Next::Stay => {}
                Next::Go(route) => {
                    self.navigate(route);
                    self.refresh().await;
                }
                Next::Quit => break,
            }
        }

        self.screen.unmount();
        Ok(())
    }
}

/// 失敗を表示して画面に留まる（入力端末のエラーだけは上へ返す）
fn alert(err: TallerError, fallback: &str) -> Result<Next> {
    if let TallerError::Prompt(_) = err {
        return Err(err);
    }
    warn!(error = %err, "Action failed");
    println!("⚠ {}", err.user_message(fallback));
    Ok(Next::Stay)
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn choose(theme: &ColorfulTheme, prompt: &str, items: &[String], default: usize) -> Result<usize> {
    Ok(Select::with_theme(theme)
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()?)
}

fn ask(theme: &ColorfulTheme, prompt: &str, initial: &str) -> Result<String> {
    Ok(Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?)
}

#[derive(Clone, Copy)]
enum ListAction {
    Open,
    Tab,
    Search,
    Brand,
    ClearFilters,
    Reload,
    New,
    Quit,
}

async fn list_step(view: &mut VehicleListView, api: &ApiClient, theme: &ColorfulTheme) -> Result<Next> {
    let mut actions = Vec::new();
    if !view.visible().is_empty() {
        actions.push(("Ver vehículo", ListAction::Open));
    }
    actions.push(("Cambiar pestaña", ListAction::Tab));
    actions.push(("Buscar", ListAction::Search));
    actions.push(("Filtrar por marca", ListAction::Brand));
    if view.filter().is_active() {
        actions.push(("Limpiar filtros", ListAction::ClearFilters));
    }
    actions.push(("Recargar", ListAction::Reload));
    actions.push(("+ Nuevo Ingreso", ListAction::New));
    actions.push(("Salir", ListAction::Quit));

    let labels: Vec<String> = actions.iter().map(|(label, _)| label.to_string()).collect();
    let action = actions[choose(theme, "Acción", &labels, 0)?].1;

    match action {
        ListAction::Open => {
            let items: Vec<String> = view
                .visible()
                .iter()
                .map(|v| format!("{} · {} · {}", v.title(), v.placas, v.propietario.nombre_completo))
                .collect();
            let index = choose(theme, "Vehículo", &items, 0)?;
            Ok(Next::Go(Route::VehicleDetail(view.visible()[index].id)))
        }
        ListAction::Tab => {
            let items: Vec<String> = StatusTab::ORDER.iter().map(|t| t.label().to_string()).collect();
            let current = StatusTab::ORDER.iter().position(|t| *t == view.tab()).unwrap_or(0);
            let tab = StatusTab::ORDER[choose(theme, "Pestaña", &items, current)?];
            view.select_tab(tab, api).await;
            Ok(Next::Stay)
        }
        ListAction::Search => {
            let search = ask(theme, "Buscar (modelo, placas o propietario)", &view.filter().search)?;
            view.set_search(search);
            Ok(Next::Stay)
        }
        ListAction::Brand => {
            let brands = view.brand_options();
            let mut items = vec!["Todas las marcas".to_string()];
            items.extend(brands.iter().cloned());
            let index = choose(theme, "Marca", &items, 0)?;
            view.set_brand(if index == 0 { String::new() } else { brands[index - 1].clone() });
            Ok(Next::Stay)
        }
        ListAction::ClearFilters => {
            view.clear_filters();
            Ok(Next::Stay)
        }
        ListAction::Reload => {
            view.load(api).await;
            Ok(Next::Stay)
        }
        ListAction::New => Ok(Next::Go(Route::NewVehicle)),
        ListAction::Quit => Ok(Next::Quit),
    }
}

#[derive(Clone, Copy)]
enum DetailAction {
    Receipt,
    Defect,
    Service,
    Complete,
    Reload,
    Home,
    New,
    Quit,
}

async fn detail_step(
    view: &mut VehicleDetailView,
    api: &ApiClient,
    config: &Config,
    theme: &ColorfulTheme,
) -> Result<Next> {
    let mut actions = Vec::new();
    if let Some(vehicle) = view.vehicle() {
        actions.push(("Generar comprobante PDF", DetailAction::Receipt));
        actions.push(("Agregar defecto", DetailAction::Defect));
        actions.push(("Agregar servicio", DetailAction::Service));
        if !vehicle.is_completed() {
            actions.push(("Marcar como finalizado", DetailAction::Complete));
        }
    }
    actions.push(("Recargar", DetailAction::Reload));
    actions.push(("Inicio", DetailAction::Home));
    actions.push(("+ Nuevo Ingreso", DetailAction::New));
    actions.push(("Salir", DetailAction::Quit));

    let labels: Vec<String> = actions.iter().map(|(label, _)| label.to_string()).collect();
    let action = actions[choose(theme, "Acción", &labels, 0)?].1;

    match action {
        DetailAction::Receipt => {
            let pb = spinner("Generando PDF...");
            let result = view.generate_receipt(api, &config.download_dir()).await;
            pb.finish_and_clear();
            match result {
                Ok(path) => {
                    println!("✔ Comprobante guardado: {}", path.display());
                    Ok(Next::Stay)
                }
                Err(e) => alert(e, RECEIPT_ERROR),
            }
        }
        DetailAction::Defect => {
            view.toggle_defect_form();
            if let Err(e) = fill_defect_form(view, theme).await {
                view.hide_defect_form();
                return alert(e, DEFECT_ERROR);
            }
            match view.add_defect(api).await {
                Ok(defect) => {
                    println!("✔ Defecto registrado (#{})", defect.id);
                    Ok(Next::Stay)
                }
                Err(e) => alert(e, DEFECT_ERROR),
            }
        }
        DetailAction::Service => {
            let draft = match fill_service_draft(theme) {
                Ok(draft) => draft,
                Err(e) => return alert(e, SERVICE_ERROR),
            };
            match view.add_service(api, &draft).await {
                Ok(_) => {
                    println!("✔ Servicio registrado");
                    Ok(Next::Stay)
                }
                Err(e) => alert(e, SERVICE_ERROR),
            }
        }
        DetailAction::Complete => {
            let result = view
                .mark_completed(api, |vehicle| {
                    Ok(Confirm::with_theme(theme)
                        .with_prompt(format!("¿Marcar {} ({}) como finalizado?", vehicle.title(), vehicle.placas))
                        .default(false)
                        .interact()?)
                })
                .await;
            match result {
                Ok(true) => {
                    println!("✔ Vehículo marcado como finalizado");
                    Ok(Next::Stay)
                }
                Ok(false) => Ok(Next::Stay),
                Err(e) => alert(e, COMPLETE_ERROR),
            }
        }
        DetailAction::Reload => {
            view.load(api).await;
            Ok(Next::Stay)
        }
        DetailAction::Home => Ok(Next::Go(Route::Home)),
        DetailAction::New => Ok(Next::Go(Route::NewVehicle)),
        DetailAction::Quit => Ok(Next::Quit),
    }
}

async fn fill_defect_form(view: &mut VehicleDetailView, theme: &ColorfulTheme) -> Result<()> {
    let kinds: Vec<String> = DefectKind::SELECTABLE.iter().map(|k| k.label().to_string()).collect();
    let current = DefectKind::SELECTABLE
        .iter()
        .position(|k| *k == view.defect_draft().tipo)
        .unwrap_or(0);
    let tipo = DefectKind::SELECTABLE[choose(theme, "Tipo de defecto", &kinds, current)?].clone();

    let ubicacion = ask(theme, "Ubicación", &view.defect_draft().ubicacion)?;
    let descripcion = ask(theme, "Descripción", &view.defect_draft().descripcion)?;

    let draft = view.defect_draft_mut();
    draft.tipo = tipo;
    draft.ubicacion = ubicacion;
    draft.descripcion = descripcion;

    let photo = ask(theme, "Foto (ruta, vacío = sin foto)", "")?;
    if photo.trim().is_empty() {
        view.clear_defect_image();
    } else {
        view.select_defect_image(&PathBuf::from(photo.trim())).await?;
    }
    Ok(())
}

fn fill_service_draft(theme: &ColorfulTheme) -> Result<ServiceDraft> {
    let descripcion_servicio = ask(theme, "Descripción del servicio", "")?;
    let mut draft = ServiceDraft {
        descripcion_servicio,
        ..ServiceDraft::default()
    };
    draft.set_cost(&ask(theme, "Costo (vacío = sin costo)", "")?)?;
    draft.mecanico = ask(theme, "Mecánico", "")?;
    draft.notas = ask(theme, "Notas", "")?;
    Ok(draft)
}

#[derive(Clone, Copy)]
enum IntakeAction {
    Fill,
    ExistingOwner,
    Photo,
    Submit,
    Cancel,
    Quit,
}

async fn intake_step(view: &mut IntakeFormView, api: &ApiClient, theme: &ColorfulTheme) -> Result<Next> {
    let actions = [
        ("Completar datos", IntakeAction::Fill),
        ("Usar propietario existente", IntakeAction::ExistingOwner),
        ("Seleccionar foto del vehículo", IntakeAction::Photo),
        ("Registrar vehículo", IntakeAction::Submit),
        ("Cancelar", IntakeAction::Cancel),
        ("Salir", IntakeAction::Quit),
    ];
    let labels: Vec<String> = actions.iter().map(|(label, _)| label.to_string()).collect();
    let action = actions[choose(theme, "Acción", &labels, 0)?].1;

    match action {
        IntakeAction::Fill => {
            if let Err(e) = fill_intake(view, theme) {
                return alert(e, SUBMIT_ERROR);
            }
            Ok(Next::Stay)
        }
        IntakeAction::ExistingOwner => match api.list_owners(ListParams::default()).await {
            Ok(owners) => {
                let mut items = vec!["Nuevo propietario".to_string()];
                items.extend(owners.iter().map(|o| format!("{} · {}", o.nombre_completo, o.telefono)));
                let index = choose(theme, "Propietario", &items, 0)?;
                view.set_existing_owner(if index == 0 { None } else { Some(owners[index - 1].id) });
                Ok(Next::Stay)
            }
            Err(e) => alert(e, "Error al cargar los propietarios"),
        },
        IntakeAction::Photo => {
            let path = ask(theme, "Foto (ruta, vacío = quitar)", "")?;
            if path.trim().is_empty() {
                view.clear_photo();
                return Ok(Next::Stay);
            }
            match view.select_photo(&PathBuf::from(path.trim())).await {
                Ok(()) => Ok(Next::Stay),
                Err(e) => alert(e, "Error al leer la imagen"),
            }
        }
        IntakeAction::Submit => match view.submit(api).await {
            Ok((_, redirect)) => {
                println!("✔ {}", SUCCESS_MESSAGE);
                tokio::time::sleep(redirect.after).await;
                Ok(Next::Go(redirect.route))
            }
            Err(e) => alert(e, SUBMIT_ERROR),
        },
        IntakeAction::Cancel => Ok(Next::Go(Route::Home)),
        IntakeAction::Quit => Ok(Next::Quit),
    }
}

fn fill_intake(view: &mut IntakeFormView, theme: &ColorfulTheme) -> Result<()> {
    if view.draft().existing_owner.is_none() {
        for field in OwnerField::ALL {
            let value = ask(theme, field.label(), view.draft().owner_value(field))?;
            view.set_owner_field(field, &value);
        }
    }

    for field in VehicleField::ALL {
        if field == VehicleField::Anio {
            let current = view.draft().vehicle.anio;
            let years = year_options(chrono::Local::now().year());
            let items: Vec<String> = years.iter().map(|y| y.to_string()).collect();
            let default = years.iter().position(|y| *y == current).unwrap_or(0);
            let year = years[choose(theme, field.label(), &items, default)?];
            view.set_vehicle_field(field, &year.to_string())?;
        } else {
            let value = ask(theme, field.label(), &view.draft().vehicle_value(field))?;
            view.set_vehicle_field(field, &value)?;
        }
    }
    Ok(())
}
