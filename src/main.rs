use anyhow::Context;
use clap::Parser;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use taller_autos::{api, cli, config, logging, render, shell, views};
use api::ApiClient;
use cli::{Cli, Commands};
use config::Config;
use taller_common::{Id, ListParams, OwnerField, Route, ServiceDraft, VehicleField};
use views::{DetailStatus, IntakeFormView, VehicleDetailView, VehicleListView};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::load()?.with_api_url(cli.api_url.clone());

    if let Commands::Config { set_api_url, show } = &cli.command {
        if let Some(url) = set_api_url {
            config.set_api_url(url.clone())?;
            println!("✔ API configurada: {}", config.api_url);
        }
        if *show {
            println!("Configuración:");
            println!("  API: {}", config.api_url);
            println!(
                "  Imágenes: {}",
                config.asset_origin.as_deref().unwrap_or("(misma que la API)")
            );
            println!("  Comprobantes: {}", config.download_dir().display());
            println!("  Redirección: {} ms", config.redirect_delay_ms);
            println!("  Archivo: {}", Config::config_path()?.display());
        }
        return Ok(());
    }

    let api = ApiClient::new(&config)?;
    let interactive_intake = cli.command.is_interactive_intake();

    match cli.command {
        Commands::Open { route } => {
            shell::Shell::new(&api, &config, route)?.run().await?;
        }

        Commands::New { .. } if interactive_intake => {
            shell::Shell::new(&api, &config, Route::NewVehicle)?.run().await?;
        }

        Commands::List { tab, search, marca, skip, limit } => {
            let mut view = VehicleListView::with_tab(tab).with_params(ListParams { skip, limit });
            view.set_search(search.unwrap_or_default());
            view.set_brand(marca.unwrap_or_default());
            view.load(&api).await;

            println!("{}", render::list_screen(&view));
            if let Some(error) = view.error() {
                anyhow::bail!("{}", error);
            }
        }

        Commands::Show { id } => {
            let view = load_detail(&api, id).await;
            println!("{}", render::detail_screen(&view, &config.asset_base()?));
            ensure_loaded(&view)?;
        }

        Commands::New { nombre, telefono, propietario_id, marca, modelo, anio, color, placas, problema } => {
            let mut form = IntakeFormView::new(config.redirect_delay());
            form.set_existing_owner(propietario_id);
            form.set_owner_field(OwnerField::NombreCompleto, &nombre.unwrap_or_default());
            form.set_owner_field(OwnerField::Telefono, &telefono.unwrap_or_default());
            form.set_vehicle_field(VehicleField::Marca, &marca.unwrap_or_default())?;
            form.set_vehicle_field(VehicleField::Modelo, &modelo.unwrap_or_default())?;
            if let Some(anio) = anio {
                form.set_vehicle_field(VehicleField::Anio, &anio.to_string())?;
            }
            form.set_vehicle_field(VehicleField::Color, &color.unwrap_or_default())?;
            form.set_vehicle_field(VehicleField::Placas, &placas.unwrap_or_default())?;
            form.set_vehicle_field(VehicleField::ProblemaIngreso, &problema.unwrap_or_default())?;

            match form.submit(&api).await {
                Ok((vehicle, redirect)) => {
                    println!("✔ {}", views::intake::SUCCESS_MESSAGE);
                    println!("  {} · {} → {}", vehicle.title(), vehicle.placas, redirect.route);
                }
                Err(_) => {
                    anyhow::bail!("{}", form.error().unwrap_or(views::intake::SUBMIT_ERROR));
                }
            }
        }

        Commands::Defect { id, tipo, ubicacion, descripcion, foto } => {
            let mut view = load_detail(&api, id).await;
            ensure_loaded(&view)?;

            let draft = view.defect_draft_mut();
            draft.tipo = tipo;
            draft.ubicacion = ubicacion;
            draft.descripcion = descripcion;
            if let Some(path) = foto {
                view.select_defect_image(&path)
                    .await
                    .with_context(|| format!("No se pudo leer la foto {}", path.display()))?;
            }

            let defect = view.add_defect(&api).await.map_err(|e| {
                anyhow::anyhow!(e.user_message(views::detail::DEFECT_ERROR))
            })?;
            println!("✔ Defecto registrado (#{}): {}", defect.id, defect.tipo.label());
        }

        Commands::Receipt { id, output } => {
            let mut view = load_detail(&api, id).await;
            ensure_loaded(&view)?;

            let dir = output.unwrap_or_else(|| config.download_dir());
            let path = view.generate_receipt(&api, &dir).await.map_err(|e| {
                anyhow::anyhow!(e.user_message(views::detail::RECEIPT_ERROR))
            })?;
            println!("✔ Comprobante guardado: {}", path.display());
        }

        Commands::Complete { id, yes } => {
            let mut view = load_detail(&api, id).await;
            ensure_loaded(&view)?;

            let theme = ColorfulTheme::default();
            let completed = view
                .mark_completed(&api, |vehicle| {
                    if yes {
                        return Ok(true);
                    }
                    Ok(Confirm::with_theme(&theme)
                        .with_prompt(format!("¿Marcar {} ({}) como finalizado?", vehicle.title(), vehicle.placas))
                        .default(false)
                        .interact()?)
                })
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message(views::detail::COMPLETE_ERROR)))?;

            if completed {
                println!("✔ Vehículo marcado como finalizado");
            } else {
                println!("Sin cambios");
            }
        }

        Commands::Service { id, descripcion, costo, mecanico, notas } => {
            let mut view = load_detail(&api, id).await;
            ensure_loaded(&view)?;

            let draft = ServiceDraft {
                descripcion_servicio: descripcion,
                costo,
                mecanico: mecanico.unwrap_or_default(),
                notas: notas.unwrap_or_default(),
            };
            let created = view.add_service(&api, &draft).await.map_err(|e| {
                anyhow::anyhow!(e.user_message(views::detail::SERVICE_ERROR))
            })?;
            println!("✔ Servicio registrado (#{})", created.id);
        }

        Commands::Owners { skip, limit } => {
            let owners = api.list_owners(ListParams { skip, limit }).await?;
            if owners.is_empty() {
                println!("No hay propietarios registrados");
            }
            for owner in owners {
                println!("#{:<4} {} · {}", owner.id, owner.nombre_completo, owner.telefono);
            }
        }

        // APIクライアントを作る前に処理済み
        Commands::Config { .. } => {}
    }

    Ok(())
}

async fn load_detail(api: &ApiClient, id: Id) -> VehicleDetailView {
    let mut view = VehicleDetailView::new(id);
    view.load(api).await;
    view
}

fn ensure_loaded(view: &VehicleDetailView) -> anyhow::Result<()> {
    match view.status() {
        DetailStatus::Loaded(_) => Ok(()),
        DetailStatus::NotFound => anyhow::bail!(views::detail::NOT_FOUND),
        DetailStatus::Failed(message) => anyhow::bail!("{}", message),
        DetailStatus::Loading => anyhow::bail!(views::detail::LOAD_ERROR),
    }
}
