use actix_web::{web, App, HttpServer, Responder, HttpResponse, HttpRequest};
use crate::color::{self, CopyFormat};
use crate::config::{Config, StoreType};
use crate::palette::{self, Gradient};
use crate::session::{SessionState, Snapshot};
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use crate::templates::{IndexTemplate, SchemeButton};
use askama::Template;
use log::{info, error, debug};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// Shared between workers; each request holds the session for one action.
pub struct AppState {
    pub session: Mutex<SessionState>,
    pub rng: Mutex<StdRng>,
    pub config: Config,
}

impl AppState {
    pub fn new(session: SessionState, rng: StdRng, config: Config) -> Self {
        Self {
            session: Mutex::new(session),
            rng: Mutex::new(rng),
            config,
        }
    }

    /// Opens the configured store and starts the session on a random color.
    pub fn from_config(config: Config) -> Self {
        let store: Box<dyn KeyValueStore> = match config.store_type {
            StoreType::Memory => Box::new(MemoryStore::new()),
            StoreType::File => Box::new(FileStore::new(&config.store_file_path)),
        };
        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut session = SessionState::load(store, &config.history_key);
        let start = session.random_color(&mut rng).clone();
        info!("Session starting on {}", start);
        Self::new(session, rng, config)
    }
}

#[derive(Serialize)]
struct ActionResponse {
    changed: bool,
    state: Snapshot,
}

#[derive(Serialize)]
struct GradientResponse {
    gradient: Gradient,
    css: String,
}

#[derive(Serialize)]
struct CopyResponse {
    text: String,
}

fn query_params(req: &HttpRequest) -> HashMap<String, String> {
    url::form_urlencoded::parse(req.query_string().as_bytes()).into_owned().collect()
}

fn session_unavailable() -> HttpResponse {
    error!("Session lock poisoned");
    HttpResponse::InternalServerError().body("Session state unavailable")
}

/// Runs one user action against the session and answers with the resulting state.
fn apply<F>(state: &AppState, action: F) -> HttpResponse
where
    F: FnOnce(&mut SessionState, &mut StdRng) -> bool,
{
    let (Ok(mut session), Ok(mut rng)) = (state.session.lock(), state.rng.lock()) else {
        return session_unavailable();
    };
    let changed = action(&mut *session, &mut *rng);
    HttpResponse::Ok().json(ActionResponse { changed, state: session.snapshot() })
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index_handler))
        .route("/api/state", web::get().to(state_handler))
        .route("/api/convert", web::get().to(convert_handler))
        .route("/api/copy", web::get().to(copy_handler))
        .route("/api/color", web::post().to(set_color_handler))
        .route("/api/color/rgb", web::post().to(set_rgb_handler))
        .route("/api/color/select", web::post().to(select_color_handler))
        .route("/api/color/random", web::post().to(random_color_handler))
        .route("/api/palette/random", web::post().to(random_palette_handler))
        .route("/api/scheme/{kind}", web::post().to(scheme_handler))
        .route("/api/gradient", web::post().to(gradient_handler))
        .route("/api/theme", web::post().to(theme_handler))
        .route("/api/history", web::delete().to(clear_history_handler));
}

pub async fn run_api_server() -> std::io::Result<()> {
    let config = Config::from_env();
    let address = (config.bind_address.clone(), config.port);

    info!("Starting color changer on {}:{}", address.0, address.1);
    info!("History store: {:?}, key: {}", config.store_type, config.history_key);

    let state = web::Data::new(AppState::from_config(config));
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes)
    })
    .bind(address)?
    .run()
    .await
}

async fn index_handler(state: web::Data<AppState>) -> impl Responder {
    let Ok(session) = state.session.lock() else {
        return session_unavailable();
    };
    let template = IndexTemplate {
        current: session.current(),
        palette: session.palette(),
        history: session.history().entries(),
        scheme_buttons: SchemeButton::all(session.scheme()),
        body_class: if session.is_dark_theme() { "dark-theme" } else { "" },
        gradient_duration_ms: state.config.gradient_duration_ms,
        notification_duration_ms: state.config.notification_duration_ms,
    };
    match template.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html")
            .body(body),
        Err(e) => {
            error!("Template error: {}", e);
            HttpResponse::InternalServerError().body(format!("Template error: {}", e))
        },
    }
}

async fn state_handler(state: web::Data<AppState>) -> impl Responder {
    match state.session.lock() {
        Ok(session) => HttpResponse::Ok().json(session.snapshot()),
        Err(_) => session_unavailable(),
    }
}

async fn convert_handler(req: HttpRequest) -> impl Responder {
    let params = query_params(&req);
    match params.get("hex").and_then(|hex| color::convert(hex)) {
        Some(color) => HttpResponse::Ok().json(color),
        None => HttpResponse::UnprocessableEntity().body("Expected a color like #1A2B3C"),
    }
}

async fn copy_handler(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let params = query_params(&req);
    let format = match params.get("format") {
        None => CopyFormat::Hex,
        Some(name) => match name.parse::<CopyFormat>() {
            Ok(format) => format,
            Err(()) => {
                debug!("Unknown copy format {:?}", name);
                return HttpResponse::UnprocessableEntity().body("Expected format=hex, rgb or css");
            }
        },
    };
    match state.session.lock() {
        Ok(session) => HttpResponse::Ok().json(CopyResponse { text: session.current().copy_text(format) }),
        Err(_) => session_unavailable(),
    }
}

async fn set_color_handler(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let hex = query_params(&req).remove("hex").unwrap_or_default();
    apply(&state, |session, _| session.set_current_color(&hex))
}

async fn set_rgb_handler(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let params = query_params(&req);
    let channel = |name: &str| params.get(name).and_then(|v| v.trim().parse::<i64>().ok());
    let channels = (channel("r"), channel("g"), channel("b"));
    apply(&state, |session, _| match channels {
        (Some(r), Some(g), Some(b)) => session.set_current_rgb(r, g, b),
        _ => {
            debug!("Ignoring incomplete rgb input");
            false
        }
    })
}

async fn select_color_handler(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let hex = query_params(&req).remove("hex").unwrap_or_default();
    apply(&state, |session, _| session.select_color(&hex))
}

async fn random_color_handler(state: web::Data<AppState>) -> impl Responder {
    apply(&state, |session, rng| {
        let color = session.random_color(rng);
        info!("Random color {}", color);
        true
    })
}

async fn random_palette_handler(state: web::Data<AppState>) -> impl Responder {
    apply(&state, |session, rng| {
        session.random_palette(rng);
        true
    })
}

async fn scheme_handler(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let kind = path.into_inner();
    info!("Received scheme request: {}", kind);
    apply(&state, |session, _| {
        session.apply_scheme(&kind);
        true
    })
}

async fn gradient_handler(state: web::Data<AppState>) -> impl Responder {
    let Ok(mut rng) = state.rng.lock() else {
        return session_unavailable();
    };
    let gradient = palette::random_gradient(&mut *rng);
    let css = gradient.css();
    HttpResponse::Ok().json(GradientResponse { gradient, css })
}

async fn theme_handler(state: web::Data<AppState>) -> impl Responder {
    apply(&state, |session, _| {
        session.toggle_theme();
        true
    })
}

async fn clear_history_handler(state: web::Data<AppState>) -> impl Responder {
    apply(&state, |session, _| {
        session.clear_history();
        true
    })
}
