use actix_multipart::Multipart;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::auth::{Admin, SESSION_COOKIE, SESSION_DAYS};
use super::config::AppState;
use crate::error::IngestError;
use crate::parser::{IngestReport, Ingested};
use crate::schema::{DISTRICT_GEO, REGION_CENTER, REGION_ZOOM};
use crate::store::import_workbook;
use crate::ui::SilentUi;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Error body shared by every endpoint
#[derive(Debug, Serialize)]
pub struct Detail {
    pub detail: String,
}

impl Detail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct UploadBody<'a> {
    status: &'static str,
    report: &'a IngestReport,
}

fn no_data() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(Detail::new("No data has been uploaded yet"))
}

fn bad_request(detail: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(Detail::new(detail))
}

fn internal(e: impl std::fmt::Display) -> HttpResponse {
    log::error!("{}", e);
    HttpResponse::InternalServerError().json(Detail::new("Internal server error"))
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({"status": "ok"}))
}

pub async fn districts(state: web::Data<AppState>) -> HttpResponse {
    match state.snapshot.current() {
        Some(dataset) => HttpResponse::Ok().json(&dataset.districts),
        None => no_data(),
    }
}

pub async fn district_schools(state: web::Data<AppState>, path: web::Path<u32>) -> HttpResponse {
    let Some(dataset) = state.snapshot.current() else {
        return no_data();
    };
    match dataset.schools_in(path.into_inner()) {
        Some(schools) => HttpResponse::Ok().json(schools),
        None => HttpResponse::NotFound().json(Detail::new("District not found")),
    }
}

pub async fn geo_districts() -> impl Responder {
    HttpResponse::Ok().json(DISTRICT_GEO)
}

pub async fn geo_region() -> impl Responder {
    HttpResponse::Ok().json(json!({"center": REGION_CENTER, "zoom": REGION_ZOOM}))
}

pub async fn geo_borders(state: web::Data<AppState>) -> HttpResponse {
    let Some(borders) = &state.borders else {
        return HttpResponse::NotFound().json(Detail::new("No border file configured"));
    };
    let dataset = state.snapshot.current().unwrap_or_default();
    HttpResponse::Ok().json(borders.resolve(&dataset.districts))
}

pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> HttpResponse {
    if !state.check_credentials(&body.login, &body.password) {
        log::warn!("failed admin login for {:?}", body.login);
        return HttpResponse::Unauthorized().json(Detail::new("Invalid login or password"));
    }

    let token = state.sessions.issue();
    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(SESSION_DAYS))
        .finish();

    log::info!("admin logged in");
    HttpResponse::Ok().cookie(cookie).json(json!({"status": "ok"}))
}

pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        state.sessions.revoke(cookie.value());
    }

    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();

    HttpResponse::Ok().cookie(removal).json(json!({"status": "ok"}))
}

/// Read the `file` field of the form, `Err` is the response to send instead
async fn read_upload(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<(String, Vec<u8>), HttpResponse> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| bad_request(e.to_string()))?;
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned)
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| bad_request(e.to_string()))?;
            if bytes.len() + chunk.len() > max_bytes {
                return Err(HttpResponse::PayloadTooLarge()
                    .json(Detail::new(format!("File is larger than {} bytes", max_bytes))));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok((filename, bytes));
    }

    Err(bad_request("Missing form field 'file'"))
}

pub async fn upload(_admin: Admin, state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let (filename, bytes) = match read_upload(payload, state.config.max_upload_bytes).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    if !filename.to_lowercase().ends_with(".xlsx") {
        return bad_request("Only .xlsx files are accepted");
    }

    let _guard = state.ingest_lock.lock().await;
    log::info!("importing upload {:?} ({} bytes)", filename, bytes.len());

    let data_dir = state.data_dir.clone();
    let result =
        web::block(move || import_workbook(&data_dir, &bytes, &mut SilentUi::new())).await;

    match result {
        Ok(Ok(Ingested { dataset, report })) => {
            state.snapshot.replace(dataset);
            HttpResponse::Ok().json(UploadBody {
                status: "ok",
                report: &report,
            })
        }
        Ok(Err(e)) => match e.downcast_ref::<IngestError>() {
            Some(ingest) => {
                log::warn!("rejected upload {:?}: {}", filename, ingest);
                HttpResponse::UnprocessableEntity().json(json!({
                    "detail": format!("Failed to process the file, check file format: {}", ingest),
                    "report": ingest.report(),
                }))
            }
            None => internal(format!("{:#}", e)),
        },
        Err(e) => internal(e),
    }
}

pub async fn data_exists(_admin: Admin, state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({"exists": state.data_dir.workbook_path().exists()}))
}

pub async fn download(_admin: Admin, state: web::Data<AppState>) -> HttpResponse {
    let path = state.data_dir.workbook_path();
    if !path.exists() {
        return HttpResponse::NotFound().json(Detail::new("No data file"));
    }

    match web::block(move || std::fs::read(path)).await {
        Ok(Ok(bytes)) => HttpResponse::Ok()
            .content_type(XLSX_MIME)
            .insert_header((
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"data.xlsx\"",
            ))
            .body(bytes),
        Ok(Err(e)) => internal(e),
        Err(e) => internal(e),
    }
}
