// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::config::{AiConfig, AppConfig};
use crate::job::JobDetection;
use crate::storage::KvStore;
use crate::types::job::JobAnalysis;
use crate::types::response::CompanyProfile;
use crate::types::resume::ResumeRecord;
use anyhow::{Context, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::{Error as JsonError, Json};
use rocket::{catchers, get, options, post, put, routes, Build, Request, Response, Rocket, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PUT, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/parse-resume", data = "<upload>")]
pub async fn parse_resume(
    upload: Form<ResumeUploadForm<'_>>,
    state: &State<ServerState>,
) -> ApiResult<DataResponse<ResumeRecord>> {
    handlers::parse_resume_handler(upload, state).await
}

#[post("/parse-resume-text", data = "<request>")]
pub async fn parse_resume_text(
    request: Json<ParseTextRequest>,
    state: &State<ServerState>,
) -> Json<DataResponse<ResumeRecord>> {
    handlers::parse_resume_text_handler(request, state).await
}

#[get("/resume")]
pub async fn get_resume(state: &State<ServerState>) -> ApiResult<DataResponse<ResumeRecord>> {
    handlers::get_resume_handler(state).await
}

#[put("/resume", data = "<request>")]
pub async fn save_resume(
    request: Json<ResumeRecord>,
    state: &State<ServerState>,
) -> ApiResult<TextResponse> {
    handlers::save_resume_handler(request, state).await
}

#[post("/detect-job", data = "<request>")]
pub async fn detect_job(
    request: Json<PageRequest>,
    state: &State<ServerState>,
) -> Json<DataResponse<JobDetection>> {
    handlers::detect_job_handler(request, state).await
}

#[post("/analyze-job", data = "<request>")]
pub async fn analyze_job(
    request: Result<Json<PageRequest>, JsonError<'_>>,
    state: &State<ServerState>,
) -> ApiResult<DataResponse<JobAnalysis>> {
    handlers::analyze_job_handler(request, state).await
}

#[post("/analyze-company", data = "<request>")]
pub async fn analyze_company(
    request: Json<CompanyRequest>,
    state: &State<ServerState>,
) -> ApiResult<DataResponse<CompanyProfile>> {
    handlers::analyze_company_handler(request, state).await
}

#[put("/ai-config", data = "<request>")]
pub async fn update_ai_config(
    request: Json<AiConfig>,
    state: &State<ServerState>,
) -> ApiResult<TextResponse> {
    handlers::update_ai_config_handler(request, state).await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST",
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Endpoint not found".to_string(),
        "NOT_FOUND",
        vec!["Check the request path and method".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable_entity() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be parsed".to_string(),
        "INVALID_BODY",
        vec!["Verify field names and types".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR",
        vec![
            "Try again in a few moments".to_string(),
            "Check the server logs".to_string(),
        ],
    ))
}

pub fn build_rocket(state: ServerState) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(state)
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable_entity, internal_error],
        )
        .mount(
            "/api",
            routes![
                parse_resume,
                parse_resume_text,
                get_resume,
                save_resume,
                detect_job,
                analyze_job,
                analyze_company,
                update_ai_config,
                health,
                options,
            ],
        )
}

pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let database_path = config.database_path()?;
    let store = KvStore::open(&database_path).await?;
    store.initialize_defaults(&config.ai).await?;

    info!("Starting resume-tailor API server");
    info!("Database: {}", database_path.display());
    info!(
        "Server: http://{}:{}/api",
        config.server.address, config.server.port
    );

    let figment = rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port));

    build_rocket(ServerState::new(store, config.ai.clone()))
        .configure(figment)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("HTTP server failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageKey;
    use rocket::http::ContentType;
    use rocket::local::asynchronous::Client;
    use serde_json::{json, Value};

    const BOUNDARY: &str = "X-RESUME-BOUNDARY";

    async fn client() -> Client {
        let store = KvStore::open_in_memory().await.unwrap();
        let state = ServerState::new(store, AiConfig::default());
        Client::tracked(build_rocket(state)).await.unwrap()
    }

    fn multipart(file_name: &str, content: &str) -> (ContentType, String) {
        let content_type = ContentType::new("multipart", "form-data")
            .with_params(("boundary", BOUNDARY));
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"resume_file\"; filename=\"{f}\"\r\nContent-Type: text/plain\r\n\r\n{c}\r\n--{b}--\r\n",
            b = BOUNDARY,
            f = file_name,
            c = content
        );
        (content_type, body)
    }

    async fn json_body(response: rocket::local::asynchronous::LocalResponse<'_>) -> Value {
        let text = response.into_string().await.unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[rocket::async_test]
    async fn test_health_has_cors_headers() {
        let client = client().await;
        let response = client.get("/api/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Origin"),
            Some("*")
        );
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
    }

    #[rocket::async_test]
    async fn test_upload_unsupported_format() {
        let client = client().await;
        let (content_type, body) = multipart("cv.rtf", "Jane Doe");
        let response = client
            .post("/api/parse-resume")
            .header(content_type)
            .body(body)
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body = json_body(response).await;
        assert_eq!(body["type"], "error");
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "UNSUPPORTED_FORMAT");
        assert!(body["suggestions"].as_array().unwrap().len() >= 1);
    }

    #[rocket::async_test]
    async fn test_upload_text_resume() {
        let client = client().await;
        let (content_type, body) = multipart(
            "resume.txt",
            "Jane Doe\njane.doe@example.com\nSKILLS\nRust, SQL",
        );
        let response = client
            .post("/api/parse-resume")
            .header(content_type)
            .body(body)
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let body = json_body(response).await;
        assert_eq!(body["data"]["fullName"], "Jane Doe");
        assert_eq!(body["data"]["email"], "jane.doe@example.com");
    }

    #[rocket::async_test]
    async fn test_parse_text_then_save_and_load() {
        let client = client().await;
        let response = client.get("/api/resume").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        assert_eq!(json_body(response).await["error_code"], "RESUME_NOT_FOUND");

        let response = client
            .post("/api/parse-resume-text")
            .header(ContentType::JSON)
            .body(json!({"text": ""}).to_string())
            .dispatch()
            .await;
        let record = json_body(response).await["data"].clone();
        assert_eq!(record["fullName"], crate::types::resume::SENTINEL_NAME);

        let response = client
            .put("/api/resume")
            .header(ContentType::JSON)
            .body(record.to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let response = client.get("/api/resume").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(json_body(response).await["data"], record);
    }

    #[rocket::async_test]
    async fn test_detect_then_analyze_last_job() {
        let client = client().await;

        let response = client.post("/api/analyze-job").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);
        assert_eq!(json_body(response).await["error_code"], "NO_JOB_POSTING");

        let page = json!({
            "url": "https://www.indeed.com/viewjob?jk=42",
            "title": "Data Engineer - Indeed",
            "html": "<html><body><h1 data-testid=\"job-title\">Data Engineer</h1>\
                <div data-testid=\"company-name\">Globex</div>\
                <div id=\"jobDescriptionText\"><p>5+ years of experience with SQL and AWS.</p></div>\
                </body></html>"
        });
        let response = client
            .post("/api/detect-job")
            .header(ContentType::JSON)
            .body(page.to_string())
            .dispatch()
            .await;
        let body = json_body(response).await;
        assert_eq!(body["data"]["detected"], true);
        assert_eq!(body["data"]["source"], "site");
        assert_eq!(body["data"]["posting"]["company"], "Globex");

        let response = client.post("/api/analyze-job").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body = json_body(response).await;
        assert_eq!(body["data"]["company"], "Globex");
        assert_eq!(body["data"]["experience"][0], "5+ years of experience");

        let rocket = client.rocket();
        let state = rocket.state::<ServerState>().unwrap();
        let stored: Value = state.store.get(StorageKey::JobAnalysis).await.unwrap().unwrap();
        assert_eq!(stored["title"], "Data Engineer");
    }

    #[rocket::async_test]
    async fn test_malformed_analyze_body_is_rejected() {
        let client = client().await;
        let page = json!({
            "url": "https://www.indeed.com/viewjob?jk=42",
            "html": "<html><body><h1 data-testid=\"job-title\">Data Engineer</h1>\
                <div data-testid=\"company-name\">Globex</div></body></html>"
        });
        client
            .post("/api/detect-job")
            .header(ContentType::JSON)
            .body(page.to_string())
            .dispatch()
            .await;

        // "htm" instead of "html": must not fall back to the Globex posting
        let response = client
            .post("/api/analyze-job")
            .header(ContentType::JSON)
            .body(json!({"url": "https://careers.initech.example/9", "htm": "<h1>Cook</h1>"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "INVALID_BODY");

        let response = client
            .post("/api/analyze-job")
            .header(ContentType::JSON)
            .body("{\"url\": ")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
        assert_eq!(json_body(response).await["error_code"], "INVALID_BODY");

        let state = client.rocket().state::<ServerState>().unwrap();
        let stored: Option<Value> = state.store.get(StorageKey::JobAnalysis).await.unwrap();
        assert!(stored.is_none());

        // A blank body still reuses the detected posting
        let response = client.post("/api/analyze-job").body("  ").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(json_body(response).await["data"]["company"], "Globex");
    }

    #[rocket::async_test]
    async fn test_update_ai_config() {
        let client = client().await;
        let response = client
            .put("/api/ai-config")
            .header(ContentType::JSON)
            .body(json!({"apiKey": "sk-test", "model": "gpt-4o"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let state = client.rocket().state::<ServerState>().unwrap();
        let stored: AiConfig = state.store.get(StorageKey::AiConfig).await.unwrap().unwrap();
        assert_eq!(stored.model, "gpt-4o");
        assert!(stored.has_api_key());
    }

    #[rocket::async_test]
    async fn test_unknown_route_uses_error_body() {
        let client = client().await;
        let response = client.get("/api/nope").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        assert_eq!(json_body(response).await["error_code"], "NOT_FOUND");
    }
}
