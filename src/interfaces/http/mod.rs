use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::ProcessQueryUseCase;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub pipeline: Arc<ProcessQueryUseCase>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProcessQueryRequest {
    #[validate(length(min = 1, message = "query must not be empty"))]
    pub query: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[post("/process-query")]
async fn process_query(
    data: web::Data<HttpState>,
    req: web::Json<ProcessQueryRequest>,
) -> impl Responder {
    if req.validate().is_err() || req.query.trim().is_empty() {
        return HttpResponse::BadRequest().json(ErrorBody {
            error: "La consulta no puede estar vacía".to_string(),
        });
    }

    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Processing query ({} chars)", req.query.len()),
    );

    match data.pipeline.execute(req.query.clone()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Pipeline failed: {}", e),
            );
            HttpResponse::InternalServerError().json(ErrorBody {
                error: e.to_string(),
            })
        }
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap().clone();
    HttpResponse::Ok().json(logs)
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap();
    logs.push(entry.clone());
    if logs.len() > 100 {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn start_server(
    pipeline: Arc<ProcessQueryUseCase>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
    host: &str,
    port: u16,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState { pipeline, logs });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // the marketing UI runs on another origin

        App::new().wrap(cors).app_data(state.clone()).service(
            web::scope("/api")
                .service(process_query)
                .service(health)
                .service(get_logs),
        )
    })
    .bind((host, port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_buffer_is_capped() {
        let logs = Mutex::new(Vec::new());
        for i in 0..150 {
            add_log(&logs, "INFO", "Test", &format!("entry {}", i));
        }
        let logs = logs.lock().unwrap();
        assert_eq!(logs.len(), 100);
        assert_eq!(logs[0].message, "entry 50");
    }

    #[test]
    fn test_empty_query_fails_validation() {
        let req = ProcessQueryRequest {
            query: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_non_empty_query_passes_validation() {
        let req = ProcessQueryRequest {
            query: "clientes VIP".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    mod endpoint {
        use super::*;
        use crate::application::PipelineOptions;
        use crate::domain::error::{AppError, Result as AppResult};
        use crate::domain::llm_config::LLMConfig;
        use crate::domain::query::Record;
        use crate::infrastructure::db::DataStore;
        use crate::infrastructure::llm_clients::LLMClient;
        use actix_web::test;
        use async_trait::async_trait;

        struct FailingLlm;

        #[async_trait]
        impl LLMClient for FailingLlm {
            async fn generate(&self, _: &LLMConfig, _: &str, _: &str) -> AppResult<String> {
                Err(AppError::LLMError("API error (500): upstream".to_string()))
            }
        }

        struct EmptyStore;

        #[async_trait]
        impl DataStore for EmptyStore {
            async fn run_sql(&self, _: &str) -> AppResult<Vec<Record>> {
                Ok(Vec::new())
            }

            async fn select_all(&self, _: usize) -> AppResult<Vec<Record>> {
                Ok(Vec::new())
            }
        }

        fn failing_state() -> web::Data<HttpState> {
            let pipeline = Arc::new(ProcessQueryUseCase::new(
                Arc::new(FailingLlm),
                Arc::new(EmptyStore),
                LLMConfig::default(),
                PipelineOptions::default(),
            ));
            web::Data::new(HttpState {
                pipeline,
                logs: Arc::new(Mutex::new(Vec::new())),
            })
        }

        #[actix_web::test]
        async fn test_upstream_failure_maps_to_500_with_error_body() {
            let app = test::init_service(
                App::new()
                    .app_data(failing_state())
                    .service(web::scope("/api").service(process_query)),
            )
            .await;

            let req = test::TestRequest::post()
                .uri("/api/process-query")
                .set_json(serde_json::json!({ "query": "clientes VIP" }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 500);

            let body: serde_json::Value = test::read_body_json(resp).await;
            assert!(body["error"].as_str().unwrap().contains("LLM error"));
        }

        #[actix_web::test]
        async fn test_blank_query_rejected_with_400() {
            let app = test::init_service(
                App::new()
                    .app_data(failing_state())
                    .service(web::scope("/api").service(process_query)),
            )
            .await;

            let req = test::TestRequest::post()
                .uri("/api/process-query")
                .set_json(serde_json::json!({ "query": "   " }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 400);
        }
    }
}
