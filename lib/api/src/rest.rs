use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use playrec_core::{Engine, Recommendation, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Deserialize)]
struct SimilarQuery {
    title: String,
    limit: Option<i64>,
}

#[derive(Serialize)]
struct SimilarResponse {
    title: String,
    known: bool,
    recommendations: Vec<Recommendation>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(engine: Arc<Engine>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new().wrap(cors).configure(configure(engine.clone()))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register routes and shared state; usable from tests without binding a port
pub fn configure(engine: Arc<Engine>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(engine))
            .route("/health", web::get().to(health))
            .route("/games", web::get().to(list_games))
            .route("/games/similar", web::get().to(similar_games))
            .route("/stats", web::get().to(stats));
    }
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok"
    })))
}

async fn list_games(engine: web::Data<Arc<Engine>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(engine.list_known_items()))
}

async fn similar_games(
    engine: web::Data<Arc<Engine>>,
    query: web::Query<SimilarQuery>,
) -> ActixResult<HttpResponse> {
    let SimilarQuery { title, limit } = query.into_inner();
    let top_n = match limit {
        Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
        Some(_) => 0,
        None => DEFAULT_TOP_N,
    };

    let snapshot = engine.snapshot();
    let known = snapshot.contains(&title);
    let recommendations = snapshot.recommend(&title, top_n);
    debug!(title = %title, known, returned = recommendations.len(), "Similar games query");

    Ok(HttpResponse::Ok().json(SimilarResponse {
        title,
        known,
        recommendations,
    }))
}

async fn stats(engine: web::Data<Arc<Engine>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(engine.snapshot().stats()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use playrec_core::{EngineConfig, InteractionRecord, RawRecords};
    use serde_json::Value;

    fn engine() -> Arc<Engine> {
        let play = |u: &str, i: &str, m: f64| InteractionRecord::new(u, i, "play", m);
        let raw = RawRecords::from(vec![
            play("u1", "A", 10.0),
            play("u1", "B", 10.0),
            play("u2", "A", 10.0),
            play("u2", "B", 10.0),
            play("u3", "C", 5.0),
        ]);
        Arc::new(Engine::fit(&raw, EngineConfig::default()).unwrap())
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(configure(engine()))).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_list_games() {
        let app = test::init_service(App::new().configure(configure(engine()))).await;
        let req = test::TestRequest::get().uri("/games").to_request();
        let body: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, vec!["A", "B", "C"]);
    }

    #[actix_web::test]
    async fn test_similar_games() {
        let app = test::init_service(App::new().configure(configure(engine()))).await;
        let req = test::TestRequest::get()
            .uri("/games/similar?title=A&limit=1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["known"], true);
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 1);
        assert_eq!(body["recommendations"][0]["item_id"], "B");
    }

    #[actix_web::test]
    async fn test_unknown_title_is_empty_ok() {
        let app = test::init_service(App::new().configure(configure(engine()))).await;
        let req = test::TestRequest::get()
            .uri("/games/similar?title=Half-Life%203")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Half-Life 3");
        assert_eq!(body["known"], false);
        assert!(body["recommendations"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_negative_limit_is_empty() {
        let app = test::init_service(App::new().configure(configure(engine()))).await;
        let req = test::TestRequest::get()
            .uri("/games/similar?title=A&limit=-3")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["recommendations"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_huge_limit_returns_every_other_game() {
        let app = test::init_service(App::new().configure(configure(engine()))).await;
        let req = test::TestRequest::get()
            .uri("/games/similar?title=A&limit=9223372036854775807")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_stats() {
        let app = test::init_service(App::new().configure(configure(engine()))).await;
        let req = test::TestRequest::get().uri("/stats").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["items"], 3);
        assert_eq!(body["users"], 3);
        assert_eq!(body["duplicate_policy"], "sum");
    }
}
