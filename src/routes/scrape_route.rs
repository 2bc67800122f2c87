use std::sync::LazyLock;

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    post, web, HttpRequest, HttpResponse,
};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    domain::product::ProductRecord,
    error::{ScrapeError, ValidationError},
    services::ScrapePipeline,
};

static BRAND_MODEL_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"brand/([^/]+)/([^/]+)").expect("valid path regex"));

#[derive(Deserialize)]
pub struct ScrapeBody {
    url: Option<String>,
}

#[derive(Serialize)]
struct ScrapeResponse {
    success: bool,
    count: usize,
    failed: usize,
    products: Vec<ProductRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    export_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ScrapeResponse {
    fn failure(error: &ScrapeError) -> Self {
        ScrapeResponse {
            success: false,
            count: 0,
            failed: 0,
            products: vec![],
            export_name: None,
            error: Some(error.to_string()),
        }
    }
}

/// Body extraction failures get the same JSON shape as any other rejected
/// request. A request without a JSON body has no URL.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(body_error)
}

fn body_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let validation = match &err {
        JsonPayloadError::ContentType => ValidationError::MissingUrl,
        other => ValidationError::MalformedBody {
            reason: other.to_string(),
        },
    };
    log::error!("Rejected scrape request: {}", validation);

    let response =
        HttpResponse::BadRequest().json(ScrapeResponse::failure(&ScrapeError::from(validation)));
    InternalError::from_response(err, response).into()
}

#[post("/scrape")]
pub async fn scrape(
    pipeline: web::Data<ScrapePipeline>,
    body: web::Json<ScrapeBody>,
) -> HttpResponse {
    let url = match pipeline.validate_listing_url(body.url.as_deref()) {
        Ok(url) => url,
        Err(e) => {
            log::error!("Rejected scrape request: {}", e);
            let error = ScrapeError::from(e);
            return HttpResponse::BadRequest().json(ScrapeResponse::failure(&error));
        }
    };

    match pipeline.run(&url).await {
        Ok(outcome) => HttpResponse::Ok().json(ScrapeResponse {
            success: true,
            count: outcome.success_count(),
            failed: outcome.failure_count(),
            export_name: Some(export_file_name(
                &url,
                chrono::Local::now().date_naive(),
            )),
            products: outcome.products,
            error: None,
        }),
        Err(e) => {
            log::error!("Scraping error for {}: {}", url, e);
            HttpResponse::build(error_status(&e)).json(ScrapeResponse::failure(&e))
        }
    }
}

fn error_status(error: &ScrapeError) -> StatusCode {
    match error {
        ScrapeError::Validation(_) => StatusCode::BAD_REQUEST,
        ScrapeError::EmptyResult(_) => StatusCode::OK,
        ScrapeError::Network(_) | ScrapeError::Cancelled => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `<make>-<model>-MM-DD.csv` for brand pages, `products-MM-DD.csv` otherwise.
pub fn export_file_name(url: &Url, date: NaiveDate) -> String {
    let date = date.format("%m-%d");

    match BRAND_MODEL_PATH.captures(url.path()) {
        Some(caps) => format!("{}-{}-{}.csv", &caps[1], &caps[2], date),
        None => format!("products-{}.csv", date),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{
        test::{call_service, init_service, read_body_json, TestRequest},
        App,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::{routes::test_support, startup::configure_routes};

    #[test]
    fn export_name_uses_brand_and_model() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();

        let url = Url::parse("https://www.machines4u.com.au/brand/jlg/4394rt/").unwrap();
        assert_eq!(export_file_name(&url, date), "jlg-4394rt-03-07.csv");

        let url = Url::parse("https://www.machines4u.com.au/search/scissor-lift").unwrap();
        assert_eq!(export_file_name(&url, date), "products-03-07.csv");
    }

    #[actix_web::test]
    async fn buffered_scrape_returns_products() {
        let marketplace = test_support::Marketplace::start().await;
        let app = init_service(
            App::new()
                .app_data(web::Data::new(marketplace.pipeline()))
                .configure(configure_routes),
        )
        .await;

        let req = TestRequest::post()
            .uri("/api/scrape")
            .set_json(json!({ "url": marketplace.listing_url() }))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 2);
        assert_eq!(body["failed"], 1);
        assert_eq!(body["products"][0]["AD Title"], "2018 JLG 4394RT");
        assert_eq!(body["products"][0]["Price"], "14500");
        assert_eq!(body["products"][1]["Seller"], "N/A");
        assert_eq!(body["products"][1]["Price"], "");
        assert!(body["export_name"]
            .as_str()
            .unwrap()
            .starts_with("jlg-4394rt-"));
        assert!(body.get("error").is_none());
    }

    #[actix_web::test]
    async fn missing_url_is_bad_request() {
        let marketplace = test_support::Marketplace::start().await;
        let app = init_service(
            App::new()
                .app_data(web::Data::new(marketplace.pipeline()))
                .configure(configure_routes),
        )
        .await;

        let req = TestRequest::post()
            .uri("/api/scrape")
            .set_json(json!({}))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "URL is required");
        assert_eq!(body["products"], json!([]));
    }

    #[actix_web::test]
    async fn request_without_json_body_gets_json_error() {
        let marketplace = test_support::Marketplace::start().await;
        let app = init_service(
            App::new()
                .app_data(web::Data::new(marketplace.pipeline()))
                .configure(configure_routes),
        )
        .await;

        let req = TestRequest::post().uri("/api/scrape").to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["count"], 0);
        assert_eq!(body["products"], json!([]));
        assert_eq!(body["error"], "URL is required");

        let req = TestRequest::post()
            .uri("/api/scrape")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"url\": ")
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body"));
    }

    #[actix_web::test]
    async fn missing_section_reports_reason() {
        let marketplace = test_support::Marketplace::start().await;
        let app = init_service(
            App::new()
                .app_data(web::Data::new(marketplace.pipeline()))
                .configure(configure_routes),
        )
        .await;

        let req = TestRequest::post()
            .uri("/api/scrape")
            .set_json(json!({ "url": marketplace.url("/search/no-section") }))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(
            body["error"],
            "Could not find a 'Listings' or 'Search Results' section."
        );
        assert_eq!(body["count"], 0);
    }

    #[actix_web::test]
    async fn unreachable_listing_page_is_server_error() {
        let marketplace = test_support::Marketplace::start().await;
        let app = init_service(
            App::new()
                .app_data(web::Data::new(marketplace.pipeline()))
                .configure(configure_routes),
        )
        .await;

        let req = TestRequest::post()
            .uri("/api/scrape")
            .set_json(json!({ "url": marketplace.url("/brand/removed/") }))
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("404"));
        assert_eq!(body["products"], json!([]));
    }
}
