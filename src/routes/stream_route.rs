use actix_web::{get, web, HttpResponse};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;

use crate::{domain::event::ScrapeEvent, services::ScrapePipeline};

const EVENT_BUFFER: usize = 32;

#[derive(Deserialize)]
pub struct StreamQuery {
    url: Option<String>,
}

/// Server-sent events for one scrape run. The run stops as soon as the client
/// goes away.
#[get("/scrape/stream")]
pub async fn scrape_stream(
    pipeline: web::Data<ScrapePipeline>,
    query: web::Query<StreamQuery>,
) -> HttpResponse {
    let url = match pipeline.validate_listing_url(query.url.as_deref()) {
        Ok(url) => url,
        Err(e) => {
            log::error!("Rejected stream request: {}", e);
            return HttpResponse::BadRequest().json(json!({ "error": e.to_string() }));
        }
    };

    let (tx, mut rx) = mpsc::channel::<ScrapeEvent>(EVENT_BUFFER);
    let pipeline = pipeline.into_inner();
    actix_web::rt::spawn(async move { pipeline.stream(url, tx).await });

    let stream = async_stream::stream! {
        while let Some(event) = rx.recv().await {
            match sse_frame(&event) {
                Ok(frame) => yield Ok::<Bytes, actix_web::Error>(frame),
                Err(e) => log::error!("Dropping unserializable '{}' event: {}", event.name(), e),
            }

            // Nothing follows done/error.
            if event.is_terminal() {
                break;
            }
        }
    };

    HttpResponse::Ok()
        .insert_header(("Content-Type", "text/event-stream"))
        .insert_header(("Cache-Control", "no-cache"))
        .insert_header(("Connection", "keep-alive"))
        .streaming(stream)
}

fn sse_frame(event: &ScrapeEvent) -> Result<Bytes, serde_json::Error> {
    let data = serde_json::to_string(event)?;
    Ok(Bytes::from(format!("event: {}\ndata: {}\n\n", event.name(), data)))
}
