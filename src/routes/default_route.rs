use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn default() -> impl Responder {
    HttpResponse::Ok().body(
        "trawl is up.\n\
         Buffered: POST /api/scrape {\"url\":\"https://www.machines4u.com.au/brand/jlg/4394rt/\"}\n\
         Stream:   GET  /api/scrape/stream?url=... (SSE)\n",
    )
}

#[get("/health_check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}
