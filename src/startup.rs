use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    routes::{default_route, scrape_route, stream_route},
    services::ScrapePipeline,
};

pub fn run(listener: TcpListener, pipeline: ScrapePipeline) -> Result<Server, std::io::Error> {
    let pipeline = web::Data::new(pipeline);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(configure_routes)
            .app_data(pipeline.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(default_route::default)
        .service(default_route::health_check)
        .service(
            web::scope("/api")
                .app_data(scrape_route::json_config())
                .service(scrape_route::scrape)
                .service(stream_route::scrape_stream),
        );
}
