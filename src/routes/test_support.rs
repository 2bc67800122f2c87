use std::{sync::Arc, time::Duration};

use mockito::{Mock, Server, ServerGuard};
use url::Url;

use crate::{
    domain::price::PriceRule,
    services::{HttpFetcher, ScrapePipeline},
};

const LISTING_PAGE: &str = r#"
    <html><body>
      <div class="search-right-head-panel"><h2>Spotlight Ads</h2></div>
      <div class="row"><a class="equip_link" href="/view/advert/spotlight/">Spotlight</a></div>
      <div class="search-right-head-panel"><h2>Listings</h2></div>
      <div class="row">
        <div class="tiled_results_container"><a class="equip_link" href="/view/advert/a/">A</a></div>
        <div class="tiled_results_container"><a class="equip_link" href="/view/advert/b/">B</a></div>
        <div class="tiled_results_container"><a class="equip_link" href="/view/advert/a/">A again</a></div>
        <div class="tiled_results_container"><a class="equip_link" href="/view/advert/c/">C</a></div>
      </div>
      <div class="search-right-head-panel"><h2>Other Ads</h2></div>
      <div class="row"><a class="equip_link" href="/view/advert/other/">Other</a></div>
    </body></html>
"#;

const DETAIL_A: &str = r#"
    <html><body>
      <h1 class="list-title">2018 JLG 4394RT</h1>
      <span class="price_normal"><b>$12,000 - $14,500</b></span>
      <a href="javascript:void(0)" onclick="showAdvertMap()">Dandenong South, VIC</a>
      <div class="business-name">Acme Access Hire</div>
      <div class="ad_det_children">Make:</div><div class="ad_det_children">JLG</div>
      <div class="ad_det_children">Model:</div><div class="ad_det_children">4394RT</div>
    </body></html>
"#;

const DETAIL_B: &str = r#"
    <html><body>
      <h1 class="list-title">Genie GS-1930</h1>
      <div class="price_container">Ask for price</div>
      <div class="ad_det_children">Make:</div><div class="ad_det_children">Genie</div>
    </body></html>
"#;

/// A mock marketplace with one brand page listing two good detail pages and
/// one that 404s.
pub struct Marketplace {
    server: ServerGuard,
    _mocks: Vec<Mock>,
}

impl Marketplace {
    pub async fn start() -> Self {
        let mut server = Server::new_async().await;
        let mut mocks = vec![];

        for (path, status, body) in [
            ("/brand/jlg/4394rt/", 200, LISTING_PAGE),
            ("/view/advert/a/", 200, DETAIL_A),
            ("/view/advert/b/", 200, DETAIL_B),
            ("/view/advert/c/", 404, "Not Found"),
            ("/brand/removed/", 404, "Not Found"),
            (
                "/search/no-section",
                200,
                r#"<div class="search-right-head-panel">Other Ads</div>"#,
            ),
        ] {
            let mock = server
                .mock("GET", path)
                .with_status(status)
                .with_header("content-type", "text/html; charset=utf-8")
                .with_body(body)
                .create_async()
                .await;
            mocks.push(mock);
        }

        Marketplace {
            server,
            _mocks: mocks,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.server.url(), path)
    }

    pub fn listing_url(&self) -> String {
        self.url("/brand/jlg/4394rt/")
    }

    pub fn pipeline(&self) -> ScrapePipeline {
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        ScrapePipeline::new(
            Arc::new(fetcher),
            Url::parse(&self.server.url()).unwrap(),
            "127.0.0.1",
            Duration::ZERO,
            PriceRule::HyphenStrip,
        )
    }
}
