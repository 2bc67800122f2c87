pub mod default_route;
pub mod scrape_route;
pub mod stream_route;

#[cfg(test)]
mod test_support;
