use color_eyre::Result;
use reqwest::header::*;

pub(crate) fn make_client() -> Result<reqwest::Client> {
    let client = reqwest::ClientBuilder::new()
        .default_headers(get_headers())
        .build()?;

    Ok(client)
}

pub(crate) fn get_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );

    headers
}
