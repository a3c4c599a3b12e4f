// Debug mode: fetch a URL and print its body.

use tracing::debug;

pub async fn fetch_to_stdout(url: &str) -> Result<(), reqwest::Error> {
    let body = fetch_body(url).await?;
    println!("{}", body);
    Ok(())
}

async fn fetch_body(url: &str) -> Result<String, reqwest::Error> {
    let response = reqwest::get(url).await?;
    debug!("GET {} -> {}", url, response.status());
    response.text().await
}
