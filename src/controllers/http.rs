#[cfg(feature = "log")]
use esp_println::println;
use webswitch_core::Press;

use super::page::INDEX_HTML;
use crate::infrastructure::drivers::SharedSwitch;
use crate::net::http::{
    ContentHeaders, ContentType, HttpConnection, HttpHandler, HttpMethod, HttpResult,
    ResponseHeaders, TextEncoding,
};

/// Maps the three routes of the control surface onto the relay.
pub struct WebSwitchHttpController {
    switch: &'static SharedSwitch,
}

impl WebSwitchHttpController {
    pub fn new(switch: &'static SharedSwitch) -> Self {
        Self { switch }
    }

    /// Run one press to completion before responding.
    ///
    /// The mutex serializes pulses: a second request arriving while the
    /// relay is held waits here until the line is released.
    async fn press(&self, press: Press) {
        #[cfg(feature = "log")]
        println!("webswitch: {:?} press", press);
        self.switch.lock().await.press(press).await;
    }
}

impl HttpHandler for WebSwitchHttpController {
    async fn handle_request(&self, mut conn: HttpConnection<'_>) -> HttpResult {
        match conn.route() {
            (HttpMethod::Get, "/") => serve_index(&mut conn).await,
            (HttpMethod::Get, "/short") => {
                self.press(Press::Short).await;
                redirect_home(&mut conn).await
            }
            (HttpMethod::Get, "/long") => {
                self.press(Press::Long).await;
                redirect_home(&mut conn).await
            }
            _ => serve_not_found(&mut conn).await,
        }
    }
}

async fn serve_index(conn: &mut HttpConnection<'_>) -> HttpResult {
    let content = ContentHeaders::new(ContentType::TextHtml)
        .with_text_encoding(TextEncoding::Utf8)
        .with_length(INDEX_HTML.len());
    let headers = ResponseHeaders::success().with_content(content);
    conn.write_headers(&headers).await?;
    conn.write_body(INDEX_HTML.as_bytes()).await
}

async fn redirect_home(conn: &mut HttpConnection<'_>) -> HttpResult {
    // Empty body; the browser lands back on the control page.
    conn.write_headers(&ResponseHeaders::see_other("/")).await
}

async fn serve_not_found(conn: &mut HttpConnection<'_>) -> HttpResult {
    const BODY: &[u8] = b"Not Found";
    let content = ContentHeaders::new(ContentType::TextPlain).with_length(BODY.len());
    conn.write_headers(&ResponseHeaders::not_found().with_content(content)).await?;
    conn.write_body(BODY).await
}
