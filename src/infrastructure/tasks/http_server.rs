//! HTTP Server Task
//!
//! Spawns the accept loop with the `WebSwitchHttpController`.

use embassy_net::Stack;

use crate::config;
use crate::controllers::WebSwitchHttpController;
use crate::net::http::HttpServer;

const RX_BUFFER_SIZE: usize = 1024;
const TX_BUFFER_SIZE: usize = 2048;

#[embassy_executor::task]
pub async fn http_server_task(stack: Stack<'static>, handler: &'static WebSwitchHttpController) {
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];
    let server = HttpServer::new(handler);
    server
        .listen_and_serve(stack, config::DEVICE.http_port, &mut rx_buffer, &mut tx_buffer)
        .await
}
