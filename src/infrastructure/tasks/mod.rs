mod http_server;
mod mdns;
mod network;

pub use http_server::http_server_task;
pub use mdns::mdns_responder_task;
pub use network::{network_runner_task, wifi_connection_task};
