mod http;
mod page;

pub use http::WebSwitchHttpController;
