mod network;
mod relay;

pub use network::{init_network_stack, wait_for_connection, wait_for_ip, wait_for_link};
pub use relay::{SharedSwitch, init_switch};
