//! mDNS Responder Task
//!
//! Answers name-resolution queries for `<hostname>.local` and advertises
//! the HTTP service record, so the device is reachable under a fixed
//! symbolic name instead of a DHCP-assigned address.

use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, IpEndpoint, Ipv4Address, Stack};
#[cfg(feature = "log")]
use esp_println::println;
use webswitch_core::dns::{self, ServiceAdvertisement};

use crate::config;

const PACKET_BUFFER_SIZE: usize = 512;
const META_SLOTS: usize = 4;

#[embassy_executor::task]
pub async fn mdns_responder_task(stack: Stack<'static>) {
    let group = Ipv4Address::from(dns::MDNS_GROUP);
    if stack.join_multicast_group(group).is_err() {
        #[cfg(feature = "log")]
        println!("mdns: failed to join multicast group");
        return;
    }

    let mut rx_meta = [PacketMetadata::EMPTY; META_SLOTS];
    let mut tx_meta = [PacketMetadata::EMPTY; META_SLOTS];
    let mut rx_buffer = [0u8; PACKET_BUFFER_SIZE];
    let mut tx_buffer = [0u8; PACKET_BUFFER_SIZE];
    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    if socket.bind(dns::MDNS_PORT).is_err() {
        #[cfg(feature = "log")]
        println!("mdns: failed to bind port {}", dns::MDNS_PORT);
        return;
    }

    #[cfg(feature = "log")]
    println!("mdns: responding for {}.local", config::DEVICE.hostname);

    let group_endpoint = IpEndpoint::new(IpAddress::Ipv4(group), dns::MDNS_PORT);
    let mut packet = [0u8; PACKET_BUFFER_SIZE];
    let mut reply = [0u8; PACKET_BUFFER_SIZE];
    loop {
        let Ok((len, meta)) = socket.recv_from(&mut packet).await else {
            continue;
        };
        // The advertised address follows DHCP renewals.
        let Some(v4) = stack.config_v4() else {
            continue;
        };
        let adv = ServiceAdvertisement {
            hostname: config::DEVICE.hostname,
            instance: config::DEVICE.instance,
            service: config::MDNS.service,
            port: config::DEVICE.http_port,
            addr: v4.address.address().octets(),
            ttl: config::MDNS.ttl_secs,
        };

        let interest = dns::classify_query(&packet[..len], &adv);
        // Legacy (non-5353) queriers get a unicast answer echoing their
        // query id (RFC 6762 §6.7); QU queriers get a unicast answer with
        // id 0; everything else goes back to the group.
        let legacy = meta.endpoint.port != dns::MDNS_PORT;
        let id = if legacy { interest.query_id } else { 0 };
        let Some(n) = dns::build_reply(&adv, interest, id, &mut reply) else {
            continue;
        };

        let target = if interest.unicast_reply || legacy {
            meta.endpoint
        } else {
            group_endpoint
        };
        let _ = socket.send_to(&reply[..n], target).await;
    }
}
