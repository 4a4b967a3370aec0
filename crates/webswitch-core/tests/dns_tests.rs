//! Host tests for the mDNS codec: query classification and reply building.

use webswitch_core::dns::{self, QueryInterest, ServiceAdvertisement};

const TYPE_A: u16 = 1;
const TYPE_PTR: u16 = 12;
const TYPE_TXT: u16 = 16;
const TYPE_SRV: u16 = 33;
const TYPE_ANY: u16 = 255;
const CLASS_IN: u16 = 0x0001;
const CLASS_QU: u16 = 0x8001;

fn adv() -> ServiceAdvertisement<'static> {
    ServiceAdvertisement {
        hostname: "esp32",
        instance: "ESP32 Web Switch",
        service: "_http._tcp",
        port: 80,
        addr: [192, 168, 1, 50],
        ttl: 120,
    }
}

/// Build a single-question query packet.
fn query(name: &str, qtype: u16, qclass: u16) -> Vec<u8> {
    let mut packet = vec![0x12, 0x34, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0];
    put_name(&mut packet, name);
    packet.extend_from_slice(&qtype.to_be_bytes());
    packet.extend_from_slice(&qclass.to_be_bytes());
    packet
}

fn put_name(packet: &mut Vec<u8>, name: &str) {
    for label in name.split('.') {
        packet.push(u8::try_from(label.len()).unwrap());
        packet.extend_from_slice(label.as_bytes());
    }
    packet.push(0);
}

/// One decoded resource record from a reply packet.
#[derive(Debug, PartialEq)]
struct Record {
    name: String,
    rtype: u16,
    class: u16,
    ttl: u32,
    rdata: Vec<u8>,
}

/// Walk a reply built by the codec. Names are written uncompressed, so a
/// plain label walk is enough.
fn parse_reply(packet: &[u8]) -> (u16, u16, Vec<Record>) {
    let flags = u16::from_be_bytes([packet[2], packet[3]]);
    let qdcount = u16::from_be_bytes([packet[4], packet[5]]);
    let ancount = u16::from_be_bytes([packet[6], packet[7]]);
    let nscount = u16::from_be_bytes([packet[8], packet[9]]);
    let arcount = u16::from_be_bytes([packet[10], packet[11]]);
    assert_eq!(flags, 0x8400, "responses must be authoritative");
    assert_eq!(qdcount, 0);
    assert_eq!(nscount, 0);

    let mut records = Vec::new();
    let mut pos = 12;
    while pos < packet.len() {
        let mut name = String::new();
        loop {
            let len = packet[pos] as usize;
            pos += 1;
            if len == 0 {
                break;
            }
            if !name.is_empty() {
                name.push('.');
            }
            name.push_str(std::str::from_utf8(&packet[pos..pos + len]).unwrap());
            pos += len;
        }
        let rtype = u16::from_be_bytes([packet[pos], packet[pos + 1]]);
        let class = u16::from_be_bytes([packet[pos + 2], packet[pos + 3]]);
        let ttl = u32::from_be_bytes([
            packet[pos + 4],
            packet[pos + 5],
            packet[pos + 6],
            packet[pos + 7],
        ]);
        let rdlen = u16::from_be_bytes([packet[pos + 8], packet[pos + 9]]) as usize;
        pos += 10;
        records.push(Record {
            name,
            rtype,
            class,
            ttl,
            rdata: packet[pos..pos + rdlen].to_vec(),
        });
        pos += rdlen;
    }
    assert_eq!(records.len(), usize::from(ancount + arcount));
    (ancount, arcount, records)
}

#[test]
fn host_address_query_is_classified() {
    let packet = query("esp32.local", TYPE_A, CLASS_IN);
    let interest = dns::classify_query(&packet, &adv());
    assert_eq!(
        interest,
        QueryInterest {
            host: true,
            service: false,
            unicast_reply: false,
            query_id: 0x1234
        }
    );
}

#[test]
fn host_name_matching_is_case_insensitive() {
    let packet = query("ESP32.LOCAL", TYPE_A, CLASS_IN);
    assert!(dns::classify_query(&packet, &adv()).host);
}

#[test]
fn any_query_counts_as_address_query() {
    let packet = query("esp32.local", TYPE_ANY, CLASS_IN);
    assert!(dns::classify_query(&packet, &adv()).host);
}

#[test]
fn service_ptr_query_is_classified() {
    let packet = query("_http._tcp.local", TYPE_PTR, CLASS_IN);
    let interest = dns::classify_query(&packet, &adv());
    assert!(interest.service);
    assert!(!interest.host);
}

#[test]
fn qu_bit_requests_unicast_reply() {
    let packet = query("esp32.local", TYPE_A, CLASS_QU);
    assert!(dns::classify_query(&packet, &adv()).unicast_reply);
}

#[test]
fn qu_bit_on_foreign_name_is_ignored() {
    let packet = query("printer.local", TYPE_A, CLASS_QU);
    let interest = dns::classify_query(&packet, &adv());
    assert!(interest.is_empty());
    assert!(!interest.unicast_reply);
}

#[test]
fn foreign_names_yield_no_interest() {
    let packet = query("other-host.local", TYPE_A, CLASS_IN);
    assert!(dns::classify_query(&packet, &adv()).is_empty());
}

#[test]
fn responses_are_not_answered() {
    let mut packet = query("esp32.local", TYPE_A, CLASS_IN);
    // Flip the QR bit: this is now somebody else's response.
    packet[2] = 0x84;
    assert!(dns::classify_query(&packet, &adv()).is_empty());
}

#[test]
fn truncated_packets_are_ignored() {
    let packet = query("esp32.local", TYPE_A, CLASS_IN);
    for len in 0..packet.len() - 1 {
        assert!(
            dns::classify_query(&packet[..len], &adv()).is_empty(),
            "truncated at {len}"
        );
    }
}

#[test]
fn compressed_question_names_are_followed() {
    // Two questions; the second name is a pointer back to the first.
    let mut packet = vec![0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0];
    put_name(&mut packet, "esp32.local"); // at offset 12
    packet.extend_from_slice(&TYPE_PTR.to_be_bytes());
    packet.extend_from_slice(&CLASS_IN.to_be_bytes());
    packet.extend_from_slice(&[0xC0, 12]); // pointer to offset 12
    packet.extend_from_slice(&TYPE_A.to_be_bytes());
    packet.extend_from_slice(&CLASS_IN.to_be_bytes());

    assert!(dns::classify_query(&packet, &adv()).host);
}

#[test]
fn pointer_loops_are_rejected() {
    let mut packet = vec![0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0];
    packet.extend_from_slice(&[0xC0, 12]); // points at itself
    packet.extend_from_slice(&TYPE_A.to_be_bytes());
    packet.extend_from_slice(&CLASS_IN.to_be_bytes());

    assert!(dns::classify_query(&packet, &adv()).is_empty());
}

#[test]
fn host_reply_carries_a_record() {
    let interest = QueryInterest {
        host: true,
        ..QueryInterest::default()
    };
    let mut out = [0u8; 512];
    let len = dns::build_reply(&adv(), interest, 0, &mut out).unwrap();
    let (ancount, arcount, records) = parse_reply(&out[..len]);

    assert_eq!(&out[..2], &[0, 0], "multicast responses carry id 0");
    assert_eq!((ancount, arcount), (1, 0));
    let a = &records[0];
    assert_eq!(a.name, "esp32.local");
    assert_eq!(a.rtype, TYPE_A);
    assert_eq!(a.class, 0x8001, "host records carry the cache-flush bit");
    assert_eq!(a.ttl, 120);
    assert_eq!(a.rdata, vec![192, 168, 1, 50]);
}

#[test]
fn service_reply_carries_ptr_srv_txt_and_additional_a() {
    let interest = QueryInterest {
        service: true,
        ..QueryInterest::default()
    };
    let mut out = [0u8; 512];
    let len = dns::build_reply(&adv(), interest, 0, &mut out).unwrap();
    let (ancount, arcount, records) = parse_reply(&out[..len]);

    assert_eq!((ancount, arcount), (3, 1));

    let ptr = &records[0];
    assert_eq!(ptr.name, "_http._tcp.local");
    assert_eq!(ptr.rtype, TYPE_PTR);
    assert_eq!(ptr.class, CLASS_IN, "PTR is a shared record");

    let srv = &records[1];
    assert_eq!(srv.name, "ESP32 Web Switch._http._tcp.local");
    assert_eq!(srv.rtype, TYPE_SRV);
    // priority 0, weight 0, port 80, then the target name
    assert_eq!(&srv.rdata[..6], &[0, 0, 0, 0, 0, 80]);

    let txt = &records[2];
    assert_eq!(txt.rtype, TYPE_TXT);
    assert_eq!(txt.rdata, vec![0]);

    let a = &records[3];
    assert_eq!(a.rtype, TYPE_A);
    assert_eq!(a.name, "esp32.local");
}

#[test]
fn combined_reply_promotes_a_record_to_answer() {
    let interest = QueryInterest {
        host: true,
        service: true,
        ..QueryInterest::default()
    };
    let mut out = [0u8; 512];
    let len = dns::build_reply(&adv(), interest, 0, &mut out).unwrap();
    let (ancount, arcount, records) = parse_reply(&out[..len]);

    assert_eq!((ancount, arcount), (4, 0));
    assert_eq!(records[3].rtype, TYPE_A);
}

#[test]
fn legacy_reply_echoes_query_id() {
    // A legacy querier (source port other than 5353) expects the reply
    // to carry its query id rather than 0.
    let packet = query("esp32.local", TYPE_A, CLASS_IN);
    let interest = dns::classify_query(&packet, &adv());
    assert_eq!(interest.query_id, 0x1234);

    let mut out = [0u8; 512];
    let len = dns::build_reply(&adv(), interest, interest.query_id, &mut out).unwrap();
    assert_eq!(&out[..2], &[0x12, 0x34]);

    let (ancount, arcount, records) = parse_reply(&out[..len]);
    assert_eq!((ancount, arcount), (1, 0));
    assert_eq!(records[0].rtype, TYPE_A);
}

#[test]
fn empty_interest_builds_nothing() {
    let mut out = [0u8; 512];
    assert!(dns::build_reply(&adv(), QueryInterest::default(), 0, &mut out).is_none());
}

#[test]
fn undersized_buffer_is_rejected() {
    let interest = QueryInterest {
        host: true,
        service: true,
        ..QueryInterest::default()
    };
    let mut out = [0u8; 40];
    assert!(dns::build_reply(&adv(), interest, 0, &mut out).is_none());
}
