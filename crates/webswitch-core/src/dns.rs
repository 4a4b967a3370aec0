//! Minimal mDNS (RFC 6762) wire codec for the responder task.
//!
//! The device answers exactly two things: address queries for its own
//! hostname and PTR queries for the advertised `_http._tcp` service.
//! Parsing works on `&[u8]`, building on `&mut [u8]`; the sockets live in
//! the firmware crate.

use core::fmt::Write as _;

/// Multicast DNS port (RFC 6762).
pub const MDNS_PORT: u16 = 5353;
/// IPv4 multicast group for mDNS.
pub const MDNS_GROUP: [u8; 4] = [224, 0, 0, 251];

const HEADER_LEN: usize = 12;
const FLAG_QR: u16 = 0x8000;
/// QR | AA, the only flags a responder sets.
const FLAGS_AUTHORITATIVE_RESPONSE: u16 = 0x8400;

const TYPE_A: u16 = 1;
const TYPE_PTR: u16 = 12;
const TYPE_TXT: u16 = 16;
const TYPE_SRV: u16 = 33;
const TYPE_ANY: u16 = 255;

const CLASS_IN: u16 = 0x0001;
/// Cache-flush bit on records the host is the sole authority for.
const CLASS_CACHE_FLUSH: u16 = 0x8000;
/// QU bit in a question class: the querier asks for a unicast reply.
const CLASS_UNICAST_RESPONSE: u16 = 0x8000;

const MAX_NAME_LEN: usize = 128;
const MAX_POINTER_JUMPS: usize = 4;

type Name = heapless::String<MAX_NAME_LEN>;

/// Everything the responder advertises about this device.
#[derive(Debug, Clone, Copy)]
pub struct ServiceAdvertisement<'a> {
    /// Hostname without the `.local` suffix.
    pub hostname: &'a str,
    /// Human-readable service instance name.
    pub instance: &'a str,
    /// Service type, e.g. `_http._tcp`.
    pub service: &'a str,
    pub port: u16,
    pub addr: [u8; 4],
    pub ttl: u32,
}

/// What an incoming query asked about, if anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryInterest {
    /// Asked for the address of `<hostname>.local`.
    pub host: bool,
    /// Asked for `<service>.local` instances.
    pub service: bool,
    /// The QU bit was set on a matching question.
    pub unicast_reply: bool,
    /// Id field of the query header. Legacy unicast responses (RFC 6762
    /// §6.7) must echo it; standard multicast responses use 0.
    pub query_id: u16,
}

impl QueryInterest {
    pub fn is_empty(&self) -> bool {
        !(self.host || self.service)
    }
}

/// Inspect an incoming packet and report which of our records it asks for.
///
/// Responses, malformed packets and queries for other names all yield an
/// empty interest.
pub fn classify_query(packet: &[u8], adv: &ServiceAdvertisement<'_>) -> QueryInterest {
    classify_inner(packet, adv).unwrap_or_default()
}

fn classify_inner(packet: &[u8], adv: &ServiceAdvertisement<'_>) -> Option<QueryInterest> {
    let mut interest = QueryInterest {
        query_id: be16(packet, 0)?,
        ..QueryInterest::default()
    };

    let flags = be16(packet, 2)?;
    if flags & FLAG_QR != 0 {
        return None;
    }
    let qdcount = be16(packet, 4)?;

    let mut host_name = Name::new();
    write!(host_name, "{}.local", adv.hostname).ok()?;
    let mut service_name = Name::new();
    write!(service_name, "{}.local", adv.service).ok()?;

    let mut pos = HEADER_LEN;
    for _ in 0..qdcount {
        let Some((name, after)) = read_name(packet, pos) else {
            break;
        };
        let (Some(qtype), Some(qclass)) = (be16(packet, after), be16(packet, after + 2)) else {
            break;
        };
        pos = after + 4;

        let wants_host = name.as_str().eq_ignore_ascii_case(host_name.as_str())
            && matches!(qtype, TYPE_A | TYPE_ANY);
        let wants_service = name.as_str().eq_ignore_ascii_case(service_name.as_str())
            && matches!(qtype, TYPE_PTR | TYPE_ANY);

        interest.host |= wants_host;
        interest.service |= wants_service;
        if (wants_host || wants_service) && qclass & CLASS_UNICAST_RESPONSE != 0 {
            interest.unicast_reply = true;
        }
    }

    Some(interest)
}

/// Build an authoritative reply for the matched questions.
///
/// `id` is 0 for standard multicast responses; replies to legacy
/// (non-5353) queriers echo the query id instead.
///
/// Returns the number of bytes written, or `None` if there is nothing to
/// answer or `out` is too small.
pub fn build_reply(
    adv: &ServiceAdvertisement<'_>,
    interest: QueryInterest,
    id: u16,
    out: &mut [u8],
) -> Option<usize> {
    if interest.is_empty() {
        return None;
    }

    // The A record is an answer for host queries and an additional record
    // on service-only replies. It is always written last, so the section
    // split is purely a matter of the counts below.
    let ancount = u16::from(interest.host) + if interest.service { 3 } else { 0 };
    let arcount = u16::from(interest.service && !interest.host);

    let mut c = Cursor::new(out);
    c.put_u16(id)?;
    c.put_u16(FLAGS_AUTHORITATIVE_RESPONSE)?;
    c.put_u16(0)?; // no questions echoed
    c.put_u16(ancount)?;
    c.put_u16(0)?;
    c.put_u16(arcount)?;

    if interest.service {
        // PTR is a shared record type, so no cache-flush bit on it
        c.put_name(&[adv.service, "local"])?;
        c.put_u16(TYPE_PTR)?;
        c.put_u16(CLASS_IN)?;
        c.put_u32(adv.ttl)?;
        c.rdata(|c| c.put_name(&[adv.instance, adv.service, "local"]))?;

        c.put_name(&[adv.instance, adv.service, "local"])?;
        c.put_u16(TYPE_SRV)?;
        c.put_u16(CLASS_IN | CLASS_CACHE_FLUSH)?;
        c.put_u32(adv.ttl)?;
        c.rdata(|c| {
            c.put_u16(0)?; // priority
            c.put_u16(0)?; // weight
            c.put_u16(adv.port)?;
            c.put_name(&[adv.hostname, "local"])
        })?;

        c.put_name(&[adv.instance, adv.service, "local"])?;
        c.put_u16(TYPE_TXT)?;
        c.put_u16(CLASS_IN | CLASS_CACHE_FLUSH)?;
        c.put_u32(adv.ttl)?;
        c.rdata(|c| c.put_u8(0))?; // single empty string
    }

    c.put_name(&[adv.hostname, "local"])?;
    c.put_u16(TYPE_A)?;
    c.put_u16(CLASS_IN | CLASS_CACHE_FLUSH)?;
    c.put_u32(adv.ttl)?;
    c.rdata(|c| c.put(&adv.addr))?;

    Some(c.pos)
}

fn be16(buf: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_be_bytes([*buf.get(at)?, *buf.get(at + 1)?]))
}

/// Decode a possibly compressed name into dotted lowercase form.
///
/// Returns the name and the position right after its inline encoding
/// (i.e. after the first pointer, if one was followed).
fn read_name(packet: &[u8], start: usize) -> Option<(Name, usize)> {
    let mut name = Name::new();
    let mut pos = start;
    let mut resume = None;
    let mut jumps = 0;
    loop {
        let len = *packet.get(pos)? as usize;
        if len == 0 {
            pos += 1;
            break;
        }
        if len & 0xC0 == 0xC0 {
            let low = *packet.get(pos + 1)? as usize;
            if resume.is_none() {
                resume = Some(pos + 2);
            }
            pos = (len & 0x3F) << 8 | low;
            jumps += 1;
            if jumps > MAX_POINTER_JUMPS {
                return None;
            }
            continue;
        }
        // 0x40 and 0x80 label prefixes are reserved
        if len & 0xC0 != 0 {
            return None;
        }
        let label = packet.get(pos + 1..pos + 1 + len)?;
        if !name.is_empty() {
            name.push('.').ok()?;
        }
        for &b in label {
            name.push(b.to_ascii_lowercase() as char).ok()?;
        }
        pos += 1 + len;
    }
    Some((name, resume.unwrap_or(pos)))
}

/// Bounds-checked big-endian writer over the output buffer.
struct Cursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn put(&mut self, bytes: &[u8]) -> Option<()> {
        let end = self.pos.checked_add(bytes.len())?;
        self.buf.get_mut(self.pos..end)?.copy_from_slice(bytes);
        self.pos = end;
        Some(())
    }

    fn put_u8(&mut self, value: u8) -> Option<()> {
        self.put(&[value])
    }

    fn put_u16(&mut self, value: u16) -> Option<()> {
        self.put(&value.to_be_bytes())
    }

    fn put_u32(&mut self, value: u32) -> Option<()> {
        self.put(&value.to_be_bytes())
    }

    /// Write an uncompressed name from dotted parts, e.g.
    /// `["_http._tcp", "local"]`.
    fn put_name(&mut self, parts: &[&str]) -> Option<()> {
        for part in parts {
            for label in part.split('.') {
                let bytes = label.as_bytes();
                if bytes.is_empty() || bytes.len() > 63 {
                    return None;
                }
                #[allow(clippy::cast_possible_truncation)]
                self.put_u8(bytes.len() as u8)?;
                self.put(bytes)?;
            }
        }
        self.put_u8(0)
    }

    /// Write an rdata section, backpatching its length prefix.
    #[allow(clippy::cast_possible_truncation)]
    fn rdata(&mut self, f: impl FnOnce(&mut Self) -> Option<()>) -> Option<()> {
        let at = self.pos;
        self.put_u16(0)?;
        f(self)?;
        let len = (self.pos - at - 2) as u16;
        self.buf[at..at + 2].copy_from_slice(&len.to_be_bytes());
        Some(())
    }
}
