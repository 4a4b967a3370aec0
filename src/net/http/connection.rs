use embassy_net::tcp::TcpSocket;
use embedded_io_async::Write as _;
use heapless::{String, Vec};

use super::{
    Error, HttpResult,
    headers::{HttpMethod, ResponseHeaders, TargetWriter as _, parse_request_line, read_heading},
};

const HEADER_BUFFER_SIZE: usize = 512;
const STREAM_CHUNK_SIZE: usize = 1024;
const MAX_PATH_LEN: usize = 64;

/// HTTP connection context.
///
/// The control surface is GET-only, so only the request heading is ever
/// read; bodies are neither expected nor consumed.
pub(crate) struct HttpConnection<'a> {
    method: HttpMethod,
    path: String<MAX_PATH_LEN>,

    socket: TcpSocket<'a>,
    header_buf: Vec<u8, HEADER_BUFFER_SIZE>,
}

impl<'a> HttpConnection<'a> {
    /// Create a new HTTP connection from a socket.
    pub(crate) async fn from_socket(mut socket: TcpSocket<'a>) -> Result<Self, Error> {
        let mut header_buf = Vec::<u8, HEADER_BUFFER_SIZE>::new();
        header_buf
            .resize_default(header_buf.capacity())
            .map_err(|()| Error::Parse)?;
        let (header_end, header_len) = read_heading(header_buf.as_mut_slice(), &mut socket).await?;
        header_buf.truncate(header_len);

        let headers_only = &header_buf.as_slice()[..header_end];
        let header_str = core::str::from_utf8(headers_only).map_err(|_| Error::Parse)?;
        let (method, raw_path) = parse_request_line(header_str).ok_or(Error::Parse)?;

        let mut path = String::new();
        path.push_str(raw_path).map_err(|()| Error::Parse)?;
        Ok(Self {
            method,
            path,
            socket,
            header_buf,
        })
    }

    /// Get request method and path
    pub(crate) fn route(&self) -> (HttpMethod, &'_ str) {
        (self.method, self.path.as_str())
    }

    /// Write the headers to the connection
    pub(crate) async fn write_headers(&mut self, headers: &ResponseHeaders) -> HttpResult {
        self.header_buf.clear();
        headers.write_to(&mut self.header_buf)?;
        self.socket.write_all(self.header_buf.as_slice()).await?;
        self.socket.flush().await?;
        Ok(())
    }

    /// Write the body to the connection
    pub(crate) async fn write_body(&mut self, body: &[u8]) -> HttpResult {
        for chunk in body.chunks(STREAM_CHUNK_SIZE) {
            self.socket.write_all(chunk).await?;
            self.socket.flush().await?;
        }
        Ok(())
    }
}
