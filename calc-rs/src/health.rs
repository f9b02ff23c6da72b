//! Liveness endpoint: `GET /` answers `{"ok":true}`.
//!
//! Runs independently of the calculator and shares no state with it. Each
//! connection gets its own task, is answered once, and is closed. Only the
//! request line is interpreted; headers are read and discarded.

use std::future::Future;
use std::io;
use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::time;
use tracing::{debug, info, warn};

/// Upper bound on the request head we are willing to read.
const MAX_HEAD_BYTES: u64 = 8 * 1024;

/// How long a client may take to send its request head.
pub const HEAD_TIMEOUT: Duration = Duration::from_secs(10);

pub const USAGE: &str = "Usage: calc-health [-b|--bind <addr>]";

// ── Arguments ─────────────────────────────────────────────────────────────────

/// Parsed `calc-health` arguments.
#[derive(Debug, Default, PartialEq)]
pub struct HealthArgs {
    /// Bind address override (`-b <addr>`).
    pub bind: Option<String>,
    pub help: bool,
}

/// Parse `calc-health` arguments (program name excluded).
pub fn parse_argv(argv: &[String]) -> Result<HealthArgs, String> {
    let mut args = HealthArgs::default();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();
        match arg {
            "-h" | "--help" => args.help = true,
            "-b" | "--bind" => {
                i += 1;
                let addr = argv
                    .get(i)
                    .ok_or_else(|| format!("{arg} requires an address argument"))?;
                args.bind = Some(addr.clone());
            }
            _ => {
                if let Some(addr) = arg.strip_prefix("--bind=") {
                    args.bind = Some(addr.to_owned());
                } else if let Some(addr) = arg.strip_prefix("-b").filter(|s| !s.is_empty()) {
                    args.bind = Some(addr.to_owned());
                } else {
                    return Err(format!("unexpected argument: {arg}"));
                }
            }
        }
        i += 1;
    }

    Ok(args)
}

// ── Routing ───────────────────────────────────────────────────────────────────

/// An HTTP response with a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub reason: &'static str,
    pub body: String,
}

impl Response {
    fn json(status: u16, reason: &'static str, ok: bool) -> Self {
        Response {
            status,
            reason,
            body: json!({ "ok": ok }).to_string(),
        }
    }

    /// Serialise as an HTTP/1.1 response that closes the connection.
    pub fn to_http(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n\
             {}",
            self.status,
            self.reason,
            self.body.len(),
            self.body
        )
    }
}

/// Map a request line (`GET / HTTP/1.1`) to a response.
pub fn route(request_line: &str) -> Response {
    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Response::json(400, "Bad Request", false);
    };
    if !version.starts_with("HTTP/") {
        return Response::json(400, "Bad Request", false);
    }

    let path = target.split_once('?').map_or(target, |(p, _)| p);
    match (method, path) {
        ("GET", "/") => Response::json(200, "OK", true),
        (_, "/") => Response::json(405, "Method Not Allowed", false),
        _ => Response::json(404, "Not Found", false),
    }
}

// ── Server ────────────────────────────────────────────────────────────────────

/// Read the request line and discard headers up to the blank line.
async fn read_head(reader: OwnedReadHalf) -> io::Result<String> {
    let mut head = BufReader::new(reader).take(MAX_HEAD_BYTES);

    let mut request_line = String::new();
    head.read_line(&mut request_line).await?;

    let mut line = String::new();
    loop {
        line.clear();
        let n = head.read_line(&mut line).await?;
        if n == 0 || line == "\r\n" || line == "\n" {
            break;
        }
    }
    Ok(request_line)
}

/// Read one request from `stream`, answer it, and close. A client that has
/// not sent its request head within `head_timeout` is dropped unanswered.
pub async fn handle_connection(stream: TcpStream, head_timeout: Duration) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let request_line = time::timeout(head_timeout, read_head(reader))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "request head not received"))??;

    let response = route(request_line.trim_end());
    debug!(request = request_line.trim_end(), status = response.status, "health request");
    writer.write_all(response.to_http().as_bytes()).await?;
    writer.shutdown().await
}

/// Accept connections until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("health endpoint shutting down");
                return;
            }
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                        continue;
                    }
                };
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, HEAD_TIMEOUT).await {
                        warn!(%peer, error = %e, "health connection failed");
                    }
                });
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
