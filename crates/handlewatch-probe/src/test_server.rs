//! Minimal loopback HTTP server for probe tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Reply {
    /// Answer every request with this status and an empty body.
    Status(u16),
    /// Accept the connection and never answer.
    Hang,
}

/// Start a server on an ephemeral port and return its base URL.
pub(crate) async fn spawn(reply: Reply) -> String {
    spawn_recording(reply).await.0
}

/// Like [`spawn`], also yielding the raw request head of every request.
pub(crate) async fn spawn_recording(reply: Reply) -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let tx = tx.clone();
            tokio::spawn(handle(stream, reply, tx));
        }
    });

    (format!("http://{addr}"), rx)
}

async fn handle(mut stream: TcpStream, reply: Reply, tx: mpsc::UnboundedSender<String>) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    let _ = tx.send(String::from_utf8_lossy(&head).into_owned());

    match reply {
        Reply::Status(code) => {
            let response = format!(
                "HTTP/1.1 {code} Test\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        Reply::Hang => {
            // Hold the socket open until the client gives up.
            let _ = stream.read(&mut buf).await;
        }
    }
}
