//! Transport layer for the Canvas SDK.

pub mod http;
pub mod pagination;

pub use http::HttpTransport;
pub use pagination::{parse_next_link, LinkPaginator};

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers every connection with headers promising more body than is
    /// ever sent, then holds the socket open. Returns the base URL.
    pub async fn stalled_body_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n[{\"id\": 1",
                        )
                        .await;
                    tokio::time::sleep(Duration::from_secs(30)).await;
                });
            }
        });

        format!("http://{}", addr)
    }
}
