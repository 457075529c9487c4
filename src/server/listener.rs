use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpSocket};
use tracing::{error, info};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::server::handler::FileService;

/// Pending connections the kernel may queue while one is being served.
const BACKLOG: u32 = 1;

pub struct Server {
    listener: TcpListener,
    service: FileService,
    read_budget: usize,
}

impl Server {
    /// Binds the listening socket with `SO_REUSEADDR` so restarts do not hit
    /// "address in use".
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let addr: SocketAddr = tokio::net::lookup_host(cfg.listen_addr())
            .await?
            .next()
            .ok_or_else(|| anyhow::anyhow!("no address for {}", cfg.listen_addr()))?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;

        Ok(Self {
            listener: socket.listen(BACKLOG)?,
            service: FileService::from_config(cfg)?,
            read_budget: cfg.server.read_budget,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts and serves connections one at a time, forever.
    ///
    /// Each connection is awaited to completion before the next `accept`, so
    /// a stalled client blocks everyone behind it. A failing connection is
    /// logged and dropped; only an `accept` error ends the loop.
    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            addr = %self.local_addr()?,
            root = %self.service.resolver().root().display(),
            "Listening"
        );

        loop {
            let (socket, peer) = self.listener.accept().await?;
            info!("Accepted connection from {}", peer);

            let mut conn = Connection::new(socket, self.service.clone(), self.read_budget);
            if let Err(e) = conn.run().await {
                error!("Connection error from {}: {}", peer, e);
            }
        }
    }
}

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    Server::bind(cfg).await?.run().await
}
