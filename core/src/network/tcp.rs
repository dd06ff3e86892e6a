//! TCP-connect liveness probing.
//!
//! A host counts as alive when any probe port accepts the connection or
//! actively refuses it. Only silence (filtered ports, unreachable routes)
//! within the per-host timeout marks it unreachable.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use assetscout_common::error::ProbeFailure;
use assetscout_common::ports::LivenessProbe;
use futures::future::select_ok;
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout};

pub struct TcpConnectProber {
    ports: Vec<u16>,
}

impl TcpConnectProber {
    pub fn new(ports: Vec<u16>) -> Self {
        Self { ports }
    }

    pub fn ports(&self) -> &[u16] {
        &self.ports
    }
}

#[async_trait::async_trait]
impl LivenessProbe for TcpConnectProber {
    async fn probe(&self, addr: IpAddr, probe_timeout: Duration) -> Result<Duration, ProbeFailure> {
        if self.ports.is_empty() {
            return Err(ProbeFailure::HostUnreachable(Duration::ZERO));
        }

        let started = Instant::now();
        let attempts = self
            .ports
            .iter()
            .map(|port| Box::pin(handshake(SocketAddr::new(addr, *port))));

        match timeout(probe_timeout, select_ok(attempts)).await {
            Ok(Ok((port, _))) => {
                tracing::trace!(%addr, port, "host answered");
                Ok(started.elapsed())
            }
            Ok(Err(_)) | Err(_) => Err(ProbeFailure::HostUnreachable(probe_timeout)),
        }
    }
}

/// Resolves to the port when the host answered on it.
async fn handshake(socket_addr: SocketAddr) -> io::Result<u16> {
    match TcpStream::connect(socket_addr).await {
        Ok(_) => Ok(socket_addr.port()),
        Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => Ok(socket_addr.port()),
        Err(e) => Err(e),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
