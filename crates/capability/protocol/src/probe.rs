//! 存活探测
//!
//! 在按需读取前确认 Modbus 服务端可达。探测只建立并关闭一条 TCP 连接，
//! 不发送任何 Modbus 帧。

use async_trait::async_trait;
use plc_telemetry::record_probe_failure;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

/// 存活探测抽象
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn is_alive(&self) -> bool;
}

/// 带超时的 TCP 连接探测
///
/// 连接建立且能取到对端地址时返回 true；拒绝、超时、不可达均返回 false 并记录原因。
/// 探测连接在返回前关闭。
pub async fn probe(host: &str, port: u16, connect_timeout: Duration) -> bool {
    let address = format!("{}:{}", host, port);
    let alive = match timeout(connect_timeout, TcpStream::connect(address.as_str())).await {
        Ok(Ok(stream)) => {
            let peer = stream.peer_addr();
            drop(stream);
            match peer {
                Ok(peer) => {
                    debug!(addr = %peer, "modbus server reachable");
                    true
                }
                Err(e) => {
                    warn!(addr = %address, error = %e, "modbus server connection not open");
                    false
                }
            }
        }
        Ok(Err(e)) => {
            warn!(addr = %address, error = %e, "modbus server connection error");
            false
        }
        Err(_) => {
            warn!(
                addr = %address,
                timeout_ms = connect_timeout.as_millis() as u64,
                "modbus server connection timed out"
            );
            false
        }
    };

    if !alive {
        record_probe_failure();
    }
    alive
}

/// 固定目标的 TCP 存活探测
#[derive(Debug, Clone)]
pub struct TcpLivenessProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpLivenessProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }
}

#[async_trait]
impl LivenessProbe for TcpLivenessProbe {
    async fn is_alive(&self) -> bool {
        probe(&self.host, self.port, self.timeout).await
    }
}
