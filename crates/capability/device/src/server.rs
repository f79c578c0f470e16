//! Modbus TCP 服务端
//!
//! 只实现读保持寄存器（0x03）。每个连接由 tokio-modbus 独立处理，
//! 同一连接上的请求按序应答；唯一的共享状态是寄存器表。
//! 请求帧先经过 [`framing`](crate::framing) 预检，PDU 无法解码的帧同样得到异常应答。
//!
//! | 请求 | 应答 |
//! |------|------|
//! | 0x03 且地址在范围内 | 寄存器值 |
//! | 0x03 数量为 0 或超过 125 | 异常 IllegalDataValue |
//! | 0x03 地址越界 | 异常 IllegalDataAddress |
//! | 其他功能码（含所有写请求） | 异常 IllegalFunction |
//! | 寄存器表内部故障 | 异常 ServerDeviceFailure |
//! | PDU 长度或字节数不合法 | 异常 IllegalDataValue |
//! | MBAP 头不可解码 | 关闭连接 |

use crate::error::{DeviceError, RegisterError};
use crate::framing::guard_connection;
use crate::register_store::RegisterStore;
use domain::RegisterBank;
use plc_telemetry::{record_exception_response, record_request_served};
use std::future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_modbus::prelude::*;
use tokio_modbus::server::tcp::{Server, accept_tcp_connection};
use tracing::{debug, info, warn};

/// 单次读请求允许的最大寄存器数量（Modbus 规范上限）。
pub const MAX_READ_COUNT: u16 = 125;

/// 寄存器表的 Modbus 服务（只读）
#[derive(Clone)]
pub struct RegisterService {
    store: Arc<RegisterStore>,
}

impl RegisterService {
    pub fn new(store: Arc<RegisterStore>) -> Self {
        Self { store }
    }

    fn read_holding_registers(&self, address: u16, count: u16) -> Result<Vec<u16>, ExceptionCode> {
        if count == 0 || count > MAX_READ_COUNT {
            return Err(ExceptionCode::IllegalDataValue);
        }
        self.store
            .get(RegisterBank::HoldingRegisters, address, count)
            .map_err(|err| match err {
                RegisterError::OutOfRange { .. } => ExceptionCode::IllegalDataAddress,
                RegisterError::LockPoisoned(_) => ExceptionCode::ServerDeviceFailure,
            })
    }
}

impl tokio_modbus::server::Service for RegisterService {
    type Request = Request<'static>;
    type Response = Response;
    type Exception = ExceptionCode;
    type Future = future::Ready<Result<Self::Response, Self::Exception>>;

    fn call(&self, req: Self::Request) -> Self::Future {
        let res = match req {
            Request::ReadHoldingRegisters(address, count) => {
                debug!(address, count, "read holding registers");
                self.read_holding_registers(address, count)
                    .map(Response::ReadHoldingRegisters)
            }
            other => {
                debug!(request = ?other, "unsupported function");
                Err(ExceptionCode::IllegalFunction)
            }
        };

        match &res {
            Ok(_) => record_request_served(),
            Err(exception) => {
                record_exception_response();
                warn!(exception = ?exception, "modbus exception response");
            }
        }

        future::ready(res)
    }
}

/// 在给定监听器上运行 Modbus TCP 服务，收到停机信号后停止接受新连接
pub async fn serve(
    listener: TcpListener,
    store: Arc<RegisterStore>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), DeviceError> {
    let local_addr = listener.local_addr()?;
    info!("modbus server listening on {}", local_addr);

    let server = Server::new(listener);
    let new_service = move |_socket_addr: SocketAddr| {
        Ok(Some(RegisterService::new(Arc::clone(&store))))
    };
    let connection_shutdown = shutdown.clone();
    let on_connected = move |stream: tokio::net::TcpStream, socket_addr: SocketAddr| {
        let new_service = new_service.clone();
        let connection_shutdown = connection_shutdown.clone();
        async move {
            debug!("new connection from {}", socket_addr);
            accept_tcp_connection(stream, socket_addr, new_service).map(|accepted| {
                accepted.map(|(service, stream)| {
                    (
                        service,
                        guard_connection(stream, socket_addr, connection_shutdown),
                    )
                })
            })
        }
    };
    let on_process_error = |err: std::io::Error| {
        warn!(error = %err, "modbus connection error");
    };

    tokio::select! {
        result = server.serve(&on_connected, on_process_error) => result?,
        _ = shutdown.changed() => {}
    }

    info!("modbus server on {} stopped", local_addr);
    Ok(())
}
