//! MBAP 帧预检
//!
//! 位于 tokio-modbus 的连接处理之前。每个请求帧先完整读出：
//! - PDU 能被解码：原样转交 tokio-modbus，再把它的应答写回客户端
//! - MBAP 头完整但 PDU 无法解码（长度不足、多余字节、字节数不符）：
//!   直接回送异常应答，回显事务号与单元号
//! - MBAP 头本身不合法（协议号非 0、长度不含功能码或超出上限）：关闭连接
//!
//! 每个连接上的帧严格按到达顺序一问一答。

use plc_telemetry::record_exception_response;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_modbus::bytes::Bytes;
use tokio_modbus::prelude::{ExceptionCode, Request};
use tracing::{debug, warn};

/// MBAP 头长度（事务号 2 + 协议号 2 + 长度 2 + 单元号 1）
pub const MBAP_HEADER_LEN: usize = 7;
/// PDU 最大长度（Modbus 规范）
pub const MAX_PDU_LEN: usize = 253;

/// 转交 tokio-modbus 的管道缓冲
const PIPE_CAPACITY: usize = (MBAP_HEADER_LEN + MAX_PDU_LEN) * 2;

/// 检查 MBAP 头；返回 PDU 长度，头部不合法时返回 None
pub fn pdu_len(header: &[u8; MBAP_HEADER_LEN]) -> Option<usize> {
    let protocol_id = u16::from_be_bytes([header[2], header[3]]);
    let length = usize::from(u16::from_be_bytes([header[4], header[5]]));
    // length 含单元号；至少还要有一个功能码字节
    if protocol_id != 0 || length < 2 || length - 1 > MAX_PDU_LEN {
        return None;
    }
    Some(length - 1)
}

/// 检查 PDU 能否解码；不能时返回应回送的异常码
pub fn check_pdu(pdu: &[u8]) -> Result<(), ExceptionCode> {
    let function = pdu.first().copied().unwrap_or_default();
    match Request::try_from(Bytes::copy_from_slice(pdu)) {
        Ok(_) => Ok(()),
        Err(_) if function >= 0x80 => Err(ExceptionCode::IllegalFunction),
        Err(_) => Err(ExceptionCode::IllegalDataValue),
    }
}

/// 编码异常应答：回显事务号与单元号，功能码置最高位
pub fn exception_adu(
    header: &[u8; MBAP_HEADER_LEN],
    function: u8,
    exception: ExceptionCode,
) -> [u8; 9] {
    [
        header[0],
        header[1],
        0x00,
        0x00,
        0x00,
        0x03,
        header[6],
        function | 0x80,
        u8::from(exception),
    ]
}

/// 在 TCP 连接与 tokio-modbus 之间插入帧预检，返回交给 tokio-modbus 的一端
pub fn guard_connection(
    stream: TcpStream,
    peer: SocketAddr,
    mut shutdown: watch::Receiver<bool>,
) -> DuplexStream {
    let (modbus_side, relay_side) = tokio::io::duplex(PIPE_CAPACITY);
    tokio::spawn(async move {
        tokio::select! {
            result = relay(stream, relay_side) => {
                if let Err(err) = result {
                    debug!(peer = %peer, error = %err, "modbus connection closed");
                }
            }
            _ = shutdown.changed() => {}
        }
    });
    modbus_side
}

/// 逐帧读取客户端请求并应答，直到客户端断开或帧头不可解码
pub async fn relay<C, M>(mut client: C, mut modbus: M) -> io::Result<()>
where
    C: AsyncRead + AsyncWrite + Unpin,
    M: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let mut header = [0u8; MBAP_HEADER_LEN];
        match client.read_exact(&mut header).await {
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(err) => return Err(err),
        }
        let Some(len) = pdu_len(&header) else {
            warn!(header = ?header, "undecodable MBAP header, closing connection");
            return Ok(());
        };
        let mut pdu = vec![0u8; len];
        client.read_exact(&mut pdu).await?;

        match check_pdu(&pdu) {
            Ok(()) => {
                modbus.write_all(&header).await?;
                modbus.write_all(&pdu).await?;
                let response = read_adu(&mut modbus).await?;
                client.write_all(&response).await?;
            }
            Err(exception) => {
                record_exception_response();
                warn!(
                    function = pdu[0],
                    pdu_len = len,
                    exception = ?exception,
                    "malformed modbus request"
                );
                client
                    .write_all(&exception_adu(&header, pdu[0], exception))
                    .await?;
            }
        }
    }
}

/// 读取一个完整的应答 ADU
async fn read_adu<M>(modbus: &mut M) -> io::Result<Vec<u8>>
where
    M: AsyncRead + Unpin,
{
    let mut adu = vec![0u8; MBAP_HEADER_LEN];
    modbus.read_exact(&mut adu).await?;
    let length = usize::from(u16::from_be_bytes([adu[4], adu[5]]));
    if length == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "empty modbus response",
        ));
    }
    adu.resize(MBAP_HEADER_LEN + length - 1, 0);
    modbus.read_exact(&mut adu[MBAP_HEADER_LEN..]).await?;
    Ok(adu)
}
