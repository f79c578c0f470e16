//! 应用运行配置加载。

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub modbus_host: String,
    pub modbus_port: u16,
    pub modbus_listen_addr: String,
    pub simulator_http_addr: String,
    pub modbus_unit_id: u8,
    pub log_path: PathBuf,
    pub poll_interval_secs: u64,
    pub generator_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub probe_timeout_ms: u64,
    pub embedded_simulator: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    ///
    /// `MODBUS_SERVER_IP` / `MODBUS_SERVER_PORT` 作为旧部署的别名仍然生效，
    /// 同时设置时以 `PLC_` 前缀的变量为准。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr = env::var("PLC_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
        let modbus_host = read_optional("PLC_MODBUS_HOST")
            .or_else(|| read_optional("MODBUS_SERVER_IP"))
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let modbus_port = match read_optional("PLC_MODBUS_PORT") {
            Some(_) => read_u16_with_default("PLC_MODBUS_PORT", 5020)?,
            None => read_u16_with_default("MODBUS_SERVER_PORT", 5020)?,
        };
        let modbus_listen_addr =
            env::var("PLC_MODBUS_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:5020".to_string());
        let simulator_http_addr = env::var("PLC_SIMULATOR_HTTP_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let modbus_unit_id = read_u8_with_default("PLC_MODBUS_UNIT_ID", 1)?;
        let log_path = read_optional("PLC_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("modbus_data.csv"));
        let poll_interval_secs = read_positive_u64("PLC_POLL_INTERVAL_SECS", 30)?;
        let generator_interval_ms = read_positive_u64("PLC_GENERATOR_INTERVAL_MS", 1000)?;
        let connect_timeout_ms = read_positive_u64("PLC_CONNECT_TIMEOUT_MS", 3000)?;
        let read_timeout_ms = read_positive_u64("PLC_READ_TIMEOUT_MS", 3000)?;
        let probe_timeout_ms = read_positive_u64("PLC_PROBE_TIMEOUT_MS", 2000)?;
        let embedded_simulator = read_bool_with_default("PLC_EMBEDDED_SIMULATOR", false);

        Ok(Self {
            http_addr,
            modbus_host,
            modbus_port,
            modbus_listen_addr,
            simulator_http_addr,
            modbus_unit_id,
            log_path,
            poll_interval_secs,
            generator_interval_ms,
            connect_timeout_ms,
            read_timeout_ms,
            probe_timeout_ms,
            embedded_simulator,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn generator_interval(&self) -> Duration {
        Duration::from_millis(self.generator_interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

fn read_u16_with_default(key: &str, default: u16) -> Result<u16, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u16>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u8_with_default(key: &str, default: u8) -> Result<u8, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u8>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

/// 读取正整数；0 视为非法（周期与超时不允许为 0）。
fn read_positive_u64(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    match value.parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
