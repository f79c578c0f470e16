use plc_config::{AppConfig, ConfigError};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("PLC_HTTP_ADDR", "127.0.0.1:8081");
        std::env::set_var("MODBUS_SERVER_IP", "10.0.0.5");
        std::env::set_var("MODBUS_SERVER_PORT", "1502");
        std::env::set_var("PLC_LOG_PATH", "/tmp/plc/modbus_data.csv");
        std::env::set_var("PLC_POLL_INTERVAL_SECS", "5");
        std::env::set_var("PLC_EMBEDDED_SIMULATOR", "on");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert_eq!(config.modbus_host, "10.0.0.5");
    assert_eq!(config.modbus_port, 1502);
    assert_eq!(config.log_path, PathBuf::from("/tmp/plc/modbus_data.csv"));
    assert_eq!(config.poll_interval(), Duration::from_secs(5));
    assert!(config.embedded_simulator);

    // PLC_ 前缀优先于旧别名
    unsafe {
        std::env::set_var("PLC_MODBUS_HOST", "192.168.1.20");
        std::env::set_var("PLC_MODBUS_PORT", "502");
    }
    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.modbus_host, "192.168.1.20");
    assert_eq!(config.modbus_port, 502);

    unsafe {
        std::env::set_var("PLC_READ_TIMEOUT_MS", "0");
    }
    let err = AppConfig::from_env().expect_err("zero timeout");
    assert!(matches!(err, ConfigError::Invalid(key, _) if key == "PLC_READ_TIMEOUT_MS"));

    unsafe {
        std::env::set_var("PLC_READ_TIMEOUT_MS", "1500");
        std::env::set_var("PLC_MODBUS_PORT", "not-a-port");
    }
    let err = AppConfig::from_env().expect_err("invalid port");
    assert_eq!(err.to_string(), "invalid value for PLC_MODBUS_PORT: not-a-port");
}
