use plc_config::AppConfig;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn defaults_match_legacy_deployment() {
    for key in [
        "PLC_HTTP_ADDR",
        "PLC_MODBUS_HOST",
        "PLC_MODBUS_PORT",
        "MODBUS_SERVER_IP",
        "MODBUS_SERVER_PORT",
        "PLC_MODBUS_LISTEN_ADDR",
        "PLC_SIMULATOR_HTTP_ADDR",
        "PLC_MODBUS_UNIT_ID",
        "PLC_LOG_PATH",
        "PLC_POLL_INTERVAL_SECS",
        "PLC_GENERATOR_INTERVAL_MS",
        "PLC_CONNECT_TIMEOUT_MS",
        "PLC_READ_TIMEOUT_MS",
        "PLC_PROBE_TIMEOUT_MS",
        "PLC_EMBEDDED_SIMULATOR",
    ] {
        unsafe {
            std::env::remove_var(key);
        }
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8000");
    assert_eq!(config.modbus_host, "127.0.0.1");
    assert_eq!(config.modbus_port, 5020);
    assert_eq!(config.modbus_listen_addr, "0.0.0.0:5020");
    assert_eq!(config.simulator_http_addr, "0.0.0.0:8080");
    assert_eq!(config.modbus_unit_id, 1);
    assert_eq!(config.log_path, PathBuf::from("modbus_data.csv"));
    assert_eq!(config.poll_interval(), Duration::from_secs(30));
    assert_eq!(config.generator_interval(), Duration::from_secs(1));
    assert_eq!(config.connect_timeout(), Duration::from_millis(3000));
    assert_eq!(config.read_timeout(), Duration::from_millis(3000));
    assert_eq!(config.probe_timeout(), Duration::from_millis(2000));
    assert!(!config.embedded_simulator);
}
