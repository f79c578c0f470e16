//! 数值发生器
//!
//! 周期性向保持寄存器 100–103 写入随机读数，模拟传感器漂移。

use crate::error::RegisterError;
use crate::register_store::RegisterStore;
use domain::{RegisterBank, SAMPLE_START_ADDRESS, Sample};
use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

/// 温度（℃）
pub const TEMPERATURE_RANGE: RangeInclusive<u16> = 20..=100;
/// 油位（%）
pub const OIL_LEVEL_RANGE: RangeInclusive<u16> = 0..=100;
/// 循环次数
pub const CYCLE_COUNT_RANGE: RangeInclusive<u16> = 100..=10_000;
/// 停机次数
pub const STOPS_RANGE: RangeInclusive<u16> = 0..=50;

/// 按各字段范围独立抽取一组读数
pub fn random_sample<R: Rng>(rng: &mut R) -> Sample {
    Sample::new(
        rng.random_range(TEMPERATURE_RANGE),
        rng.random_range(OIL_LEVEL_RANGE),
        rng.random_range(CYCLE_COUNT_RANGE),
        rng.random_range(STOPS_RANGE),
    )
}

/// 数值发生器（持有寄存器表的共享写句柄）
pub struct ValueGenerator {
    store: Arc<RegisterStore>,
    period: Duration,
}

impl ValueGenerator {
    pub fn new(store: Arc<RegisterStore>, period: Duration) -> Self {
        Self { store, period }
    }

    /// 生成一组读数并一次性写入 100–103
    pub fn tick(&self) -> Result<Sample, RegisterError> {
        let sample = random_sample(&mut rand::rng());
        self.store.set(
            RegisterBank::HoldingRegisters,
            SAMPLE_START_ADDRESS,
            &sample.to_registers(),
        )?;
        Ok(sample)
    }

    /// 运行生成循环，收到停机信号后退出
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(period_ms = self.period.as_millis() as u64, "value generator started");
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => match self.tick() {
                    Ok(sample) => debug!(?sample, "registers updated"),
                    // 地址固定在范围内，走到这里说明寄存器表配置有误
                    Err(err) => error!(error = %err, "value generator write failed"),
                },
                _ = shutdown.changed() => break,
            }
        }

        info!("value generator stopped");
    }
}
