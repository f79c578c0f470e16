use crate::registers::SAMPLE_REGISTER_COUNT;

/// 一次采样：保持寄存器 100–103 的读数。
///
/// 字段顺序即寄存器顺序（temperature, oil_level, cycle_count, stops）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sample {
    pub temperature: u16,
    pub oil_level: u16,
    pub cycle_count: u16,
    pub stops: u16,
}

impl Sample {
    pub fn new(temperature: u16, oil_level: u16, cycle_count: u16, stops: u16) -> Self {
        Self {
            temperature,
            oil_level,
            cycle_count,
            stops,
        }
    }

    /// 从寄存器读数构造采样；数量不等于 4 时返回 None。
    pub fn from_registers(registers: &[u16]) -> Option<Self> {
        match registers {
            [temperature, oil_level, cycle_count, stops] => Some(Self::new(
                *temperature,
                *oil_level,
                *cycle_count,
                *stops,
            )),
            _ => None,
        }
    }

    /// 按寄存器顺序展开。
    pub fn to_registers(&self) -> [u16; SAMPLE_REGISTER_COUNT as usize] {
        [self.temperature, self.oil_level, self.cycle_count, self.stops]
    }
}
