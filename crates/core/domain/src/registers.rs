//! 模拟设备寄存器地址表。

/// 采样起始地址（保持寄存器）。
pub const SAMPLE_START_ADDRESS: u16 = 100;
/// 采样寄存器数量。
pub const SAMPLE_REGISTER_COUNT: u16 = 4;

/// 各字段所在的保持寄存器地址。
pub const TEMPERATURE_ADDRESS: u16 = SAMPLE_START_ADDRESS;
pub const OIL_LEVEL_ADDRESS: u16 = SAMPLE_START_ADDRESS + 1;
pub const CYCLE_COUNT_ADDRESS: u16 = SAMPLE_START_ADDRESS + 2;
pub const STOPS_ADDRESS: u16 = SAMPLE_START_ADDRESS + 3;

/// 寄存器地址空间（Modbus 四类数据区）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterBank {
    DiscreteInputs,
    Coils,
    HoldingRegisters,
    InputRegisters,
}

impl RegisterBank {
    pub const ALL: [RegisterBank; 4] = [
        RegisterBank::DiscreteInputs,
        RegisterBank::Coils,
        RegisterBank::HoldingRegisters,
        RegisterBank::InputRegisters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegisterBank::DiscreteInputs => "discrete_inputs",
            RegisterBank::Coils => "coils",
            RegisterBank::HoldingRegisters => "holding_registers",
            RegisterBank::InputRegisters => "input_registers",
        }
    }

    /// 数据区在寄存器表中的下标。
    pub fn index(&self) -> usize {
        match self {
            RegisterBank::DiscreteInputs => 0,
            RegisterBank::Coils => 1,
            RegisterBank::HoldingRegisters => 2,
            RegisterBank::InputRegisters => 3,
        }
    }
}

impl std::fmt::Display for RegisterBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
