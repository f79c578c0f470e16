//! 寄存器表
//!
//! 每个数据区一把 `RwLock`，单次 `set` 在写锁内完成，
//! 因此任何 `get` 都看不到写了一半的多寄存器写入。

use crate::error::RegisterError;
use domain::RegisterBank;
use std::ops::Range;
use std::sync::RwLock;

/// 每个数据区的默认寄存器数量（地址 0..=199，覆盖采样地址 100–103）。
pub const DEFAULT_BANK_SIZE: u16 = 200;

/// 模拟设备寄存器表
pub struct RegisterStore {
    banks: [RwLock<Vec<u16>>; 4],
    bank_size: u16,
}

impl RegisterStore {
    /// 创建默认大小、全部清零的寄存器表
    pub fn new() -> Self {
        Self::with_bank_size(DEFAULT_BANK_SIZE)
    }

    /// 创建指定大小的寄存器表
    pub fn with_bank_size(bank_size: u16) -> Self {
        let zeroed = || RwLock::new(vec![0u16; bank_size as usize]);
        Self {
            banks: [zeroed(), zeroed(), zeroed(), zeroed()],
            bank_size,
        }
    }

    pub fn bank_size(&self) -> u16 {
        self.bank_size
    }

    /// 读取 `count` 个连续寄存器
    pub fn get(
        &self,
        bank: RegisterBank,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>, RegisterError> {
        let range = self.checked_range(bank, address, count as usize)?;
        let values = self.banks[bank.index()]
            .read()
            .map_err(|_| RegisterError::LockPoisoned(bank))?;
        Ok(values[range].to_vec())
    }

    /// 从 `address` 起连续写入 `values`
    pub fn set(
        &self,
        bank: RegisterBank,
        address: u16,
        values: &[u16],
    ) -> Result<(), RegisterError> {
        let range = self.checked_range(bank, address, values.len())?;
        let mut registers = self.banks[bank.index()]
            .write()
            .map_err(|_| RegisterError::LockPoisoned(bank))?;
        registers[range].copy_from_slice(values);
        Ok(())
    }

    fn checked_range(
        &self,
        bank: RegisterBank,
        address: u16,
        count: usize,
    ) -> Result<Range<usize>, RegisterError> {
        let start = address as usize;
        let end = start.saturating_add(count);
        if count == 0 || end > self.bank_size as usize {
            return Err(RegisterError::OutOfRange {
                bank,
                address,
                count,
            });
        }
        Ok(start..end)
    }
}

impl Default for RegisterStore {
    fn default() -> Self {
        Self::new()
    }
}
