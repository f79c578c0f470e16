pub mod data;
pub mod registers;

pub use data::Sample;
pub use registers::{
    CYCLE_COUNT_ADDRESS, OIL_LEVEL_ADDRESS, RegisterBank, SAMPLE_REGISTER_COUNT,
    SAMPLE_START_ADDRESS, STOPS_ADDRESS, TEMPERATURE_ADDRESS,
};
