#[macro_use]
pub mod measure_time;
