pub mod period;
pub mod reading;
