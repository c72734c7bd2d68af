pub mod observable;
pub mod time_utils;
