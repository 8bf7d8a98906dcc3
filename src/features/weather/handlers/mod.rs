mod weather_handler;

pub use weather_handler::*;
