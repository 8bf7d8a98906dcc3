mod weather_reading;

pub use weather_reading::*;
