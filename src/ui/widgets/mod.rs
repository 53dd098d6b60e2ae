//! Custom widgets shared by the screens

pub mod temperature_chart;

pub use temperature_chart::TemperatureChart;
