pub mod config;
pub mod demo_loader;
pub mod export;
pub mod fake_demo;
pub mod selection;
pub mod stats;
pub mod tables;
pub mod view;
