#![doc = include_str!("../readme.md")]

pub mod cloudlet;
pub mod config;
pub mod frequency;
pub mod generator;
pub mod series;
pub mod session;
pub mod vm;
pub mod workload;
