#![allow(dead_code)]

pub mod mock_adapter;
pub mod strategies;

pub use mock_adapter::*;
pub use strategies::*;
