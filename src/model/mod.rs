pub mod config;
pub mod data_core;
pub mod node;
pub mod normalize;
pub mod outline;
pub mod performance;
pub mod settings;
pub mod tree_ops;
