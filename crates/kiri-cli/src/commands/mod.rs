pub mod config_ops;
pub mod features_ops;
pub mod tokenize_ops;
