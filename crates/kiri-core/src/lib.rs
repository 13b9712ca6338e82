pub mod dict;
pub mod lattice;
pub mod segmenter;
pub mod settings;
pub mod token;
pub mod unicode;
