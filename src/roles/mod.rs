pub mod generator;
pub mod producer;
