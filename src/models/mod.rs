pub mod cutoff;
pub mod execution;
