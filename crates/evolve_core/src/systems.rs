pub mod behavior;
pub mod metabolism;
pub mod reproduction;
pub mod stats;
