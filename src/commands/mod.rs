pub mod export;
pub mod import;
pub mod latest;
pub mod plan;
