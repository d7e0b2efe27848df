pub mod domain;
pub mod error;
pub mod labels;
pub mod protocol;
pub mod region;
