pub mod censor;
pub mod preview;
