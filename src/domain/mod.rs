pub mod difference;
pub mod fingerprint;
pub mod outcome;
pub mod pair;
pub mod path;
pub mod ports;
pub mod report;
pub mod rules;
pub mod text_diff;
