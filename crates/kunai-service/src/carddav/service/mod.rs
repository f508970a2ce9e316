pub mod object;
pub mod report;
