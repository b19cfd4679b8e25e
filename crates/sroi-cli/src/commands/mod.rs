pub mod scenarios;
pub mod sroi;
