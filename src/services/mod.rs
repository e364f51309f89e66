// Service exports
pub mod dataset;

pub use dataset::{CsvDataset, IngestError, IngestLimits, apply_availability, parse_freelancers, parse_projects, weekday_for_project};
