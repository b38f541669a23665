pub mod csv_tasks;
pub mod markdown;
