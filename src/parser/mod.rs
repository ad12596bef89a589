pub mod backup_sheet;
pub mod capacity;
