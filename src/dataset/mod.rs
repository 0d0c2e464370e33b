pub mod builder;
pub mod consistency;
pub mod flat_row;
pub mod image_report;
pub mod row_packer;
pub mod table;
