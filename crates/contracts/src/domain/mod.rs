pub mod a001_category;
pub mod a002_subcategory;
pub mod a003_prospect;
pub mod a004_pendency;
pub mod common;
