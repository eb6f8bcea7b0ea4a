pub mod aggregate;
pub mod contract_nature;
pub mod numbering;
