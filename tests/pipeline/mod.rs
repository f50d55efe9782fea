pub mod modules;
pub mod ordering;
pub mod stages;
