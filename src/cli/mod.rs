pub mod doctor;
pub mod maintenance;
pub mod reset;
pub mod stats;
pub mod track;
