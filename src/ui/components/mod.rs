pub mod menu;
pub mod stats_table;
pub mod summary;
pub mod typing_area;
