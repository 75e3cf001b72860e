//! Line-oriented widgets shared by the dashboard tabs.

pub mod bar;
pub mod filter_panel;
pub mod header;
