//! Filter-and-aggregate core of the bike sharing dashboard.
//!
//! The GUI binary and the text report are both presenters over
//! [`view::DashboardView`]; nothing in here depends on egui.

pub mod data;
pub mod report;
pub mod stats;
pub mod view;
