pub mod d404_campus_pulse;

pub use d404_campus_pulse::ui::CampusPulseDashboard;
