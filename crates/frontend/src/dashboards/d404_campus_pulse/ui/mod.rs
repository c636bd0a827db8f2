pub mod dashboard;

pub use dashboard::CampusPulseDashboard;
