pub mod api;
pub mod export;
pub mod inject;
pub mod ui;

/// Delay before the export buttons are added to the filter section
pub const INJECT_DELAY_MS: u32 = 1_000;

/// One-time delay before auto-refresh is switched on after page load
pub const AUTO_REFRESH_DELAY_MS: u32 = 60_000;

/// Auto-refresh period once it is running
pub const AUTO_REFRESH_INTERVAL_MS: u32 = 60_000;

/// Marker of the element that receives the export buttons
pub const FILTER_SECTION_SELECTOR: &str = ".filter-section";

/// Class of the injected button group
pub const EXPORT_SECTION_CLASS: &str = "export-section";

/// Deferred work scheduled when the dashboard mounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoadStep {
    InjectExportButtons,
    StartAutoRefresh { interval_ms: u32 },
}

/// Page-load steps with their delays, in firing order
pub fn page_load_plan() -> [(u32, PageLoadStep); 2] {
    [
        (INJECT_DELAY_MS, PageLoadStep::InjectExportButtons),
        (
            AUTO_REFRESH_DELAY_MS,
            PageLoadStep::StartAutoRefresh {
                interval_ms: AUTO_REFRESH_INTERVAL_MS,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_load_plan() {
        assert_eq!(
            page_load_plan(),
            [
                (1_000, PageLoadStep::InjectExportButtons),
                (60_000, PageLoadStep::StartAutoRefresh { interval_ms: 60_000 }),
            ]
        );
    }

    #[test]
    fn test_page_load_steps_fire_in_order() {
        let plan = page_load_plan();
        assert!(plan.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }
}
