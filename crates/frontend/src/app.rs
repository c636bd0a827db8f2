use crate::dashboards::CampusPulseDashboard;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <CampusPulseDashboard />
    }
}
