use crate::dashboards::d404_campus_pulse::api::{self, FilterOptions};
use crate::dashboards::d404_campus_pulse::export::ExportController;
use crate::dashboards::d404_campus_pulse::inject::inject_export_buttons;
use crate::dashboards::d404_campus_pulse::{
    page_load_plan, PageLoadStep, AUTO_REFRESH_INTERVAL_MS,
};
use crate::shared::components::ui::select::Select;
use crate::shared::date_utils::format_date_range;
use crate::shared::export::ExportFormat;
use crate::shared::refresh::{IntervalTicker, RefreshScheduler};
use chrono::Local;
use contracts::dashboards::d404_campus_pulse::{
    DashboardSummary, FacilityMetrics, FilteredDataQuery, Insight, MajorMetrics, OverallMetrics,
    TimeMetrics, TrendAnalysis, YearMetrics,
};
use std::collections::BTreeMap;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Campus Pulse satisfaction dashboard
#[component]
pub fn CampusPulseDashboard() -> impl IntoView {
    let filters = RwSignal::new(FilteredDataQuery::default());
    let (options, set_options) = signal(FilterOptions::default());

    // Data state
    let (summary, set_summary) = signal(None::<DashboardSummary>);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let (refreshed_at, set_refreshed_at) = signal(None::<String>);
    let (auto_refresh, set_auto_refresh) = signal(false);

    let load_dashboard_data = move || {
        set_loading.set(true);
        set_error.set(None);
        let query = filters.get_untracked();

        spawn_local(async move {
            match api::get_dashboard_summary(&query).await {
                Ok(data) => {
                    set_summary.set(Some(data));
                    set_refreshed_at.set(Some(Local::now().format("%H:%M:%S").to_string()));
                }
                Err(e) => {
                    log::error!("Failed to load D404 dashboard summary: {}", e);
                    set_error.set(Some(e.to_string()));
                }
            }
            set_loading.set(false);
        });
    };

    // Scheduler holds a JS timer, keep it on this thread only
    let scheduler = StoredValue::new_local(RefreshScheduler::new(
        IntervalTicker,
        load_dashboard_data,
    ));

    on_cleanup(move || {
        scheduler.try_update_value(|s| s.stop());
    });

    // Reload when filters change (and once on mount)
    Effect::new(move |_| {
        filters.track();
        load_dashboard_data();
    });

    // Load filter options on mount
    Effect::new(move |_| {
        spawn_local(async move {
            match api::get_filter_options().await {
                Ok(loaded) => set_options.set(loaded),
                Err(err) => log::error!("Failed to load D404 filter options: {}", err),
            }
        });
    });

    // Page-load timers: export buttons after 1s, auto-refresh after 1 min
    Effect::new(move |_| {
        for (delay_ms, step) in page_load_plan() {
            spawn_local(async move {
                TimeoutFuture::new(delay_ms).await;
                match step {
                    PageLoadStep::InjectExportButtons => {
                        let on_export = move |format: ExportFormat| {
                            let query = filters.get_untracked();
                            spawn_local(async move {
                                ExportController::browser().export(format, &query).await;
                            });
                        };
                        match inject_export_buttons(on_export) {
                            Ok(outcome) => log::debug!("Export buttons: {:?}", outcome),
                            Err(e) => log::warn!("Failed to inject export buttons: {:?}", e),
                        }
                    }
                    PageLoadStep::StartAutoRefresh { interval_ms } => {
                        let started = scheduler
                            .try_update_value(|s| s.auto_start(interval_ms))
                            .unwrap_or(false);
                        if started {
                            set_auto_refresh.set(true);
                        }
                    }
                }
            });
        }
    });

    let toggle_auto_refresh = move |_| {
        let running = scheduler
            .try_update_value(|s| s.toggle(AUTO_REFRESH_INTERVAL_MS))
            .unwrap_or(false);
        set_auto_refresh.set(running);
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Campus Pulse"</h1>
                </div>
                <div class="page__header-right">
                    {move || refreshed_at.get().map(|t| view! {
                        <span class="page__subtitle">"Updated " {t}</span>
                    })}
                    <button
                        class="button button--secondary"
                        on:click=move |_| load_dashboard_data()
                        disabled=move || loading.get()
                    >
                        "Refresh"
                    </button>
                    <button class="button button--secondary" on:click=toggle_auto_refresh>
                        {move || if auto_refresh.get() { "Stop auto-refresh" } else { "Start auto-refresh" }}
                    </button>
                </div>
            </div>

            <div class="filter-section">
                <Select
                    label="Facility"
                    value=Signal::derive(move || filters.with(|q| q.facility.clone().unwrap_or_default()))
                    options=Signal::derive(move || options.get().facilities)
                    on_change=filter_setter(filters, |q, v| q.facility = v)
                />
                <Select
                    label="Academic year"
                    value=Signal::derive(move || filters.with(|q| q.year.clone().unwrap_or_default()))
                    options=Signal::derive(move || options.get().years)
                    on_change=filter_setter(filters, |q, v| q.year = v)
                />
                <Select
                    label="Major"
                    value=Signal::derive(move || filters.with(|q| q.major.clone().unwrap_or_default()))
                    options=Signal::derive(move || options.get().majors)
                    on_change=filter_setter(filters, |q, v| q.major = v)
                />
                <Select
                    label="Score"
                    value=Signal::derive(move || filters.with(|q| q.score_range.clone().unwrap_or_default()))
                    options=Signal::derive(|| vec!["1-2".to_string(), "3-3".to_string(), "4-5".to_string()])
                    on_change=filter_setter(filters, |q, v| q.score_range = v)
                />
            </div>

            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            {move || summary.get().map(|s| view! { <SummaryView summary=s /> })}
        </div>
    }
}

/// Callback writing one select's value into the filter query
fn filter_setter(
    filters: RwSignal<FilteredDataQuery>,
    apply: fn(&mut FilteredDataQuery, Option<String>),
) -> Callback<String> {
    Callback::new(move |value: String| {
        let value = Some(value).filter(|v| !v.is_empty());
        filters.update(|q| apply(q, value));
    })
}

#[component]
fn SummaryView(summary: DashboardSummary) -> impl IntoView {
    let DashboardSummary {
        overall,
        facilities,
        years,
        majors,
        time_analysis,
        trends,
        insights,
    } = summary;
    let year_rows: Vec<GroupRow> = years.into_iter().map(YearMetrics::into_row).collect();
    let major_rows: Vec<GroupRow> = majors.into_iter().map(MajorMetrics::into_row).collect();

    view! {
        <MetricsSummary metrics=overall />
        <InsightCards insights=insights />
        <div class="summary-tables">
            <FacilityTable facilities=facilities />
            <GroupTable title="Academic years" rows=year_rows />
            <GroupTable title="Top majors" rows=major_rows />
        </div>
        <div class="summary-lists">
            <TimeOfDayList time_analysis=time_analysis />
            <TrendList trends=trends />
        </div>
    }
}

#[component]
fn MetricsSummary(metrics: OverallMetrics) -> impl IntoView {
    let period = format_date_range(&metrics.date_range);
    let scores = metrics
        .score_distribution
        .iter()
        .map(|(score, count)| view! { <li>{format!("{}: {}", score, count)}</li> })
        .collect_view();
    let categories = metrics
        .category_distribution
        .iter()
        .map(|(category, count)| view! { <li>{format!("{}: {}", category, count)}</li> })
        .collect_view();

    view! {
        <div class="summary-cards">
            <div class="summary-card">
                <div class="summary-card__label">"Total ratings"</div>
                <div class="summary-card__value">{metrics.total_ratings}</div>
            </div>
            <div class="summary-card">
                <div class="summary-card__label">"Average score"</div>
                <div class="summary-card__value">{format!("{:.2}", metrics.average_score)}</div>
            </div>
            <div class="summary-card">
                <div class="summary-card__label">"Median / std"</div>
                <div class="summary-card__value">
                    {format!("{:.2} / {:.2}", metrics.median_score, metrics.std_deviation)}
                </div>
            </div>
            <div class="summary-card">
                <div class="summary-card__label">"Facilities"</div>
                <div class="summary-card__value">{metrics.facilities_count}</div>
            </div>
            <div class="summary-card">
                <div class="summary-card__label">"Period"</div>
                <div class="summary-card__value">{period}</div>
            </div>
        </div>
        <div class="summary-lists">
            <ul class="summary-list">{scores}</ul>
            <ul class="summary-list">{categories}</ul>
        </div>
    }
}

#[component]
fn InsightCards(insights: Vec<Insight>) -> impl IntoView {
    let cards = insights
        .into_iter()
        .map(|insight| {
            view! {
                <div class="insight-card">
                    <div class="insight-card__title">{insight.title}</div>
                    <div class="insight-card__value">{format!("{:.2}", insight.value)}</div>
                    <div class="insight-card__text">{insight.description}</div>
                    <div class="insight-card__hint">{insight.recommendation}</div>
                </div>
            }
        })
        .collect_view();

    view! { <div class="insight-cards">{cards}</div> }
}

#[component]
fn FacilityTable(facilities: Vec<FacilityMetrics>) -> impl IntoView {
    let rows = facilities
        .into_iter()
        .map(|f| {
            view! {
                <tr>
                    <td>{f.rank}</td>
                    <td>{f.facility}</td>
                    <td>{f.total_ratings}</td>
                    <td>{format!("{:.2}", f.average_score)}</td>
                    <td>{format!("{:.2}", f.std_deviation)}</td>
                    <td>{format!("{} - {}", f.min_score, f.max_score)}</td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <table class="table">
            <thead>
                <tr>
                    <th>"#"</th>
                    <th>"Facility"</th>
                    <th>"Ratings"</th>
                    <th>"Average"</th>
                    <th>"Std"</th>
                    <th>"Range"</th>
                </tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>
    }
}

/// One line of a year/major breakdown
struct GroupRow {
    name: String,
    total_ratings: usize,
    average_score: f64,
    std_deviation: f64,
}

trait IntoGroupRow {
    fn into_row(self) -> GroupRow;
}

impl IntoGroupRow for YearMetrics {
    fn into_row(self) -> GroupRow {
        GroupRow {
            name: self.academic_year,
            total_ratings: self.total_ratings,
            average_score: self.average_score,
            std_deviation: self.std_deviation,
        }
    }
}

impl IntoGroupRow for MajorMetrics {
    fn into_row(self) -> GroupRow {
        GroupRow {
            name: self.major,
            total_ratings: self.total_ratings,
            average_score: self.average_score,
            std_deviation: self.std_deviation,
        }
    }
}

#[component]
fn GroupTable(title: &'static str, rows: Vec<GroupRow>) -> impl IntoView {
    let rows = rows
        .into_iter()
        .map(|row| {
            view! {
                <tr>
                    <td>{row.name}</td>
                    <td>{row.total_ratings}</td>
                    <td>{format!("{:.2}", row.average_score)}</td>
                    <td>{format!("{:.2}", row.std_deviation)}</td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <table class="table">
            <thead>
                <tr>
                    <th>{title}</th>
                    <th>"Ratings"</th>
                    <th>"Average"</th>
                    <th>"Std"</th>
                </tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>
    }
}

#[component]
fn TimeOfDayList(time_analysis: BTreeMap<String, TimeMetrics>) -> impl IntoView {
    let items = time_analysis
        .into_iter()
        .map(|(period, m)| {
            view! {
                <li>{format!("{}: {:.2} ({} ratings)", period, m.average_score, m.total_ratings)}</li>
            }
        })
        .collect_view();

    view! { <ul class="summary-list">{items}</ul> }
}

#[component]
fn TrendList(trends: TrendAnalysis) -> impl IntoView {
    let items = trends
        .labels
        .into_iter()
        .zip(trends.scores)
        .map(|(month, score)| view! { <li>{format!("{}: {:.2}", month, score)}</li> })
        .collect_view();

    view! { <ul class="summary-list">{items}</ul> }
}
