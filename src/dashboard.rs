//! Loaded data, precomputed summaries and the selection state machine.
//!
//! A `Dashboard` is built once at startup and never mutated afterwards.
//! Every view is a pure function of the dashboard and a `Selections` value.

use crate::aggregator::{
    aggregate, partition, top_n, AggregateRecord, GroupedSummary, AD_SPEND_RULES, ELECTION_RULES,
};
use crate::charts::ChartSpec;
use crate::config::{ALL_LABEL, DASHBOARD_TITLE, TOP_ADVERTISERS};
use crate::types::{AdRecord, AdvertiserRow, ElectionRecord, Field, GroupSummaryRow};
use crate::util::format_value;
use crate::view::{resolve_view, Scope, Series, SeriesRow};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;

fn by_state(r: &ElectionRecord) -> String {
    r.state.clone()
}

fn by_phase(r: &ElectionRecord) -> String {
    r.phase.clone()
}

/// Which of the two independent chart groups a selection drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Slot {
    State,
    Phase,
}

/// A dropdown change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    State(Scope),
    Phase(Scope),
}

/// Current value of both dropdowns. Both start at `All`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selections {
    pub state: Scope,
    pub phase: Scope,
}

impl Selections {
    /// Replace one selection and report which slot needs redrawing. The other
    /// selection is left untouched.
    pub fn apply(&mut self, event: SelectionEvent) -> Slot {
        match event {
            SelectionEvent::State(scope) => {
                self.state = scope;
                Slot::State
            }
            SelectionEvent::Phase(scope) => {
                self.phase = scope;
                Slot::Phase
            }
        }
    }

    pub fn get(&self, slot: Slot) -> &Scope {
        match slot {
            Slot::State => &self.state,
            Slot::Phase => &self.phase,
        }
    }
}

/// The charts rendered for one slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub slot: Slot,
    pub selection: String,
    pub charts: Vec<ChartSpec>,
    /// Shown instead of charts when the selection is unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSnapshot {
    pub title: &'static str,
    pub generated_at: DateTime<Utc>,
    pub top_advertisers: ChartSpec,
    pub state: View,
    pub phase: View,
}

#[derive(Debug)]
pub struct Dashboard {
    top_advertisers: Vec<(String, AggregateRecord)>,
    states: GroupedSummary<String>,
    state_subsets: HashMap<String, Vec<ElectionRecord>>,
    phases: GroupedSummary<String>,
    phase_subsets: HashMap<String, Vec<ElectionRecord>>,
}

impl Dashboard {
    pub fn build(ads: &[AdRecord], results: &[ElectionRecord]) -> Self {
        let top_advertisers = top_n(
            ads,
            |r: &AdRecord| r.page_name.clone(),
            AD_SPEND_RULES,
            Field::AmountSpent,
            TOP_ADVERTISERS,
        );
        let states = aggregate(results, by_state, ELECTION_RULES);
        let phases = aggregate(results, by_phase, ELECTION_RULES);
        info!(
            "Dashboard ready: {} advertisers ranked, {} states, {} phases",
            top_advertisers.len(),
            states.len(),
            phases.len()
        );
        Dashboard {
            top_advertisers,
            states,
            state_subsets: partition(results, by_state),
            phases,
            phase_subsets: partition(results, by_phase),
        }
    }

    /// `All` followed by every state in first-occurrence order.
    pub fn state_options(&self) -> Vec<String> {
        options(&self.states)
    }

    /// `All` followed by every phase in first-occurrence order.
    pub fn phase_options(&self) -> Vec<String> {
        options(&self.phases)
    }

    pub fn state_summary(&self) -> &GroupedSummary<String> {
        &self.states
    }

    pub fn phase_summary(&self) -> &GroupedSummary<String> {
        &self.phases
    }

    pub fn top_advertisers(&self) -> &[(String, AggregateRecord)] {
        &self.top_advertisers
    }

    pub fn advertiser_chart(&self) -> ChartSpec {
        let series = Series {
            rows: self
                .top_advertisers
                .iter()
                .map(|(page, record)| SeriesRow {
                    label: page.clone(),
                    record: record.clone(),
                })
                .collect(),
            missing: None,
        };
        ChartSpec::new(
            "top-advertisers",
            format!("Top {} Advertisers by Ad Spend", TOP_ADVERTISERS),
            Field::AmountSpent,
        )
        .with_x_title("Page Name")
        .with_y_title("Amount Spent (INR)")
        .with_series(&series)
    }

    pub fn render(&self, slot: Slot, selections: &Selections) -> View {
        match slot {
            Slot::State => self.state_view(&selections.state),
            Slot::Phase => self.phase_view(&selections.phase),
        }
    }

    pub fn state_view(&self, scope: &Scope) -> View {
        let series = resolve_view(scope, &self.states, &self.state_subsets, None, ELECTION_RULES);
        match scope {
            Scope::All => slot_view(Slot::State, scope, &series, "State", " (All States)", true),
            Scope::Key(state) => slot_view(
                Slot::State,
                scope,
                &series,
                "Parliamentary Constituency",
                &format!(" - {}", state),
                false,
            ),
        }
    }

    pub fn phase_view(&self, scope: &Scope) -> View {
        let secondary: &dyn Fn(&ElectionRecord) -> String = &by_state;
        let series = resolve_view(
            scope,
            &self.phases,
            &self.phase_subsets,
            Some(secondary),
            ELECTION_RULES,
        );
        match scope {
            Scope::All => slot_view(Slot::Phase, scope, &series, "Phase", " (All Phases)", true),
            Scope::Key(phase) => slot_view(
                Slot::Phase,
                scope,
                &series,
                "State",
                &format!(" - Phase {}", phase),
                true,
            ),
        }
    }

    pub fn snapshot(&self, selections: &Selections, generated_at: DateTime<Utc>) -> DashboardSnapshot {
        DashboardSnapshot {
            title: DASHBOARD_TITLE,
            generated_at,
            top_advertisers: self.advertiser_chart(),
            state: self.render(Slot::State, selections),
            phase: self.render(Slot::Phase, selections),
        }
    }

    pub fn advertiser_rows(&self) -> Vec<AdvertiserRow> {
        self.top_advertisers
            .iter()
            .enumerate()
            .map(|(idx, (page, record))| AdvertiserRow {
                rank: idx + 1,
                page_name: page.clone(),
                amount_spent: format_value(record.get(Field::AmountSpent), false),
                number_of_ads: format_value(record.get(Field::NumberOfAds), true),
            })
            .collect()
    }
}

/// Render a grouped summary as table rows.
pub fn summary_rows(summary: &GroupedSummary<String>) -> Vec<GroupSummaryRow> {
    summary
        .iter()
        .map(|(key, record)| GroupSummaryRow {
            group: key.clone(),
            total_electors: format_value(record.get(Field::TotalElectors), true),
            polled_pct: format_value(record.get(Field::PolledPct), false),
            total_votes: format_value(record.get(Field::TotalVotes), true),
            amount_spent: format_value(record.get(Field::AmountSpent), false),
        })
        .collect()
}

fn options(summary: &GroupedSummary<String>) -> Vec<String> {
    std::iter::once(ALL_LABEL.to_string())
        .chain(summary.keys().cloned())
        .collect()
}

fn slot_view(
    slot: Slot,
    scope: &Scope,
    series: &Series,
    x_title: &str,
    suffix: &str,
    with_spend: bool,
) -> View {
    let selection = scope.label().to_string();
    if let Some(missing) = &series.missing {
        warn!("{:?} selection '{}' not found, rendering placeholder", slot, missing);
        return View {
            slot,
            selection,
            charts: Vec::new(),
            placeholder: Some(format!("No data for '{}'", missing)),
        };
    }

    let prefix = match slot {
        Slot::State => "state",
        Slot::Phase => "phase",
    };
    let mut charts = vec![
        ChartSpec::new(format!("{}-polled", prefix), format!("Votes Polled{}", suffix), Field::PolledPct)
            .with_x_title(x_title)
            .with_y_title("Votes Polled (%)")
            .with_hover(Field::TotalVotes)
            .with_series(series),
        ChartSpec::new(format!("{}-electors", prefix), format!("Total Electors{}", suffix), Field::TotalElectors)
            .with_x_title(x_title)
            .with_series(series),
    ];
    if with_spend {
        charts.push(
            ChartSpec::new(
                format!("{}-spend", prefix),
                format!("Total Amount Spent On Ads{}", suffix),
                Field::AmountSpent,
            )
            .with_x_title(x_title)
            .with_series(series),
        );
    }
    debug!("{:?} view for '{}': {} charts, {} bars each", slot, selection, charts.len(), series.len());

    View {
        slot,
        selection,
        charts,
        placeholder: None,
    }
}
