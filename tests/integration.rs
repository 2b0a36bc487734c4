use election_dashboard::dashboard::{Dashboard, SelectionEvent, Selections, Slot};
use election_dashboard::loader::{load_advertisers, load_election_results};
use election_dashboard::types::Field;
use election_dashboard::view::Scope;
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "{}", contents).unwrap();
    tmp
}

fn load_dashboard() -> Dashboard {
    let ads = csv_file(
        "Page name,Disclaimer,Amount spent (INR),Number of ads in Library\n\
         Party One,Paid by One,500000,120\n\
         Party Two,Paid by Two,≤100,3\n\
         Party Three,Paid by Three,900000,40\n\
         Party One,Paid by One,250000,30\n",
    );
    let results = csv_file(
        "State,PC_Name,Total Electors,Polled (%),Total Votes,Phase,Amount spent (INR)\n\
         A,A-1,100,50.0,50,1,7000\n\
         A,A-2,200,70.0,140,2,7000\n\
         B,B-1,300,60.0,180,1,3000\n",
    );
    let (ads, _) = load_advertisers(ads.path()).unwrap();
    let (results, _) = load_election_results(results.path()).unwrap();
    Dashboard::build(&ads, &results)
}

#[test]
fn test_state_summary_from_files() {
    let dashboard = load_dashboard();
    let states = dashboard.state_summary();
    let a = states.get(&"A".to_string()).unwrap();
    assert_eq!(a.get(Field::TotalElectors), Some(300.0));
    assert_eq!(a.get(Field::PolledPct), Some(60.0));
    assert_eq!(a.get(Field::TotalVotes), Some(190.0));
    let b = states.get(&"B".to_string()).unwrap();
    assert_eq!(b.get(Field::TotalElectors), Some(300.0));
    assert_eq!(b.get(Field::PolledPct), Some(60.0));
    assert_eq!(b.get(Field::TotalVotes), Some(180.0));
}

#[test]
fn test_top_advertisers_from_files() {
    let dashboard = load_dashboard();
    let chart = dashboard.advertiser_chart();
    let bars: Vec<(&str, Option<f64>)> = chart.bars.iter().map(|b| (b.x.as_str(), b.y)).collect();
    // Party Two's spend was unparseable, so it sums to zero rather than failing the load
    assert_eq!(
        bars,
        vec![
            ("Party Three", Some(900000.0)),
            ("Party One", Some(750000.0)),
            ("Party Two", Some(0.0)),
        ]
    );
}

#[test]
fn test_selection_cycle() {
    let dashboard = load_dashboard();
    let mut selections = Selections::default();
    assert_eq!(dashboard.render(Slot::State, &selections).charts.len(), 3);

    let slot = selections.apply(SelectionEvent::Phase(Scope::parse("1")));
    let view = dashboard.render(slot, &selections);
    let states: Vec<&str> = view.charts[0].bars.iter().map(|b| b.x.as_str()).collect();
    assert_eq!(states, vec!["A", "B"]);

    let slot = selections.apply(SelectionEvent::State(Scope::parse("Z")));
    let view = dashboard.render(slot, &selections);
    assert!(view.charts.is_empty());
    assert!(view.placeholder.is_some());
}

#[test]
fn test_snapshot_serializes() {
    let dashboard = load_dashboard();
    let snapshot = dashboard.snapshot(&Selections::default(), chrono::Utc::now());
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["title"], "General Election 2024 Dashboard");
    assert_eq!(json["state"]["selection"], "All");
    assert_eq!(json["phase"]["charts"].as_array().unwrap().len(), 3);
}
