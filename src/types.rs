use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Deserialize)]
pub struct RawAdRow {
    #[serde(rename = "Page name")]
    pub page_name: Option<String>,
    #[serde(rename = "Amount spent (INR)")]
    pub amount_spent: Option<String>,
    #[serde(rename = "Number of ads in Library")]
    pub number_of_ads: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawResultRow {
    #[serde(rename = "State")]
    pub state: Option<String>,
    #[serde(rename = "PC_Name")]
    pub pc_name: Option<String>,
    #[serde(rename = "Total Electors")]
    pub total_electors: Option<String>,
    #[serde(rename = "Polled (%)")]
    pub polled_pct: Option<String>,
    #[serde(rename = "Total Votes")]
    pub total_votes: Option<String>,
    #[serde(rename = "Phase")]
    pub phase: Option<String>,
    #[serde(rename = "Amount spent (INR)")]
    pub amount_spent: Option<String>,
}

/// Spend of one advertiser page. Numeric cells that failed to parse are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct AdRecord {
    pub page_name: String,
    pub amount_spent: Option<f64>,
    pub number_of_ads: Option<u64>,
}

/// One parliamentary constituency.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionRecord {
    pub state: String,
    pub constituency: String,
    pub phase: String,
    pub total_electors: Option<u64>,
    pub polled_pct: Option<f64>,
    pub total_votes: Option<u64>,
    pub amount_spent: Option<f64>,
}

/// Numeric columns that can be aggregated or plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    #[serde(rename = "Total Electors")]
    TotalElectors,
    #[serde(rename = "Polled (%)")]
    PolledPct,
    #[serde(rename = "Total Votes")]
    TotalVotes,
    #[serde(rename = "Amount spent (INR)")]
    AmountSpent,
    #[serde(rename = "Number of ads in Library")]
    NumberOfAds,
}

impl Field {
    /// Column header as it appears in the input files.
    pub fn column(self) -> &'static str {
        match self {
            Field::TotalElectors => "Total Electors",
            Field::PolledPct => "Polled (%)",
            Field::TotalVotes => "Total Votes",
            Field::AmountSpent => "Amount spent (INR)",
            Field::NumberOfAds => "Number of ads in Library",
        }
    }

    /// Whether values of this field are whole counts.
    pub fn is_count(self) -> bool {
        matches!(
            self,
            Field::TotalElectors | Field::TotalVotes | Field::NumberOfAds
        )
    }
}

/// A row whose numeric fields can be read by `Field`.
pub trait Record {
    fn value(&self, field: Field) -> Option<f64>;
}

impl Record for ElectionRecord {
    fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::TotalElectors => self.total_electors.map(|v| v as f64),
            Field::PolledPct => self.polled_pct,
            Field::TotalVotes => self.total_votes.map(|v| v as f64),
            Field::AmountSpent => self.amount_spent,
            Field::NumberOfAds => None,
        }
    }
}

impl Record for AdRecord {
    fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::AmountSpent => self.amount_spent,
            Field::NumberOfAds => self.number_of_ads.map(|v| v as f64),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct GroupSummaryRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "TotalElectors")]
    #[tabled(rename = "TotalElectors")]
    pub total_electors: String,
    #[serde(rename = "PolledPct")]
    #[tabled(rename = "PolledPct")]
    pub polled_pct: String,
    #[serde(rename = "TotalVotes")]
    #[tabled(rename = "TotalVotes")]
    pub total_votes: String,
    #[serde(rename = "AmountSpent")]
    #[tabled(rename = "AmountSpent")]
    pub amount_spent: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct AdvertiserRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "PageName")]
    #[tabled(rename = "PageName")]
    pub page_name: String,
    #[serde(rename = "AmountSpent")]
    #[tabled(rename = "AmountSpent")]
    pub amount_spent: String,
    #[serde(rename = "NumberOfAds")]
    #[tabled(rename = "NumberOfAds")]
    pub number_of_ads: String,
}

/// One bar of a chart preview.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct BarPreviewRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Hover")]
    pub hover: String,
}
