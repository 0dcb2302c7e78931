use crate::error::CliResult;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use parcelview_core::{NormalizedAddress, ParcelSet, SessionState};
use parcelview_router::{CycleReport, NavigationOutcome, Navigator};
use serde::Serialize;
use std::fmt::Write;

/// Where one navigation left the session
#[derive(Debug, Serialize)]
pub struct Summary {
    pub route: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CycleReport>,
    pub session: SessionState,
    pub address: Option<NormalizedAddress>,
    pub parcels: ParcelSet,
}

impl Summary {
    pub fn capture(navigator: &Navigator, outcome: &NavigationOutcome) -> Self {
        let orchestrator = navigator.orchestrator();
        Self {
            route: navigator.current().to_path(),
            outcome: outcome_label(outcome),
            report: outcome.report().cloned(),
            session: orchestrator.session().snapshot(),
            address: orchestrator.addresses().current().filter(|a| !a.is_empty()),
            parcels: orchestrator.parcels().pwd(),
        }
    }

    /// True when the navigation produced no property to show.
    ///
    /// A clicked parcel whose address the geocoder misses is still a hit.
    pub fn is_miss(&self) -> bool {
        if self.outcome == "aborted" || self.route == "/not-found" {
            return true;
        }
        self.session.current_address.is_none() && !self.parcels.has_features()
    }
}

pub fn outcome_label(outcome: &NavigationOutcome) -> &'static str {
    match outcome {
        NavigationOutcome::Completed(_) => "completed",
        NavigationOutcome::Aborted => "aborted",
        NavigationOutcome::Rejected => "rejected",
    }
}

pub fn render(summary: &Summary, json: bool) -> CliResult<String> {
    if json {
        return Ok(serde_json::to_string_pretty(summary)?);
    }
    Ok(render_human(summary))
}

pub fn render_all(summaries: &[Summary], json: bool) -> CliResult<String> {
    if json {
        return Ok(serde_json::to_string_pretty(summaries)?);
    }
    let blocks: Vec<String> = summaries
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{} {}\n{}", "step".dimmed(), i + 1, render_human(s)))
        .collect();
    Ok(blocks.join("\n"))
}

fn render_human(summary: &Summary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "route:".bold(), summary.route);

    let plan = summary
        .report
        .as_ref()
        .map(|r| format!(" ({})", serde_plain(&r.plan)))
        .unwrap_or_default();
    let outcome = match summary.outcome {
        "completed" => summary.outcome.green(),
        _ => summary.outcome.yellow(),
    };
    let _ = writeln!(out, "{} {outcome}{plan}", "outcome:".bold());

    match summary.session.current_address.as_deref() {
        Some(address) => {
            let _ = writeln!(out, "{} {}", "address:".bold(), address.cyan());
        }
        None => {
            let _ = writeln!(out, "{} {}", "address:".bold(), "none".dimmed());
        }
    }
    if let Some(address) = &summary.address {
        if !address.owner_names.is_empty() {
            let _ = writeln!(out, "{} {}", "owners:".bold(), address.owner_names.join("; "));
        }
        if let Some(account) = &address.account_number {
            let _ = writeln!(out, "{} {account}", "account:".bold());
        }
    }

    match &summary.parcels {
        ParcelSet::Unfetched => {
            let _ = writeln!(out, "{} {}", "parcels:".bold(), "not fetched".dimmed());
        }
        ParcelSet::Empty => {
            let _ = writeln!(out, "{} {}", "parcels:".bold(), "none".dimmed());
        }
        ParcelSet::Found(features) => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["PARCEL", "ADDRESS", "OWNER", "BRT"]);
            for parcel in features {
                let owner = [parcel.owner1.as_deref(), parcel.owner2.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" / ");
                table.add_row(vec![
                    parcel.parcel_identifier.clone().unwrap_or_default(),
                    parcel.address.clone().unwrap_or_default(),
                    owner,
                    parcel.brt_id.clone().unwrap_or_default(),
                ]);
            }
            let _ = writeln!(out, "{}", table);
        }
    }
    out
}

/// Render a unit enum through its serde name
fn serde_plain<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcelview_core::ParcelFeature;
    use parcelview_router::PlanKind;

    fn summary(parcels: ParcelSet) -> Summary {
        Summary {
            route: "/1234%20MARKET%20ST/property?address=1234%20MARKET%20ST".to_string(),
            outcome: "completed",
            report: Some(CycleReport {
                plan: PlanKind::Address,
                states: Vec::new(),
                address: None,
                parcels: None,
            }),
            session: SessionState {
                current_address: Some("1234 MARKET ST".to_string()),
                ..SessionState::default()
            },
            address: None,
            parcels,
        }
    }

    fn market_parcel() -> ParcelFeature {
        ParcelFeature {
            external_id: Some(1),
            geometry: None,
            parcel_identifier: Some("001234000".to_string()),
            address: Some("1234 MARKET ST".to_string()),
            owner1: Some("CITY OF PHILA".to_string()),
            owner2: None,
            brt_id: Some("883309050".to_string()),
        }
    }

    #[test]
    fn test_human_output_lists_parcels() {
        colored::control::set_override(false);
        let text = render(&summary(ParcelSet::Found(vec![market_parcel()])), false).unwrap();
        assert!(text.contains("outcome: completed (address)"));
        assert!(text.contains("address: 1234 MARKET ST"));
        assert!(text.contains("001234000"));
        assert!(text.contains("CITY OF PHILA"));
    }

    #[test]
    fn test_json_output_is_structured() {
        let text = render(&summary(ParcelSet::Empty), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["outcome"], "completed");
        assert_eq!(value["report"]["plan"], "address");
        assert_eq!(value["session"]["current_address"], "1234 MARKET ST");
        assert_eq!(value["parcels"]["state"], "empty");
    }

    #[test]
    fn test_miss_detection() {
        let mut miss = summary(ParcelSet::Unfetched);
        assert!(!miss.is_miss());
        miss.session.current_address = None;
        assert!(miss.is_miss());
    }

    #[test]
    fn test_clicked_parcel_without_address_is_a_hit() {
        let mut clicked = summary(ParcelSet::Found(vec![market_parcel()]));
        clicked.route = "/".to_string();
        clicked.session.current_address = None;
        assert!(!clicked.is_miss());

        clicked.outcome = "aborted";
        assert!(clicked.is_miss());
    }
}
