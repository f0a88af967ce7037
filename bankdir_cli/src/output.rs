use anyhow::Result;
use bankdir_lib::db::{Branch, InstitutionSummary};
use bankdir_lib::format::{
    display_value, format_currency, format_currency_thousands, format_phone, website_url,
    PLACEHOLDER,
};
use bankdir_lib::types::Publication;
use bankdir_lib::{
    FacetCounts, FiguresReport, HistoryEntry, InstitutionDetail, MembershipRoster,
    PublicationChoice, SearchResults,
};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct InstitutionRow {
    #[tabled(rename = "State")]
    #[serde(rename = "State")]
    state: String,
    #[tabled(rename = "Bank No")]
    #[serde(rename = "Bank No")]
    bank_no: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "City")]
    #[serde(rename = "City")]
    city: String,
    #[tabled(rename = "County")]
    #[serde(rename = "County")]
    county: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "Type")]
    type_name: String,
    #[tabled(rename = "Total Assets")]
    #[serde(rename = "Total Assets")]
    total_assets: String,
}

#[derive(Tabled, Serialize)]
struct FacetRow {
    #[tabled(rename = "Facet")]
    #[serde(rename = "Facet")]
    facet: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
    #[tabled(rename = "Count")]
    #[serde(rename = "Count")]
    count: i64,
}

#[derive(Tabled, Serialize)]
struct FieldRow {
    #[tabled(rename = "Field")]
    #[serde(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Tabled, Serialize)]
struct HistoryRow {
    #[tabled(rename = "Publication")]
    #[serde(rename = "Publication")]
    publication: String,
    #[tabled(rename = "Total Assets")]
    #[serde(rename = "Total Assets")]
    total_assets: String,
    #[tabled(rename = "Total Loans")]
    #[serde(rename = "Total Loans")]
    total_loans: String,
    #[tabled(rename = "Total Deposits")]
    #[serde(rename = "Total Deposits")]
    total_deposits: String,
    #[tabled(rename = "Shares")]
    #[serde(rename = "Shares")]
    shares: String,
    #[tabled(rename = "Net Income")]
    #[serde(rename = "Net Income")]
    net_income: String,
}

#[derive(Tabled, Serialize)]
struct BranchRow {
    #[tabled(rename = "Branch")]
    #[serde(rename = "Branch")]
    name: String,
    #[tabled(rename = "Address")]
    #[serde(rename = "Address")]
    address: String,
    #[tabled(rename = "City")]
    #[serde(rename = "City")]
    city: String,
    #[tabled(rename = "Phone")]
    #[serde(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Manager")]
    #[serde(rename = "Manager")]
    manager: String,
}

// -- Row builders --

fn opt(value: &Option<String>) -> String {
    display_value(value.as_deref())
}

fn opt_publication(publication: Option<Publication>) -> String {
    publication
        .map(|p| p.label())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// `"total_assets"` -> `"Total Assets"`.
fn field_title(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn field(name: &str, value: impl Into<String>) -> FieldRow {
    FieldRow {
        field: name.to_string(),
        value: value.into(),
    }
}

fn build_institution_rows(institutions: &[InstitutionSummary]) -> Vec<InstitutionRow> {
    institutions
        .iter()
        .map(|i| InstitutionRow {
            state: i.state.clone(),
            bank_no: i.bank_no.clone(),
            name: i.name.clone(),
            city: opt(&i.city),
            county: opt(&i.county),
            type_name: i.type_name.clone(),
            total_assets: format_currency_thousands(i.total_assets),
        })
        .collect()
}

fn build_facet_rows(facets: &FacetCounts) -> Vec<FacetRow> {
    let mut rows = Vec::new();
    for s in &facets.states {
        rows.push(FacetRow {
            facet: "State".into(),
            value: s.code.clone(),
            count: s.count,
        });
    }
    for t in &facets.types {
        rows.push(FacetRow {
            facet: "Type".into(),
            value: t.name.clone(),
            count: t.count,
        });
    }
    for c in &facets.counties {
        rows.push(FacetRow {
            facet: "County".into(),
            value: c.county.clone(),
            count: c.count,
        });
    }
    for m in &facets.memberships {
        rows.push(FacetRow {
            facet: "Membership".into(),
            value: m.name.clone(),
            count: m.count,
        });
    }
    for a in &facets.asset_ranges {
        rows.push(FacetRow {
            facet: "Assets".into(),
            value: a.label.to_string(),
            count: a.count,
        });
    }
    rows
}

fn build_figure_rows(report: &FiguresReport) -> Vec<FieldRow> {
    let mut rows = vec![
        field("Publication", report.display_year.clone()),
        field("Latest", report.current_display.clone()),
        field("Older", opt_publication(report.older_pub)),
        field("Newer", opt_publication(report.newer_pub)),
    ];
    for (name, _) in report.values.entries() {
        let formatted = report.figures.get(name).cloned().flatten();
        rows.push(field(
            &field_title(name),
            formatted.unwrap_or_else(|| PLACEHOLDER.to_string()),
        ));
    }
    rows
}

fn build_history_rows(history: &[HistoryEntry]) -> Vec<HistoryRow> {
    history
        .iter()
        .map(|h| HistoryRow {
            publication: h.label.clone(),
            total_assets: format_currency_thousands(h.financials.total_assets),
            total_loans: format_currency_thousands(h.financials.total_loans),
            total_deposits: format_currency_thousands(h.financials.total_deposits),
            shares: format_currency_thousands(h.financials.shares),
            net_income: format_currency_thousands(h.financials.net_income),
        })
        .collect()
}

fn build_detail_rows(detail: &InstitutionDetail) -> Vec<FieldRow> {
    let inst = &detail.institution;
    let contact = &inst.contact;
    let mut rows = vec![
        field("Name", inst.name.clone()),
        field("Type", inst.type_name.clone()),
        field("Publication", inst.publication().label()),
        field("Address", opt(&contact.address)),
        field("Mailing Address", opt(&contact.mail_address)),
        field("City", opt(&contact.city)),
        field("State", opt(&contact.state)),
        field("Zip", opt(&contact.zip)),
        field("County", opt(&contact.county)),
        field(
            "Phone",
            contact
                .phone1
                .as_deref()
                .map(format_phone)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        ),
        field(
            "Fax",
            contact
                .fax
                .as_deref()
                .map(format_phone)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        ),
        field("Email", opt(&contact.email)),
        field(
            "Website",
            contact
                .website
                .as_deref()
                .map(website_url)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        ),
        field("Hours", opt(&contact.hours)),
        field(
            "Charter Year",
            contact
                .charter_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        ),
        field("Holding Company", opt(&contact.holding_company)),
        field("CEO", opt(&inst.ceo)),
        field("CEO Title", opt(&detail.ceo_title)),
    ];
    if !inst.officers.is_empty() {
        rows.push(field("Officers", inst.officers.join(", ")));
    }
    for dept in &inst.department_contacts {
        rows.push(field(dept.label, dept.name.clone()));
    }
    if !detail.memberships.is_empty() {
        let names: Vec<&str> = detail.memberships.iter().map(|m| m.name.as_str()).collect();
        rows.push(field("Memberships", names.join(", ")));
    }

    let mut figures_label = detail.figures_publication.label();
    if detail.figures_is_current {
        figures_label.push_str(" (latest)");
    }
    rows.push(field("Figures", figures_label));
    rows.push(field("Older", opt_publication(detail.neighbors.older)));
    rows.push(field("Newer", opt_publication(detail.neighbors.newer)));
    // Detail figures are shown in full dollars.
    for (name, value) in detail.figures.entries() {
        rows.push(field(&field_title(name), format_currency(value)));
    }
    rows
}

fn build_branch_rows(branches: &[Branch]) -> Vec<BranchRow> {
    branches
        .iter()
        .map(|b| BranchRow {
            name: opt(&b.branch_name),
            address: opt(&b.address),
            city: opt(&b.city),
            phone: b
                .phone
                .as_deref()
                .map(format_phone)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            manager: opt(&b.manager),
        })
        .collect()
}

fn build_publication_rows(choice: &PublicationChoice) -> Vec<FieldRow> {
    let join = |items: Vec<String>| {
        if items.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            items.join(", ")
        }
    };
    vec![
        field("States", join(choice.states.clone())),
        field("State", opt(&choice.state)),
        field(
            "Years",
            join(choice.years.iter().map(|y| y.to_string()).collect()),
        ),
        field(
            "Seasons",
            join(choice.seasons.iter().map(|s| s.label().to_string()).collect()),
        ),
        field("Selected", opt_publication(choice.publication())),
    ]
}

// -- Generic emitters --

fn print_table<R: Tabled>(rows: &[R]) {
    println!("{}", Table::new(rows));
}

fn print_markdown<R: Tabled>(rows: &[R]) {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    println!("{}", table);
}

fn print_csv<R: Serialize>(rows: &[R]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_rows<R: Tabled + Serialize>(rows: &[R], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_table(rows),
        OutputFormat::Markdown => print_markdown(rows),
        OutputFormat::Csv => print_csv(rows)?,
        OutputFormat::Json => print_json(&rows),
    }
    Ok(())
}

// -- Payload output --

pub fn print_search(results: &SearchResults, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(results),
        OutputFormat::Csv => print_csv(&build_institution_rows(&results.results))?,
        OutputFormat::Table | OutputFormat::Markdown => {
            if results.enabled {
                print_rows(&build_institution_rows(&results.results), format)?;
            }
            print_rows(&build_facet_rows(&results.facets), format)?;
        }
    }
    Ok(())
}

pub fn print_figures(report: &FiguresReport, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        _ => print_rows(&build_figure_rows(report), format)?,
    }
    Ok(())
}

pub fn print_history(history: &[HistoryEntry], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&history),
        _ => print_rows(&build_history_rows(history), format)?,
    }
    Ok(())
}

pub fn print_detail(detail: &InstitutionDetail, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(detail),
        OutputFormat::Csv => print_csv(&build_detail_rows(detail))?,
        OutputFormat::Table | OutputFormat::Markdown => {
            print_rows(&build_detail_rows(detail), format)?;
            let branches: Vec<Branch> = detail
                .city_branches
                .iter()
                .chain(detail.other_branches.iter())
                .cloned()
                .collect();
            if !branches.is_empty() {
                print_rows(&build_branch_rows(&branches), format)?;
            }
        }
    }
    Ok(())
}

pub fn print_roster(roster: &MembershipRoster, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(roster),
        _ => print_rows(&build_institution_rows(&roster.members), format)?,
    }
    Ok(())
}

pub fn print_publications(choice: &PublicationChoice, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(choice),
        _ => print_rows(&build_publication_rows(choice), format)?,
    }
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
