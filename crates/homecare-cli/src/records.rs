//! # Record Subcommands
//!
//! `list`, `upsert`, `remove`, `expense`, `announce`, `search` and
//! `orphans`. Collections are addressed by their document key
//! (`children`, `staff`, ..., `expenses`); any other name addresses a
//! custom collection.
//!
//! `upsert` is the form path: the record is validated, a `Goods` donation
//! is stored with amount 0, and an inventory item without a minimum
//! gets minimum 1.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Args;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use homecare_core::{
    required_fields, AppState, Collection, CollectionName, Donation, InventoryItem, Record,
};
use homecare_query::{
    child_age, filter_records, global_search, is_low_stock, money, orphaned_child_references,
    RecordFilter, Searchable,
};
use homecare_store::{KeyValueStore, Repository};

use crate::table::{cell, Table};

/// Arguments for `homecare list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Collection name, e.g. `children` or `meals`.
    pub collection: String,

    /// Only records linked to this child (exact name).
    #[arg(long)]
    pub child: Option<String>,

    /// Only records containing this text (case-insensitive).
    #[arg(long, short, default_value = "")]
    pub query: String,

    /// Only records with this status, e.g. `Resident` or `Present`.
    #[arg(long)]
    pub status: Option<String>,

    /// Only inventory items in this category.
    #[arg(long)]
    pub category: Option<String>,

    /// Only records of this type, e.g. `Medical` or `Funds`.
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// Only records dated on this day (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Print the records as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// All records of `collection`, unfiltered.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            child: None,
            query: String::new(),
            status: None,
            category: None,
            kind: None,
            date: None,
            json: false,
        }
    }

    pub fn filter(&self) -> RecordFilter<'_> {
        RecordFilter {
            child: self.child.as_deref(),
            status: self.status.as_deref(),
            category: self.category.as_deref(),
            kind: self.kind.as_deref(),
            date: self.date,
            query: &self.query,
        }
    }
}

/// Arguments for `homecare upsert`.
#[derive(Args, Debug)]
pub struct UpsertArgs {
    pub collection: String,

    /// The record as a JSON object. Omit `id` (or leave it blank) to
    /// create a record; give an existing id to replace that record.
    pub record: String,
}

/// Arguments for `homecare remove`.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    pub collection: String,
    pub id: String,
}

/// Arguments for `homecare expense`.
#[derive(Args, Debug)]
pub struct ExpenseArgs {
    /// What the money was spent on.
    pub desc: String,

    /// Amount in the configured currency; must not be zero.
    #[arg(allow_negative_numbers = true)]
    pub amount: f64,

    /// Booking date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Arguments for `homecare announce`.
#[derive(Args, Debug)]
pub struct AnnounceArgs {
    pub message: String,

    /// Date of the announcement (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Arguments for `homecare search`.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for in child names, staff names and donors.
    pub query: String,
}

fn num(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn id_cell<R: Record>(record: &R) -> String {
    record.id().to_string()
}

/// Filter `records` and print them as a table or JSON.
fn show<R, F>(records: &[R], args: &ListArgs, headers: &[&str], row: F) -> Result<()>
where
    R: Searchable + Serialize,
    F: Fn(&R) -> Vec<String>,
{
    let hits = filter_records(records, &args.filter());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }
    if hits.is_empty() {
        println!("No records.");
        return Ok(());
    }
    let mut table = Table::new(headers.iter().copied());
    for record in hits {
        table.push(row(record));
    }
    println!("{table}");
    Ok(())
}

fn list_known(
    collection: Collection,
    args: &ListArgs,
    state: &AppState,
    today: NaiveDate,
) -> Result<()> {
    let m = |amount: f64| money(state, amount);
    match collection {
        Collection::Children => show(
            &state.children,
            args,
            &["Id", "Name", "Gender", "Age", "Status", "Admitted"],
            |c| {
                vec![
                    id_cell(c),
                    cell(c.name.as_deref()),
                    cell(c.gender.as_deref()),
                    child_age(c, today).to_string(),
                    cell(c.status.as_deref()),
                    cell(c.admission_date.as_deref()),
                ]
            },
        ),
        Collection::Staff => show(&state.staff, args, &["Id", "Name", "Role", "Phone"], |s| {
            vec![
                id_cell(s),
                cell(s.name.as_deref()),
                cell(s.role.as_deref()),
                cell(s.phone.as_deref()),
            ]
        }),
        Collection::Donations => show(
            &state.donations,
            args,
            &["Id", "Donor", "Type", "Amount", "Date", "Note"],
            |d| {
                let amount = if d.is_funds() {
                    m(d.amount_or_zero())
                } else {
                    "-".to_string()
                };
                vec![
                    id_cell(d),
                    cell(d.donor.as_deref()),
                    cell(d.kind.as_deref()),
                    amount,
                    cell(d.date.as_deref()),
                    cell(d.note.as_deref()),
                ]
            },
        ),
        Collection::Inventory => show(
            &state.inventory,
            args,
            &["Id", "Item", "Qty", "Min", "Category", "Cost", "Low"],
            |i| {
                vec![
                    id_cell(i),
                    cell(i.item.as_deref()),
                    num(i.qty),
                    num(i.min),
                    cell(i.category.as_deref()),
                    num(i.cost),
                    if is_low_stock(i) {
                        "yes".into()
                    } else {
                        String::new()
                    },
                ]
            },
        ),
        Collection::Health => show(
            &state.health,
            args,
            &["Id", "Date", "Child", "Type", "Notes", "Bill"],
            |h| {
                vec![
                    id_cell(h),
                    cell(h.date.as_deref()),
                    cell(h.child.as_deref()),
                    cell(h.kind.as_deref()),
                    cell(h.notes.as_deref()),
                    m(h.medical_bill_or_zero()),
                ]
            },
        ),
        Collection::Education => show(
            &state.education,
            args,
            &["Id", "Date", "Child", "School", "Grade", "Term", "Fees"],
            |e| {
                vec![
                    id_cell(e),
                    cell(e.date.as_deref()),
                    cell(e.child.as_deref()),
                    cell(e.school.as_deref()),
                    cell(e.grade.as_deref()),
                    cell(e.term.as_deref()),
                    m(e.fees_or_zero()),
                ]
            },
        ),
        Collection::Attendance => show(
            &state.attendance,
            args,
            &["Id", "Date", "Child", "Status", "Time in", "Notes"],
            |a| {
                vec![
                    id_cell(a),
                    cell(a.date.as_deref()),
                    cell(a.child.as_deref()),
                    cell(a.status.as_deref()),
                    cell(a.time_in.as_deref()),
                    cell(a.notes.as_deref()),
                ]
            },
        ),
        Collection::Incidents => show(
            &state.incidents,
            args,
            &[
                "Id",
                "Date",
                "Child",
                "Severity",
                "Description",
                "Action",
                "Reporter",
            ],
            |i| {
                vec![
                    id_cell(i),
                    cell(i.date.as_deref()),
                    cell(i.child.as_deref()),
                    cell(i.severity.as_deref()),
                    cell(i.description.as_deref()),
                    cell(i.action.as_deref()),
                    cell(i.reporter.as_deref()),
                ]
            },
        ),
        Collection::Meals => show(
            &state.meals,
            args,
            &["Id", "Date", "Child", "Meal", "Amount", "Notes"],
            |r| {
                vec![
                    id_cell(r),
                    cell(r.date.as_deref()),
                    cell(r.child.as_deref()),
                    cell(r.meal_type.as_deref()),
                    m(r.amount_or_zero()),
                    cell(r.notes.as_deref()),
                ]
            },
        ),
        Collection::Schedule => show(
            &state.schedule,
            args,
            &[
                "Id",
                "Date",
                "Time",
                "Title",
                "Type",
                "Assigned to",
                "Status",
            ],
            |s| {
                vec![
                    id_cell(s),
                    cell(s.date.as_deref()),
                    cell(s.time.as_deref()),
                    cell(s.title.as_deref()),
                    cell(s.kind.as_deref()),
                    cell(s.assigned_to.as_deref()),
                    cell(s.status.as_deref()),
                ]
            },
        ),
        Collection::Adoptions => show(
            &state.adoptions,
            args,
            &["Id", "Date", "Child", "Parent", "Contact", "Agency"],
            |a| {
                vec![
                    id_cell(a),
                    cell(a.date.as_deref()),
                    cell(a.child.as_deref()),
                    cell(a.parent.as_deref()),
                    cell(a.contact.as_deref()),
                    cell(a.agency.as_deref()),
                ]
            },
        ),
        Collection::Announcements => {
            show(&state.announcements, args, &["Id", "Date", "Message"], |a| {
                vec![
                    id_cell(a),
                    cell(a.date.as_deref()),
                    cell(a.message.as_deref()),
                ]
            })
        }
        Collection::Expenses => show(
            &state.finance.expenses,
            args,
            &["Id", "Date", "Description", "Amount"],
            |e| {
                vec![
                    id_cell(e),
                    cell(e.date.as_deref()),
                    cell(e.desc.as_deref()),
                    m(e.amount_or_zero()),
                ]
            },
        ),
    }
}

/// Custom collections are only filtered by the text query.
pub fn run_list(args: &ListArgs, state: &AppState, today: NaiveDate) -> Result<u8> {
    match CollectionName::parse(&args.collection) {
        CollectionName::Known(collection) => list_known(collection, args, state, today)?,
        CollectionName::Custom(name) => {
            let needle = args.query.trim().to_lowercase();
            let records: Vec<&Value> = match state.custom.get(&name) {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter(|r| {
                        needle.is_empty() || r.to_string().to_lowercase().contains(&needle)
                    })
                    .collect(),
                _ => Vec::new(),
            };
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(0)
}

fn decode<R: DeserializeOwned>(collection: &str, record: Value) -> Result<R> {
    serde_json::from_value(record)
        .with_context(|| format!("record does not fit collection {collection:?}"))
}

/// What `upsert` was doing, naming the fields a typed record needs.
fn upsert_context(collection: &str) -> String {
    match CollectionName::parse(collection) {
        CollectionName::Known(known) => format!(
            "saving into {known} (required fields: {})",
            required_fields(known).join(", ")
        ),
        CollectionName::Custom(name) => format!("saving into {name}"),
    }
}

pub fn run_upsert<S: KeyValueStore>(args: &UpsertArgs, repo: &mut Repository<S>) -> Result<u8> {
    let record: Value = serde_json::from_str(&args.record).context("record is not valid JSON")?;
    if !record.is_object() {
        bail!("record must be a JSON object");
    }
    let stored = upsert_record(&args.collection, record, repo)
        .with_context(|| upsert_context(&args.collection))?;
    println!("{}", serde_json::to_string_pretty(&stored)?);
    Ok(0)
}

fn upsert_record<S: KeyValueStore>(
    collection: &str,
    record: Value,
    repo: &mut Repository<S>,
) -> Result<Value> {
    Ok(match CollectionName::parse(collection) {
        CollectionName::Known(Collection::Donations) => {
            let donation = decode::<Donation>(collection, record)?.with_form_amount();
            serde_json::to_value(repo.upsert(donation)?)?
        }
        CollectionName::Known(Collection::Inventory) => {
            let item = decode::<InventoryItem>(collection, record)?.with_form_defaults();
            serde_json::to_value(repo.upsert(item)?)?
        }
        _ => repo.upsert_named(collection, record)?,
    })
}

pub fn run_remove<S: KeyValueStore>(args: &RemoveArgs, repo: &mut Repository<S>) -> Result<u8> {
    if repo.remove_named(&args.collection, &args.id)? {
        println!("Removed {} from {}.", args.id, args.collection.trim());
    } else {
        println!(
            "No record {} in {}; nothing changed.",
            args.id,
            args.collection.trim()
        );
    }
    Ok(0)
}

pub fn run_expense<S: KeyValueStore>(
    args: &ExpenseArgs,
    repo: &mut Repository<S>,
    today: NaiveDate,
) -> Result<u8> {
    let expense = repo.add_expense(&args.desc, args.amount, args.date.unwrap_or(today))?;
    println!(
        "Booked {} for {} ({}).",
        money(repo.state(), expense.amount_or_zero()),
        cell(expense.desc.as_deref()),
        expense.id
    );
    Ok(0)
}

pub fn run_announce<S: KeyValueStore>(
    args: &AnnounceArgs,
    repo: &mut Repository<S>,
    today: NaiveDate,
) -> Result<u8> {
    let posted = repo.add_announcement(&args.message, args.date.unwrap_or(today))?;
    println!("Posted announcement {}.", posted.id);
    Ok(0)
}

pub fn run_search(args: &SearchArgs, state: &AppState, today: NaiveDate) -> Result<u8> {
    let hits = global_search(state, &args.query);

    println!("Children");
    if hits.children.is_empty() {
        println!("  No matches.");
    }
    for c in &hits.children {
        let age = child_age(c, today);
        let (name, gender) = (cell(c.name.as_deref()), cell(c.gender.as_deref()));
        println!("  {name}  {gender} • {age} yrs");
    }

    println!("Staff");
    if hits.staff.is_empty() {
        println!("  No matches.");
    }
    for s in &hits.staff {
        println!("  {}  {}", cell(s.name.as_deref()), cell(s.role.as_deref()));
    }

    println!("Donations");
    if hits.donations.is_empty() {
        println!("  No matches.");
    }
    for d in &hits.donations {
        let amount = match d.amount {
            Some(a) if a != 0.0 => format!(" • {}", money(state, a)),
            _ => String::new(),
        };
        let (donor, kind) = (cell(d.donor.as_deref()), cell(d.kind.as_deref()));
        println!("  {donor}  {kind}{amount}");
    }
    Ok(0)
}

/// List child-linked records whose child is not on file.
pub fn run_orphans(state: &AppState) -> Result<u8> {
    let orphans = orphaned_child_references(state);
    if orphans.is_empty() {
        println!("Every child reference matches a child on file.");
        return Ok(0);
    }
    let mut table = Table::new(["Collection", "Id", "Child"]);
    for o in &orphans {
        table.push([o.collection.to_string(), o.id.to_string(), o.child.clone()]);
    }
    println!("{table}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use homecare_core::Child;
    use homecare_store::{MemoryStore, StateStore};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn repo() -> Repository<MemoryStore> {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        Repository::open_at(StateStore::new(MemoryStore::new()), today(), now).unwrap()
    }

    fn upsert(collection: &str, record: &str) -> UpsertArgs {
        UpsertArgs {
            collection: collection.into(),
            record: record.into(),
        }
    }

    #[test]
    fn upsert_applies_the_donation_form_rule() {
        let mut repo = repo();
        let goods = r#"{"donor": "Local Market", "type": "Goods", "amount": 400}"#;
        run_upsert(&upsert("donations", goods), &mut repo).unwrap();
        let d = &repo.state().donations[0];
        assert_eq!(d.donor.as_deref(), Some("Local Market"));
        assert_eq!(d.amount, Some(0.0));
    }

    #[test]
    fn upsert_applies_the_inventory_form_rule() {
        let mut repo = repo();
        let beans = upsert("inventory", r#"{"item": "Beans (kg)", "qty": "30"}"#);
        run_upsert(&beans, &mut repo).unwrap();
        let item = &repo.state().inventory[0];
        assert_eq!(item.min, Some(1.0));
        assert_eq!(item.qty, Some(30.0));
    }

    #[test]
    fn upsert_rejects_bad_input() {
        let mut repo = repo();
        assert!(run_upsert(&upsert("children", "{oops"), &mut repo).is_err());
        assert!(run_upsert(&upsert("children", "[]"), &mut repo).is_err());
        assert!(run_upsert(&upsert("children", r#"{"name": "Zoe"}"#), &mut repo).is_err());
        assert_eq!(repo.list::<Child>().len(), 3);
    }

    #[test]
    fn upsert_errors_name_the_required_fields() {
        let mut repo = repo();
        let err = run_upsert(&upsert("meals", r#"{"child": "Amina K"}"#), &mut repo).unwrap_err();
        assert_eq!(
            err.to_string(),
            "saving into meals (required fields: child, date)"
        );
        assert!(run_upsert(&upsert("visitors", "{}"), &mut repo).is_ok());
    }

    #[test]
    fn remove_of_unknown_id_is_not_an_error() {
        let mut repo = repo();
        let args = RemoveArgs {
            collection: "staff".into(),
            id: "missing".into(),
        };
        assert_eq!(run_remove(&args, &mut repo).unwrap(), 0);
        assert_eq!(repo.state().staff.len(), 2);
    }

    #[test]
    fn quick_adds_default_to_today() {
        let mut repo = repo();
        let args = ExpenseArgs {
            desc: "Gas refill".into(),
            amount: 900.0,
            date: None,
        };
        run_expense(&args, &mut repo, today()).unwrap();
        let booked = &repo.state().finance.expenses[0];
        assert_eq!(booked.date.as_deref(), Some("2025-01-01"));
        let zero = ExpenseArgs {
            desc: "Nothing".into(),
            amount: 0.0,
            date: None,
        };
        assert!(run_expense(&zero, &mut repo, today()).is_err());
    }

    #[test]
    fn listing_runs_for_every_collection() {
        let repo = repo();
        for collection in Collection::ALL {
            let args = ListArgs::new(collection.as_str());
            assert_eq!(run_list(&args, repo.state(), today()).unwrap(), 0);
        }
        let custom = ListArgs {
            child: Some("Amina K".into()),
            query: "x".into(),
            json: true,
            ..ListArgs::new("visitors")
        };
        assert_eq!(run_list(&custom, repo.state(), today()).unwrap(), 0);
    }

    #[test]
    fn list_flags_narrow_the_screen() {
        let repo = repo();
        let state = repo.state();

        let residents = ListArgs {
            status: Some("Resident".into()),
            ..ListArgs::new("children")
        };
        let hits = filter_records(&state.children, &residents.filter());
        assert_eq!(hits.len(), 3);
        let adopted = ListArgs {
            status: Some("Adopted".into()),
            ..ListArgs::new("children")
        };
        assert!(filter_records(&state.children, &adopted.filter()).is_empty());

        let food = ListArgs {
            category: Some("Food".into()),
            ..ListArgs::new("inventory")
        };
        assert_eq!(filter_records(&state.inventory, &food.filter()).len(), 2);

        let treatment = ListArgs {
            kind: Some("Treatment".into()),
            date: today().checked_sub_days(chrono::Days::new(2)),
            ..ListArgs::new("health")
        };
        let hits = filter_records(&state.health, &treatment.filter());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].child.as_deref(), Some("Brian O"));
        let wrong_day = ListArgs {
            date: Some(today()),
            ..treatment
        };
        assert!(filter_records(&state.health, &wrong_day.filter()).is_empty());
    }

    #[test]
    fn search_and_orphans_run() {
        let repo = repo();
        let args = SearchArgs { query: "a".into() };
        assert_eq!(run_search(&args, repo.state(), today()).unwrap(), 0);
        assert_eq!(run_orphans(repo.state()).unwrap(), 0);
    }
}
