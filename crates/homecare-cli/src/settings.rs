//! `homecare settings`: show or change the application settings and the
//! finance budget.

use anyhow::{bail, Result};
use clap::Args;

use homecare_core::{AppState, Settings};
use homecare_query::money;
use homecare_store::{KeyValueStore, Repository};

use crate::table::{cell, Table};

/// Arguments for `homecare settings`. With no flags the current settings
/// are printed.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Currency code used when formatting amounts, e.g. `KES`.
    #[arg(long)]
    pub currency: Option<String>,

    #[arg(long)]
    pub org_name: Option<String>,

    #[arg(long)]
    pub org_address: Option<String>,

    #[arg(long)]
    pub logo_url: Option<String>,

    #[arg(long)]
    pub primary_color: Option<String>,

    #[arg(long)]
    pub secondary_color: Option<String>,

    #[arg(long)]
    pub hover_color: Option<String>,

    /// Planned spending for the finance screen.
    #[arg(long)]
    pub budget: Option<f64>,
}

impl SettingsArgs {
    fn changes_settings(&self) -> bool {
        [
            &self.currency,
            &self.org_name,
            &self.org_address,
            &self.logo_url,
            &self.primary_color,
            &self.secondary_color,
            &self.hover_color,
        ]
        .iter()
        .any(|v| v.is_some())
    }

    /// The current settings with every given flag applied.
    fn apply(&self, current: &Settings) -> Settings {
        let pick =
            |flag: &Option<String>, old: &Option<String>| flag.clone().or_else(|| old.clone());
        Settings {
            currency: pick(&self.currency, &current.currency),
            org_name: pick(&self.org_name, &current.org_name),
            org_address: pick(&self.org_address, &current.org_address),
            logo_url: pick(&self.logo_url, &current.logo_url),
            primary_color: pick(&self.primary_color, &current.primary_color),
            secondary_color: pick(&self.secondary_color, &current.secondary_color),
            hover_color: pick(&self.hover_color, &current.hover_color),
            ..current.clone()
        }
    }
}

fn print_settings(state: &AppState) {
    let s = &state.meta.settings;
    let mut table = Table::new(["Setting", "Value"]);
    table.push(["Currency".to_string(), s.currency().to_string()]);
    table.push(["Organisation".to_string(), s.org_name().to_string()]);
    table.push(["Address".to_string(), s.org_address().to_string()]);
    table.push(["Logo URL".to_string(), cell(s.logo_url.as_deref())]);
    table.push([
        "Primary colour".to_string(),
        cell(s.primary_color.as_deref()),
    ]);
    table.push([
        "Secondary colour".to_string(),
        cell(s.secondary_color.as_deref()),
    ]);
    table.push(["Hover colour".to_string(), cell(s.hover_color.as_deref())]);
    table.push(["Budget".to_string(), money(state, state.finance.budget)]);
    println!("{table}");
}

pub fn run_settings<S: KeyValueStore>(args: &SettingsArgs, repo: &mut Repository<S>) -> Result<u8> {
    if let Some(budget) = args.budget {
        if !budget.is_finite() {
            bail!("budget must be a finite number");
        }
        repo.set_budget(budget)?;
    }
    if args.changes_settings() {
        let updated = args.apply(&repo.state().meta.settings);
        repo.update_settings(updated)?;
    }
    print_settings(repo.state());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use homecare_store::{MemoryStore, StateStore};

    fn repo() -> Repository<MemoryStore> {
        Repository::open_at(
            StateStore::new(MemoryStore::new()),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn no_flags_changes_nothing() {
        let mut repo = repo();
        let before = repo.state().clone();
        run_settings(&SettingsArgs::default(), &mut repo).unwrap();
        assert_eq!(repo.state(), &before);
    }

    #[test]
    fn flags_update_only_what_they_name() {
        let mut repo = repo();
        let org_before = repo.state().meta.settings.org_name.clone();
        let args = SettingsArgs {
            currency: Some("USD".into()),
            budget: Some(5000.0),
            ..Default::default()
        };
        run_settings(&args, &mut repo).unwrap();
        assert_eq!(repo.state().currency(), "USD");
        assert_eq!(repo.state().meta.settings.org_name, org_before);
        assert_eq!(repo.state().finance.budget, 5000.0);
    }

    #[test]
    fn non_finite_budget_is_refused() {
        let mut repo = repo();
        let args = SettingsArgs {
            budget: Some(f64::NAN),
            ..Default::default()
        };
        assert!(run_settings(&args, &mut repo).is_err());
        assert_eq!(repo.state().finance.budget, 12000.0);
    }
}
