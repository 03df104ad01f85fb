//! # homecare-cli: Command-Line Front End
//!
//! Provides the `homecare` command. Every screen of the application maps
//! to a subcommand that reads or mutates the one stored document:
//!
//! ```bash
//! homecare summary --charts
//! homecare list health --child "Amina K"
//! homecare upsert staff '{"name": "Ruth A", "role": "Cook"}'
//! homecare expense "Gas refill" 900
//! homecare export -o backup.json
//! homecare clear --yes
//! ```
//!
//! The data directory comes from `--data-dir`, then `HOMECARE_DATA_DIR`,
//! then `./.homecare` (see [`config`]).

pub mod chart;
pub mod config;
pub mod data;
pub mod records;
pub mod reports;
pub mod settings;
pub mod table;
