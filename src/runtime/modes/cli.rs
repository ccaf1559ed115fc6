//! CLI mode
//!
//! One-shot maintenance commands. Output goes to stdout; failures are
//! returned as [`CliError`] and printed by the binary.

use colored::Colorize;
use std::path::Path;
use thiserror::Error;

use crate::cli::{Commands, ConfigCommands, PriceCommands};
use crate::config::StaticConfig;
use crate::pricing::{IptvPlan, format_cents, quote_iptv, quote_quantity};
use crate::services::seed_demo_data;
use crate::storage::StorageFactory;
use crate::utils::password::hash_password;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Command error: {0}")]
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        self.to_string()
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl From<crate::errors::StoreError> for CliError {
    fn from(err: crate::errors::StoreError) -> Self {
        CliError::StorageError(err.format_simple())
    }
}

impl From<crate::pricing::PricingError> for CliError {
    fn from(err: crate::pricing::PricingError) -> Self {
        CliError::ParseError(err.to_string())
    }
}

/// Run a CLI command. `Serve` is handled by the binary.
pub async fn run_cli(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Serve => Err(CliError::CommandError(
            "serve is not a CLI command".to_string(),
        )),
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force),
        Commands::HashPassword { password } => {
            let hash = hash_password(&password)
                .map_err(|e| CliError::CommandError(e.to_string()))?;
            println!("{}", hash);
            Ok(())
        }
        Commands::Price { action } => price(action),
        Commands::Seed => {
            let storage = StorageFactory::create().await?;
            let report = seed_demo_data(storage).await?;
            if report.skipped {
                println!(
                    "{}",
                    "Catalog already has products, nothing seeded.".yellow()
                );
            } else {
                println!(
                    "{} {} products, {} promotions, {} posts, {} redirects",
                    "Seeded".green().bold(),
                    report.products,
                    report.promotions,
                    report.posts,
                    report.redirects
                );
            }
            Ok(())
        }
        Commands::Stats => {
            let storage = StorageFactory::create().await?;
            let stats = storage.dashboard_stats().await?;
            println!("{}", "Dashboard".bold());
            println!(
                "  Products:    {} ({} active)",
                stats.products_total, stats.products_active
            );
            println!(
                "  Promotions:  {} ({} live)",
                stats.promotions_total, stats.promotions_live
            );
            println!(
                "  Posts:       {} published, {} drafts, {} views",
                stats.posts_published, stats.posts_draft, stats.blog_views
            );
            println!(
                "  Reviews:     {} approved, {} pending, avg {}",
                stats.reviews_approved,
                stats.reviews_pending,
                stats
                    .average_rating
                    .map(|r| format!("{:.1}", r))
                    .unwrap_or_else(|| "-".to_string())
            );
            println!(
                "  Redirects:   {} ({} hits)",
                stats.redirects_total, stats.redirect_hits
            );
            println!(
                "  Affiliates:  {} active, ${} sales, ${} commission",
                stats.affiliates_active,
                format_cents(stats.affiliate_sales_cents),
                format_cents(stats.affiliate_commission_cents)
            );
            Ok(())
        }
    }
}

fn config_generate(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let path = output_path.unwrap_or_else(|| "config.example.toml".to_string());

    if !force && Path::new(&path).exists() {
        return Err(CliError::CommandError(format!(
            "File already exists: {} (use --force to overwrite)",
            path
        )));
    }

    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| CliError::CommandError(format!("Failed to write {}: {}", path, e)))?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    println!(
        "  {}",
        "Set api.admin_password before exposing the admin API".yellow()
    );
    Ok(())
}

fn price(action: PriceCommands) -> Result<(), CliError> {
    match action {
        PriceCommands::Iptv { plan, devices } => {
            let plan: IptvPlan = plan.parse()?;
            let quote = quote_iptv(plan, devices)?;
            println!(
                "{} for {} device(s): ${} (${} per device, save ${})",
                plan.label(),
                quote.devices,
                format_cents(quote.total_cents),
                format_cents(quote.per_device_cents),
                format_cents(quote.savings_cents)
            );
        }
        PriceCommands::Quantity {
            base_unit_cents,
            quantity,
        } => {
            let quote = quote_quantity(base_unit_cents, quantity)?;
            println!(
                "{} x ${}: ${} each, ${} total ({}% off, save ${})",
                quote.quantity,
                format_cents(quote.base_unit_cents),
                format_cents(quote.unit_cents),
                format_cents(quote.total_cents),
                quote.discount_bps / 100,
                format_cents(quote.savings_cents)
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_generate_refuses_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let path_str = path.to_string_lossy().to_string();

        config_generate(Some(path_str.clone()), false).unwrap();
        assert!(path.exists());

        let err = config_generate(Some(path_str.clone()), false).unwrap_err();
        assert!(matches!(err, CliError::CommandError(_)));

        config_generate(Some(path_str), true).unwrap();
    }

    #[test]
    fn test_price_rejects_bad_input() {
        let err = price(PriceCommands::Iptv {
            plan: "2yr".into(),
            devices: 1,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::ParseError(_)));

        assert!(
            price(PriceCommands::Quantity {
                base_unit_cents: 4999,
                quantity: 6,
            })
            .is_err()
        );
        assert!(
            price(PriceCommands::Iptv {
                plan: "1yr".into(),
                devices: 3,
            })
            .is_ok()
        );
    }

    #[test]
    fn test_cli_error_format() {
        let err = CliError::StorageError("db down".into());
        assert_eq!(err.format_simple(), "Storage error: db down");
        assert_eq!(err.to_string(), err.format_simple());
        assert!(err.format_colored().contains("db down"));

        let boxed: Box<dyn std::error::Error> = Box::new(CliError::ParseError("bad plan".into()));
        assert_eq!(boxed.to_string(), "Parse error: bad plan");
    }

    #[test]
    fn test_oversized_cli_price_is_parse_error() {
        let err = price(PriceCommands::Quantity {
            base_unit_cents: i64::MAX / 2,
            quantity: 3,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::ParseError(_)));
    }
}
