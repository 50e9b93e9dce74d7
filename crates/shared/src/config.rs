//! Application configuration management.

use serde::Deserialize;

use crate::error::BootstrapError;
use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Customs document numbering and currency.
    #[serde(default)]
    pub customs: CustomsConfig,
    /// Account codes used by the posting engine.
    #[serde(default)]
    pub posting: PostingConfig,
    /// Seed data for the chart of accounts.
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Store configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Optional JSON snapshot file backing the in-memory store.
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "tppb=info".to_string()
}

/// Customs document configuration.
///
/// Inbound goods enter the bonded area under BC 2.3, outbound goods leave
/// under BC 2.7 unless configured otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomsConfig {
    /// Document type code for inbound submissions.
    #[serde(default = "default_inbound_doc_type")]
    pub inbound_doc_type: String,
    /// Number prefix for inbound documents.
    #[serde(default = "default_inbound_prefix")]
    pub inbound_prefix: String,
    /// Document type code for outbound submissions.
    #[serde(default = "default_outbound_doc_type")]
    pub outbound_doc_type: String,
    /// Number prefix for outbound documents.
    #[serde(default = "default_outbound_prefix")]
    pub outbound_prefix: String,
    /// Currency recorded on transaction logs.
    #[serde(default)]
    pub currency: Currency,
}

impl Default for CustomsConfig {
    fn default() -> Self {
        Self {
            inbound_doc_type: default_inbound_doc_type(),
            inbound_prefix: default_inbound_prefix(),
            outbound_doc_type: default_outbound_doc_type(),
            outbound_prefix: default_outbound_prefix(),
            currency: Currency::default(),
        }
    }
}

fn default_inbound_doc_type() -> String {
    "BC 2.3".to_string()
}

fn default_inbound_prefix() -> String {
    "BC23".to_string()
}

fn default_outbound_doc_type() -> String {
    "BC 2.7".to_string()
}

fn default_outbound_prefix() -> String {
    "BC27".to_string()
}

/// Account codes the posting engine resolves against the chart of accounts.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingConfig {
    /// Expense account for the value of inbound goods.
    #[serde(default = "default_goods_expense_code")]
    pub goods_expense_code: String,
    /// Expense account for operational costs (freight, handling, storage).
    #[serde(default = "default_operational_expense_code")]
    pub operational_expense_code: String,
    /// Revenue account for outbound sales.
    #[serde(default = "default_sales_revenue_code")]
    pub sales_revenue_code: String,
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            goods_expense_code: default_goods_expense_code(),
            operational_expense_code: default_operational_expense_code(),
            sales_revenue_code: default_sales_revenue_code(),
        }
    }
}

fn default_goods_expense_code() -> String {
    "5100".to_string()
}

fn default_operational_expense_code() -> String {
    "5200".to_string()
}

fn default_sales_revenue_code() -> String {
    "4100".to_string()
}

/// Seed data.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Chart of accounts written by the seeder.
    #[serde(default = "default_seed_accounts")]
    pub accounts: Vec<SeedAccount>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            accounts: default_seed_accounts(),
        }
    }
}

/// One chart-of-accounts row to seed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedAccount {
    /// Account code, e.g. "1100".
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type name (asset, liability, equity, revenue, expense).
    pub account_type: String,
}

fn seed(code: &str, name: &str, account_type: &str) -> SeedAccount {
    SeedAccount {
        code: code.to_string(),
        name: name.to_string(),
        account_type: account_type.to_string(),
    }
}

fn default_seed_accounts() -> Vec<SeedAccount> {
    vec![
        seed("1100", "Kas dan Bank", "asset"),
        seed("1200", "Persediaan Barang", "asset"),
        seed("2100", "Utang Usaha", "liability"),
        seed("3100", "Modal", "equity"),
        seed("4100", "Pendapatan Penjualan", "revenue"),
        seed("5100", "Beban Pembelian Barang", "expense"),
        seed("5200", "Beban Operasional", "expense"),
    ]
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `TPPB__*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, BootstrapError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TPPB").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
