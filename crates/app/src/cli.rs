use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "reparto")]
#[command(about = "Customers, zone prices, delivery runs and cash ledger of a delivery round")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the data file.
    #[arg(long, global = true)]
    pub data_file: Option<String>,
    /// Override the directory delivery sheets are written to.
    #[arg(long, global = true)]
    pub export_dir: Option<String>,
    /// Override the log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage customers and their orders.
    #[command(subcommand)]
    Customer(CustomerCommand),
    /// Manage zones and unit prices.
    #[command(subcommand)]
    Zone(ZoneCommand),
    /// Export a delivery run and, once confirmed, reset pending units.
    Settle(SettleArgs),
    /// Manual cash ledger.
    #[command(subcommand)]
    Cash(CashCommand),
}

/// A customer, given by its number in `customer list` or by full name.
pub type CustomerArg = String;

#[derive(Subcommand, Debug)]
pub enum CustomerCommand {
    Add(CustomerAddArgs),
    List,
    /// Add boxes to a customer's pending order.
    Order {
        customer: CustomerArg,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Overwrite the pending units of a customer.
    SetPending {
        customer: CustomerArg,
        #[arg(allow_negative_numbers = true)]
        units: i64,
    },
    Edit(CustomerEditArgs),
    Delete {
        customer: CustomerArg,
    },
    /// Search by name or phone.
    Find {
        query: String,
    },
}

#[derive(Args, Debug)]
pub struct CustomerAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub zone: String,
    /// Usual delivery day.
    #[arg(long)]
    pub day: Option<String>,
    /// Tax id (RUT).
    #[arg(long)]
    pub rut: Option<String>,
}

#[derive(Args, Debug)]
pub struct CustomerEditArgs {
    pub customer: CustomerArg,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub zone: Option<String>,
    /// Usual delivery day; an empty value clears it.
    #[arg(long)]
    pub day: Option<String>,
    #[arg(long)]
    pub rut: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ZoneCommand {
    Add {
        name: String,
    },
    List,
    /// Set a custom unit price for a zone.
    Price {
        zone: String,
        #[arg(allow_negative_numbers = true)]
        price: i64,
    },
    /// Go back to the default price for a zone.
    ClearPrice {
        zone: String,
    },
    /// Change the price used by zones without a custom one.
    DefaultPrice {
        #[arg(allow_negative_numbers = true)]
        price: i64,
    },
}

#[derive(Args, Debug)]
pub struct SettleArgs {
    #[arg(long)]
    pub zone: Option<String>,
    #[arg(long)]
    pub day: Option<String>,
    /// Mark the run as delivered without asking.
    #[arg(long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum CashCommand {
    Add {
        /// income, expense or other.
        category: String,
        /// Amount such as `15000`, `10.000` or `2.500,50`.
        #[arg(allow_hyphen_values = true)]
        amount: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        reference: String,
    },
    List,
    Delete {
        id: String,
    },
    Totals,
}
