//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;

use clap::{Args, Subcommand};
use telly_commerce::checkout::{PaymentProvider, PaymentStatus};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add an item, merging with a line of the same product and size.
    Add(AddArgs),
    /// Remove a line, or every size of a product when no size is given.
    Remove {
        /// Product ID.
        product_id: String,
        /// Size of the line to remove.
        #[arg(short, long)]
        size: Option<String>,
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Set the quantity of a line. Zero removes it.
    Set {
        /// Product ID.
        product_id: String,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
        /// Size of the line (default: the configured default size).
        #[arg(short, long)]
        size: Option<String>,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// List cart lines with count and total.
    Show,
}

/// Arguments for `cart add`.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    pub product_id: String,

    /// Display name.
    #[arg(short, long)]
    pub name: String,

    /// Unit price as a decimal, e.g. 49.99.
    #[arg(short, long)]
    pub price: f64,

    /// Size label (default: the configured default size).
    #[arg(short, long)]
    pub size: Option<String>,

    /// Quantity to add.
    #[arg(short, long, default_value = "1")]
    pub quantity: i64,

    /// Color label.
    #[arg(long)]
    pub color: Option<String>,

    /// Image URL.
    #[arg(long)]
    pub image: Option<String>,

    /// Bust measurement, for custom-size lines.
    #[arg(long)]
    pub bust: Option<f64>,

    /// Under-bust measurement, for custom-size lines.
    #[arg(long)]
    pub under_bust: Option<f64>,

    /// Waist measurement, for custom-size lines.
    #[arg(long)]
    pub waist: Option<f64>,

    /// Hips measurement, for custom-size lines.
    #[arg(long)]
    pub hips: Option<f64>,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    #[command(subcommand)]
    pub command: CheckoutCommand,
}

#[derive(Subcommand)]
pub enum CheckoutCommand {
    /// Show subtotal, shipping, tax and total for the cart.
    Quote,
    /// Build the payload a payment provider needs.
    Prepare(PrepareArgs),
    /// Record the provider's answer; a paid order clears the cart.
    Complete {
        /// Order number returned by `prepare`.
        #[arg(short, long)]
        order: String,
        /// Payment status (pending, paid, failed, refunded).
        #[arg(short, long, value_parser = parse_status)]
        status: PaymentStatus,
        /// Message from the provider.
        #[arg(short, long)]
        message: Option<String>,
        /// Payload file written by `prepare`; a paid order then gets a receipt.
        #[arg(long)]
        payload: Option<String>,
        /// Write the receipt here instead of printing it. Needs `--payload`.
        #[arg(long)]
        receipt: Option<String>,
    },
}

/// Arguments for `checkout prepare`.
#[derive(Args)]
pub struct PrepareArgs {
    /// Payment provider (stripe or paypal).
    #[arg(long, default_value = "stripe", value_parser = parse_provider)]
    pub provider: PaymentProvider,

    /// Customer name.
    #[arg(long)]
    pub name: String,

    /// Customer email.
    #[arg(long)]
    pub email: String,

    /// Customer phone.
    #[arg(long)]
    pub phone: Option<String>,

    /// Street address.
    #[arg(long)]
    pub address: String,

    /// Apartment, suite, etc.
    #[arg(long)]
    pub address2: Option<String>,

    #[arg(long)]
    pub city: String,

    /// State code, e.g. FL.
    #[arg(long)]
    pub state: String,

    #[arg(long)]
    pub zip: String,

    /// Write the payload to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

fn parse_provider(value: &str) -> Result<PaymentProvider, String> {
    PaymentProvider::from_name(value)
        .ok_or_else(|| format!("unknown provider '{}' (expected stripe or paypal)", value))
}

fn parse_status(value: &str) -> Result<PaymentStatus, String> {
    PaymentStatus::from_name(value).ok_or_else(|| format!("unknown payment status '{}'", value))
}
