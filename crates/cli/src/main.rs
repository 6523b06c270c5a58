//! Storekeeper CLI - Back-office store management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create the bootstrap admin account (password from STORE_ADMIN_PASSWORD)
//! sk-cli init
//!
//! # Build the catalog
//! sk-cli --user admin category add -n Snacks
//! sk-cli --user admin product add -n Chips -c <category-id> -p 1.50 -s 40
//!
//! # Ring up a sale and print the invoice
//! sk-cli --user clerk checkout --customer "Ana" --phone 0912345678 \
//!     --payment cash --item <product-id>:2
//!
//! # Monthly sales report
//! sk-cli --user admin report monthly --year 2024 --month 3
//! ```
//!
//! # Commands
//!
//! - `init` - Create the `admin` account if no admin exists
//! - `category` / `product` - Catalog management
//! - `user` - Account management (admin only)
//! - `checkout` - Place an order and print its invoice
//! - `order list` / `invoice show` / `invoice list` - Order history
//! - `report monthly` / `report range` - Sales reports
//!
//! The acting user is given with `--user` and `--password` (or
//! `STORE_PASSWORD`). Logs go to stderr (JSON with `STORE_LOG_FORMAT=json`);
//! invoices and reports go to stdout.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{CliError, Credentials};

#[derive(Parser)]
#[command(name = "sk-cli")]
#[command(author, version, about = "Storekeeper back-office tools")]
struct Cli {
    /// Directory holding the JSON documents (overrides `STORE_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Username of the acting back-office user
    #[arg(short, long, global = true, env = "STORE_USER")]
    user: Option<String>,

    /// Password of the acting back-office user
    #[arg(long, global = true, env = "STORE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the bootstrap admin account
    Init {
        /// Admin password (defaults to `STORE_ADMIN_PASSWORD`)
        #[arg(long)]
        admin_password: Option<String>,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage products and stock
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage back-office users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Place an order and print its invoice
    Checkout {
        /// Customer name
        #[arg(long)]
        customer: String,

        /// Customer phone (`09xxxxxxxx`)
        #[arg(long)]
        phone: String,

        /// Payment method (`cash`, `credit-card`)
        #[arg(long, default_value = "cash")]
        payment: String,

        /// Line as `PRODUCT_ID:QTY`, repeatable
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
    /// Browse orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Show invoices
    Invoice {
        #[command(subcommand)]
        action: InvoiceAction,
    },
    /// Sales reports
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Create a category
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List categories
    List,
    /// Delete an unused category
    Delete { id: String },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Create a product
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        category: String,

        /// Unit price, e.g. 12.50
        #[arg(short, long)]
        price: Decimal,

        /// Initial stock
        #[arg(short, long, default_value_t = 0)]
        stock: i32,

        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List products, optionally for one category
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Add units to a product's stock
    Restock {
        id: String,

        #[arg(short, long)]
        quantity: i32,
    },
    /// Delete a product
    Delete { id: String },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user
    Create {
        #[arg(long)]
        username: String,

        #[arg(long)]
        full_name: String,

        /// Role (`admin`, `employee`)
        #[arg(short, long, default_value = "employee")]
        role: String,

        /// Password for the new account
        #[arg(long, env = "STORE_NEW_USER_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
    /// List users
    List,
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders, optionally filtered by customer name
    List {
        #[arg(short, long)]
        customer: Option<String>,
    },
}

#[derive(Subcommand)]
enum InvoiceAction {
    /// Print the invoice for an order
    Show { order_id: String },
    /// Print invoices for a customer and/or month without storing them
    List {
        /// Customer name, matched case-insensitively as a substring
        #[arg(short, long)]
        customer: Option<String>,

        #[arg(long, requires = "month")]
        year: Option<i32>,

        #[arg(long, requires = "year")]
        month: Option<u32>,
    },
}

#[derive(Subcommand)]
enum ReportAction {
    /// Report for one calendar month
    Monthly {
        #[arg(long)]
        year: i32,

        #[arg(long)]
        month: u32,
    },
    /// Report for an inclusive date range (`YYYY-MM-DD`)
    Range {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,
    },
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storekeeper_backoffice=info,sk_cli=info".into());

    // JSON logs when STORE_LOG_FORMAT=json, text otherwise; both on stderr
    let is_json = std::env::var("STORE_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut state = commands::open_state(cli.data_dir)?;
    let credentials = Credentials::new(cli.user, cli.password);

    match cli.command {
        Commands::Init { admin_password } => {
            commands::init::bootstrap_admin(&mut state, admin_password)?;
        }
        Commands::Category { action } => {
            let actor = credentials.login(&mut state)?;
            match action {
                CategoryAction::Add { name, description } => {
                    commands::catalog::add_category(&mut state, &actor, name, description)?;
                }
                CategoryAction::List => commands::catalog::list_categories(&mut state)?,
                CategoryAction::Delete { id } => {
                    commands::catalog::delete_category(&mut state, &actor, &id)?;
                }
            }
        }
        Commands::Product { action } => {
            let actor = credentials.login(&mut state)?;
            match action {
                ProductAction::Add {
                    name,
                    category,
                    price,
                    stock,
                    description,
                } => commands::catalog::add_product(
                    &mut state,
                    &actor,
                    commands::catalog::ProductArgs {
                        name,
                        category,
                        price,
                        stock,
                        description,
                    },
                )?,
                ProductAction::List { category } => {
                    commands::catalog::list_products(&mut state, category.as_deref())?;
                }
                ProductAction::Restock { id, quantity } => {
                    commands::catalog::restock(&mut state, &actor, &id, quantity)?;
                }
                ProductAction::Delete { id } => {
                    commands::catalog::delete_product(&mut state, &actor, &id)?;
                }
            }
        }
        Commands::User { action } => {
            let actor = credentials.login(&mut state)?;
            match action {
                UserAction::Create {
                    username,
                    full_name,
                    role,
                    new_password,
                } => commands::users::create(
                    &mut state,
                    &actor,
                    username,
                    full_name,
                    &role,
                    new_password,
                )?,
                UserAction::List => commands::users::list(&mut state, &actor)?,
            }
        }
        Commands::Checkout {
            customer,
            phone,
            payment,
            items,
        } => {
            let actor = credentials.login(&mut state)?;
            commands::sales::checkout(&mut state, &actor, customer, phone, &payment, &items)?;
        }
        Commands::Order { action } => {
            credentials.login(&mut state)?;
            match action {
                OrderAction::List { customer } => {
                    commands::sales::list_orders(&mut state, customer.as_deref())?;
                }
            }
        }
        Commands::Invoice { action } => {
            credentials.login(&mut state)?;
            match action {
                InvoiceAction::Show { order_id } => {
                    commands::sales::show_invoice(&mut state, &order_id)?;
                }
                InvoiceAction::List {
                    customer,
                    year,
                    month,
                } => {
                    commands::sales::list_invoices(
                        &mut state,
                        customer.as_deref(),
                        year.zip(month),
                    )?;
                }
            }
        }
        Commands::Report { action } => {
            credentials.login(&mut state)?;
            match action {
                ReportAction::Monthly { year, month } => {
                    commands::reports::monthly(&mut state, year, month)?;
                }
                ReportAction::Range { from, to } => {
                    commands::reports::range(&mut state, &from, &to)?;
                }
            }
        }
    }
    Ok(())
}
