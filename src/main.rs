use clap::{Parser, Subcommand};

mod cmd;
mod ledger;
mod money;
mod tax;
mod utils;

#[derive(Parser, Debug)]
#[command(
    name = "irpcalc",
    version,
    about = "Paraguay IRP & IVA calculator for individual service providers"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full IRP and IVA summary from income and expense ledgers
    Summary(cmd::summary::SummaryCommand),
    /// IVA breakdown for a single ledger file
    Iva(cmd::iva::IvaCommand),
    /// List ledger entries with the IVA embedded in each amount
    Entries(cmd::entries::EntriesCommand),
    /// Report rows excluded from the calculations
    Validate(cmd::validate::ValidateCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Summary(cmd) => cmd.exec(),
        Command::Iva(cmd) => cmd.exec(),
        Command::Entries(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
