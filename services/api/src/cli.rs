use crate::demo::{
    run_catalog_export, run_chat, run_demo, run_emi, CatalogExportArgs, ChatArgs, DemoArgs,
    EmiArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Advisor",
    about = "Run and demonstrate the conversational loan advisor from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Replay a scripted eligibility conversation against the bundled lenders
    Demo(DemoArgs),
    /// Chat with the advisor interactively on stdin
    Chat(ChatArgs),
    /// Compute an EMI and optional amortization schedule
    Emi(EmiArgs),
    /// Work with the lender catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Write the catalog as a flattened CSV export
    Export(CatalogExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args).await,
        Command::Chat(args) => run_chat(args).await,
        Command::Emi(args) => run_emi(args),
        Command::Catalog {
            command: CatalogCommand::Export(args),
        } => run_catalog_export(args),
    }
}
