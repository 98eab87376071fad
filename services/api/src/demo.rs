use crate::infra::{load_catalog, InMemorySessionStore};
use clap::Args;
use loan_advisor::advisor::{
    build_amortization_schedule, compute_loan_details, market_stats, AdvisorService,
    CalculatorError, EvaluationConfig, LenderCatalog, ResponseEnvelope, ResponsePayload,
    SessionId,
};
use loan_advisor::config::AdvisorConfig;
use loan_advisor::error::AppError;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const DEMO_SCRIPT: [&str; 12] = [
    "Hello!",
    "I want to buy a new car",
    "What is Horizon Trust's auto loan rate?",
    "Compare lenders for me",
    "Am I eligible?",
    "home",
    "1500000",
    "20",
    "80000",
    "720",
    "5000",
    "salaried",
];

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Lender catalog CSV export. Defaults to the bundled lenders.
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Skip the market statistics summary after the conversation.
    #[arg(long)]
    pub(crate) skip_stats: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ChatArgs {
    /// Lender catalog CSV export. Defaults to the bundled lenders.
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Conversation identifier used for the interview state
    #[arg(long, default_value = "cli")]
    pub(crate) session: String,
}

#[derive(Args, Debug)]
pub(crate) struct EmiArgs {
    /// Loan principal
    #[arg(long)]
    pub(crate) amount: f64,
    /// Annual interest rate in percent
    #[arg(long)]
    pub(crate) rate: f64,
    /// Tenure in months
    #[arg(long)]
    pub(crate) tenure_months: u32,
    /// Print the month-by-month amortization schedule
    #[arg(long)]
    pub(crate) schedule: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogExportArgs {
    /// Source catalog CSV. Defaults to the bundled lenders.
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Destination file; stdout when omitted.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

fn catalog_from(path: Option<PathBuf>) -> Result<LenderCatalog, AppError> {
    load_catalog(&AdvisorConfig {
        catalog_csv: path,
        ..AdvisorConfig::default()
    })
}

fn advisor(catalog: LenderCatalog) -> AdvisorService<InMemorySessionStore> {
    AdvisorService::new(
        Arc::new(InMemorySessionStore::default()),
        Arc::new(catalog),
        EvaluationConfig::default(),
    )
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        catalog_csv,
        skip_stats,
    } = args;

    let catalog = catalog_from(catalog_csv)?;
    let stats = market_stats(&catalog);
    let service = advisor(catalog);
    let session = SessionId::new("demo");

    println!("Loan advisor demo");
    for line in DEMO_SCRIPT {
        let envelope = service.submit_utterance(&session, line).await?;
        println!("\n> {line}");
        println!("{}", format_envelope(&envelope));
    }

    if skip_stats {
        return Ok(());
    }

    match stats {
        Some(stats) => {
            println!("\nMarket snapshot ({} offers)", stats.total_offers);
            println!(
                "- Average rate {:.2}% | range {:.1}% to {:.1}%",
                stats.average_rate, stats.min_rate, stats.max_rate
            );
            println!(
                "- Cheapest on average: {} | priciest: {}",
                stats.lowest_average_type.label(),
                stats.highest_average_type.label()
            );
            println!(
                "- Widest range: {} with {} products",
                stats.most_offerings_lender, stats.most_offerings_count
            );
        }
        None => println!("\nMarket snapshot unavailable: catalog has no offers"),
    }

    Ok(())
}

pub(crate) async fn run_chat(args: ChatArgs) -> Result<(), AppError> {
    let ChatArgs {
        catalog_csv,
        session,
    } = args;

    let service = advisor(catalog_from(catalog_csv)?);
    let session = SessionId::new(session);

    println!("Loan advisor chat. Type \"reset\" to start over or \"exit\" to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        match text.to_ascii_lowercase().as_str() {
            "exit" | "quit" => break,
            "reset" => {
                service.reset(&session)?;
                println!("Conversation reset.");
            }
            _ => {
                let envelope = service.submit_utterance(&session, text).await?;
                println!("{}\n", format_envelope(&envelope));
            }
        }
    }

    Ok(())
}

pub(crate) fn run_emi(args: EmiArgs) -> Result<(), AppError> {
    let EmiArgs {
        amount,
        rate,
        tenure_months,
        schedule,
    } = args;

    let entries = build_amortization_schedule(amount, rate, tenure_months)?;
    let details = compute_loan_details(amount, rate, tenure_months).ok_or(
        CalculatorError::InvalidInput {
            principal: amount,
            annual_rate_percent: rate,
            tenure_months,
        },
    )?;

    println!(
        "EMI ₹{:.2} for ₹{:.0} at {}% over {} months",
        details.emi, details.principal, rate, tenure_months
    );
    println!(
        "- Total interest ₹{:.2} | total payment ₹{:.2}",
        details.total_interest, details.total_payment
    );

    if schedule {
        println!("\nMonth | Principal | Interest | Balance");
        for entry in entries {
            println!(
                "{:>5} | {:>9.2} | {:>8.2} | {:.2}",
                entry.period, entry.principal_portion, entry.interest_portion, entry.remaining_balance
            );
        }
    }

    Ok(())
}

pub(crate) fn run_catalog_export(args: CatalogExportArgs) -> Result<(), AppError> {
    let catalog = catalog_from(args.catalog_csv)?;
    match args.output {
        Some(path) => {
            catalog.write_csv(File::create(&path)?)?;
            println!("Wrote {} lenders to {}", catalog.lenders().len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            catalog.write_csv(&mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}

/// Plain-text rendering of one advisor reply.
pub(crate) fn format_envelope(envelope: &ResponseEnvelope) -> String {
    let mut out = String::new();
    if let Some(title) = &envelope.title {
        out.push_str(&format!("[{title}]\n"));
    }
    out.push_str(&envelope.display_text);

    if let Some(ResponsePayload::Comparison(comparison)) = &envelope.payload {
        for row in &comparison.rows {
            let emi = row
                .details
                .map(|details| format!("EMI ₹{:.0}", details.emi))
                .unwrap_or_else(|| "EMI n/a".to_string());
            out.push_str(&format!(
                "\n  - {}: {}% | up to {} years | {}",
                row.lender_name, row.annual_rate_percent, row.max_tenure_years, emi
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_conversation_ends_with_results() {
        let service = advisor(LenderCatalog::standard());
        let session = SessionId::new("demo-test");

        let mut last = None;
        for line in DEMO_SCRIPT {
            last = Some(
                service
                    .submit_utterance(&session, line)
                    .await
                    .expect("memory store never fails"),
            );
        }

        let result = last.expect("script is not empty");
        assert_eq!(result.verdicts().map(|verdicts| verdicts.len()), Some(3));
        assert!(format_envelope(&result).starts_with("[Home Loan Eligibility]"));
    }

    #[tokio::test]
    async fn comparison_rows_are_listed() {
        let service = advisor(LenderCatalog::standard());
        let envelope = service
            .submit_utterance(&SessionId::new("demo-compare"), "compare lenders")
            .await
            .expect("memory store never fails");

        let rendered = format_envelope(&envelope);
        assert_eq!(rendered.matches("\n  - ").count(), 3);
        assert!(rendered.contains("Apex Financial: 6.5%"));
    }

    #[test]
    fn emi_rejects_zero_tenure() {
        let result = run_emi(EmiArgs {
            amount: 100_000.0,
            rate: 9.0,
            tenure_months: 0,
            schedule: false,
        });
        assert!(matches!(result, Err(AppError::Calculator(_))));
    }
}
