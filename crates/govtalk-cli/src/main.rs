// crates/govtalk-cli/src/main.rs
// ============================================================================
// Module: GovTalk CLI Entry Point
// Description: Command dispatcher for VAT filing and gateway housekeeping.
// Purpose: Provide a thin demonstration surface over the envelope engine.
// Dependencies: clap, govtalk-core, govtalk-hmrc, govtalk-transport, toml
// ============================================================================

//! ## Overview
//! The govtalk binary files VAT declarations, polls for their results, and
//! deletes stored responses. It is a thin demonstration of the library
//! crates: one command maps onto one service call, and the outcome is
//! printed as plain text. Credentials come from the TOML config file only.

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "The CLI's output surface is stdout/stderr by design."
)]

// ============================================================================
// SECTION: Modules
// ============================================================================

mod config;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use govtalk_companieshouse::CompaniesHouseService;
use govtalk_companieshouse::Dataset;
use govtalk_core::CorrelationId;
use govtalk_core::MessageClass;
use govtalk_core::SendOutcome;
use govtalk_hmrc::VatDeclaration;
use govtalk_hmrc::VatPollOutcome;
use govtalk_hmrc::VatReturnBoxes;
use govtalk_hmrc::VatService;
use govtalk_transport::HttpTransport;
use url::Url;

use crate::config::CliConfig;

// ============================================================================
// SECTION: Command Surface
// ============================================================================

/// GovTalk gateway client for VAT filing and housekeeping.
#[derive(Debug, Parser)]
#[command(name = "govtalk", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "govtalk.toml")]
    config: PathBuf,
    /// Command to run.
    #[command(subcommand)]
    command: Command,
}

/// Supported commands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a VAT declaration and print the poll receipt.
    VatSubmit(VatSubmitArgs),
    /// Poll a pending VAT declaration by correlation id.
    VatPoll(VatPollArgs),
    /// Delete a stored response from the gateway.
    Delete(DeleteArgs),
    /// Search Companies House by company name.
    CompanySearch(CompanySearchArgs),
}

/// Arguments for the vat-submit command.
#[derive(Debug, clap::Args)]
struct VatSubmitArgs {
    /// VAT registration number, with or without the GB prefix.
    #[arg(long)]
    vat_number: String,
    /// Return period in YYYY-MM form.
    #[arg(long)]
    period: String,
    /// Capacity the return is submitted under (Company, Agent, and so on).
    #[arg(long, default_value = "Company")]
    capacity: String,
    /// Box 1: VAT due on outputs.
    #[arg(long)]
    box1: f64,
    /// Box 2: VAT due on EC acquisitions.
    #[arg(long)]
    box2: f64,
    /// Box 3: total VAT; derived from boxes 1 and 2 when omitted.
    #[arg(long)]
    box3: Option<f64>,
    /// Box 4: VAT reclaimed on inputs.
    #[arg(long)]
    box4: f64,
    /// Box 5: net VAT; derived from boxes 3 and 4 when omitted.
    #[arg(long)]
    box5: Option<f64>,
    /// Box 6: net sales and outputs.
    #[arg(long)]
    box6: f64,
    /// Box 7: net purchases and inputs.
    #[arg(long)]
    box7: f64,
    /// Box 8: net EC supplies.
    #[arg(long)]
    box8: f64,
    /// Box 9: net EC acquisitions.
    #[arg(long)]
    box9: f64,
    /// Mark this return as final.
    #[arg(long)]
    final_return: bool,
}

/// Arguments for the vat-poll command.
#[derive(Debug, clap::Args)]
struct VatPollArgs {
    /// Correlation id from the submission receipt.
    #[arg(long)]
    correlation_id: String,
    /// Poll URL from the submission receipt; the service default otherwise.
    #[arg(long)]
    poll_url: Option<String>,
}

/// Arguments for the delete command.
#[derive(Debug, clap::Args)]
struct DeleteArgs {
    /// Correlation id of the stored response.
    #[arg(long)]
    correlation_id: String,
    /// Message class the original submission used.
    #[arg(long)]
    class: String,
}

/// Arguments for the company-search command.
#[derive(Debug, clap::Args)]
struct CompanySearchArgs {
    /// Company name to search for.
    #[arg(long)]
    name: String,
    /// Dataset to search: live, dissolved, former, or proposed.
    #[arg(long, default_value = "live")]
    dataset: String,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Parses arguments, runs the selected command, and reports the outcome.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatches one command against a freshly configured service.
fn run(cli: &Cli) -> Result<(), String> {
    let config = CliConfig::load(&cli.config).map_err(|error| error.to_string())?;
    let transport =
        HttpTransport::new(config.transport_config()).map_err(|error| error.to_string())?;

    match &cli.command {
        Command::VatSubmit(args) => submit(&mut vat_service(&config, transport)?, args),
        Command::VatPoll(args) => poll(&mut vat_service(&config, transport)?, args),
        Command::Delete(args) => delete(&mut vat_service(&config, transport)?, args),
        Command::CompanySearch(args) => {
            let mut service = CompaniesHouseService::new(
                &config.gateway.sender_id,
                &config.gateway.password,
                transport,
            )
            .map_err(|error| error.to_string())?;
            company_search(&mut service, args)
        }
    }
}

/// Builds the VAT service for the configured endpoint.
fn vat_service(
    config: &CliConfig,
    transport: HttpTransport,
) -> Result<VatService<HttpTransport>, String> {
    let endpoint = config.service_endpoint().map_err(|error| error.to_string())?;
    VatService::new(&config.gateway.sender_id, &config.gateway.password, endpoint, transport)
        .map_err(|error| error.to_string())
}

// ============================================================================
// SECTION: Command Handlers
// ============================================================================

/// Submits a declaration and prints the poll receipt.
fn submit(service: &mut VatService<HttpTransport>, args: &VatSubmitArgs) -> Result<(), String> {
    let boxes = VatReturnBoxes {
        vat_due_on_outputs: args.box1,
        vat_due_on_ec_acquisitions: args.box2,
        total_vat: args.box3,
        vat_reclaimed_on_inputs: args.box4,
        net_vat: args.box5,
        net_sales_and_outputs: args.box6,
        net_purchases_and_inputs: args.box7,
        net_ec_supplies: args.box8,
        net_ec_acquisitions: args.box9,
    };
    let declaration = VatDeclaration::new(
        &args.vat_number,
        &args.period,
        &args.capacity,
        boxes,
        args.final_return,
    )
    .map_err(|error| error.to_string())?;

    let receipt = service.submit(&declaration).map_err(|error| error.to_string())?;
    println!("submission acknowledged");
    println!("correlation id: {}", receipt.correlation_id.as_str());
    println!("poll endpoint:  {}", receipt.endpoint.endpoint);
    if let Some(interval) = receipt.endpoint.poll_interval {
        println!("poll after:     {interval}s");
    }
    Ok(())
}

/// Polls a pending declaration and prints the result.
fn poll(service: &mut VatService<HttpTransport>, args: &VatPollArgs) -> Result<(), String> {
    let correlation =
        CorrelationId::new(args.correlation_id.clone()).map_err(|error| error.to_string())?;
    let poll_url = match args.poll_url.as_deref() {
        Some(raw) => Some(Url::parse(raw).map_err(|error| error.to_string())?),
        None => None,
    };

    match service.poll(Some(correlation), poll_url).map_err(|error| error.to_string())? {
        VatPollOutcome::Pending(receipt) => {
            println!("still pending");
            println!("correlation id: {}", receipt.correlation_id.as_str());
            if let Some(interval) = receipt.endpoint.poll_interval {
                println!("poll after:     {interval}s");
            }
        }
        VatPollOutcome::Accepted(acceptance) => {
            println!("declaration accepted at {}", acceptance.accepted_time);
            for message in &acceptance.messages {
                println!("message: {message}");
            }
            println!("period:  {} ({} to {})", acceptance.period.id, acceptance.period.start, acceptance.period.end);
            println!("net vat: {}", acceptance.payment.net_vat);
            if !acceptance.payment.narrative.is_empty() {
                println!("payment: {}", acceptance.payment.narrative);
            }
        }
    }
    Ok(())
}

/// Deletes a stored response from the gateway.
fn delete(service: &mut VatService<HttpTransport>, args: &DeleteArgs) -> Result<(), String> {
    let correlation =
        CorrelationId::new(args.correlation_id.clone()).map_err(|error| error.to_string())?;
    let class = MessageClass::new(args.class.clone()).map_err(|error| error.to_string())?;

    let deleted = service
        .client_mut()
        .send_delete_request(Some((correlation, class)))
        .map_err(|error| error.to_string())?;
    if deleted {
        println!("response deleted");
        Ok(())
    } else {
        let outcome = service.client().outcome().map_or("unknown", outcome_label);
        Err(format!("gateway refused the delete ({outcome})"))
    }
}

/// Runs a company name search and prints the matches.
fn company_search(
    service: &mut CompaniesHouseService<HttpTransport>,
    args: &CompanySearchArgs,
) -> Result<(), String> {
    let dataset = match args.dataset.as_str() {
        "live" => Dataset::Live,
        "dissolved" => Dataset::Dissolved,
        "former" => Dataset::Former,
        "proposed" => Dataset::Proposed,
        other => return Err(format!("unknown dataset `{other}`")),
    };
    let results =
        service.company_name_search(&args.name, dataset).map_err(|error| error.to_string())?;
    if let Some(exact) = &results.exact {
        println!("exact match: {} ({})", exact.name, exact.number);
    }
    for company in &results.matches {
        println!("match: {} ({})", company.name, company.number);
    }
    if results.matches.is_empty() {
        println!("no matches");
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns a short label for a send outcome.
const fn outcome_label(outcome: &SendOutcome) -> &'static str {
    match outcome {
        SendOutcome::Acknowledged(_) => "acknowledged",
        SendOutcome::Completed => "completed",
        SendOutcome::Errored => "gateway errors reported",
        SendOutcome::Parsed(_) => "unclassified reply",
        SendOutcome::Unparsed => "unparsed reply",
    }
}
