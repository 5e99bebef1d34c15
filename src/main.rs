mod args;
mod progress;

use crate::args::{
    Args, Commands, DatabaseCommand, DatabaseRunArgs, LookupCommand, ReportCommand, TinCommand,
    TinRunArgs,
};
use crate::progress::ApiProgress;

use clap::Parser;
use persona::{
    api::Client,
    config::ClientConfig,
    job::{Accessor, RunResult, Stage},
    resources::{DatabaseVerificationInput, ReportRequest, TinVerificationInput},
};
use serde::Serialize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let synchronous = !args.no_wait;
    let config = ClientConfig::new(args.api_key.clone())
        .with_host(args.host.clone())
        .with_poll(args.poll());
    let client = Client::new(config)?;

    match args.command {
        Commands::Database(DatabaseCommand::Run(run)) => {
            let input = database_input(run);
            let result = track("database verification", synchronous, async {
                client.verifications().database().run(&input, synchronous).await
            })
            .await;
            conclude(result)
        }
        Commands::Tin(TinCommand::Run(run)) => {
            let input = tin_input(run);
            let result = track("TIN verification", synchronous, async {
                client.verifications().tin().run(&input, synchronous).await
            })
            .await;
            conclude(result)
        }
        Commands::Report(ReportCommand::Run(run)) => {
            let request = run
                .attributes
                .into_iter()
                .fold(ReportRequest::new(run.template_id), |request, (key, value)| {
                    request.attribute(key, value)
                });
            let result = track("report", synchronous, async {
                client.reports().run(&request, synchronous).await
            })
            .await;
            conclude(result)
        }
        Commands::Report(ReportCommand::Get { id }) => {
            let progress = ApiProgress::new_lookup("report");
            let fetched = client.reports().fetch(&id).await;
            progress.finish_and_clear();
            print_json(&fetched?)
        }
        Commands::Verification(LookupCommand::Get { id }) => {
            let progress = ApiProgress::new_lookup("verification");
            let fetched = client.verifications().fetch(&id).await;
            progress.finish_and_clear();
            print_json(&fetched?)
        }
        Commands::Inquiry(LookupCommand::Get { id }) => {
            let progress = ApiProgress::new_lookup("inquiry");
            let fetched = client.inquiries().fetch(&id).await;
            progress.finish_and_clear();
            print_json(&fetched?)
        }
    }
}

fn database_input(args: DatabaseRunArgs) -> DatabaseVerificationInput {
    DatabaseVerificationInput {
        inquiry_id: args.inquiry_id,
        name_first: args.name_first,
        name_last: args.name_last,
        address_street_1: args.street,
        address_street_2: args.street_2,
        address_city: args.city,
        address_subdivision: args.subdivision,
        address_postal_code: args.postal_code,
        identification_number: args.identification_number,
        birthdate: args.birthdate,
        phone_number: args.phone,
        email_address: args.email,
        country_code: args.country,
        idempotency_key: args.idempotency_key,
    }
}

fn tin_input(args: TinRunArgs) -> TinVerificationInput {
    TinVerificationInput {
        name_business: args.name_business,
        tin: args.tin,
        verification_template_id: args.template_id,
        country_code: None,
    }
}

async fn track<R, F>(kind: &str, synchronous: bool, run: F) -> RunResult<R>
where
    F: std::future::Future<Output = RunResult<R>>,
{
    let progress = if synchronous {
        ApiProgress::new_polling(kind)
    } else {
        ApiProgress::new_submit(kind)
    };
    let result = run.await;

    let message = match (result.success(), result.stage()) {
        (true, Stage::Complete) => format!("✅ {kind} finished"),
        (true, stage) => format!("📨 {kind} dispatched after {stage}"),
        (false, stage) => format!("❌ {kind} failed at {stage}"),
    };
    progress.finish_with_message(&message);
    result
}

fn conclude<R: Serialize>(result: RunResult<R>) -> anyhow::Result<()> {
    // A timed out run still shows how far the job got.
    if !result.success() {
        if let Some(last_seen) = result.resource() {
            print_json(last_seen)?;
        }
    }
    let resource = result.into_result()?;
    print_json(&resource)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
