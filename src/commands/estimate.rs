use anyhow::{anyhow, Result};
use colored::Colorize;
use savvy_it::{
    config,
    estimator::EstimatorSession,
    pricing::{
        models::complexity_label, EstimateRequest, PricingEngine, QuotedEstimate, ServiceCategory,
        Urgency,
    },
};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::EstimateArgs;

/// Execute the estimate command
pub async fn execute(config_path: &Path, args: &EstimateArgs) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let engine = cfg.estimator.engine();

    let urgency = if args.emergency {
        Urgency::Emergency
    } else {
        Urgency::Standard
    };
    let request = EstimateRequest::new(
        args.service.parse::<ServiceCategory>()?,
        args.complexity,
        args.devices,
        urgency,
    );

    if args.interactive {
        return interactive(engine, cfg.estimator.display_delay(), request).await;
    }

    let quote = QuotedEstimate::from(engine.breakdown(&request)?);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(());
    }

    print_request(&engine.validate(&request)?);
    println!();
    println!("  {}", quote.headline.dimmed());
    println!("  {}", quote.summary().green().bold());
    println!("  {}", quote.disclaimer.dimmed());
    Ok(())
}

fn print_request(request: &EstimateRequest) {
    println!("  {}: {}", "Service".cyan(), request.service.label());
    println!(
        "  {}: {} ({})",
        "Complexity".cyan(),
        request.complexity,
        complexity_label(request.complexity).unwrap_or("?")
    );
    println!("  {}: {}", "Devices".cyan(), request.devices);
    println!("  {}: {}", "Response".cyan(), request.urgency.label());
}

/// One line typed in interactive mode
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputChange {
    Service(ServiceCategory),
    Complexity(i32),
    Devices(i32),
    Urgency(Urgency),
    Show,
    Quit,
}

fn parse_input(line: &str) -> Result<InputChange> {
    let mut words = line.split_whitespace();
    let command = words.next().ok_or_else(|| anyhow!("empty input"))?;
    let value = words.next();

    let value_of = |name: &str| value.ok_or_else(|| anyhow!("usage: {} <value>", name));

    match command {
        "service" | "s" => Ok(InputChange::Service(value_of("service")?.parse()?)),
        "complexity" | "c" => Ok(InputChange::Complexity(value_of("complexity")?.parse()?)),
        "devices" | "d" => Ok(InputChange::Devices(value_of("devices")?.parse()?)),
        "urgency" | "u" => Ok(InputChange::Urgency(value_of("urgency")?.parse()?)),
        "show" => Ok(InputChange::Show),
        "quit" | "exit" | "q" => Ok(InputChange::Quit),
        other => Err(anyhow!("unknown command '{}'", other)),
    }
}

/// Drive an [`EstimatorSession`] from stdin, printing each displayed value
async fn interactive(
    engine: PricingEngine,
    display_delay: std::time::Duration,
    request: EstimateRequest,
) -> Result<()> {
    let mut session = EstimatorSession::with_request(engine, display_delay, request)?;
    let mut views = session.subscribe();

    let printer = tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = *views.borrow_and_update();
            if !view.calculating {
                println!("  {}", view.render().green().bold());
            }
        }
    });

    println!("{}", "Savvy IT cost estimator".bold());
    println!(
        "{}",
        "Commands: service <slug>, complexity <1-4>, devices <1-15>, urgency <normal|emergency>, show, quit"
            .dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let change = match parse_input(&line) {
            Ok(change) => change,
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
                continue;
            }
        };

        let outcome = match change {
            InputChange::Service(service) => session.set_category(service),
            InputChange::Complexity(level) => session.set_complexity(level),
            InputChange::Devices(devices) => session.set_devices(devices),
            InputChange::Urgency(urgency) => session.set_urgency(urgency),
            InputChange::Show => {
                print_request(session.request());
                println!("  {}", session.current().render());
                continue;
            }
            InputChange::Quit => break,
        };

        if let Err(e) = outcome {
            eprintln!("  {}", e.to_string().red());
        }
    }

    // Let a pending display land before closing the channel
    if session.current().calculating {
        tokio::time::sleep(display_delay).await;
    }
    drop(session);
    let _ = printer.await;
    Ok(())
}
