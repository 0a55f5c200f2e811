// Private maximum of a batch of secrets with the Max-AFE.
//
// Runs the reference batch once over in-process channels, then repeats random
// batches through the in-memory entry points and compares the observed
// failure rate with the soundness bound.

use std::{env, error::Error, process::exit, time::Instant};

use afe::{aggregate_server, encode_batch, finalize, run_local, MaxAfeParametersBuilder};
use afe_math::bits::BitMatrix;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{distributions::Uniform, prelude::Distribution, rngs::OsRng, thread_rng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const REFERENCE_SECRETS: [i64; 7] = [1, 15, 60, 95, 42, 99, 23];

fn print_notice_and_exit(error: Option<String>) {
    println!(
        "{} Private maximum aggregation with the Max-AFE",
        style("  overview:").magenta().bold()
    );
    println!(
        "{} max_aggregation [-h] [--help] [--domain_size=<value>] [--lambda=<value>] [--num_servers=<value>] [--num_clients=<value>] [--trials=<value>]",
        style("     usage:").magenta().bold()
    );
    println!(
        "{} {} {} and {} must be at least 1, and {} at least 2",
        style("constraints:").magenta().bold(),
        style("domain_size").blue(),
        style("lambda").blue(),
        style("num_clients").blue(),
        style("num_servers").blue(),
    );
    if let Some(error) = error {
        println!("{} {}", style("     error:").red().bold(), error);
    }
    exit(0);
}

fn parse_arg(arg: &str, name: &str) -> usize {
    let parts: Vec<&str> = arg.rsplit('=').collect();
    match (parts.len(), parts[0].parse::<usize>()) {
        (2, Ok(value)) => value,
        _ => {
            print_notice_and_exit(Some(format!("Invalid `--{name}` argument")));
            0
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "afe=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    if args.contains(&"-h".to_string()) || args.contains(&"--help".to_string()) {
        print_notice_and_exit(None)
    }

    let mut domain_size = 100;
    let mut lambda = 50;
    let mut num_servers = 2;
    let mut num_clients = 7;
    let mut trials = 100;

    for arg in &args {
        if arg.starts_with("--domain_size") {
            domain_size = parse_arg(arg, "domain_size")
        } else if arg.starts_with("--lambda") {
            lambda = parse_arg(arg, "lambda")
        } else if arg.starts_with("--num_servers") {
            num_servers = parse_arg(arg, "num_servers")
        } else if arg.starts_with("--num_clients") {
            num_clients = parse_arg(arg, "num_clients")
        } else if arg.starts_with("--trials") {
            trials = parse_arg(arg, "trials")
        } else {
            print_notice_and_exit(Some(format!("Unrecognized argument: {arg}")))
        }
    }

    if num_clients == 0 {
        print_notice_and_exit(Some("Number of clients must be nonzero".to_string()))
    }

    let par = match MaxAfeParametersBuilder::new()
        .set_domain_size(domain_size)
        .set_lambda(lambda)
        .set_num_servers(num_servers)
        .build_arc()
    {
        Ok(par) => par,
        Err(e) => {
            print_notice_and_exit(Some(e.to_string()));
            return Ok(());
        }
    };

    println!("# Private maximum aggregation");
    println!("\tdomain_size = {domain_size}");
    println!("\tlambda = {lambda}");
    println!("\tnum_servers = {num_servers}");
    println!("\tnum_clients = {num_clients}");
    println!(
        "\tsoundness error bound = {:e}",
        par.soundness_error_bound()
    );

    // Reference batch, one thread per server.
    if REFERENCE_SECRETS.iter().all(|s| (*s as usize) < domain_size) {
        let start = Instant::now();
        let max = run_local(&REFERENCE_SECRETS, &par, &mut OsRng)?;
        println!(
            "{} secrets {:?} -> maximum {} in {:?}",
            style("reference:").green().bold(),
            REFERENCE_SECRETS,
            max,
            start.elapsed()
        );
    }

    // Random batches.
    let mut rng = thread_rng();
    let distribution = Uniform::new(0, domain_size as i64);
    let progress = ProgressBar::new(trials as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let mut failures = 0usize;
    let start = Instant::now();
    for _ in 0..trials {
        let secrets: Vec<i64> = distribution
            .sample_iter(&mut rng)
            .take(num_clients)
            .collect();
        let expected = secrets.iter().copied().max().unwrap_or_default() as usize;

        let shares = encode_batch(&secrets, &par, &mut OsRng)?;
        let aggregates = (0..num_servers)
            .map(|server_id| {
                let inbox: Vec<BitMatrix> = shares
                    .iter()
                    .map(|client| client[server_id].matrix().clone())
                    .collect();
                aggregate_server(&inbox, &par)
            })
            .collect::<Result<Vec<_>, _>>()?;

        match finalize(&aggregates, &par) {
            Ok(max) if max == expected => {}
            _ => failures += 1,
        }
        progress.inc(1);
    }
    progress.finish_with_message("Done");

    println!(
        "{} {} of {} trials decoded the true maximum in {:?}",
        style("   trials:").green().bold(),
        trials - failures,
        trials,
        start.elapsed()
    );
    if trials > 0 {
        println!(
            "{} observed {:e}, bound {:e}",
            style("  failures:").green().bold(),
            failures as f64 / trials as f64,
            par.soundness_error_bound()
        );
    }

    Ok(())
}
