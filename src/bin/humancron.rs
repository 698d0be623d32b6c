use clap::Parser;
use humancron::{CronContext, Dialect, QuartzOutput, ScheduleSpec, SystemClock, Tzdb};
use std::process;

#[derive(Parser)]
#[command(name = "humancron", about = "Natural-language schedules to cron and back", version)]
struct Cli {
    /// Schedule expression (e.g., "every weekday at 2pm")
    expression: Option<String>,

    /// Convert the expression to a Unix 5-field cron expression
    #[arg(long)]
    to_cron: bool,

    /// Convert the expression to a 6-field NCrontab expression
    #[arg(long)]
    to_ncrontab: bool,

    /// Convert the expression to Quartz output
    #[arg(long)]
    to_quartz: bool,

    /// Zone the cron daemon runs in (with --to-cron)
    #[arg(long)]
    server_zone: Option<String>,

    /// Zone the expression's time of day is interpreted in
    #[arg(long)]
    user_zone: Option<String>,

    /// Validate the expression without converting
    #[arg(long)]
    check: bool,

    /// Show the parsed schedule
    #[arg(long)]
    parse: bool,

    /// Convert a cron expression back to its human form
    #[arg(long)]
    from_cron: Option<String>,

    /// Dialect for --from-cron: unix, ncrontab, or quartz
    #[arg(long, default_value = "unix")]
    dialect: String,
}

fn main() {
    let cli = Cli::parse();

    if let Some(ref cron_expr) = cli.from_cron {
        let dialect = match cli.dialect.parse::<Dialect>() {
            Ok(d) => d,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(2);
            }
        };
        match humancron::to_natural(cron_expr, dialect) {
            Ok(text) => {
                println!("{text}");
                process::exit(0);
            }
            Err(e) => {
                eprintln!("{}", e.display_rich(cron_expr));
                process::exit(1);
            }
        }
    }

    let expression = match cli.expression {
        Some(ref expr) => expr.as_str(),
        None => {
            eprintln!("error: no expression provided");
            process::exit(2);
        }
    };

    let mut spec = match ScheduleSpec::parse(expression) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e.display_rich(expression));
            process::exit(1);
        }
    };

    if let Some(ref zone) = cli.user_zone {
        spec = match spec.with_time_zone(zone) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}", e.display_rich(expression));
                process::exit(1);
            }
        };
    }

    if cli.check {
        println!("\u{2713} valid");
        process::exit(0);
    }

    if cli.parse {
        println!("{spec:#?}");
        process::exit(0);
    }

    if cli.to_cron || cli.to_ncrontab {
        let clock = SystemClock;
        let zones = Tzdb;
        let ctx = CronContext::new(cli.server_zone.as_deref(), &clock, &zones);
        let result = if cli.to_cron {
            spec.to_cron(&ctx)
        } else {
            spec.to_ncrontab(&ctx)
        };
        match result {
            Ok(expr) => {
                println!("{expr}");
                process::exit(0);
            }
            Err(e) => {
                eprintln!("{}", e.display_rich(expression));
                process::exit(1);
            }
        }
    }

    if cli.to_quartz {
        match spec.to_quartz() {
            Ok(QuartzOutput::Cron(expr)) => {
                println!("{expr}");
                process::exit(0);
            }
            Ok(QuartzOutput::CalendarInterval(interval)) => {
                match serde_json::to_string_pretty(&interval) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("error: failed to serialize: {e}");
                        process::exit(1);
                    }
                }
                process::exit(0);
            }
            Err(e) => {
                eprintln!("{}", e.display_rich(expression));
                process::exit(1);
            }
        }
    }

    // Default: print the canonical form.
    println!("{spec}");
}
