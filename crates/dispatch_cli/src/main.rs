//! Interactive ride-dispatch shell.
//!
//! All raw-string parsing and rendering lives here; the core only ever sees
//! typed arguments and returns typed results. No error aborts the loop.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use dispatch_core::dispatch::{Dispatch, DriverStatus, RideStatus};
use dispatch_core::ecs::{DriverId, RideId, RiderId};
use dispatch_core::lifecycle::RequestOutcome;

#[derive(Parser, Debug)]
#[command(name = "dispatch_cli", about = "Interactive ride-dispatch shell")]
struct Args {
    /// Run commands from a file instead of prompting on stdin
    #[arg(long)]
    script: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    RegisterRider(String),
    RegisterDriver(String),
    Request(u32),
    Complete(u32),
    Cancel(u32),
    Drivers,
    Rides,
    Ride(u32),
    DriverStatus(u32),
    Quote(f64),
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  rider <name>          register a rider
  driver <name>         register a driver (starts Available)
  request <rider-id>    request a ride for a rider
  complete <ride-id>    complete a matched ride
  cancel <ride-id>      cancel a requested or matched ride
  ride <ride-id>        show one ride
  rides                 list all rides
  drivers               list available drivers
  driver-status <id>    show one driver
  quote <km>            quote a fare for a trip distance
  help                  show this help
  quit                  exit";

fn parse_id(raw: &str) -> Result<u32, String> {
    raw.parse().map_err(|_| format!("not an id: {raw:?}"))
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };
    let command = match keyword {
        "rider" => Command::RegisterRider(rest.to_string()),
        "driver" => Command::RegisterDriver(rest.to_string()),
        "request" => Command::Request(parse_id(rest)?),
        "complete" => Command::Complete(parse_id(rest)?),
        "cancel" => Command::Cancel(parse_id(rest)?),
        "ride" => Command::Ride(parse_id(rest)?),
        "driver-status" => Command::DriverStatus(parse_id(rest)?),
        "quote" => Command::Quote(
            rest.parse()
                .map_err(|_| format!("not a distance: {rest:?}"))?,
        ),
        "drivers" => Command::Drivers,
        "rides" => Command::Rides,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(command))
}

fn render_ride(ride: &RideStatus) -> String {
    let driver = match (&ride.driver, &ride.driver_name) {
        (Some(id), Some(name)) => format!(" -> driver {id} ({name})"),
        _ => String::new(),
    };
    format!(
        "ride {} [{}] rider {} ({}){driver}",
        ride.id, ride.state, ride.rider, ride.rider_name
    )
}

fn render_driver(driver: &DriverStatus) -> String {
    format!("driver {} ({}) is {}", driver.id, driver.name, driver.state)
}

fn execute(app: &mut Dispatch, command: Command) -> String {
    match command {
        Command::RegisterRider(name) => match app.register_rider(&name) {
            Ok(id) => format!("registered rider {id} ({name})", name = name.trim()),
            Err(err) => err.to_string(),
        },
        Command::RegisterDriver(name) => match app.register_driver(&name) {
            Ok(id) => format!("registered driver {id} ({name})", name = name.trim()),
            Err(err) => err.to_string(),
        },
        Command::Request(id) => match app.request_ride(RiderId::from_raw(id)) {
            Ok(RequestOutcome::Matched { ride, driver }) => {
                format!("ride {ride} matched with driver {driver}")
            }
            Ok(RequestOutcome::NoDriverAvailable { ride }) => {
                format!("no driver available; ride {ride} stays requested")
            }
            Err(err) => err.to_string(),
        },
        Command::Complete(id) => match app.complete_ride(RideId::from_raw(id)) {
            Ok(ride) => format!("completed {}", render_ride(&ride)),
            Err(err) => err.to_string(),
        },
        Command::Cancel(id) => match app.cancel_ride(RideId::from_raw(id)) {
            Ok(ride) => format!("cancelled {}", render_ride(&ride)),
            Err(err) => err.to_string(),
        },
        Command::Ride(id) => match app.ride_status(RideId::from_raw(id)) {
            Ok(ride) => render_ride(&ride),
            Err(err) => err.to_string(),
        },
        Command::Rides => {
            let rides = app.list_rides();
            if rides.is_empty() {
                "no rides yet".to_string()
            } else {
                rides
                    .iter()
                    .map(render_ride)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::Drivers => {
            let drivers = app.available_drivers();
            if drivers.is_empty() {
                "no drivers available".to_string()
            } else {
                drivers
                    .iter()
                    .map(render_driver)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::DriverStatus(id) => match app.driver_status(DriverId::from_raw(id)) {
            Ok(driver) => render_driver(&driver),
            Err(err) => err.to_string(),
        },
        Command::Quote(distance_km) => match app.fare_quote(distance_km) {
            Ok(fare) => format!("estimated fare for {distance_km} km: {fare:.2}"),
            Err(err) => err.to_string(),
        },
        Command::Help => HELP.to_string(),
        // Handled by the caller.
        Command::Quit => String::new(),
    }
}

/// Feed one line through the shell. Returns `false` when the loop should
/// stop.
fn run_line(app: &mut Dispatch, line: &str) -> bool {
    match parse_command(line) {
        Ok(Some(Command::Quit)) => false,
        Ok(Some(command)) => {
            println!("{}", execute(app, command));
            true
        }
        Ok(None) => true,
        Err(message) => {
            println!("{message}");
            true
        }
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut app = Dispatch::new();

    if let Some(path) = args.script {
        for line in fs::read_to_string(path)?.lines() {
            if !run_line(&mut app, line) {
                break;
            }
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "dispatch> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if !run_line(&mut app, &line) {
            break;
        }
    }
    Ok(())
}
