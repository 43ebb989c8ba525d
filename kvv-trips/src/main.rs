use kvv_trips::domain::TripRequest;
use kvv_trips::efa::{EfaClient, EfaConfig, EfaError, MockTransport, Transport};
use kvv_trips::search::{SearchOutcome, TripCollection, TripSearch};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [origin, destination] = args.as_slice() else {
        eprintln!("Usage: kvv-trips <origin> <destination>");
        std::process::exit(2);
    };
    let request = TripRequest::departing_now(origin, destination);

    // Replay saved responses instead of calling the provider
    let result = if let Ok(dir) = std::env::var("EFA_MOCK_DIR") {
        let transport = MockTransport::from_dir(&dir).expect("Failed to load mock responses");
        println!("Using mock responses from {dir}");
        run(TripSearch::new(transport), request).await
    } else {
        let mut config = EfaConfig::default();
        if let Ok(url) = std::env::var("EFA_BASE_URL") {
            config = config.with_base_url(url);
        }
        let client = EfaClient::new(config).expect("Failed to create EFA client");
        run(TripSearch::new(client), request).await
    };

    if let Err(e) = result {
        eprintln!("Search failed: {e}");
        std::process::exit(1);
    }
}

async fn run<T: Transport>(mut search: TripSearch<T>, request: TripRequest) -> Result<(), EfaError> {
    let trips = match search.get_trips(request).await? {
        SearchOutcome::Found(trips) => trips,
        SearchOutcome::Ambiguous(choices) => {
            println!("Locations are ambiguous, candidates:");
            for suggestion in choices.origin_suggestions() {
                println!("  from: {}", suggestion.display_name());
            }
            for suggestion in choices.destination_suggestions() {
                println!("  to:   {}", suggestion.display_name());
            }

            let Some(precise) = choices.best_match() else {
                println!("Cannot pick a candidate for both ends.");
                return Ok(());
            };
            println!(
                "Searching {} -> {}",
                precise.request().origin(),
                precise.request().destination()
            );

            match search.get_trips(precise).await? {
                SearchOutcome::Found(trips) => trips,
                _ => {
                    println!("Still no unique trip list.");
                    return Ok(());
                }
            }
        }
        SearchOutcome::NoTarget(_) => {
            println!("No connection found.");
            return Ok(());
        }
    };

    print_trips(&trips);

    if let SearchOutcome::Found(later) = trips.next_page(&mut search).await? {
        println!();
        println!("Later:");
        print_trips(&later);
    }

    Ok(())
}

fn print_trips(trips: &TripCollection) {
    println!(
        "{} -> {}",
        trips.origin_name().unwrap_or("?"),
        trips.destination_name().unwrap_or("?")
    );

    for trip in trips {
        println!(
            "{} - {}  ({}, {} changes)  {}",
            trip.interval_raw.0,
            trip.interval_raw.1,
            trip.duration_raw,
            trip.change_count,
            trip.routes_used.join(", ")
        );
        for section in &trip.sections {
            println!(
                "    {} {} -> {} {}  {}",
                section.origin_time,
                section.origin_place,
                section.destination_time,
                section.destination_place,
                section.info_lines.first().map(String::as_str).unwrap_or("")
            );
        }
    }
}
