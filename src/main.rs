use meetsync::config::{parse_port, Config};
use meetsync::display::print_slots;
use meetsync::schedule::generate_slots;
use meetsync::web;

const USAGE: &str = "usage:\n  meetsync [web [port]]\n  meetsync slots <HH:MM> <HH:MM> <YYYY-MM-DD>...";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = Config::from_env()?;
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("web") => {
            if let Some(port) = args.get(2) {
                config.port = parse_port(port)?;
            }
            web::start_server(config).await?;
        }
        Some("slots") => {
            // Offline check of the slot math for a window and some dates
            let (Some(start), Some(end)) = (args.get(2), args.get(3)) else {
                return Err(USAGE.into());
            };
            let dates = args.get(4..).unwrap_or_default();
            let slots = generate_slots(dates, start, end, config.timezone)?;
            print_slots(&slots, config.timezone);
        }
        Some(_) => return Err(USAGE.into()),
    }

    Ok(())
}
