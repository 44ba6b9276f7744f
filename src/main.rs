mod config;
mod dispatch;
mod rules;
mod runner;
mod settings;
mod template;
mod types;
mod webhook;

use log::{LevelFilter, error, info};
use rocket::{Build, Rocket, launch, routes};
use rules::RuleSet;
use settings::Settings;
use simplelog::{ColorChoice, SimpleLogger, TermLogger, TerminalMode};
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::process;

pub fn build_rocket(rules: RuleSet, settings: Settings) -> Rocket<Build> {
    let config = rocket::Config {
        port: settings.port,
        address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        ..rocket::Config::default()
    };
    rocket::build()
        .manage(rules)
        .manage(settings)
        .mount("/", routes![webhook::healthz, webhook::receive])
        .configure(config)
}

fn init_logger(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = simplelog::Config::default();
    if TermLogger::init(level, config.clone(), TerminalMode::Mixed, ColorChoice::Auto).is_err() {
        let _ = SimpleLogger::init(level, config);
    }
}

#[launch]
fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    init_logger(settings.debug);

    let Some(config_path) = std::env::args().nth(1) else {
        error!("pass one argument with the path to the config file");
        process::exit(2);
    };

    let rules = match config::load_rules(Path::new(&config_path)) {
        Ok(rules) => rules,
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    };

    info!(
        "loaded {} rule(s) from {config_path}: {}",
        rules.len(),
        rules.names().join(", ")
    );
    info!("listening on port {}", settings.port);

    build_rocket(rules, settings)
}
