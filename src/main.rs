use gantrykit::console::{ConsoleCommand, LogFollower, HELP};
use gantrykit::{init_logging, Config, JogController, SerialConnector, BUILD_DATE, VERSION};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = match std::env::args().nth(1) {
        Some(path) => Ok(PathBuf::from(path)),
        None => Config::default_path(),
    };
    let loaded = config_path
        .and_then(|path| Config::load_or_default(&path).map(|config| (path, config)));

    let config = match &loaded {
        Ok((_, config)) => config.clone(),
        Err(_) => Config::default(),
    };

    init_logging(&config.logging)?;
    tracing::info!("GantryKit {} (built {})", VERSION, BUILD_DATE);
    match loaded {
        Ok((path, _)) => tracing::info!("Configuration from {}", path.display()),
        Err(e) => tracing::warn!("Ignoring configuration, using defaults: {}", e),
    }

    let connector = Arc::new(SerialConnector::new(config.connection.clone()));
    let controller = JogController::launch(&config, connector).await;

    // Replay what happened during startup, then follow the log
    let mut subscription = controller.subscribe_to_log();
    let mut follower = LogFollower::default();
    for entry in controller.log_entries() {
        println!("{}", entry.display_line());
        follower = LogFollower::starting_at(entry.sequence + 1);
    }
    let log = controller.log().clone();
    let printer = tokio::spawn(async move {
        while let Some(entry) = subscription.next().await {
            for shown in follower.accept(entry, &log) {
                println!("{}", shown.display_line());
            }
        }
    });

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            ConsoleCommand::Press(direction) => {
                controller.start_movement(direction);
            }
            ConsoleCommand::Release(direction) => {
                controller.stop_movement(direction);
            }
            ConsoleCommand::Toggle(direction) => {
                if controller.is_moving(direction) {
                    controller.stop_movement(direction);
                } else {
                    controller.start_movement(direction);
                }
            }
            ConsoleCommand::Step(text) => {
                println!("step = {}", controller.set_step(&text));
            }
            ConsoleCommand::Reconnect => {
                println!("link: {}", controller.reconnect().await);
            }
            ConsoleCommand::Status => {
                let held: Vec<&str> = controller
                    .active_directions()
                    .iter()
                    .map(|d| d.label())
                    .collect();
                println!(
                    "link: {} | step: {} | held: {}",
                    controller.link_state(),
                    controller.step(),
                    if held.is_empty() {
                        "none".to_string()
                    } else {
                        held.join(", ")
                    }
                );
            }
            ConsoleCommand::Stop => controller.stop_all(),
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Quit => break,
        }
    }

    controller.shutdown().await;
    printer.abort();
    Ok(())
}
