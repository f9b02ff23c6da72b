use calc::cli;
use calc::config::HealthConfig;
use calc::health;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() {
    calc::logging::init();

    let args = match health::parse_argv(&cli::args()) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("calc-health: {e}");
            eprintln!("{}", health::USAGE);
            std::process::exit(1);
        }
    };
    if args.help {
        println!("{}", health::USAGE);
        return;
    }

    let config = match HealthConfig::from_env(args.bind.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("calc-health: {e}");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(config.bind).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("calc-health: bind {}: {e}", config.bind);
            std::process::exit(1);
        }
    };
    info!(addr = %config.bind, "health endpoint listening");

    health::serve(listener, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await;
}
