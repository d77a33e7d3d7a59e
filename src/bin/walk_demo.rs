use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use stride_core::client::SimulatedClient;
use stride_core::events::ChannelEvents;
use stride_core::navigation::planner::{DirectionsProvider, StaticPlanner, StraightLinePlanner};
use stride_core::{
    Coordinate, RoutedStrategy, Session, StepCallback, WalkEvent, WalkSettings, WalkStrategy,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Walk a simulated agent to a target in human-like steps
#[derive(Debug, Parser)]
struct Args {
    #[arg(long, allow_hyphen_values = true)]
    start_lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    start_lng: f64,
    #[arg(long, allow_hyphen_values = true)]
    target_lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    target_lng: f64,
    /// JSON file with walking settings
    #[arg(long)]
    settings: Option<String>,
    /// JSON file with a fixed route, otherwise a straight line is routed
    #[arg(long)]
    route: Option<String>,
    /// Override the configured walking speed, km/h
    #[arg(long)]
    speed: Option<f64>,
    /// Simulated latency of every position update, milliseconds
    #[arg(long, default_value_t = 250)]
    latency_ms: u64,
    /// Cancel the walk after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Pretend the routing provider is rate limited
    #[arg(long)]
    over_quota: bool,
    /// Log every step
    #[arg(short, long)]
    verbose: bool,
}

/// Logs a line after every step, standing in for work done between steps
struct StepLogger {
    steps: usize,
}

#[async_trait]
impl StepCallback for StepLogger {
    async fn on_step(&mut self) -> anyhow::Result<()> {
        self.steps += 1;
        if self.steps % 10 == 0 {
            log::info!("{} steps taken", self.steps);
        }
        Ok(())
    }
}

fn log(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("initialize logger");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    log(args.verbose);

    let mut settings = match &args.settings {
        Some(path) => WalkSettings::from_json_file(path)?,
        None => WalkSettings::default(),
    };
    if let Some(speed) = args.speed {
        let mut params = HashMap::new();
        params.insert("walking_speed_kmh".to_string(), speed);
        settings.configure(&params)?;
    }

    let directions: Arc<dyn DirectionsProvider> = if args.over_quota {
        Arc::new(StaticPlanner::over_query_limit())
    } else if let Some(path) = &args.route {
        Arc::new(StaticPlanner::from_json_file(path)?)
    } else {
        Arc::new(StraightLinePlanner)
    };

    let start = Coordinate::new(args.start_lat, args.start_lng);
    let target = Coordinate::new(args.target_lat, args.target_lng);
    let client = Arc::new(SimulatedClient::new(
        start,
        Duration::from_millis(args.latency_ms),
    ));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let events = Arc::new(ChannelEvents::new(tx));
    let listener = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                WalkEvent::PositionChanged {
                    latitude,
                    longitude,
                } => log::debug!("Position changed: {{lat: {}, lng: {}}}", latitude, longitude),
                WalkEvent::Path(path) if path.calculated => {
                    log::info!("Planned path:\n{}", path.path)
                }
                WalkEvent::Path(path) => log::info!("Walked path:\n{}", path.path),
            }
        }
    });

    let cancel = CancellationToken::new();
    if let Some(secs) = args.timeout_secs {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            cancel.cancel();
        });
    }

    let session = Session::new(settings, directions);
    let mut strategy = RoutedStrategy::new(client.clone(), events);
    let mut callback = StepLogger { steps: 0 };

    log::info!("Walking from {} to {} with {}", start, target, strategy.name());
    let result = strategy
        .walk(target, Some(&mut callback), &session, &cancel)
        .await;
    drop(strategy);
    listener.await?;

    match result {
        Ok(Some(ack)) => log::info!(
            "Arrived at {} after {} updates",
            ack.position,
            client.update_count()
        ),
        Ok(None) => log::info!("Already at the target"),
        Err(e) if e.is_cancelled() => {
            log::warn!("Walk cancelled after {} updates", client.update_count())
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
