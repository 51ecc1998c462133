use std::sync::Arc;

use {
    clap::{Parser, Subcommand},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    wuphf_channels::TransportRegistry,
    wuphf_common::types::{ChannelKind, Message},
    wuphf_dispatch::{DispatchService, HistoryFilter, InMemoryStore},
};

#[derive(Parser)]
#[command(name = "wuphf", about = "WUPHF! One message, every channel.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a wuphf across the selected channels.
    Send {
        /// Sender name.
        #[arg(long)]
        from: String,
        /// Recipient name.
        #[arg(long)]
        to: String,
        /// Message body.
        #[arg(short, long)]
        message: String,
        /// Comma-separated channels (defaults to all of them).
        #[arg(long, value_delimiter = ',')]
        channels: Vec<ChannelKind>,
    },
    /// List supported channels.
    Channels,
    /// Send a few sample wuphfs and show the resulting history.
    Demo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let registry = Arc::new(TransportRegistry::simulated());
    let store = Arc::new(InMemoryStore::new());
    let service = DispatchService::new(registry, store);

    match cli.command {
        Commands::Send {
            from,
            to,
            message,
            channels,
        } => run_send(&service, &from, &to, &message, channels).await,
        Commands::Channels => {
            for kind in ChannelKind::ALL {
                println!("{kind}");
            }
            Ok(())
        }
        Commands::Demo => run_demo(&service).await,
    }
}

fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}

async fn run_send(
    service: &DispatchService,
    from: &str,
    to: &str,
    message: &str,
    channels: Vec<ChannelKind>,
) -> anyhow::Result<()> {
    let channels = if channels.is_empty() {
        ChannelKind::ALL.to_vec()
    } else {
        channels
    };
    if let Err(err) = service.validate(message, &channels) {
        anyhow::bail!("{err}");
    }

    let sent = service.dispatch(from, to, message, &channels).await?;
    print_message(&sent);
    println!();
    println!(
        "Ryan says: {}",
        reaction(sent.success_count(), sent.outcomes.len())
    );
    Ok(())
}

async fn run_demo(service: &DispatchService) -> anyhow::Result<()> {
    let samples: [(&str, &str, &str, &[ChannelKind]); 3] = [
        ("pam", "jim", "hello", &[ChannelKind::Email]),
        (
            "michael",
            "jan",
            "dinner party at my condo",
            &[ChannelKind::Sms, ChannelKind::Chat, ChannelKind::Printer],
        ),
        ("ryan", "kelly", "WUPHF me back", &ChannelKind::ALL),
    ];
    for (from, to, message, channels) in samples {
        service.dispatch(from, to, message, channels).await?;
    }

    println!("=== Full history, newest first ===");
    for message in service.history(&HistoryFilter::default()).await? {
        print_message(&message);
        println!();
    }

    let filter = HistoryFilter {
        user: Some("pam".into()),
        ..HistoryFilter::default()
    };
    println!("=== Messages involving pam ===");
    for message in service.history(&filter).await? {
        println!(
            "{} {} -> {}: {:?}",
            message.id, message.from_user, message.to_user, message.status
        );
    }
    Ok(())
}

fn print_message(message: &Message) {
    println!(
        "[{}] {} -> {} ({}): {:?}",
        format_time(message.created_at_ms),
        message.from_user,
        message.to_user,
        message.id,
        message.status
    );
    println!("  \"{}\"", message.body);
    for outcome in &message.outcomes {
        match (&outcome.external_id, &outcome.error) {
            (Some(external_id), _) => println!("  [ok] {:10} {external_id}", outcome.channel),
            (None, Some(error)) => println!("  [!!] {:10} {error}", outcome.channel),
            (None, None) => println!("  [??] {}", outcome.channel),
        }
    }
}

fn format_time(ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(ms as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Ryan's enthusiasm, scaled to the success ratio.
fn reaction(successes: usize, attempted: usize) -> &'static str {
    if successes == 0 {
        "That's what she said... wait, that doesn't work here."
    } else if successes == attempted {
        "WUPHF! We did it! I'm gonna be rich!"
    } else if successes > attempted / 2 {
        "Pretty good, but we can do better!"
    } else {
        "This is a disaster. I need to call my lawyer."
    }
}
