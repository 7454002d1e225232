//! Application entry point for the event bus demo.
//!
//! A line-oriented REPL that publishes typed messages through an [`EventBus`]
//! and shows fan-out, listener removal, and listener counts.

use std::io::BufRead;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;
use chrono::DateTime;
use chrono::Utc;
use dotenv::dotenv;
use log::debug;
use log::info;
use serde::Deserialize;
use serde::Serialize;

use event_bus::config::Config;
use event_bus::event::EventBus;
use event_bus::event::Listener;
use event_bus::logging::setup_logging;
use event_bus::subscriber::Subscriber;

/// Payload carried under the `"data"` event.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct MessageData {
    message: String,
    timestamp: DateTime<Utc>,
}

/// Subscriber that logs every message it receives.
struct AuditSubscriber;

impl Subscriber<MessageData> for AuditSubscriber {
    fn callback(&self, payload: &MessageData) -> Result<()> {
        info!("Received message: {}", payload.message);
        Ok(())
    }
}

fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::new();
    setup_logging(&config)?;
    info!("Starting event-bus demo...");

    let bus = Arc::new(EventBus::new());
    let history = Arc::new(Mutex::new(Vec::new()));

    let recorder = setup_recorder(&bus, history.clone(), config.history_limit);
    let audit = bus.subscribe("data", Arc::new(AuditSubscriber));
    debug!("{} listeners registered for \"data\"", bus.listener_count("data"));

    run(&bus, &history)?;

    bus.off("data", &recorder).off("data", &audit);
    info!("Demo shut down.");
    Ok(())
}

/// Registers the listener that records emitted messages into `history`.
fn setup_recorder(
    bus: &EventBus<MessageData>,
    history: Arc<Mutex<Vec<MessageData>>>,
    history_limit: usize,
) -> Listener<MessageData> {
    let recorder = Listener::new(move |payload: &MessageData| {
        let mut history = history.lock().unwrap();
        history.push(payload.clone());
        let overflow = history.len().saturating_sub(history_limit);
        if overflow > 0 {
            history.drain(..overflow);
        }
        Ok(())
    });
    bus.on("data", recorder.clone());
    recorder
}

fn run(bus: &EventBus<MessageData>, history: &Mutex<Vec<MessageData>>) -> Result<()> {
    println!("Type a message to emit it, or /history, /clear, /count, /quit.");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => {}
            "/quit" => break,
            "/count" => {
                println!("{} listeners for \"data\"", bus.listener_count("data"));
            }
            "/clear" => {
                history.lock().unwrap().clear();
                println!("History cleared.");
            }
            "/history" => {
                let history = history.lock().unwrap();
                if history.is_empty() {
                    println!("No messages. Emit an event!");
                }
                for entry in history.iter() {
                    println!("{}", serde_json::to_string(entry)?);
                }
            }
            message => {
                let payload = MessageData {
                    message: message.to_string(),
                    timestamp: Utc::now(),
                };
                debug!("Emitting message: {:?}", payload);
                bus.emit("data", &payload);
            }
        }
    }

    Ok(())
}
