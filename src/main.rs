//! fpc1020-sim: drive the resource controller against the in-memory
//! platform from the command line.
//!
//! ```text
//!  stdin ──▶ line parser ──▶ Fpc1020Device ──▶ SimPlatform (journal)
//!                                 │
//!                       irq-fire  ▼
//!                            IrqHandler ──▶ IrqEvents ──▶ reader thread
//! ```
//!
//! Usage: `fpc1020-sim [config.json]`, then one command per line:
//!
//! | Line                    | Effect                               |
//! |-------------------------|--------------------------------------|
//! | `<attribute> [value]`   | write to a device attribute          |
//! | `read irq`              | print the interrupt line level       |
//! | `blank <code>`          | framebuffer blank notification       |
//! | `irq-fire`              | run the interrupt handler once       |
//! | `status`                | print a JSON status snapshot         |
//! | `journal`               | dump and clear the backend journal   |
//! | `quit`                  | detach and exit                      |
//!
//! The backend keeps at most `JOURNAL_CAP` entries and drops the oldest
//! half when full. Dump it with `journal` to keep a complete trace.
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for the
//! sequencing detail.

use std::io::BufRead;

use anyhow::{Context, Result, bail};
use log::{info, warn};

use fpc1020::adapters::sim::{SimBlankSource, SimPlatform, SimWakeSource};
use fpc1020::{DriverConfig, Fpc1020Device};

type SimDevice = Fpc1020Device<SimPlatform, SimWakeSource, SimBlankSource>;

fn load_config() -> Result<DriverConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            DriverConfig::from_json(&text).with_context(|| format!("parsing config {path}"))
        }
        None => Ok(DriverConfig::default()),
    }
}

fn spawn_reader(dev: &SimDevice) -> Result<()> {
    let events = dev.irq_events();
    std::thread::Builder::new()
        .name("irq-reader".into())
        .spawn(move || {
            loop {
                let n = futures_lite::future::block_on(events.wait());
                info!("irq notification: {} total", n);
            }
        })
        .context("spawning irq reader")?;
    Ok(())
}

/// Run one input line. `Ok(false)` ends the session.
fn run_line(dev: &SimDevice, line: &str) -> Result<bool> {
    let line = line.trim();
    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    match head {
        "" => {}
        "quit" | "exit" => return Ok(false),
        "status" => println!("{}", dev.status().to_json()?),
        "irq-fire" => {
            dev.irq_handler().handle();
        }
        "blank" => {
            let code: i32 = rest.trim().parse().context("blank code")?;
            dev.on_fb_event(code);
        }
        "journal" => {
            let calls = dev.controller().with_platform_mut(|p| {
                let calls = p.journal().to_vec();
                p.clear_journal();
                calls
            });
            for call in calls {
                println!("{call:?}");
            }
        }
        "read" => match rest.trim() {
            "irq" => println!("{}", dev.read_irq()?),
            other => bail!("attribute '{other}' is not readable"),
        },
        attribute => dev.write(attribute, rest)?,
    }
    Ok(true)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    info!("fpc1020-sim v{}", env!("CARGO_PKG_VERSION"));

    let dev = Fpc1020Device::attach(
        SimPlatform::new().with_real_delays(),
        SimWakeSource::new(),
        SimBlankSource::new(),
        config,
    )
    .context("attach")?;
    spawn_reader(&dev)?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        match run_line(&dev, &line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => warn!("{:#}", e),
        }
    }

    let (hw, _) = dev.detach();
    info!("{} backend calls after detach", hw.journal().len());
    Ok(())
}
