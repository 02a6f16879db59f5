use std::cell::RefCell;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use rand::Rng;

use flackerlicht::config::{FlackerConfig, LightConfig};
use flackerlicht::intervaltimer::IntervalTimer;
use flackerlicht::olaoutput::{DmxLight, OlaOutput};
use flackerlicht::{DebugOverlay, Flicker, LightRef, LogOverlay, NoOverlay};

#[derive(Parser)]
#[command(about = "Flickers DMX dimmer channels through letter-encoded light styles")]
struct Cli {
    /// TOML file with styles and lights
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Frames per second, overriding the config file
    #[arg(short, long, value_name = "HZ")]
    frame_rate: Option<f64>,

    /// Address of the OLA OSC plugin, overriding the config file
    #[arg(short, long, value_name = "ADDR")]
    ola: Option<String>,

    /// Log a debug overlay line for every light each frame
    #[arg(short, long)]
    debug: bool,

    /// Log more
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Cli) -> Result<FlackerConfig, String> {
    let mut config = match args.config.as_deref() {
        Some(path) => FlackerConfig::load(path)?,
        None => FlackerConfig::default(),
    };

    if let Some(frame_rate) = args.frame_rate {
        config.frame_rate = frame_rate;
    }
    if let Some(ola) = args.ola.as_deref() {
        config.ola_address = ola.to_string();
    }
    if !(config.frame_rate.is_finite() && config.frame_rate > 0.0) {
        return Err(format!("Invalid frame rate {}", config.frame_rate));
    }

    Ok(config)
}

fn start_light(
    flicker: &mut Flicker,
    output: &Rc<RefCell<OlaOutput>>,
    light_config: &LightConfig,
    debug: bool,
) -> Option<LightRef> {
    let style_id = match light_config.style_id() {
        Ok(style_id) => style_id,
        Err(err) => {
            log::warn!("Skipping channel {}: {err}", light_config.channel);
            return None;
        }
    };

    // Lights without a start position begin at a random step
    let start_index = match light_config.start_index {
        Some(start_index) => Some(start_index),
        None => flicker
            .lookup(&style_id)
            .map(|style| rand::thread_rng().gen_range(1..=style.pattern().len()) as f64),
    };

    let light = LightRef::new(DmxLight::new(
        Rc::clone(output),
        light_config.channel,
        light_config.level,
    ));
    match flicker.start_flicker(&light, &style_id, debug || light_config.debug, start_index) {
        Ok(()) => Some(light),
        // Already reported by the flicker core
        Err(_) => None,
    }
}

fn main() {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => panic!("Cannot load configuration: {}", err),
    };

    let options = match config.flicker_options() {
        Ok(options) => options,
        Err(err) => panic!("Invalid configuration: {}", err),
    };

    let overlay: Box<dyn DebugOverlay> = if args.debug || config.lights.iter().any(|l| l.debug) {
        Box::new(LogOverlay::new())
    } else {
        Box::new(NoOverlay)
    };
    let mut flicker = Flicker::with_overlay(options, overlay);
    if let Err(err) = flicker.init() {
        panic!("Cannot register default styles: {}", err);
    }
    if let Err(err) = config.register_styles(&mut flicker) {
        panic!("Invalid style in configuration: {}", err);
    }

    let ola_addr = match SocketAddr::from_str(&config.ola_address) {
        Ok(addr) => addr,
        Err(err) => panic!("Invalid OLA address {}: {}", config.ola_address, err),
    };
    let output = match OlaOutput::new(ola_addr, config.universe) {
        Ok(ola) => Rc::new(RefCell::new(ola)),
        Err(msg) => panic!("Cannot set up OLA output: {}", msg),
    };

    let lights: Vec<LightRef> = config
        .lights
        .iter()
        .filter_map(|light_config| start_light(&mut flicker, &output, light_config, args.debug))
        .collect();
    log::info!(
        "Flickering {} lights at {} FPS, sending to {}",
        lights.len(),
        config.frame_rate,
        ola_addr
    );

    let running = Arc::new(AtomicBool::new(true));
    let handler_running = Arc::clone(&running);
    if let Err(err) = ctrlc::set_handler(move || handler_running.store(false, Ordering::SeqCst)) {
        panic!("Cannot install Ctrl-C handler: {}", err);
    }

    let mut timer = IntervalTimer::new(config.frame_rate, args.verbose);
    while running.load(Ordering::SeqCst) && flicker.is_ticking() {
        let delta_time = timer.sleep_until_next_tick();
        flicker.tick(delta_time);

        if let Err(err) = output.borrow_mut().flush() {
            log::warn!("{err}");
        }
    }

    log::info!("Shutting down");
    flicker.shutdown();
    output.borrow_mut().blackout();
    let flushed = output.borrow_mut().flush();
    if let Err(err) = flushed {
        log::warn!("{err}");
    }
}
