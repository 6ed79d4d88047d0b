//! Promptfield CLI — headless real-time driver for the mix engine.
//!
//! Steps the engine with measured wall-clock deltas, prints every emitted
//! weight vector, and surfaces notices the way a UI toast would. Useful for
//! watching auto-pilot behavior and field pacing without a front end.

use promptfield_engine::{Engine, EngineConfig, IntervalMode, MotionModel, PlaybackState, PromptView, ShuffleStyle};
use std::error::Error;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Args {
    list_profiles: bool,
    list_archetypes: bool,
    profile: Option<String>,
    seed: Option<u64>,
    autopilot: bool,
    interval_sec: Option<f32>,
    random_interval: bool,
    style: Option<String>,
    motion: Option<String>,
    duration_sec: Option<u64>,
    fps: Option<u32>,
}

fn parse_args() -> Args {
    let mut a = Args::default();
    for s in std::env::args().skip(1) {
        if s == "--list-profiles" { a.list_profiles = true; continue; }
        if s == "--list-archetypes" { a.list_archetypes = true; continue; }
        if s == "--autopilot" { a.autopilot = true; continue; }
        if s == "--random-interval" { a.random_interval = true; continue; }
        if let Some(rest) = s.strip_prefix("--profile=")  { a.profile      = Some(rest.to_string()); continue; }
        if let Some(rest) = s.strip_prefix("--seed=")     { a.seed         = rest.parse().ok();      continue; }
        if let Some(rest) = s.strip_prefix("--interval=") { a.interval_sec = rest.parse().ok();      continue; }
        if let Some(rest) = s.strip_prefix("--style=")    { a.style        = Some(rest.to_string()); continue; }
        if let Some(rest) = s.strip_prefix("--motion=")   { a.motion       = Some(rest.to_string()); continue; }
        if let Some(rest) = s.strip_prefix("--duration=") { a.duration_sec = rest.parse().ok();      continue; }
        if let Some(rest) = s.strip_prefix("--fps=")      { a.fps          = rest.parse().ok();      continue; }
        eprintln!("[warn] unknown arg: {s}");
    }
    a
}

fn list_profiles() {
    println!("Available profiles:");
    for p in promptfield_engine::profiles::PROFILES {
        println!("- {}", p.name);
    }
}

fn list_archetypes() {
    println!("Available archetypes:");
    for a in promptfield_core::archetype::ARCHETYPES {
        println!("- {:<16} {} active, weights {:.1}..{:.1}", a.name, a.total(), a.weight_lo, a.weight_hi);
    }
}

fn print_mix(weights: &[PromptView]) {
    let active: Vec<String> = weights
        .iter()
        .filter(|p| p.weight > 0.0)
        .map(|p| {
            let mark = if p.filtered { "!" } else { "" };
            format!("{}{} \"{}\" w={:.2}", mark, p.id, p.text, p.weight)
        })
        .collect();
    println!("[mix] {} active | {}", active.len(), active.join(" | "));
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = parse_args();

    if args.list_profiles {
        list_profiles();
        return Ok(());
    }
    if args.list_archetypes {
        list_archetypes();
        return Ok(());
    }

    let motion = match args.motion.as_deref() {
        Some("orbit") => MotionModel::Orbit,
        Some("drift") | None => MotionModel::Drift,
        Some(other) => {
            eprintln!("[warn] unknown motion {other:?}, using drift");
            MotionModel::Drift
        }
    };

    let mut engine = Engine::new(EngineConfig {
        profile: args.profile.clone().unwrap_or_else(|| {
            promptfield_engine::profiles::DEFAULT_PROFILE.to_string()
        }),
        motion,
        seed: args.seed,
        ..EngineConfig::default()
    });

    engine.add_sink(Box::new(|weights: &[PromptView]| print_mix(weights)));

    match args.style.as_deref() {
        Some("archetype") => engine.autopilot_set_style(ShuffleStyle::Archetype),
        Some("coherent") | None => {}
        Some(other) => eprintln!("[warn] unknown style {other:?}, using coherent"),
    }

    if args.random_interval {
        engine.autopilot_set_interval(IntervalMode::Random);
    } else if let Some(secs) = args.interval_sec {
        engine.autopilot_set_interval(IntervalMode::fixed(secs));
    }

    println!("promptfield-cli — weighted-prompt mix driver\n");
    println!("Profile: {}", args.profile.as_deref().unwrap_or(promptfield_engine::profiles::DEFAULT_PROFILE));
    println!("Motion: {motion:?}  | Auto-pilot: {}", if args.autopilot { "on" } else { "off" });
    if let Some(d) = args.duration_sec { println!("Auto-stop after {d} seconds"); }
    println!("Press Ctrl+C to stop…\n");

    // There is no live session here; pretend one is playing so the field
    // runs at full speed.
    engine.set_playback(PlaybackState::Playing);

    if args.autopilot {
        engine.autopilot_engage();
    }

    let fps = args.fps.unwrap_or(30).clamp(1, 240);
    let frame = Duration::from_secs_f64(1.0 / f64::from(fps));
    let started = Instant::now();
    let mut last = started;
    let mut last_meter = started;

    loop {
        std::thread::sleep(frame);
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        engine.tick(dt);

        for notice in engine.take_notices() {
            println!("[toast] {}", notice.text);
        }

        // ~2 second field meter
        if now.duration_since(last_meter) >= Duration::from_secs(2) {
            last_meter = now;
            let field = engine.field();
            let halos = engine.halos();
            let spread: Vec<String> = halos
                .iter()
                .take(3)
                .map(|h| {
                    let (x, y) = field.position(h);
                    format!("#{} ({x:.0},{y:.0}) d={:.0}", h.slot, h.size)
                })
                .collect();
            println!("[field] {} halos | {}", halos.len(), spread.join(" "));
        }

        if let Some(d) = args.duration_sec {
            if started.elapsed() >= Duration::from_secs(d) {
                return Ok(());
            }
        }
    }
}
