#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod controls;
mod scene;
mod session;
mod status;
mod timer;

use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use structopt::StructOpt;

use model::Route;
use osrm::LonLat;

pub use self::controls::{
    parse_script, Command, ControlSource, Input, ScriptedControls, StdinControls,
};
pub use self::scene::Scene;
pub use self::session::Session;
pub use self::status::StatusPanel;
pub use self::timer::{TickHandle, TickTimer};

// Between RTC X Roads and Panjagutta metro stations in Hyderabad
const DEFAULT_START: LonLat = LonLat::new(78.495095, 17.4065539);
const DEFAULT_END: LonLat = LonLat::new(78.45031, 17.42895);

// Anything slower isn't a replay anymore
const MAX_TICK_MS: u64 = 24 * 60 * 60 * 1000;

// How long to wait for input when no tick is scheduled
const IDLE_WAIT: Duration = Duration::from_secs(60);

#[derive(StructOpt)]
struct Args {
    /// The path to a saved OSRM route response. If set, nothing is requested over the network.
    #[structopt(long)]
    route_file: Option<String>,
    /// The OSRM server to request a route from
    #[structopt(long, default_value = "https://router.project-osrm.org")]
    osrm_url: String,
    /// The OSRM routing profile
    #[structopt(long, default_value = "driving")]
    profile: String,
    /// Where the vehicle starts, as "lon,lat"
    #[structopt(long)]
    start: Option<LonLat>,
    /// Where the vehicle ends up, as "lon,lat"
    #[structopt(long)]
    end: Option<LonLat>,
    /// Milliseconds of real time between each step of the replay
    #[structopt(long, default_value = "2000")]
    tick_ms: u64,
    /// Milliseconds between the made-up timestamps of consecutive route points
    #[structopt(long, default_value = "5000")]
    sample_spacing_ms: i64,
    /// Start playing as soon as the route loads
    #[structopt(long)]
    autoplay: bool,
    /// Comma-separated commands to run, one per tick, instead of reading stdin
    #[structopt(long)]
    script: Option<String>,
    /// Write the map scene as GeoJSON to this path after every change
    #[structopt(long)]
    scene: Option<String>,
}

impl Args {
    fn validate(&self) -> Result<()> {
        if self.route_file.is_some() && (self.start.is_some() || self.end.is_some()) {
            bail!("--route-file already has a start and end; don't pass --start or --end");
        }
        if self.tick_ms == 0 || self.tick_ms > MAX_TICK_MS {
            bail!("--tick-ms must be between 1 and {MAX_TICK_MS}");
        }
        if self.sample_spacing_ms <= 0 {
            bail!("--sample-spacing-ms must be positive");
        }
        Ok(())
    }

    /// Failing to get a route isn't fatal; the replay just has nothing to show.
    fn load_route(&self, load_time: DateTime<Utc>) -> Route {
        let points = match self.route_file {
            Some(ref path) => osrm::load_response_file(path),
            None => {
                let client = osrm::Client::new(&self.osrm_url, &self.profile);
                let start = self.start.unwrap_or(DEFAULT_START);
                let end = self.end.unwrap_or(DEFAULT_END);
                client.fetch(start, end)
            }
        };
        let spacing = chrono::Duration::milliseconds(self.sample_spacing_ms);
        match points.and_then(|pts| Route::from_points(&pts, load_time, spacing)) {
            Ok(route) => route,
            Err(err) => {
                error!("Error fetching route: {err:#}");
                Route::empty()
            }
        }
    }
}

fn run(args: Args) -> Result<()> {
    args.validate()?;
    let tick_interval = Duration::from_millis(args.tick_ms);
    let route = args.load_route(Utc::now());
    info!("Replaying a route with {} samples", route.len());

    let mut session = Session::new(route, tick_interval);
    if args.autoplay {
        session.handle(Command::Play, Instant::now());
    }

    let mut controls: Box<dyn ControlSource> = match args.script {
        Some(ref script) => Box::new(ScriptedControls::new(parse_script(script)?, tick_interval)),
        None => {
            info!("Commands: toggle (t, or just Enter), play, pause, reset (x), quit (q)");
            Box::new(StdinControls::spawn())
        }
    };
    run_session(&mut session, controls.as_mut(), args.scene.as_deref())
}

/// Runs until quit, or until the controls close and nothing more will happen.
pub fn run_session(
    session: &mut Session,
    controls: &mut dyn ControlSource,
    scene_path: Option<&str>,
) -> Result<()> {
    let mut controls_open = true;
    report(session, scene_path)?;
    loop {
        if session.poll(Instant::now()) {
            report(session, scene_path)?;
        }

        let timeout = match session.next_deadline() {
            Some(due) => due.saturating_duration_since(Instant::now()),
            None if controls_open => IDLE_WAIT,
            None => break,
        };
        if !controls_open {
            std::thread::sleep(timeout);
            continue;
        }

        match controls.next_command(timeout) {
            Input::Command(Command::Quit) => break,
            Input::Command(cmd) => {
                if session.handle(cmd, Instant::now()) {
                    report(session, scene_path)?;
                }
            }
            Input::Idle => {}
            Input::Closed => {
                debug!("No more commands");
                controls_open = false;
            }
        }
    }
    Ok(())
}

fn report(session: &Session, scene_path: Option<&str>) -> Result<()> {
    println!("{}", StatusPanel::new(session.replay(), &Local));
    if let Some(path) = scene_path {
        Scene::new(session.replay()).write(path)?;
    }
    Ok(())
}

pub fn main() {
    abstutil::logger::setup();

    let args = Args::from_iter(abstutil::cli_args());
    if let Err(err) = run(args) {
        error!("{err:#}");
        std::process::exit(1);
    }
}
