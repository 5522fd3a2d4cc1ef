use embassy_executor::Spawner;
use embassy_time::{Instant, Timer};
use log::{debug, error, info};
use storytime_core::{
    app::{StoryReader, TickResult},
    input::mock::MockInput,
    settings::ReaderConfig,
    speech::simulated::SimulatedSpeech,
    story::bundled_story,
};

use console::ConsolePresenter;
use stdin_input::StdinInput;

#[path = "main/console.rs"]
mod console;
#[path = "main/startup.rs"]
mod startup;
#[path = "main/stdin_input.rs"]
mod stdin_input;

const FRAME_INTERVAL_MS: u64 = 20;
/// Voices the simulated platform reports as installed.
const INSTALLED_VOICES: [&str; 2] = ["Karen", "Google US English"];

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("boot: storytime starting");

    let options = startup::options_from_args(std::env::args().skip(1));
    info!(
        "boot: auto_read_all={} rate={:?} panel={:?}",
        options.auto_read_all,
        options.rate.map(|rate| rate.percent()),
        options.start_panel
    );

    let (story, presenter_story) = match (bundled_story(), bundled_story()) {
        (Ok(story), Ok(presenter_story)) => (story, presenter_story),
        (Err(err), _) | (_, Err(err)) => {
            error!("boot: bundled story rejected: {}", err);
            return;
        }
    };
    let mut commands = match StdinInput::spawn() {
        Ok(input) => input,
        Err(err) => {
            error!("boot: stdin reader failed to start: {}", err);
            return;
        }
    };

    let mut reader = StoryReader::new(
        story,
        SimulatedSpeech::new(&INSTALLED_VOICES),
        MockInput::new(),
        ConsolePresenter::new(presenter_story, std::io::stdout()),
        ReaderConfig::default(),
    );
    println!("{}", stdin_input::HELP);

    let loop_start = Instant::now();
    reader.start(options, 0);

    loop {
        let now_ms = loop_start.elapsed().as_millis();
        let mut quit = false;
        // Word taps bind to the panel on screen at dispatch time.
        while let Some(command) = commands.poll_command() {
            match command.into_input(reader.current_panel()) {
                Some(event) => reader.handle_input(event, now_ms),
                None => {
                    quit = true;
                    break;
                }
            }
        }

        if reader.tick(now_ms) == TickResult::Changed {
            let snapshot = reader.snapshot();
            debug!(
                "ui: panel={}/{} mode={:?} rate_pct={} paused={}",
                snapshot.panel,
                snapshot.total_panels,
                snapshot.mode,
                snapshot.rate.percent(),
                snapshot.paused
            );
        }

        if quit {
            reader.stop(now_ms);
            info!("boot: quit at panel={}", reader.current_panel());
            break;
        }

        Timer::after_millis(FRAME_INTERVAL_MS).await;
    }
}
