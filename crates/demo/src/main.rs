//! Drive the stagehand demo headlessly: launch, resize, start a game and drag
//! a card.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, ValueEnum};
use stagehand::{
    Scene, SceneConfig, UiThread, geom::Point, input::NativeOrigin, texture::SystemView,
};
use stagehand_demo::{DemoCore, Stage, textures::MemoryTextureLoader};
use tracing::{Level, info};

/// How long to wait for each stage.
const STAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Window origin reported by the simulated platform.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum Origin {
    /// Top-left, Y down.
    TopLeft,
    /// Bottom-left, Y up.
    BottomLeft,
}

impl From<Origin> for NativeOrigin {
    fn from(o: Origin) -> Self {
        match o {
            Origin::TopLeft => Self::TopLeft,
            Origin::BottomLeft => Self::BottomLeft,
        }
    }
}

/// CLI flags for the demo.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Window width.
    #[clap(long, default_value_t = 1024.0)]
    width: f64,

    /// Window height.
    #[clap(long, default_value_t = 768.0)]
    height: f64,

    /// Native window origin.
    #[clap(long, value_enum, default_value_t = Origin::TopLeft)]
    origin: Origin,

    /// Pointer moves in the simulated drag.
    #[clap(long, default_value_t = 8)]
    steps: usize,

    /// More logging. Repeat for trace output.
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Log level for the verbosity flag.
    fn level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Native coordinates for window point `p`.
    fn native(&self, p: Point) -> Point {
        match self.origin {
            Origin::TopLeft => p,
            Origin::BottomLeft => Point::new(p.x, self.height - p.y),
        }
    }
}

/// Run the demo.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt().with_max_level(args.level()).init();

    let ui = UiThread::spawn("ui")?;
    let scene = Scene::new(
        ui.handle(),
        SceneConfig {
            native_origin: args.origin.into(),
        },
    );
    let core = DemoCore::new(SystemView::new(Arc::new(MemoryTextureLoader::standard())));
    scene.launch(core.clone())?;
    scene.resize(args.width, args.height)?;
    if !core.wait_for(Stage::MainMenu, STAGE_TIMEOUT) {
        bail!("resources did not load");
    }

    let centre = args.native(Point::new(args.width / 2.0, args.height / 2.0));
    scene.pointer_down(centre.x, centre.y)?;
    scene.pointer_up(centre.x, centre.y)?;
    if !core.wait_for(Stage::Game, STAGE_TIMEOUT) {
        bail!("the start button did not start a game");
    }
    info!(view = ?scene.current_view_name()?, "showing");

    let table = core.table().context("no cards were dealt")?;
    let (face, place) = *table.cards().first().context("empty hand")?;
    let from = place.center();
    let to = Point::new(from.x, from.y - args.height / 4.0);
    let start = args.native(from);
    scene.pointer_down(start.x, start.y)?;
    for i in 1..=args.steps {
        let t = i as f64 / args.steps as f64;
        let p = args.native(Point::new(from.x, from.y + (to.y - from.y) * t));
        scene.pointer_move(p.x, p.y)?;
    }
    let end = args.native(to);
    scene.pointer_up(end.x, end.y)?;

    for (face, place) in table.cards() {
        info!(face, left = place.left, top = place.top, "card");
    }
    info!(face, "dragged");
    ui.join()?;
    Ok(())
}
