use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use cadence_engine::RuntimeError;
use cadence_engine::config::RunOptions;
use cadence_engine::core::{FrameParams, FrameRequest, Game, GraphicsDriver, Platform};
use cadence_engine::coords::ScaleOffsets;
use cadence_engine::input::{InputHub, InputSnapshot};
use cadence_engine::target::{RenderTarget, TargetKind, WriteNotifier};
use cadence_engine::thread::{ContextHandle, Coordinator, call_on};
use cadence_engine::time::TickRate;

type Log = Arc<Mutex<Vec<String>>>;

fn thread_name() -> String {
    thread::current().name().unwrap_or("?").to_owned()
}

struct Surface {
    size: (u32, u32),
    kind: TargetKind,
    notifier: Option<WriteNotifier>,
}

impl RenderTarget for Surface {
    fn size(&self) -> (u32, u32) {
        self.size
    }
    fn kind(&self) -> TargetKind {
        self.kind
    }
    fn clear(&mut self) {}
    fn flush(&mut self) {}
    fn observe_writes(&mut self, notifier: WriteNotifier) {
        self.notifier = Some(notifier);
    }
    fn dispose(self) {}
}

#[derive(Default)]
struct Tally {
    updates: usize,
    composites: usize,
    update_threads: Vec<String>,
}

struct TestGame {
    tally: Arc<Mutex<Tally>>,
    coordinator: Option<Arc<Coordinator>>,
    main_thread_jobs: Log,
    panic_at: Option<usize>,
}

impl TestGame {
    fn new(tally: &Arc<Mutex<Tally>>) -> Self {
        Self {
            tally: tally.clone(),
            coordinator: None,
            main_thread_jobs: Log::default(),
            panic_at: None,
        }
    }
}

impl Game for TestGame {
    type Target = Surface;

    fn layout(&mut self, _w: f64, _h: f64) -> (f64, f64) {
        (320.0, 240.0)
    }

    fn update(&mut self, _input: &InputSnapshot) -> anyhow::Result<()> {
        let updates = {
            let mut tally = self.tally.lock();
            tally.updates += 1;
            tally.update_threads.push(thread_name());
            tally.updates
        };
        if self.panic_at == Some(updates) {
            panic!("game logic exploded");
        }
        if let Some(coordinator) = &self.coordinator {
            let jobs = self.main_thread_jobs.clone();
            coordinator.run_on_main_thread(move || {
                jobs.lock().push(thread_name());
                Ok(())
            })?;
        }
        Ok(())
    }

    fn draw_offscreen(&mut self, offscreen: &mut Surface) -> anyhow::Result<()> {
        if let Some(n) = &offscreen.notifier {
            n.notify();
        }
        Ok(())
    }

    fn draw_final_screen(&mut self, _screen: &mut Surface, _offscreen: &Surface, _t: ScaleOffsets) {
        self.tally.lock().composites += 1;
    }

    fn new_offscreen_target(&mut self, width: u32, height: u32, kind: TargetKind) -> Surface {
        Surface { size: (width, height), kind, notifier: None }
    }

    fn new_screen_target(&mut self, width: u32, height: u32) -> Surface {
        Surface { size: (width, height), kind: TargetKind::Screen, notifier: None }
    }
}

/// Serves `frames` regular frames, then asks to exit.
struct ScriptedPlatform {
    frames: usize,
    served: usize,
    log: Log,
    coordinator: Option<Arc<Coordinator>>,
    fail_init: bool,
}

impl ScriptedPlatform {
    fn new(frames: usize, log: &Log) -> Self {
        Self { frames, served: 0, log: log.clone(), coordinator: None, fail_init: false }
    }
}

impl Platform for ScriptedPlatform {
    fn init(&mut self, _input: InputHub, _options: &RunOptions) -> anyhow::Result<()> {
        let running = self.coordinator.as_ref().is_some_and(|c| c.is_running());
        self.log.lock().push(format!("init on {} running={running}", thread_name()));
        if self.fail_init {
            anyhow::bail!("no display");
        }
        Ok(())
    }

    fn next_frame(&mut self) -> anyhow::Result<FrameRequest> {
        self.log.lock().push(format!("next_frame on {}", thread_name()));
        if self.served == self.frames {
            return Ok(FrameRequest::Exit);
        }
        self.served += 1;
        Ok(FrameRequest::Frame(FrameParams::new(640.0, 480.0, 1.0)))
    }
}

/// Submits one job per frame to the render context; optionally fails on one.
struct TestDriver {
    render: Option<ContextHandle>,
    log: Log,
    fail_at_frame: Option<usize>,
    frames: usize,
}

impl TestDriver {
    fn new(log: &Log) -> Self {
        Self { render: None, log: log.clone(), fail_at_frame: None, frames: 0 }
    }
}

impl GraphicsDriver for TestDriver {
    fn set_render_context(&mut self, ctx: ContextHandle) {
        self.log.lock().push(format!("render context {}", ctx.name()));
        self.render = Some(ctx);
    }

    fn begin_frame(&mut self) -> anyhow::Result<()> {
        self.frames += 1;
        let Some(render) = &self.render else {
            return Ok(());
        };

        let fail = self.fail_at_frame == Some(self.frames);
        let on = call_on(render.as_ref(), move || {
            if fail {
                anyhow::bail!("device lost");
            }
            Ok(thread_name())
        })?;
        self.log.lock().push(format!("render job on {on}"));
        Ok(())
    }
}

fn options(single_thread: bool) -> RunOptions {
    RunOptions::default()
        .single_thread(single_thread)
        .tick_rate(TickRate::PerFrame)
}

fn count(log: &Log, prefix: &str) -> usize {
    log.lock().iter().filter(|e| e.starts_with(prefix)).count()
}

#[test]
fn threaded_run_places_work_on_the_right_threads() {
    let log = Log::default();
    let tally = Arc::default();
    let coordinator = Arc::new(Coordinator::new());

    let caller = thread::Builder::new()
        .name("host".into())
        .spawn({
            let log = log.clone();
            let coordinator = coordinator.clone();
            let tally = Arc::clone(&tally);
            move || {
                coordinator.run(
                    TestGame::new(&tally),
                    ScriptedPlatform::new(5, &log),
                    TestDriver::new(&log),
                    options(false),
                )
            }
        })
        .unwrap();
    caller.join().unwrap().unwrap();

    let tally = tally.lock();
    assert_eq!(tally.updates, 5);
    assert_eq!(tally.composites, 5);
    assert!(tally.update_threads.iter().all(|t| t == "cadence-game"));

    assert_eq!(count(&log, "next_frame on host"), 6);
    assert_eq!(count(&log, "render job on cadence-render"), 5);
    assert!(!coordinator.is_running());
}

#[test]
fn render_context_registered_before_platform_init() {
    let log = Log::default();
    let tally = Arc::default();
    let coordinator = Arc::new(Coordinator::new());

    let mut platform = ScriptedPlatform::new(0, &log);
    platform.coordinator = Some(coordinator.clone());
    coordinator
        .run(TestGame::new(&tally), platform, TestDriver::new(&log), options(false))
        .unwrap();

    let log = log.lock();
    assert_eq!(log[0], "render context cadence-render");
    assert!(log[1].starts_with("init on"));
    assert!(log[1].ends_with("running=true"));
}

#[test]
fn exit_request_ends_run_without_updates() {
    let log = Log::default();
    let tally: Arc<Mutex<Tally>> = Arc::default();
    let coordinator = Coordinator::new();

    coordinator
        .run(
            TestGame::new(&tally),
            ScriptedPlatform::new(0, &log),
            TestDriver::new(&log),
            options(false),
        )
        .unwrap();

    assert_eq!(tally.lock().updates, 0);
    assert_eq!(count(&log, "next_frame"), 1);
    assert!(coordinator.fault().check().is_ok());
}

#[test]
fn render_failure_cancels_game_and_is_reported_once() {
    let log = Log::default();
    let tally: Arc<Mutex<Tally>> = Arc::default();
    let coordinator = Coordinator::new();

    let mut driver = TestDriver::new(&log);
    driver.fail_at_frame = Some(3);
    let err = coordinator
        .run(
            TestGame::new(&tally),
            ScriptedPlatform::new(100, &log),
            driver,
            options(false),
        )
        .unwrap_err();

    assert!(matches!(err, RuntimeError::Job { context: "cadence-render", .. }));
    assert!(coordinator.fault().get().is_some_and(|f| f.same_fault(&err)));

    // The failing frame never reached its update.
    assert_eq!(tally.lock().updates, 2);
    assert_eq!(count(&log, "next_frame"), 3);
    assert!(!coordinator.is_running());
}

#[test]
fn single_thread_mode_runs_everything_inline() {
    let log = Log::default();
    let tally: Arc<Mutex<Tally>> = Arc::default();
    let coordinator = Arc::new(Coordinator::new());

    let mut game = TestGame::new(&tally);
    game.coordinator = Some(coordinator.clone());
    let jobs = game.main_thread_jobs.clone();

    let caller = thread::Builder::new()
        .name("host".into())
        .spawn({
            let log = log.clone();
            let coordinator = coordinator.clone();
            move || {
                coordinator.run(
                    game,
                    ScriptedPlatform::new(4, &log),
                    TestDriver::new(&log),
                    options(true),
                )
            }
        })
        .unwrap();
    caller.join().unwrap().unwrap();

    let tally = tally.lock();
    assert_eq!(tally.updates, 4);
    assert_eq!(tally.composites, 4);
    assert!(tally.update_threads.iter().all(|t| t == "host"));
    assert_eq!(count(&log, "render job on host"), 4);
    assert_eq!(*jobs.lock(), vec!["host"; 4]);
}

#[test]
fn main_thread_jobs_from_game_run_on_caller() {
    let log = Log::default();
    let tally: Arc<Mutex<Tally>> = Arc::default();
    let coordinator = Arc::new(Coordinator::new());

    let mut game = TestGame::new(&tally);
    game.coordinator = Some(coordinator.clone());
    let jobs = game.main_thread_jobs.clone();

    let caller = thread::Builder::new()
        .name("host".into())
        .spawn({
            let log = log.clone();
            let coordinator = coordinator.clone();
            move || {
                coordinator.run(
                    game,
                    ScriptedPlatform::new(3, &log),
                    TestDriver::new(&log),
                    options(false),
                )
            }
        })
        .unwrap();
    caller.join().unwrap().unwrap();

    assert_eq!(*jobs.lock(), vec!["host"; 3]);
    assert!(coordinator.run_on_main_thread(|| Ok(())).is_err());
}

#[test]
fn platform_init_failure_is_latched_and_returned() {
    let log = Log::default();
    let tally: Arc<Mutex<Tally>> = Arc::default();
    let coordinator = Coordinator::new();

    let mut platform = ScriptedPlatform::new(10, &log);
    platform.fail_init = true;
    let err = coordinator
        .run(TestGame::new(&tally), platform, TestDriver::new(&log), options(false))
        .unwrap_err();

    assert!(matches!(err, RuntimeError::Platform(_)));
    assert!(coordinator.fault().get().is_some_and(|f| f.same_fault(&err)));
    assert_eq!(count(&log, "next_frame"), 0);
    assert!(!coordinator.is_running());
}

#[test]
#[should_panic(expected = "game logic exploded")]
fn game_thread_panic_is_reraised_on_caller() {
    let log = Log::default();
    let tally: Arc<Mutex<Tally>> = Arc::default();
    let coordinator = Coordinator::new();

    let mut game = TestGame::new(&tally);
    game.panic_at = Some(2);
    let _ = coordinator.run(game, ScriptedPlatform::new(10, &log), TestDriver::new(&log), options(false));
}

#[test]
fn before_update_hooks_are_installed_per_run() {
    let log = Log::default();
    let tally: Arc<Mutex<Tally>> = Arc::default();
    let coordinator = Coordinator::new();

    let hook_log = log.clone();
    coordinator.add_before_update_hook(move || {
        hook_log.lock().push("hook".into());
        Ok(())
    });

    coordinator
        .run(
            TestGame::new(&tally),
            ScriptedPlatform::new(3, &log),
            TestDriver::new(&log),
            options(true),
        )
        .unwrap();
    assert_eq!(count(&log, "hook"), 3);
}

/// Fails a render job from its own thread, unrelated to any frame.
struct DetachedFailureDriver {
    delay: Duration,
}

impl GraphicsDriver for DetachedFailureDriver {
    fn set_render_context(&mut self, ctx: ContextHandle) {
        let delay = self.delay;
        thread::spawn(move || {
            thread::sleep(delay);
            let _ = ctx.run(Box::new(|| -> anyhow::Result<()> {
                anyhow::bail!("device lost asynchronously")
            }));
        });
    }
}

#[test]
fn render_thread_failure_cancels_running_game() {
    let log = Log::default();
    let tally: Arc<Mutex<Tally>> = Arc::default();
    let coordinator = Coordinator::new();
    let frames = 1_000_000;

    let started = Instant::now();
    let err = coordinator
        .run(
            TestGame::new(&tally),
            ScriptedPlatform::new(frames, &log),
            DetachedFailureDriver { delay: Duration::from_millis(50) },
            options(false),
        )
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(5), "took {:?}", started.elapsed());
    assert!(matches!(err, RuntimeError::Job { context: "cadence-render", .. }));
    assert!(coordinator.fault().get().is_some_and(|f| f.same_fault(&err)));
    assert!(tally.lock().updates < frames);
    assert!(!coordinator.is_running());
}
