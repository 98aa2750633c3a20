use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};

use super::{CancelToken, ContextHandle, InlineThread, OsThread, TaskGroup, call_on};
use crate::config::{RunOptions, RuntimeSettings};
use crate::core::{FrameRequest, Game, GraphicsDriver, Platform};
use crate::error::{Result, RuntimeError};
use crate::fault::FaultLatch;
use crate::frame::{BeforeUpdateHook, FrameContext};
use crate::input::InputHub;
use crate::time::TickClock;

const MAIN_THREAD: &str = "main";
const RENDER_THREAD: &str = "cadence-render";
const GAME_THREAD: &str = "cadence-game";

/// Owns the run loop and the threads a game runs on.
///
/// In threaded mode the caller's thread becomes the main thread (platform
/// calls), while the render loop and the game loop get their own OS threads.
/// In cooperative mode everything runs on the caller.
///
/// Share it through an `Arc` to query or steer a running game from elsewhere.
pub struct Coordinator {
    fault: FaultLatch,
    settings: Arc<RuntimeSettings>,
    input: InputHub,
    main: RwLock<Option<ContextHandle>>,
    running: AtomicBool,
    hooks: Mutex<Vec<BeforeUpdateHook>>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            fault: FaultLatch::new(),
            settings: Arc::new(RuntimeSettings::default()),
            input: InputHub::new(),
            main: RwLock::new(None),
            running: AtomicBool::new(false),
            hooks: Mutex::new(Vec::new()),
        }
    }

    /// Runs `game` until the platform asks to exit or something fails.
    ///
    /// Returns the first error raised by the game, the render thread or the
    /// platform.
    ///
    /// # Panics
    /// If the coordinator is already running, and re-raises panics from the
    /// game or render threads once the other threads have stopped.
    pub fn run<G, P, D>(&self, game: G, mut platform: P, mut driver: D, options: RunOptions) -> Result<()>
    where
        G: Game,
        P: Platform,
        D: GraphicsDriver,
    {
        assert!(
            !self.running.load(Ordering::SeqCst),
            "coordinator is already running"
        );

        self.settings
            .set_screen_cleared_every_frame(options.screen_cleared_every_frame);
        self.settings.set_tick_rate(options.tick_rate);

        let mut frame = FrameContext::new(
            game,
            self.fault.clone(),
            self.settings.clone(),
            self.input.clone(),
            TickClock::with_max_gap(options.tick_rate, options.max_gap),
        );
        for hook in self.hooks.lock().drain(..) {
            frame.add_before_update_hook(hook);
        }

        let _running = RunningGuard(self);

        if options.is_cooperative() {
            log::debug!("running in single-thread mode");

            let main: ContextHandle = Arc::new(InlineThread::new(MAIN_THREAD));
            driver.set_render_context(Arc::new(InlineThread::new(RENDER_THREAD)));
            self.start(main.clone(), &mut platform, &options)?;

            let platform = Arc::new(Mutex::new(platform));
            game_loop(&mut frame, &mut driver, &platform, &main, &CancelToken::new())
        } else {
            log::debug!("running in multi-thread mode");
            self.run_threaded(frame, platform, driver, &options)
        }
    }

    fn run_threaded<G, P, D>(
        &self,
        mut frame: FrameContext<G>,
        mut platform: P,
        mut driver: D,
        options: &RunOptions,
    ) -> Result<()>
    where
        G: Game,
        P: Platform,
        D: GraphicsDriver,
    {
        let cancel = CancelToken::new();
        let main = Arc::new(OsThread::new(MAIN_THREAD, self.fault.clone(), cancel.clone()));
        let render = Arc::new(OsThread::new(RENDER_THREAD, self.fault.clone(), cancel.clone()));

        driver.set_render_context(render.clone());
        self.start(main.clone(), &mut platform, options)?;

        let mut group = TaskGroup::new(cancel.clone());
        let spawned = group.spawn(RENDER_THREAD, move || render.run_loop()).and_then(|()| {
            let platform = Arc::new(Mutex::new(platform));
            let main: ContextHandle = main.clone();
            let cancel = cancel.clone();
            group.spawn(GAME_THREAD, move || {
                game_loop(&mut frame, &mut driver, &platform, &main, &cancel)
            })
        });
        if let Err(err) = spawned {
            self.fault.set(err.clone());
            cancel.cancel();
            group.join()?;
            return Err(err);
        }

        // Main-thread jobs are served here until the group winds down.
        if let Err(err) = main.run_loop() {
            log::warn!("main thread loop ended with an error: {err}");
        }
        cancel.cancel();
        group.join()
    }

    /// Publishes the main context, marks the coordinator running and
    /// initialises the platform on the caller's thread.
    fn start<P: Platform>(&self, main: ContextHandle, platform: &mut P, options: &RunOptions) -> Result<()> {
        *self.main.write() = Some(main);
        self.running.store(true, Ordering::SeqCst);
        log::info!("run loop starting");

        platform
            .init(self.input.clone(), options)
            .map_err(|err| self.latch(RuntimeError::platform(err)))
    }

    fn latch(&self, err: RuntimeError) -> RuntimeError {
        self.fault.set(err.clone());
        err
    }

    /// Whether [`run`](Self::run) is between platform initialisation and exit.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Runs `job` on the main thread and waits for it.
    ///
    /// Fails with [`RuntimeError::ContextClosed`] when nothing is running.
    pub fn run_on_main_thread<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        let main = self
            .main
            .read()
            .clone()
            .ok_or(RuntimeError::ContextClosed(MAIN_THREAD))?;
        main.run(Box::new(job))
    }

    /// Registers a callback run before every logical update of the next run.
    pub fn add_before_update_hook<F>(&self, hook: F)
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.hooks.lock().push(Box::new(hook));
    }

    pub fn fault(&self) -> &FaultLatch {
        &self.fault
    }

    pub fn settings(&self) -> &Arc<RuntimeSettings> {
        &self.settings
    }

    /// Where the platform delivers input events.
    pub fn input(&self) -> &InputHub {
        &self.input
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("running", &self.is_running())
            .field("fault", &self.fault)
            .finish_non_exhaustive()
    }
}

/// Clears the running state however `run` exits, unwinding included.
struct RunningGuard<'a>(&'a Coordinator);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.main.write().take();
        if self.0.running.swap(false, Ordering::SeqCst) {
            log::info!("run loop stopped");
        }
    }
}

fn game_loop<G, P, D>(
    frame: &mut FrameContext<G>,
    driver: &mut D,
    platform: &Arc<Mutex<P>>,
    main: &ContextHandle,
    cancel: &CancelToken,
) -> Result<()>
where
    G: Game,
    P: Platform,
    D: GraphicsDriver,
{
    loop {
        // Whoever cancelled may have latched a fault; report it, not a
        // closed context.
        if cancel.is_cancelled() {
            return frame.fault().check();
        }

        let source = platform.clone();
        let request = call_on(main.as_ref(), move || {
            source
                .lock()
                .next_frame()
                .map_err(|err| RuntimeError::platform(err).into())
        });
        let request = match request {
            Ok(request) => request,
            Err(_) if cancel.is_cancelled() => return frame.fault().check(),
            Err(err) => {
                frame.fault().set(err);
                return frame.fault().check();
            }
        };

        match request {
            FrameRequest::Frame(params) => frame.update_frame(driver, params)?,
            FrameRequest::ForceRedraw(params) => frame.force_update_frame(driver, params)?,
            FrameRequest::Exit => {
                log::info!("platform requested exit");
                return Ok(());
            }
        }
    }
}
