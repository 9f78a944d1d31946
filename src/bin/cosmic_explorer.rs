//! Cosmic Explorer
//!
//! Run with: `cargo run --bin cosmic-explorer`
//!
//! Interactive procedural galaxy: a spiral point cloud around a glowing
//! accretion disk, two asteroid belts and a drifting ship.
//!
//! Controls:
//! - Left-drag: Orbit
//! - Right-drag: Pan
//! - Middle-drag / Scroll: Zoom
//! - Click: Identify object under the cursor
//! - R: New random galaxy
//! - 1 / 2: Top / side view
//! - W or Space: Warp to a new galaxy
//! - ESC: Exit
//!
//! Set `COSMIC_EXPLORER_CONFIG` to a JSON file to override scene settings.

use std::sync::Arc;

use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowAttributes, WindowId};

use cosmic_explorer_engine::camera::ndc_from_pixels;
use cosmic_explorer_engine::error::ExplorerResult;
use cosmic_explorer_engine::galaxy::{
    CameraPreset, ExplorerConfig, GalaxyExplorer, MonotonicClock, TimeSource,
};
use cosmic_explorer_engine::input::{ExplorerAction, KeyBindings, PointerButton, PointerState};
use cosmic_explorer_engine::render::{GpuContextConfig, SceneRenderer, WgpuRenderer};

/// Zoom factor per scroll line.
const ZOOM_STEP: f32 = 0.95;
/// Dolly factor per pixel of middle-button drag.
const DOLLY_PER_PIXEL: f32 = 0.005;
const WINDOW_TITLE: &str = "Cosmic Explorer";

type Explorer = GalaxyExplorer<WgpuRenderer, StdRng>;

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct AppState {
    window: Arc<Window>,
    explorer: Explorer,
    pointer: PointerState,
    bindings: KeyBindings,
    clock: MonotonicClock,
    fps_frames: u32,
    fps_window_start: f64,
}

impl AppState {
    fn new(window: Arc<Window>, renderer: WgpuRenderer, config: ExplorerConfig) -> ExplorerResult<Self> {
        let clock = MonotonicClock::new();
        let mut explorer =
            GalaxyExplorer::new(renderer, config, StdRng::from_entropy(), clock.clone())?;
        explorer.set_object_click_handler(|id| info!("selected object: {id}"));

        let fps_window_start = clock.now_ms();
        Ok(Self {
            window,
            explorer,
            pointer: PointerState::new(),
            bindings: KeyBindings::new(),
            clock,
            fps_frames: 0,
            fps_window_start,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.explorer.resize(size.width, size.height);
    }

    /// Returns `false` when the app should exit.
    fn handle_action(&mut self, action: ExplorerAction) -> bool {
        match action {
            ExplorerAction::Regenerate => {
                if let Err(e) = self.explorer.regenerate_random() {
                    error!("regenerate failed: {e}");
                }
            }
            ExplorerAction::TopView => self.explorer.set_camera_position(CameraPreset::Top),
            ExplorerAction::SideView => self.explorer.set_camera_position(CameraPreset::Side),
            ExplorerAction::Warp => {
                if !self.explorer.trigger_warp() {
                    info!("warp already in progress");
                }
            }
            ExplorerAction::Quit => return false,
        }
        true
    }

    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        let Some(button) = pointer_button(button) else {
            return;
        };
        if pressed {
            self.pointer.press(button);
            return;
        }
        let click = self.pointer.release(button);
        if let Some(click) = click.filter(|c| c.button == PointerButton::Primary) {
            let (width, height) = self.explorer.renderer().surface_size();
            let (x, y) = ndc_from_pixels(
                click.position.x,
                click.position.y,
                width as f32,
                height as f32,
            );
            self.explorer.click(x, y);
        }
    }

    fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
        };
        self.pointer.scroll(lines);
    }

    /// Feed accumulated pointer motion into the camera rig.
    fn apply_pointer(&mut self) {
        let (_, height) = self.explorer.renderer().surface_size();
        let height = height as f32;
        let rig = self.explorer.rig_mut();

        if let Some((button, delta)) = self.pointer.consume_drag() {
            match button {
                PointerButton::Primary => rig.orbit_by_pixels(delta.x, delta.y, height),
                PointerButton::Secondary => rig.pan_by_pixels(delta.x, delta.y, height),
                PointerButton::Middle => rig.dolly((1.0 + DOLLY_PER_PIXEL).powf(delta.y)),
            }
        }

        let scroll = self.pointer.consume_scroll();
        if scroll != 0.0 {
            rig.dolly(ZOOM_STEP.powf(scroll));
        }
    }

    fn frame(&mut self) -> ExplorerResult<()> {
        self.apply_pointer();
        let report = self.explorer.frame()?;
        if let Some(count) = report.regenerated {
            info!("warped into a galaxy of {count} stars");
        }
        self.update_fps();
        Ok(())
    }

    fn update_fps(&mut self) {
        self.fps_frames += 1;
        let now = self.clock.now_ms();
        let span = now - self.fps_window_start;
        if span >= 1000.0 {
            let fps = self.fps_frames as f64 * 1000.0 / span;
            let params = self.explorer.current_params();
            self.window.set_title(&format!(
                "{WINDOW_TITLE} - {} stars, {} arms - {fps:.0} FPS",
                params.count, params.branches
            ));
            self.fps_frames = 0;
            self.fps_window_start = now;
        }
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

// ============================================================================
// APPLICATION HANDLER
// ============================================================================

struct App {
    config: ExplorerConfig,
    state: Option<AppState>,
    #[cfg(target_arch = "wasm32")]
    pending: std::rc::Rc<std::cell::RefCell<Option<(Arc<Window>, ExplorerResult<WgpuRenderer>)>>>,
}

impl App {
    fn new(config: ExplorerConfig) -> Self {
        Self {
            config,
            state: None,
            #[cfg(target_arch = "wasm32")]
            pending: Default::default(),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop, window: Arc<Window>, renderer: ExplorerResult<WgpuRenderer>) {
        let state = renderer.and_then(|r| AppState::new(Arc::clone(&window), r, self.config.clone()));
        match state {
            Ok(state) => {
                info!("explorer ready");
                window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                error!("failed to start explorer: {e}");
                event_loop.exit();
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn poll_pending(&mut self, event_loop: &ActiveEventLoop) {
        let ready = self.pending.borrow_mut().take();
        if let Some((window, renderer)) = ready {
            self.start(event_loop, window, renderer);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        info!("creating window");
        let window_attrs = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(1280, 720));
        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use winit::platform::web::WindowAttributesExtWebSys;
            window_attrs.with_append(true)
        };

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let renderer = pollster::block_on(WgpuRenderer::new(
                Arc::clone(&window),
                GpuContextConfig::default(),
            ));
            self.start(event_loop, window, renderer);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let pending = std::rc::Rc::clone(&self.pending);
            wasm_bindgen_futures::spawn_local(async move {
                let renderer =
                    WgpuRenderer::new(Arc::clone(&window), GpuContextConfig::default()).await;
                window.request_redraw();
                *pending.borrow_mut() = Some((window, renderer));
            });
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(target_arch = "wasm32")]
        self.poll_pending(event_loop);

        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                state.resize(new_size);
            }
            WindowEvent::Focused(false) => {
                state.pointer.cancel();
            }
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(action) = state.bindings.get_action(key) {
                    if !state.handle_action(action) {
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::MouseInput {
                button,
                state: btn_state,
                ..
            } => {
                state.handle_mouse_button(button, btn_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.pointer.move_to(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                state.handle_scroll(delta);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = state.frame() {
                    error!("frame failed: {e}");
                    event_loop.exit();
                    return;
                }
                state.window.request_redraw();
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            let renderer = state.explorer.teardown();
            let stats = renderer.resource_stats();
            if stats.total() != 0 {
                warn!("{} renderer resources still live at exit", stats.total());
            }
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger init failed: {e}").into());
    }
}

fn main() {
    init_logging();
    info!("=== {WINDOW_TITLE} ===");

    let config = match ExplorerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    #[cfg(not(target_arch = "wasm32"))]
    {
        let mut app = App::new(config);
        if let Err(e) = event_loop.run_app(&mut app) {
            error!("event loop error: {e}");
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::EventLoopExtWebSys;
        event_loop.spawn_app(App::new(config));
    }
}
