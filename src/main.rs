//! Paddock - an F1 racing circuit you can orbit, inspect and drive
//!
//! Three scenes (circuit, garage, car), an orthographic orbit camera and a
//! chase camera behind the driven car, a day/night sky with night fog and
//! GPU rain.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use paddock::camera::{frame_camera, OrbitCamera, ViewMode};
use paddock::cli::{Args, Settings};
use paddock::controls::{self, Action, HeldKeys, KEY_REPEAT_DELAY_S};
use paddock::lighting::Light;
use paddock::params::{CarPhysics, ChaseCamera, FogParams, LightingParams};
use paddock::rendering::{RainUniforms, RenderSystem, SceneUniforms, SkyboxUniforms};
use paddock::scene::{DisplayMode, DynamicScene, SceneBuilder};
use paddock::texture::{load_scene_textures, load_skybox};
use paddock::vehicle::{CarState, FixedTimestep};
use paddock::weather::{Fog, RainField, TimeOfDay};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    scenes: SceneBuilder,
    settings: Settings,

    // Display state
    mode: DisplayMode,
    view: ViewMode,
    time: TimeOfDay,
    rain_enabled: bool,
    axes: bool,
    orbit: OrbitCamera,
    chase: ChaseCamera,
    fog: FogParams,
    light: Light,

    // Simulation
    physics: CarPhysics,
    car: CarState,
    rain: RainField,
    held: HeldKeys,
    physics_clock: FixedTimestep,
    input_clock: FixedTimestep,

    // Time tracking
    start_time: Instant,
    last_frame: Instant,
    title: String,

    /// Startup failure reported once the event loop returns
    error: Option<anyhow::Error>,
}

impl App {
    fn new(settings: Settings) -> Self {
        let lighting = LightingParams::default();
        let scenes = SceneBuilder::new(&settings.render, &lighting);
        let rain = RainField::new(settings.rain.clone(), settings.seed as u64);
        let now = Instant::now();

        Self {
            window: None,
            render_system: None,
            scenes,
            mode: settings.mode,
            view: settings.view,
            time: settings.time,
            rain_enabled: settings.rain_enabled,
            axes: settings.axes,
            orbit: OrbitCamera::from_preset(&settings.mode.preset()),
            chase: ChaseCamera::default(),
            fog: FogParams::default(),
            light: Light::new(lighting),
            physics: CarPhysics::default(),
            car: CarState::default(),
            rain,
            held: HeldKeys::default(),
            physics_clock: FixedTimestep::physics(),
            input_clock: FixedTimestep::input(),
            start_time: now,
            last_frame: now,
            title: String::new(),
            error: None,
            settings,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let render = &self.settings.render;
        let window_attributes = Window::default_attributes()
            .with_title("Paddock")
            .with_inner_size(winit::dpi::LogicalSize::new(
                render.window_width,
                render.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let textures = load_scene_textures(&render.assets_dir, render.texture_size, self.settings.seed)?;
        let sky = load_skybox(&render.assets_dir, self.time, render.skybox_size, self.settings.seed)?;
        let static_mesh = self.scenes.build_static(self.mode);

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &static_mesh,
            &textures,
            &sky,
            &self.rain,
        ))?;

        let size = window.inner_size();
        self.settings.render.window_width = size.width;
        self.settings.render.window_height = size.height;

        log::info!("Paddock is running: {} ({} view)", self.mode.label(), self.view.label());
        log::info!("Press ESC to quit");

        self.window = Some(window);
        self.render_system = Some(render_system);
        Ok(())
    }

    /// Apply one key action; returns false when the action quits
    fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::Rotate(delta) => self.orbit.rotate(delta),
            Action::ZoomOut => self.orbit.zoom_out(),
            Action::ZoomIn => self.orbit.zoom_in(),
            Action::LowerLight => self.light.lower(),
            Action::RaiseLight => self.light.raise(),
            Action::ResetAngles => self.orbit.reset_angles(),
            Action::ToggleRain => {
                self.rain_enabled = !self.rain_enabled;
                log::info!("Rain {}", if self.rain_enabled { "on" } else { "off" });
            }
            Action::ToggleTime => self.set_time(self.time.toggle()),
            Action::NextMode => self.set_mode(self.mode.next()),
            Action::ToggleView => {
                self.view = self.view.toggle();
                log::info!("{} view", self.view.label());
            }
            Action::ToggleLight => self.light.toggle(),
            Action::ToggleAxes => self.axes = !self.axes,
            Action::ToggleLightDistance => self.light.toggle_distance(),
        }
        true
    }

    /// Apply held driving keys, or fall back to orbit off the circuit
    fn drive(&mut self) {
        if controls::can_drive(self.view, self.mode) {
            let input = self.held.car_input();
            if !input.is_idle() {
                self.car.apply_input(&input, &self.physics);
            }
            return;
        }
        let view = controls::allowed_view(self.view, self.mode);
        if view != self.view {
            log::info!("Chase view is only available on the circuit");
            self.view = view;
        }
    }

    fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
        let preset = mode.preset();
        // Returning to the circuit only resets the zoom
        if mode == DisplayMode::Circuit {
            self.orbit.dim = preset.dim;
        } else {
            self.orbit.apply_preset(&preset);
        }
        if let Some(render_system) = self.render_system.as_mut() {
            render_system.set_static_mesh(&self.scenes.build_static(mode));
        }
        log::info!("Mode: {}", mode.label());
    }

    fn set_time(&mut self, time: TimeOfDay) {
        self.time = time;
        let render = &self.settings.render;
        match load_skybox(&render.assets_dir, time, render.skybox_size, self.settings.seed) {
            Ok(faces) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.set_skybox(&faces);
                }
            }
            Err(e) => log::error!("Keeping the current sky: {e}"),
        }
        log::info!("Time: {}", time.label());
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        match event.state {
            ElementState::Pressed => {
                // Held keys are repeated by our own clock
                if event.repeat {
                    return;
                }
                self.held.press(code);
                self.input_clock.delay(KEY_REPEAT_DELAY_S);
                if let Some(action) = Action::for_key(code, false) {
                    if !self.apply(action) {
                        event_loop.exit();
                    }
                }
                self.drive();
            }
            ElementState::Released => {
                self.held.release(code);
                if self.held.is_empty() {
                    self.input_clock.reset();
                }
            }
        }
    }

    /// Advance input repeat, car physics, rain and the light
    fn update(&mut self, dt_s: f32) {
        if !self.held.is_empty() {
            for _ in 0..self.input_clock.advance(dt_s) {
                for action in self.held.repeat_actions() {
                    self.apply(action);
                }
                self.drive();
            }
        }

        for _ in 0..self.physics_clock.advance(dt_s) {
            self.car.step(&self.physics);
            self.rain.advance();
        }

        self.light.update(self.start_time.elapsed().as_secs_f32());
    }

    fn update_title(&mut self) {
        let title = format!(
            "Angle={},{}  Perspective={}  Mode={}  Time={}  Velocity={:.2}  Heading={:.1}  Steering={:.1}",
            self.orbit.azimuth_deg,
            self.orbit.elevation_deg,
            self.view.label(),
            self.mode.label(),
            self.time.label(),
            self.car.velocity,
            self.car.heading_deg,
            self.car.steering_deg,
        );
        if title != self.title {
            log::debug!("{title}");
            if let Some(window) = &self.window {
                window.set_title(&format!("Paddock | {title}"));
            }
            self.title = title;
        }
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt_s = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.update(dt_s);
        self.update_title();

        let frame = frame_camera(
            self.view,
            &self.orbit,
            &self.car,
            &self.chase,
            &self.settings.render,
        );
        let light = self.light.enabled.then(|| self.light.position());
        let dynamic = self.scenes.build_dynamic(&DynamicScene {
            mode: self.mode,
            car: &self.car,
            light,
            axes: self.axes,
        });
        let fog = Fog::select(&self.fog, self.time, self.view);
        let scene_uniforms = SceneUniforms::new(
            &frame,
            light.map(|pos| (pos, self.light.levels(self.time))),
            &fog,
        );
        let skybox_uniforms = SkyboxUniforms {
            inv_view_proj: frame.sky_inv_view_proj.to_cols_array_2d(),
        };
        let rain_uniforms = RainUniforms::new(&frame, &self.rain, &fog);
        let draw_rain = self.time.is_night() && self.rain_enabled;

        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };
        render_system.update_dynamic_mesh(&dynamic);
        render_system.update_uniforms(&scene_uniforms, &skybox_uniforms, &rain_uniforms);

        match render_system.render(draw_rain) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = render_system.size();
                render_system.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {e:?}"),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }
        if let Err(e) = self.init_graphics(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => self.on_key(event_loop, &event),
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.settings.render.window_width = size.width;
                    self.settings.render.window_height = size.height;
                }
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Warn)
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .init();

    let settings = Args::parse().validate()?;
    log::info!(
        "Starting in {} mode, {} view, {}",
        settings.mode.label(),
        settings.view.label(),
        settings.time.label()
    );

    let mut app = App::new(settings);
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
