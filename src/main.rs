// src/main.rs
//
// Interactive host: a winit window, a wgpu full-screen blit of the frame the
// sampler renders on the CPU, keyboard/mouse editing and step pacing.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use bitlife::{
    render, tuning::ControlPanel, EditMode, Grid, LifeError, Pattern, PixelTarget, Session,
    Stepper, Theme,
};
use clap::Parser;
use log::{debug, error, info, warn};
use pollster::block_on;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, ModifiersState, NamedKey},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

// -----------------------------
// Embedded WGSL blit shader
// -----------------------------
const BLIT_WGSL: &str = r#"
struct VSOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vi: u32) -> VSOut {
  var p = array<vec2<f32>, 3>(
    vec2<f32>(-1.0, -3.0),
    vec2<f32>( 3.0,  1.0),
    vec2<f32>(-1.0,  1.0)
  );
  var uv = array<vec2<f32>, 3>(
    vec2<f32>(0.0, 2.0),
    vec2<f32>(2.0, 0.0),
    vec2<f32>(0.0, 0.0)
  );

  var o: VSOut;
  o.pos = vec4<f32>(p[vi], 0.0, 1.0);
  o.uv  = uv[vi];
  return o;
}

@group(0) @binding(0) var samp: sampler;
@group(0) @binding(1) var tex: texture_2d<f32>;

@fragment
fn fs_main(i: VSOut) -> @location(0) vec4<f32> {
  return textureSample(tex, samp, i.uv);
}
"#;

// -----------------------------
// CLI
// -----------------------------
#[derive(Parser, Debug)]
#[command(author, version, about = "Bit-packed Game of Life", long_about = None)]
struct Args {
    /// Pattern to load: Life 1.06, RLE, or an image (dark pixels are alive)
    pattern: Option<PathBuf>,

    /// Largest grid side (after rounding up to a multiple of 32)
    #[arg(long)]
    max_size: Option<usize>,

    /// Update worker threads (0 = one per core)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Start from a random soup with this alive density instead of a pattern
    #[arg(long)]
    random: Option<f32>,

    /// Seed for --random and the R key
    #[arg(long)]
    seed: Option<u64>,

    /// Run this many steps without a window, report timings and exit
    #[arg(long)]
    benchmark: Option<usize>,

    /// Start running instead of paused
    #[arg(long)]
    run: bool,

    /// Log CPU/memory/fps stats once per second
    #[arg(short, long)]
    debug: bool,
}

#[derive(Default, Clone, Copy)]
struct InputState {
    cursor: Option<(f32, f32)>,
    mods: ModifiersState,
}

impl InputState {
    fn any_modifier(&self) -> bool {
        self.mods.shift_key() || self.mods.control_key() || self.mods.alt_key()
    }
}

// -----------------------------
// Rendering (wgpu)
// -----------------------------
struct Gfx {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    blit_pipeline: wgpu::RenderPipeline,
    blit_bind: wgpu::BindGroup,
    blit_bgl: wgpu::BindGroupLayout,
    blit_sampler: wgpu::Sampler,

    tex: wgpu::Texture,
    tex_view: wgpu::TextureView,

    tex_w: u32,
    tex_h: u32,
    bpr: u32,
    upload: Vec<u8>,
}

impl Gfx {
    async fn new(window: Arc<Window>, width: u32, height: u32, vsync: bool) -> Self {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window).expect("create_surface failed");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("No suitable GPU adapters found");

        let info = adapter.get_info();
        info!("presenting with {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::default(),
            })
            .await
            .expect("request_device failed");

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(caps.formats[0]);
        let alpha_mode = caps.alpha_modes[0];

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (tex, tex_view, tex_w, tex_h, bpr, upload) =
            Self::make_pixel_texture(&device, config.width, config.height);

        let blit_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("blit_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let blit_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blit_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
            ],
        });

        let blit_bind = Self::make_bind_group(&device, &blit_bgl, &blit_sampler, &tex_view);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit_shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_WGSL.into()),
        });

        let pl_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blit_pl_layout"),
            bind_group_layouts: &[&blit_bgl],
            push_constant_ranges: &[],
        });

        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blit_pipeline"),
            layout: Some(&pl_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            surface,
            device,
            queue,
            config,
            blit_pipeline,
            blit_bind,
            blit_bgl,
            blit_sampler,
            tex,
            tex_view,
            tex_w,
            tex_h,
            bpr,
            upload,
        }
    }

    fn make_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blit_bind"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
            ],
        })
    }

    fn make_pixel_texture(
        device: &wgpu::Device,
        w: u32,
        h: u32,
    ) -> (wgpu::Texture, wgpu::TextureView, u32, u32, u32, Vec<u8>) {
        let tex_w = w.max(1);
        let tex_h = h.max(1);

        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("cells_tex"),
            size: wgpu::Extent3d {
                width: tex_w,
                height: tex_h,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let tex_view = tex.create_view(&wgpu::TextureViewDescriptor::default());

        // rows padded to COPY_BYTES_PER_ROW_ALIGNMENT
        let tight_bpr = 4 * tex_w;
        let bpr = tight_bpr.div_ceil(256) * 256;
        let upload = vec![0u8; (bpr * tex_h) as usize];

        (tex, tex_view, tex_w, tex_h, bpr, upload)
    }

    fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn resize(&mut self, new_w: u32, new_h: u32) {
        self.config.width = new_w.max(1);
        self.config.height = new_h.max(1);
        self.surface.configure(&self.device, &self.config);

        let (tex, tex_view, tex_w, tex_h, bpr, upload) =
            Self::make_pixel_texture(&self.device, self.config.width, self.config.height);

        self.tex = tex;
        self.tex_view = tex_view;
        self.tex_w = tex_w;
        self.tex_h = tex_h;
        self.bpr = bpr;
        self.upload = upload;

        self.blit_bind =
            Self::make_bind_group(&self.device, &self.blit_bgl, &self.blit_sampler, &self.tex_view);
    }

    fn set_vsync(&mut self, on: bool) {
        self.config.present_mode = present_mode(on);
        self.surface.configure(&self.device, &self.config);
    }

    /// Sample the grid into the upload buffer and copy it to the texture.
    fn draw(&mut self, grid: &Grid, session: &Session) {
        let mut target = PixelTarget {
            pixels: &mut self.upload,
            width: self.tex_w as usize,
            height: self.tex_h as usize,
            bytes_per_row: self.bpr as usize,
        };
        render(grid, &session.view, &session.palette, &mut target);

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.upload,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.bpr),
                rows_per_image: Some(self.tex_h),
            },
            wgpu::Extent3d {
                width: self.tex_w,
                height: self.tex_h,
                depth_or_array_layers: 1,
            },
        );
    }

    fn present(&mut self) {
        let frame = match self.surface.get_current_texture() {
            Ok(f) => f,
            Err(e) => {
                debug!("surface lost ({e}), reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut enc = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("enc") });

        {
            let mut rp = enc.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rp"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rp.set_pipeline(&self.blit_pipeline);
            rp.set_bind_group(0, &self.blit_bind, &[]);
            rp.draw(0..3, 0..1);
        }

        self.queue.submit(Some(enc.finish()));
        frame.present();
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

// -----------------------------
// App
// -----------------------------
struct App {
    debug: bool,
    vsync: bool,
    seed: u64,

    window: Option<Arc<Window>>,
    gfx: Option<Gfx>,

    grid: Grid,
    stepper: Stepper,
    session: Session,
    input: InputState,

    // title / stats
    last_title: Instant,
    title_frames: u64,
    last_stat: Instant,
    frames: u64,
    sim_steps: u64,

    sys: System,
}

impl App {
    fn new(grid: Grid, stepper: Stepper, session: Session, debug: bool, seed: u64) -> Self {
        let mut sys = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );
        sys.refresh_all();
        let vsync = session.panel().vsync;

        Self {
            debug,
            vsync,
            seed,
            window: None,
            gfx: None,
            grid,
            stepper,
            session,
            input: InputState::default(),
            last_title: Instant::now(),
            title_frames: 0,
            last_stat: Instant::now(),
            frames: 0,
            sim_steps: 0,
            sys,
        }
    }

    fn window_size(&self) -> (u32, u32) {
        self.gfx.as_ref().map(Gfx::size).unwrap_or((1, 1))
    }

    fn recenter(&mut self) {
        let size = self.window_size();
        self.session.recenter(size, &self.grid);
    }

    fn install(&mut self, pattern: &Pattern) {
        match pattern.apply(&mut self.grid) {
            Ok(()) => {
                let (w, h) = self.grid.dimensions();
                info!("{} installed on a {w} x {h} grid", pattern.name);
                self.session.pattern_name = pattern.name.clone();
                self.recenter();
            }
            Err(e) => error!("{}: {e} .. ignoring", pattern.name),
        }
    }

    fn load_file(&mut self, path: &Path) {
        info!("loading {}", path.display());
        match Pattern::load(path, self.grid.max_side()) {
            Ok(pattern) => self.install(&pattern),
            Err(e) => error!("couldn't load {}: {e}", path.display()),
        }
    }

    fn seed_soup(&mut self) {
        let (w, h) = self.grid.dimensions();
        let density = self.session.panel().soup_density;
        self.seed = self.seed.wrapping_add(1);
        let soup = Pattern::random(w, h, density, self.seed);
        self.install(&soup);
    }

    fn step(&mut self) {
        self.stepper.step_once(&mut self.grid);
        self.sim_steps += 1;
    }

    fn toggle_fullscreen(&self) {
        if let Some(win) = &self.window {
            if win.fullscreen().is_some() {
                win.set_fullscreen(None);
            } else {
                win.set_fullscreen(Some(Fullscreen::Borderless(None)));
            }
        }
    }

    fn update_title(&mut self) {
        let elapsed = self.last_title.elapsed();
        if elapsed < Duration::from_millis(50) {
            return;
        }
        let Some(win) = &self.window else {
            return;
        };
        let s = &self.session;
        let title = if s.running {
            let fps = self.title_frames as f64 / elapsed.as_secs_f64();
            format!(
                "Bit Life - {} - {} steps per frame @ {:.1} fps - generation {}",
                s.pattern_name,
                s.steps_per_frame(),
                fps,
                self.grid.generation()
            )
        } else {
            format!(
                "Bit Life - {} - {} steps per frame @ PAUSED - generation {}",
                s.pattern_name,
                s.steps_per_frame(),
                self.grid.generation()
            )
        };
        win.set_title(&title);
        self.title_frames = 0;
        self.last_title = Instant::now();
    }

    fn on_key(&mut self, el: &ActiveEventLoop, key: Key) {
        let view_tuning = self.session.panel().view;
        match key {
            Key::Named(NamedKey::Escape) => {
                let fullscreen = self.window.as_ref().is_some_and(|w| w.fullscreen().is_some());
                if fullscreen {
                    self.toggle_fullscreen();
                } else {
                    el.exit();
                }
            }
            Key::Named(NamedKey::Enter) | Key::Named(NamedKey::Pause) => {
                self.session.running = !self.session.running;
            }
            Key::Named(NamedKey::Home) => self.recenter(),
            Key::Named(NamedKey::Space) | Key::Named(NamedKey::Tab) => self.step(),
            Key::Named(NamedKey::Backspace) | Key::Named(NamedKey::Delete) => {
                self.grid.clear();
                self.session.pattern_name = String::from("unnamed pattern");
            }
            Key::Named(NamedKey::F11) => self.toggle_fullscreen(),
            Key::Named(NamedKey::ArrowLeft) => self.session.view.pan_step((-1, 0), &view_tuning),
            Key::Named(NamedKey::ArrowRight) => self.session.view.pan_step((1, 0), &view_tuning),
            Key::Named(NamedKey::ArrowUp) => self.session.view.pan_step((0, -1), &view_tuning),
            Key::Named(NamedKey::ArrowDown) => self.session.view.pan_step((0, 1), &view_tuning),
            Key::Character(ref s) => match s.to_lowercase().as_str() {
                "c" => self.recenter(),
                "b" => self.session.toggle_border(),
                "v" => {
                    self.vsync = !self.vsync;
                    let vsync = self.vsync;
                    if let Some(gfx) = &mut self.gfx {
                        gfx.set_vsync(vsync);
                    }
                }
                "+" | "=" => self.session.faster(),
                "-" | "_" => self.session.slower(),
                "l" => self.session.set_theme(Theme::Light),
                "d" => self.session.set_theme(Theme::Dark),
                "s" | "." => self.step(),
                "f" => self.toggle_fullscreen(),
                "r" => self.seed_soup(),
                _ => {}
            },
            _ => {}
        }
    }

    fn log_stats(&mut self) {
        if !self.debug || self.last_stat.elapsed() < Duration::from_secs(1) {
            return;
        }
        self.sys.refresh_cpu_all();
        self.sys.refresh_memory();

        let cpu = self.sys.global_cpu_usage();
        let mem_used = self.sys.used_memory();
        let mem_total = self.sys.total_memory();
        let mem_pct = if mem_total > 0 {
            (mem_used as f32 / mem_total as f32) * 100.0
        } else {
            0.0
        };

        debug!(
            "CPU {:5.1}% | MEM {:5.1}% | FPS {} | steps/s {} | generation {} | alive {}",
            cpu,
            mem_pct,
            self.frames,
            self.sim_steps,
            self.grid.generation(),
            self.grid.population()
        );

        self.frames = 0;
        self.sim_steps = 0;
        self.last_stat = Instant::now();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, el: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let panel = self.session.panel();
        let attrs = WindowAttributes::default()
            .with_title("Bit Life")
            .with_inner_size(PhysicalSize::new(panel.window_width, panel.window_height));

        let win = Arc::new(el.create_window(attrs).expect("create_window"));
        let size = win.inner_size();
        let gfx = block_on(Gfx::new(win.clone(), size.width, size.height, self.vsync));

        self.window = Some(win);
        self.gfx = Some(gfx);
        self.recenter();

        self.last_title = Instant::now();
        self.last_stat = Instant::now();
    }

    fn window_event(&mut self, el: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => el.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    self.on_key(el, event.logical_key);
                }
            }

            WindowEvent::ModifiersChanged(m) => self.input.mods = m.state(),

            WindowEvent::Resized(sz) => {
                if let Some(gfx) = &mut self.gfx {
                    gfx.resize(sz.width, sz.height);
                }
                self.recenter();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let to = (position.x as f32, position.y as f32);
                if let Some(from) = self.input.cursor {
                    let window = self.window_size();
                    self.session.stroke(&mut self.grid, from, to, window);
                }
                self.input.cursor = Some(to);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if state == ElementState::Released {
                    self.session.edit = None;
                    return;
                }
                let mode = match button {
                    MouseButton::Middle => EditMode::Pan,
                    _ if self.input.any_modifier() => EditMode::Pan,
                    MouseButton::Left => EditMode::Paint,
                    MouseButton::Right => EditMode::Erase,
                    _ => return,
                };
                self.session.edit = Some(mode);
                if let Some(at) = self.input.cursor {
                    let window = self.window_size();
                    self.session.poke(&mut self.grid, at, window);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                if dy == 0.0 {
                    return;
                }
                if self.input.any_modifier() {
                    let window = self.window_size();
                    let at = self.input.cursor.unwrap_or((0.0, 0.0));
                    let tuning = self.session.panel().view;
                    self.session.view.zoom_at(at, window, dy > 0.0, &tuning);
                } else if dy > 0.0 {
                    self.session.faster();
                } else {
                    self.session.slower();
                }
            }

            WindowEvent::DroppedFile(path) => self.load_file(&path),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, el: &ActiveEventLoop) {
        el.set_control_flow(ControlFlow::Poll);

        let due = self.session.steps_due();
        if due > 0 {
            self.stepper.run_steps(&mut self.grid, due);
            self.sim_steps += due as u64;
        }

        if let Some(gfx) = self.gfx.as_mut() {
            gfx.draw(&self.grid, &self.session);
            gfx.present();
        }
        self.frames += 1;
        self.title_frames += 1;

        self.update_title();
        self.log_stats();
    }
}

// -----------------------------
// Startup
// -----------------------------
fn initial_pattern(args: &Args, panel: &ControlPanel, seed: u64) -> Result<Pattern, LifeError> {
    if let Some(path) = &args.pattern {
        return Ok(Pattern::load(path, panel.max_side)?);
    }
    if let Some(density) = args.random {
        return Ok(Pattern::random(
            panel.initial_width,
            panel.initial_height,
            density,
            seed,
        ));
    }
    Ok(Pattern::empty(
        "unnamed pattern",
        panel.initial_width,
        panel.initial_height,
    ))
}

fn benchmark(grid: &mut Grid, stepper: &Stepper, steps: usize) {
    let (w, h) = grid.dimensions();
    info!("running benchmark: {steps} steps on {w} x {h} with {} threads", stepper.threads());

    let start = Instant::now();
    stepper.run_steps(grid, steps);
    let secs = start.elapsed().as_secs_f64();

    let cells = (steps as f64) * (w as f64) * (h as f64);
    info!("total   {secs:.2} sec");
    info!("average {:.3} ms per step", secs * 1.0e3 / steps.max(1) as f64);
    info!("average {:.2} ps per cell", secs * 1.0e12 / cells.max(1.0));
    info!("alive after generation {}: {}", grid.generation(), grid.population());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut panel = ControlPanel::default();
    if let Some(max) = args.max_size {
        panel.max_side = max;
    }
    let seed = args.seed.unwrap_or(panel.rng_seed);

    let stepper = Stepper::new(args.threads).inspect_err(|e| error!("{e} .. aborting"))?;

    let mut grid = Grid::new(panel.initial_width, panel.initial_height, panel.max_side)?;
    let mut session = Session::new(panel.clone());
    match initial_pattern(&args, &panel, seed) {
        Ok(pattern) => match pattern.apply(&mut grid) {
            Ok(()) => session.pattern_name = pattern.name,
            Err(e) => warn!("{}: {e} .. starting empty", pattern.name),
        },
        Err(e) => warn!("{e} .. starting empty"),
    }

    if let Some(steps) = args.benchmark {
        benchmark(&mut grid, &stepper, steps);
        return Ok(());
    }

    session.running = args.run;
    let event_loop = EventLoop::new()?;
    let mut app = App::new(grid, stepper, session, args.debug, seed);
    event_loop.run_app(&mut app)?;
    Ok(())
}
