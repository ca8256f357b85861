//! leopard - terminal UI and CLI for the Momentary Leopard pattern engine
//!
//! Usage:
//!   leopard                          Launch TUI
//!   leopard generate [options]       Render a final leopard
//!   leopard tile [options]           Pattern sheet from a saved leopard
//!   leopard archive <list|show>      Browse saved leopards
//!   leopard params | type            Inspect the slider mapping
//!   leopard benchmark                Time renders against the frame budget
//!   leopard config [--example]       Show configuration

mod cli;

use std::env;
use std::io::{self, stdout};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use image::DynamicImage;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use ratatui_image::{picker::{Picker, ProtocolType}, protocol::StatefulProtocol, StatefulImage};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use leopard::{render, FrameCoalescer, GeneratedLeopard, Quality, Slider, SliderState};

use cli::common::{default_sliders, result_view_lines};
use cli::export::{render_preview_image, save_png, today_png_name, LEOPARD_PNG_PREFIX};
use cli::{
    cmd_archive, cmd_benchmark, cmd_config, cmd_generate, cmd_params, cmd_tile, cmd_type, Archive, Config,
};

/// Filter variable for log output.
const LOG_ENV: &str = "LEOPARD_LOG";

/// Log filter for subcommands when `LEOPARD_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "leopard=warn,leopard_cli=info";

/// The TUI owns the terminal; only warnings may reach stderr.
const TUI_LOG_FILTER: &str = "warn";

/// Preview raster edge in pixels.
const PREVIEW_SIZE: u32 = 520;

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .compact()
        .init();
}

/// Pull `--config <file>` out of the argument list, wherever it appears.
fn split_config_flag(args: &[String]) -> Result<(Option<String>, Vec<String>), String> {
    let mut config_path = None;
    let mut rest = Vec::with_capacity(args.len());

    let mut i = 0;
    while i < args.len() {
        if args[i] == "--config" {
            i += 1;
            let path = args.get(i).ok_or("--config requires a file path")?;
            config_path = Some(path.clone());
        } else {
            rest.push(args[i].clone());
        }
        i += 1;
    }
    Ok((config_path, rest))
}

/// Result from background preview rendering
struct PreviewResult {
    /// Value of `App::preview_epoch` when the render started
    epoch: u64,
    image: Option<DynamicImage>,
    shapes: usize,
    gen_time_ms: f64,
    error: Option<String>,
}

/// Application state for TUI
struct App {
    /// Current slider values
    sliders: SliderState,
    /// Which slider is focused (index into `Slider::all()`)
    focus: usize,
    /// Latest slider snapshot waiting for a preview
    coalescer: FrameCoalescer<SliderState>,
    /// Is a preview render in progress?
    is_loading: bool,
    /// Bumped by a final render; previews started before it are dropped
    preview_epoch: u64,
    /// The image shows the final render rather than a preview
    showing_final: bool,
    /// Channel to receive preview results
    result_rx: Receiver<PreviewResult>,
    /// Sender cloned into each worker
    result_tx: Sender<PreviewResult>,
    /// Animation frame counter for spinner
    spinner_frame: usize,
    /// Image picker for terminal protocol detection
    picker: Picker,
    /// Current rendered image protocol state
    image_state: Option<Box<dyn StatefulProtocol>>,
    /// Shapes in the last preview
    shapes: usize,
    /// Last preview render time
    gen_time_ms: f64,
    /// Last final generation, shown in the result panel
    generated: Option<GeneratedLeopard>,
    /// One-line feedback for the last action
    status: String,
    archive: Archive,
    png_size: u32,
    frame: Duration,
    /// Should exit
    should_quit: bool,
}

impl App {
    fn new(config: &Config) -> Self {
        let (result_tx, result_rx) = mpsc::channel();

        // Initialize image picker - force Sixel protocol
        let mut picker = Picker::from_termios()
            .unwrap_or_else(|_| Picker::new((8, 16)));
        picker.protocol_type = ProtocolType::Sixel;

        let sliders = default_sliders();
        let mut coalescer = FrameCoalescer::new();
        coalescer.request(sliders);

        App {
            sliders,
            focus: 0,
            coalescer,
            is_loading: false,
            preview_epoch: 0,
            showing_final: false,
            result_rx,
            result_tx,
            spinner_frame: 0,
            picker,
            image_state: None,
            shapes: 0,
            gen_time_ms: 0.0,
            generated: None,
            status: "g generate  s save  p png".to_string(),
            archive: Archive::from_config(&config.archive),
            png_size: config.export.png_size,
            frame: Duration::from_millis(config.preview.frame_ms),
            should_quit: false,
        }
    }

    fn focused(&self) -> Slider {
        Slider::all()[self.focus]
    }

    /// Start a preview for the newest pending snapshot, at most one at a
    /// time. Snapshots arriving meanwhile replace each other in the
    /// coalescer.
    fn pump_preview(&mut self) {
        if self.is_loading {
            return;
        }
        let Some(sliders) = self.coalescer.on_frame() else {
            return;
        };

        let tx = self.result_tx.clone();
        let epoch = self.preview_epoch;
        self.is_loading = true;

        thread::spawn(move || {
            let start = Instant::now();
            let scene = render(&sliders, Quality::Low);
            let svg = scene.to_svg();
            let gen_time_ms = start.elapsed().as_secs_f64() * 1000.0;

            let (image, error) = match render_preview_image(&svg, PREVIEW_SIZE) {
                Ok(img) => (Some(img), None),
                Err(e) => (None, Some(e.to_string())),
            };
            let _ = tx.send(PreviewResult { epoch, image, shapes: scene.len(), gen_time_ms, error });
        });
    }

    fn check_preview_result(&mut self) {
        // Drain all pending results, keep only the latest
        let mut latest: Option<PreviewResult> = None;
        while let Ok(result) = self.result_rx.try_recv() {
            latest = Some(result);
        }

        if let Some(result) = latest {
            // One worker at a time, so any result means it finished
            self.is_loading = false;
            if result.epoch != self.preview_epoch {
                return;
            }
            self.showing_final = false;
            self.shapes = result.shapes;
            self.gen_time_ms = result.gen_time_ms;
            if let Some(e) = result.error {
                warn!(error = %e, "preview rasterization failed");
                self.status = format!("Preview failed: {}", e);
            }
            if let Some(img) = result.image {
                self.image_state = Some(self.picker.new_resize_protocol(img));
            }
        }
    }

    fn select(&mut self, delta: isize) {
        let n = Slider::all().len() as isize;
        self.focus = ((self.focus as isize + delta).rem_euclid(n)) as usize;
    }

    fn adjust(&mut self, delta: f64) {
        let slider = self.focused();
        let value = (self.sliders.get(slider) + delta).clamp(0.0, 100.0);
        self.sliders.set(slider, value);
        self.coalescer.request(self.sliders);
    }

    /// Final render at high quality; replaces the preview.
    fn generate(&mut self) {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let record = GeneratedLeopard::generate(&self.sliders, timestamp, &mut rand::rng());

        match render_preview_image(&record.svg, PREVIEW_SIZE) {
            Ok(img) => {
                self.image_state = Some(self.picker.new_resize_protocol(img));
                self.showing_final = true;
            }
            Err(e) => warn!(error = %e, "could not rasterize generated leopard"),
        }
        // Neither the pending nor an in-flight preview may replace it
        self.coalescer.cancel();
        self.preview_epoch += 1;
        self.status = format!("Generated: {}", record.type_name);
        self.generated = Some(record);
    }

    fn save(&mut self) {
        let Some(record) = &self.generated else {
            self.status = "Nothing to save yet, press g first".to_string();
            return;
        };
        self.status = match self.archive.save(record) {
            Ok(outcome) => match (outcome.shared_path, outcome.shared_error) {
                (_, Some(e)) => format!("Saved locally; shared save failed: {}", e),
                (Some(_), None) => "Saved to local and shared archive".to_string(),
                (None, None) => format!("Saved to {}", self.archive.local().path().display()),
            },
            Err(e) => {
                warn!(error = %e, "archive save failed");
                format!("Save failed: {}", e)
            }
        };
    }

    fn export_png(&mut self) {
        let Some(record) = &self.generated else {
            self.status = "Nothing to export yet, press g first".to_string();
            return;
        };
        let path = today_png_name(LEOPARD_PNG_PREFIX);
        self.status = match save_png(&record.svg, &path, self.png_size) {
            Ok(()) => format!("Wrote {}", path),
            Err(e) => {
                warn!(error = %e, "png export failed");
                format!("PNG export failed: {}", e)
            }
        };
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let (config_path, args) = match split_config_flag(&args) {
        Ok(split) => split,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let command = args.get(1).map(|s| s.as_str());
    let is_tui = matches!(command, None | Some("tui"));
    init_logging(if is_tui { TUI_LOG_FILTER } else { DEFAULT_LOG_FILTER });

    let config = match Config::resolve(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let rest: &[String] = args.get(2..).unwrap_or(&[]);
    let result = match command {
        None | Some("tui") => run_tui(&config),
        Some("generate") => cmd_generate(rest, &config),
        Some("tile") => cmd_tile(rest, &config),
        Some("archive") => cmd_archive(rest, &config),
        Some("params") => cmd_params(rest),
        Some("type") => cmd_type(rest),
        Some("benchmark") => cmd_benchmark(rest),
        Some("config") => cmd_config(rest, &config),
        Some("help") | Some("--help") | Some("-h") => {
            print_usage(&args[0]);
            Ok(())
        }
        Some(other) => Err(format!("Unknown command: {}. Run 'leopard help' for usage.", other)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_usage(prog: &str) {
    eprintln!("leopard - momentary leopard pattern generator");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {}                                  Launch TUI", prog);
    eprintln!("  {} generate [sliders] [options]     Render a final leopard", prog);
    eprintln!("  {} tile [options]                   Pattern sheet from a saved leopard", prog);
    eprintln!("  {} archive list|show [options]      Browse saved leopards", prog);
    eprintln!("  {} params [sliders]                 Engine parameters as JSON", prog);
    eprintln!("  {} type [sliders]                   Leopard type for a slider set", prog);
    eprintln!("  {} benchmark [options]              Render timing", prog);
    eprintln!("  {} config [--example]               Effective configuration", prog);
    eprintln!();
    eprintln!("Sliders: --complexity --softness --display --chaos --quirk --rest (0-100)");
    eprintln!("         or --sliders c,s,d,ch,q,r");
    eprintln!();
    eprintln!("Global options:");
    eprintln!("  --config <file>   YAML config (or set {})", cli::config::CONFIG_ENV);
    eprintln!("  {}=<filter>  Log filter, e.g. leopard=debug", LOG_ENV);
    eprintln!();
    eprintln!("TUI Controls:");
    eprintln!("  ↑/↓ or j/k    Select slider");
    eprintln!("  ←/→ or h/l    Adjust slider (fine)");
    eprintln!("  [ / ]         Adjust slider (coarse)");
    eprintln!("  g             Generate final leopard");
    eprintln!("  s             Save to archive");
    eprintln!("  p             Export PNG");
    eprintln!("  q / Esc       Quit");
}

fn run_tui(config: &Config) -> Result<(), String> {
    // Initialize terminal
    enable_raw_mode().map_err(|e| e.to_string())?;
    stdout().execute(EnterAlternateScreen).map_err(|e| e.to_string())?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))
        .map_err(|e| e.to_string())?;

    let mut app = App::new(config);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().map_err(|e| e.to_string())?;
    stdout().execute(LeaveAlternateScreen).map_err(|e| e.to_string())?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<(), String> {
    loop {
        // Check for a finished preview (non-blocking), then start the next
        app.check_preview_result();
        app.pump_preview();

        // Animate spinner while loading
        if app.is_loading {
            app.spinner_frame = (app.spinner_frame + 1) % 8;
        }

        terminal.draw(|frame| ui(frame, app)).map_err(|_| "Draw error".to_string())?;

        if event::poll(app.frame).map_err(|e| e.to_string())? {
            if let Event::Key(key) = event::read().map_err(|e| e.to_string())? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                        KeyCode::Up | KeyCode::Char('k') => app.select(-1),
                        KeyCode::Down | KeyCode::Char('j') => app.select(1),
                        KeyCode::Left | KeyCode::Char('h') => app.adjust(-1.0),
                        KeyCode::Right | KeyCode::Char('l') => app.adjust(1.0),
                        KeyCode::Char('[') => app.adjust(-10.0),
                        KeyCode::Char(']') => app.adjust(10.0),
                        KeyCode::Char('g') => app.generate(),
                        KeyCode::Char('s') => app.save(),
                        KeyCode::Char('p') => app.export_png(),
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// `[#####.....]` bar for a 0-100 value.
fn slider_bar(value: f64, width: usize) -> String {
    let filled = ((value / 100.0) * width as f64).round().clamp(0.0, width as f64) as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

fn ui(frame: &mut Frame, app: &mut App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let top_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(36),
            Constraint::Min(40),
        ])
        .split(main_layout[0]);

    // Split left sidebar into sliders and result
    let sidebar_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(Slider::all().len() as u16 + 4),
            Constraint::Min(8),
        ])
        .split(top_layout[0]);

    // Sliders
    let slider_lines: Vec<Line> = Slider::all()
        .iter()
        .enumerate()
        .map(|(i, slider)| {
            let value = app.sliders.get(*slider);
            let text = format!("{:<9} {} {:>3.0}", slider.label(), slider_bar(value, 14), value);
            if i == app.focus {
                Line::styled(format!("► {}", text), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                Line::styled(format!("  {}", text), Style::default().fg(Color::White))
            }
        })
        .collect();

    let mut slider_text = slider_lines;
    slider_text.push(Line::raw(""));
    slider_text.push(Line::styled(
        format!("Shapes: {}  Gen: {:.1}ms", app.shapes, app.gen_time_ms),
        Style::default().fg(Color::DarkGray),
    ));

    let sliders = Paragraph::new(slider_text)
        .block(Block::default()
            .title(" Sliders ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)));

    frame.render_widget(sliders, sidebar_layout[0]);

    // Result panel
    let result_text = match &app.generated {
        Some(record) => result_view_lines(&record.leopard_type(), &record.sliders).join("\n"),
        None => "Press g to generate a leopard.".to_string(),
    };
    let result = Paragraph::new(result_text)
        .wrap(Wrap { trim: true })
        .block(Block::default()
            .title(" Your Leopard ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)))
        .style(Style::default().fg(Color::White));

    frame.render_widget(result, sidebar_layout[1]);

    // Spinner animation frames
    let spinner_chars = ['|', '/', '-', '\\', '|', '/', '-', '\\'];
    let spinner = spinner_chars[app.spinner_frame % spinner_chars.len()];

    let image_title = if app.is_loading {
        format!(" [{}] Rendering... ", spinner)
    } else if app.showing_final {
        " Final ".to_string()
    } else {
        " Preview ".to_string()
    };

    let border_color = if app.is_loading { Color::Yellow } else { Color::Green };

    let image_block = Block::default()
        .title(image_title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner_area = image_block.inner(top_layout[1]);
    frame.render_widget(image_block, top_layout[1]);

    if let Some(ref mut image_state) = app.image_state {
        let image_widget = StatefulImage::new(None);
        frame.render_stateful_widget(image_widget, inner_area, image_state);
    }

    // Status + help
    let help = Paragraph::new(format!(
        "{}   │   ↑↓ slider  ←→ [ ] adjust  g generate  s save  p png  q quit",
        app.status
    ))
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, main_layout[1]);
}
