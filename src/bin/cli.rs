use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use logic2live::convert::{convert, ConvertOptions};
use logic2live::error::AppError;
use logic2live::paths;
use logic2live::progress::{JsonProgress, ProgressEvent, ProgressSink, Stage, TextProgress};
use logic2live::settings::{self, ConverterSettings};

// ── CLI argument parsing ─────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "logic2live",
    about = "Convert Logic Pro .logicx projects to Ableton Live sets",
    version
)]
struct Cli {
    /// Path to the .logicx project
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Project alternative to convert
    #[arg(short, long, default_value_t = 0)]
    alternative: u32,

    /// Don't copy audio files into the Live project
    #[arg(long)]
    no_copy: bool,

    /// Only print the conversion report
    #[arg(long)]
    report_only: bool,

    /// Live template set (DefaultLiveSet.als); auto-detected if omitted
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// VST3 directory scanned for replacement plugins
    #[arg(long, value_name = "DIR")]
    vst3_path: Option<PathBuf>,

    /// mixer_overrides.json with per-track volume/pan/mute/solo
    #[arg(long, value_name = "FILE")]
    mixer: Option<PathBuf>,

    /// Write a mixer_overrides.json template listing every track
    #[arg(long)]
    generate_mixer_template: bool,

    /// Machine-readable JSON progress lines on stdout
    #[arg(long)]
    json_progress: bool,

    /// Settings file (default: settings.json in the user config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Store --template, --vst3-path, --no-copy and --json-progress in the
    /// settings file as new defaults
    #[arg(long)]
    save_settings: bool,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbosity: u8,
}

impl Cli {
    /// The settings file in use: `--config`, else the user config directory.
    fn settings_file(&self) -> Option<PathBuf> {
        self.config
            .clone()
            .or_else(|| paths::config_dir().map(|dir| paths::settings_path(&dir)))
    }

    /// Settings with this invocation's flags folded in. Flags win over the
    /// settings file, which wins over built-in defaults.
    fn merged_settings(&self, settings: &ConverterSettings, json: bool) -> ConverterSettings {
        ConverterSettings {
            template_path: self.template.clone().or_else(|| settings.template_path.clone()),
            vst3_path: self.vst3_path.clone().or_else(|| settings.vst3_path.clone()),
            copy_audio: settings.copy_audio && !self.no_copy,
            json_progress: json,
            ..settings.clone()
        }
    }

    /// `effective` comes from [`Cli::merged_settings`].
    fn into_options(self, effective: ConverterSettings) -> ConvertOptions {
        let mut options = ConvertOptions::new(self.input, self.output);
        options.alternative = self.alternative;
        options.copy_audio = effective.copy_audio;
        options.report_only = self.report_only;
        options.template = effective.template_path;
        if effective.vst3_path.is_some() {
            options.vst3_dir = effective.vst3_path;
        }
        options.mixer = self.mixer;
        options.generate_mixer_template = self.generate_mixer_template;
        options
    }
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    let settings_file = cli.settings_file();
    let settings = settings_file
        .as_deref()
        .and_then(settings::load_settings_file)
        .unwrap_or_default();
    let json = cli.json_progress || settings.json_progress;
    let effective = cli.merged_settings(&settings, json);
    log::debug!("{cli:?}");

    if cli.save_settings {
        match &settings_file {
            Some(path) => match settings::save_settings_file(path, &effective) {
                Ok(()) => log::info!("saved settings to {}", path.display()),
                Err(e) => log::warn!("cannot save settings to {}: {e}", path.display()),
            },
            None => log::warn!("no config directory on this platform; use --config to save settings"),
        }
    }

    let options = cli.into_options(effective);
    let result = if json {
        run(&options, &mut JsonProgress::new(io::stdout()))
    } else {
        run(&options, &mut TextProgress::new(io::stdout()))
    };

    if let Err(e) = result {
        if json {
            let event = ProgressEvent::new(Stage::Error, 0.0, e.to_string())
                .with("code", e.code())
                .with("error", serde_json::to_value(&e).unwrap_or_default());
            JsonProgress::new(io::stdout()).emit(event);
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

fn run(options: &ConvertOptions, progress: &mut dyn ProgressSink) -> Result<(), AppError> {
    convert(options, progress).map(|_| ())
}
