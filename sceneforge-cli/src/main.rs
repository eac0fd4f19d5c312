//! Command-line interface for the sceneforge assembly engine.
//!
//! Discovers scene assets (`scene_N.{jpg,jpeg,png}` stills with optional
//! `scene_N.{mp3,wav}` narration audio and `scene_N.txt` narration text)
//! in an input directory, runs the core assembly, and writes the MP4,
//! the SRT sidecar, and the scene-timing JSON next to each other in the
//! output directory.

use clap::{Parser, Subcommand};
use log::{info, warn};
use sceneforge_core::{assemble, AssemblyConfig, PanDirection, Scene};

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sceneforge: scene-based video assembly",
    long_about = "Assembles ordered scene assets (stills, narration audio, narration \
                  text) into a single MP4 with pan-and-zoom motion, crossfade \
                  transitions, and synchronized SRT subtitles."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assembles scene assets from a directory into a video
    Assemble(AssembleArgs),
}

#[derive(Parser, Debug)]
struct AssembleArgs {
    /// Directory containing scene_N.{jpg,jpeg,png} and companions
    #[arg(required = true, value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Directory where outputs are written (defaults to the input dir)
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Base name for the output files
    #[arg(short, long, default_value = "assembly")]
    title: String,

    /// Output frame rate
    #[arg(long, default_value_t = sceneforge_core::config::DEFAULT_FPS)]
    fps: u32,

    /// Output resolution as WIDTHxHEIGHT
    #[arg(long, value_name = "WxH", default_value = "1920x1080")]
    resolution: String,

    /// Crossfade length between scenes, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = sceneforge_core::config::DEFAULT_CROSSFADE_SECS)]
    crossfade: f64,

    /// Duration for scenes without narration audio, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = sceneforge_core::config::DEFAULT_FALLBACK_SCENE_SECONDS)]
    fallback_duration: f64,

    /// Minimum scene duration, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = sceneforge_core::config::DEFAULT_MIN_SCENE_SECONDS)]
    min_scene_duration: f64,

    /// Cap on total video duration, in seconds
    #[arg(long, value_name = "SECONDS")]
    max_duration: Option<f64>,

    /// Pan direction: auto, left, right, up, or down
    #[arg(long, default_value = "auto")]
    pan: String,

    /// Skip SRT subtitle generation
    #[arg(long)]
    no_subtitles: bool,
}

fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn parse_resolution(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Invalid resolution '{value}', expected WIDTHxHEIGHT"))?;
    let width = w
        .parse::<u32>()
        .map_err(|_| format!("Invalid width in resolution '{value}'"))?;
    let height = h
        .parse::<u32>()
        .map_err(|_| format!("Invalid height in resolution '{value}'"))?;
    Ok((width, height))
}

fn find_asset(dir: &Path, index: usize, extensions: &[&str]) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| dir.join(format!("scene_{index}.{ext}")))
        .find(|p| p.is_file())
}

/// Loads scenes from `dir` by scanning `scene_1`, `scene_2`, ... until the
/// first index with no still image.
fn discover_scenes(dir: &Path) -> Result<Vec<Scene>, Box<dyn std::error::Error>> {
    let mut scenes = Vec::new();
    let mut index = 1usize;
    while let Some(image_path) = find_asset(dir, index, &["jpg", "jpeg", "png"]) {
        let mut scene = Scene::new(index, fs::read(&image_path)?);

        if let Some(audio_path) = find_asset(dir, index, &["mp3", "wav"]) {
            scene = scene.with_audio(fs::read(&audio_path)?);
        }
        if let Some(text_path) = find_asset(dir, index, &["txt"]) {
            let narration = fs::read_to_string(&text_path)?;
            if narration.trim().is_empty() {
                warn!("Scene {index}: narration file is empty, ignoring");
            } else {
                scene = scene.with_narration(narration);
            }
        }

        scenes.push(scene);
        index += 1;
    }

    if scenes.is_empty() {
        return Err(format!(
            "No scene assets found in '{}' (expected scene_1.jpg/jpeg/png)",
            dir.display()
        )
        .into());
    }
    Ok(scenes)
}

fn run_assemble(args: AssembleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    let input_dir = args
        .input_dir
        .canonicalize()
        .map_err(|e| format!("Invalid input directory '{}': {e}", args.input_dir.display()))?;
    let output_dir = args.output_dir.unwrap_or_else(|| input_dir.clone());
    fs::create_dir_all(&output_dir)?;

    let config = AssemblyConfig {
        fps: args.fps,
        resolution: parse_resolution(&args.resolution)?,
        crossfade_secs: args.crossfade,
        fallback_scene_seconds: args.fallback_duration,
        min_scene_seconds: args.min_scene_duration,
        max_video_duration: args.max_duration,
        generate_subtitles: !args.no_subtitles,
        pan: PanDirection::from_name(&args.pan),
        ..Default::default()
    };

    let scenes = discover_scenes(&input_dir)?;
    info!(
        "[{}] Assembling {} scene(s) from {}",
        get_timestamp(),
        scenes.len(),
        input_dir.display()
    );

    let compiled = assemble(&scenes, &config)?;

    let title = sceneforge_core::utils::sanitize_filename(&args.title);
    let video_path = output_dir.join(format!("{title}.mp4"));
    fs::write(&video_path, &compiled.video)?;
    println!("Video:    {}", video_path.display());

    if let Some(srt) = &compiled.subtitles {
        let srt_path = output_dir.join(format!("{title}.srt"));
        fs::write(&srt_path, srt)?;
        println!("Subtitles: {}", srt_path.display());
    }

    let timings_path = output_dir.join(format!("{title}_timings.json"));
    let timings_file = fs::File::create(&timings_path)?;
    serde_json::to_writer_pretty(timings_file, &compiled.timings)?;
    println!("Timings:  {}", timings_path.display());

    let total_secs = compiled.timings.last().map_or(0.0, |t| t.end);
    println!(
        "Assembled {} scene(s), {} of content, in {}",
        compiled.timings.len(),
        sceneforge_core::utils::format_duration(total_secs),
        sceneforge_core::utils::format_duration(start_time.elapsed().as_secs_f64())
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Assemble(args) => run_assemble(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("1920x1080").unwrap(), (1920, 1080));
        assert_eq!(parse_resolution("1280X720").unwrap(), (1280, 720));
        assert!(parse_resolution("1080p").is_err());
        assert!(parse_resolution("axb").is_err());
    }

    #[test]
    fn test_assemble_args_defaults() {
        let cli = Cli::parse_from(["sceneforge", "assemble", "/tmp/scenes"]);
        let Commands::Assemble(args) = cli.command;
        assert_eq!(args.input_dir, PathBuf::from("/tmp/scenes"));
        assert_eq!(args.title, "assembly");
        assert_eq!(args.fps, 30);
        assert_eq!(args.pan, "auto");
        assert!(!args.no_subtitles);
        assert!(args.max_duration.is_none());
    }

    #[test]
    fn test_assemble_args_overrides() {
        let cli = Cli::parse_from([
            "sceneforge",
            "assemble",
            "/tmp/scenes",
            "--output-dir",
            "/tmp/out",
            "--title",
            "My Story",
            "--crossfade",
            "0.5",
            "--max-duration",
            "60",
            "--pan",
            "left",
            "--no-subtitles",
        ]);
        let Commands::Assemble(args) = cli.command;
        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(args.title, "My Story");
        assert_eq!(args.crossfade, 0.5);
        assert_eq!(args.max_duration, Some(60.0));
        assert_eq!(args.pan, "left");
        assert!(args.no_subtitles);
    }

    #[test]
    fn test_discover_scenes_stops_at_gap() {
        let dir = tempfile::tempdir().unwrap();
        for i in [1, 2, 4] {
            fs::write(dir.path().join(format!("scene_{i}.jpg")), [0xFF, 0xD8]).unwrap();
        }
        fs::write(dir.path().join("scene_1.txt"), "Narration one").unwrap();

        let scenes = discover_scenes(dir.path()).unwrap();
        // scene_4 is unreachable past the gap at 3.
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].narration.as_deref(), Some("Narration one"));
        assert!(scenes[1].narration.is_none());
    }

    #[test]
    fn test_discover_scenes_empty_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_scenes(dir.path()).is_err());
    }
}
