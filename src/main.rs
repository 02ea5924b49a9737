mod color;
mod config;
mod error;
mod render;
mod roster;
mod stylesheet;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

use color::ColorSpec;
use render::{IconRenderer, RenderRequest, ScaleMode};
use roster::IconRoster;

#[derive(Parser, Debug)]
#[command(
    name = "glyphforge",
    version,
    about = "Render icon-font glyphs to PNG and track which icons are used"
)]
struct Cli {
    /// Path to the JSON config file (default: ./glyphforge.json)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long, action)]
    init_config: bool,

    /// Print all icon names from the stylesheet and exit
    #[arg(long, action)]
    list: bool,

    /// Render this icon instead of picking one at random (the
    /// available/reserved lists are left untouched)
    #[arg(short, long, value_name = "NAME")]
    icon: Option<String>,

    #[arg(long, value_name = "FILE")]
    stylesheet: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Keep the common icon-name prefix instead of stripping it
    #[arg(long, action)]
    keep_prefix: bool,

    /// Output size in pixels
    #[arg(short, long)]
    size: Option<u32>,

    /// Fill color: a name or hex value such as '#5DADE2'
    #[arg(long)]
    color: Option<String>,

    /// 'auto' or an explicit scale factor between 0 and 1
    #[arg(long, default_value = "auto")]
    scale: String,

    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Output filename (default: <icon>.png)
    #[arg(long, value_name = "FILE")]
    filename: Option<String>,

    /// Seed for the random pick, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose logging
    #[arg(short, long, action)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    let started = Instant::now();

    if cli.init_config {
        let path = cli
            .config
            .unwrap_or_else(|| PathBuf::from(config::CONFIG_FILE));
        config::save_config(&config::Config::default(), &path)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let mut config = config::load_config(cli.config.as_deref());
    if let Some(path) = cli.stylesheet {
        config.stylesheet = path;
    }
    if let Some(path) = cli.font {
        config.font = path;
    }
    if cli.keep_prefix {
        config.keep_prefix = true;
    }
    if let Some(size) = cli.size {
        config.size = size;
    }
    if let Some(color) = cli.color {
        config.color = color;
    }
    if let Some(dir) = cli.out_dir {
        config.output_dir = dir;
    }
    anyhow::ensure!(config.size > 0, "size must be a positive pixel count");

    let scale = parse_scale(&cli.scale)?;
    let color = ColorSpec::parse(&config.color);

    let renderer = IconRenderer::new(&config.stylesheet, &config.font, config.keep_prefix)
        .with_context(|| {
            format!(
                "loading icon font ({} / {})",
                config.stylesheet.display(),
                config.font.display()
            )
        })?;
    log::debug!(
        "Catalog holds {} icons, common prefix {:?}",
        renderer.catalog().len(),
        renderer.common_prefix()
    );

    if cli.list {
        for name in renderer.catalog().names() {
            println!("{name}");
        }
        return Ok(());
    }

    if let Some(icon) = cli.icon {
        // Explicit render: the available/reserved lists stay untouched.
        let request = RenderRequest {
            icon,
            size: config.size,
            color,
            scale,
            filename: cli.filename,
            out_dir: config.output_dir,
        };
        let path = renderer.render(&request)?;
        log::info!("Rendered {} to {}", request.icon, path.display());
    } else {
        let roster = IconRoster::new(config.available_list.clone(), config.reserved_list.clone());
        let names = roster
            .load_available()
            .with_context(|| format!("reading {}", config.available_list.display()))?;

        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let index = roster::pick(&names, &mut rng, config.pick_mode).ok_or_else(|| {
            anyhow::anyhow!("available list {} is empty", config.available_list.display())
        })?;
        let icon = names[index].clone();

        let request = RenderRequest {
            icon: icon.clone(),
            size: config.size,
            color,
            scale,
            filename: cli.filename,
            out_dir: config.output_dir,
        };
        let path = renderer.render(&request)?;
        roster
            .reserve(&names, &icon)
            .with_context(|| format!("moving {icon} to the reserved list"))?;
        log::info!("Reserved {} ({})", icon, path.display());
    }

    println!("Runtime = {}ms", started.elapsed().as_millis());
    Ok(())
}

fn parse_scale(value: &str) -> anyhow::Result<ScaleMode> {
    if value == "auto" {
        return Ok(ScaleMode::Auto);
    }
    let factor: f32 = value
        .parse()
        .context("scale must be 'auto' or a number")?;
    anyhow::ensure!(factor > 0.0, "scale factor must be positive");
    Ok(ScaleMode::Factor(factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scale() {
        assert_eq!(parse_scale("auto").unwrap(), ScaleMode::Auto);
        assert_eq!(parse_scale("0.8").unwrap(), ScaleMode::Factor(0.8));
        assert!(parse_scale("-1").is_err());
        assert!(parse_scale("big").is_err());
    }
}
