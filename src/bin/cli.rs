use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use worldgen::{GenerationConfig, generate_with_progress};

/// Генератор тайловых миров
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (по умолчанию встроенные параметры)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Переопределить сид из конфигурации
    #[arg(short, long)]
    seed: Option<u64>,

    /// Сохранить цветное превью карты в PNG
    #[arg(short, long)]
    preview: Option<PathBuf>,

    /// Вывести сводку по рельефу в JSON
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("worldgen=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            GenerationConfig::from_toml_file(path)?
        }
        None => GenerationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let grid = generate_with_progress(&config, &mut |percent: u8| {
        if percent % 10 == 0 {
            info!("Generation {percent}%");
        }
        true
    })?;

    if let Some(path) = &cli.preview {
        info!("Saving preview to {}", path.display());
        grid.save_as_png(&path.to_string_lossy())?;
    }

    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&grid.summary())?);
    }

    Ok(())
}
