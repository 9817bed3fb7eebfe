//! Конвейер генерации мира
//!
//! Проходы выполняются строго по порядку, и каждый целиком покрывает сетку до начала
//! следующего: дождю нужны уже классифицированные соседи, рекам нужны готовые осадки.

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::biome::{classification_row, frost_row, vegetation_row};
use crate::climate::rainfall_row;
use crate::config::GenerationConfig;
use crate::error::{GenError, Result};
use crate::grid::WorldGrid;
use crate::heightmap::{elevation_row, faulting_row, ruggedness_row};
use crate::noise::NoiseField;
use crate::progress::{Checkpoint, ProgressTracker, Unobserved};
use crate::rivers::river_row;

/// Сдвиг сида для генератора истоков рек
const RIVER_SEED_SALT: u64 = 0x5249_5645_5253;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Elevation,
    Faulting,
    Ruggedness,
    Classification,
    Frost,
    Rainfall,
    Rivers,
    Vegetation,
}

impl Pass {
    pub const ALL: [Pass; 8] = [
        Pass::Elevation,
        Pass::Faulting,
        Pass::Ruggedness,
        Pass::Classification,
        Pass::Frost,
        Pass::Rainfall,
        Pass::Rivers,
        Pass::Vegetation,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Pass::Elevation => "elevation",
            Pass::Faulting => "faulting",
            Pass::Ruggedness => "ruggedness",
            Pass::Classification => "classification",
            Pass::Frost => "frost",
            Pass::Rainfall => "rainfall",
            Pass::Rivers => "rivers",
            Pass::Vegetation => "vegetation",
        }
    }
}

/// Шумовые поля одного прогона, по одному на явление
#[derive(Debug)]
struct NoiseFields {
    elevation: NoiseField,
    fault: NoiseField,
    erosion: NoiseField,
    ruggedness: NoiseField,
}

impl NoiseFields {
    fn new(config: &GenerationConfig) -> Self {
        let aspect = config.aspect();
        Self {
            elevation: NoiseField::new(config.seed, &config.elevation_noise, aspect),
            fault: NoiseField::new(config.seed, &config.fault_noise, aspect),
            erosion: NoiseField::new(config.seed, &config.erosion_noise, aspect),
            ruggedness: NoiseField::new(config.seed, &config.ruggedness_noise, aspect),
        }
    }
}

struct Pipeline<'a> {
    config: &'a GenerationConfig,
    fields: NoiseFields,
    rng: ChaCha8Rng,
    grid: WorldGrid,
    rivers: usize,
}

impl Pipeline<'_> {
    fn run_row(&mut self, pass: Pass, y: u32) {
        let config = self.config;
        let grid = &mut self.grid;
        match pass {
            Pass::Elevation => elevation_row(grid, y, &self.fields.elevation, &config.elevation),
            Pass::Faulting => faulting_row(
                grid,
                y,
                &self.fields.fault,
                &self.fields.erosion,
                &config.faulting,
            ),
            Pass::Ruggedness => ruggedness_row(grid, y, &self.fields.ruggedness),
            Pass::Classification => classification_row(grid, y, &config.terrain),
            Pass::Frost => frost_row(grid, y, &config.biomes),
            Pass::Rainfall => rainfall_row(grid, y, &config.rain),
            Pass::Rivers => self.rivers += river_row(grid, y, &config.rivers, &mut self.rng),
            Pass::Vegetation => vegetation_row(grid, y, &config.biomes),
        }
    }
}

/// Генерирует мир по конфигурации без отслеживания прогресса
pub fn generate(config: &GenerationConfig) -> Result<WorldGrid> {
    generate_with_progress(config, &mut Unobserved)
}

/// Генерирует мир, сообщая прогресс после каждой строки каждого прохода
///
/// Конфигурация проверяется до начала работы. Если `checkpoint` вернул `false`,
/// недостроенная сетка отбрасывается и возвращается [`GenError::Cancelled`].
pub fn generate_with_progress(
    config: &GenerationConfig,
    checkpoint: &mut impl Checkpoint,
) -> Result<WorldGrid> {
    config.validate()?;

    info!(
        seed = config.seed,
        width = config.width,
        height = config.height,
        "Generating world"
    );
    let started = Instant::now();

    let mut pipeline = Pipeline {
        config,
        fields: NoiseFields::new(config),
        rng: ChaCha8Rng::seed_from_u64(config.seed ^ RIVER_SEED_SALT),
        grid: WorldGrid::blank(config.width, config.height),
        rivers: 0,
    };

    let mut progress = ProgressTracker::new(Pass::ALL.len() * config.height as usize);
    if !progress.report(checkpoint) {
        return Err(GenError::Cancelled { percent: 0 });
    }

    for pass in Pass::ALL {
        let pass_started = Instant::now();
        for y in 0..config.height {
            pipeline.run_row(pass, y);
            if !progress.advance(checkpoint) {
                info!(pass = pass.name(), "World generation cancelled");
                return Err(GenError::Cancelled {
                    percent: progress.percent(),
                });
            }
        }
        debug!(pass = pass.name(), elapsed = ?pass_started.elapsed(), "Pass finished");
    }

    info!(
        rivers = pipeline.rivers,
        elapsed = ?started.elapsed(),
        "World generated"
    );
    Ok(pipeline.grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_config_is_rejected_before_any_progress() {
        let config = GenerationConfig::new(1, 0, 10);
        let mut calls = 0;
        let result = generate_with_progress(&config, &mut |_: u8| {
            calls += 1;
            true
        });
        assert!(matches!(result, Err(GenError::InvalidDimensions { .. })));
        assert_eq!(calls, 0);
    }

    #[test]
    fn progress_runs_from_zero_to_hundred() {
        let config = GenerationConfig::new(3, 24, 12);
        let mut seen = Vec::new();
        generate_with_progress(&config, &mut |p: u8| {
            seen.push(p);
            true
        })
        .unwrap();

        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn cancellation_stops_generation() {
        let config = GenerationConfig::new(3, 24, 12);
        let result = generate_with_progress(&config, &mut |p: u8| p < 50);
        assert!(matches!(result, Err(GenError::Cancelled { percent }) if percent >= 50));
    }

    #[test]
    fn passes_run_in_declared_order() {
        assert_eq!(Pass::ALL[0], Pass::Elevation);
        assert_eq!(Pass::ALL[5], Pass::Rainfall);
        assert_eq!(Pass::ALL[6], Pass::Rivers);
        assert_eq!(Pass::ALL.len(), 8);
    }
}
