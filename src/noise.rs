//! Фрактальные шумовые поля с бесшовностью по долготе
//!
//! Долгота не подаётся в шум напрямую: она проецируется на окружность, длина которой
//! равна `scale`, и шум берётся в 3D по координатам `(sin, cos, широта)`. Синус и косинус
//! приближаются параболой: ошибка до нескольких процентов, зато шов на долготе 0/1
//! непрерывен, а вызов дешёвый. Точной периодичности не гарантируется, только визуальная.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};

use crate::config::NoiseSettings;

const SIN_B: f32 = 4.0 / PI;
const SIN_C: f32 = -4.0 / (PI * PI);

/// Параболическое приближение синуса на отрезке `[-π, π]`
#[inline]
#[must_use]
pub fn fast_sin(x: f32) -> f32 {
    SIN_B * x + SIN_C * x * x.abs()
}

/// Косинус через сдвинутый [`fast_sin`]; вход тоже из `[-π, π]`
#[inline]
#[must_use]
pub fn fast_cos(x: f32) -> f32 {
    let mut shifted = x + FRAC_PI_2;
    if shifted > PI {
        shifted -= TAU;
    }
    fast_sin(shifted)
}

/// Сворачивает 64-битный сид в 32 бита шумового генератора, не теряя старшую половину
fn fold_seed(seed: u64) -> i32 {
    (seed ^ (seed >> 32)) as i32
}

/// Неизменяемое шумовое поле: сид + параметры FBM
///
/// Выборка не меняет состояние, поэтому одно поле можно читать из нескольких потоков.
pub struct NoiseField {
    settings: NoiseSettings,
    radius: f32,
    vertical_scale: f32,
    noise: FastNoiseLite,
}

impl NoiseField {
    /// Создаёт поле для мира с сидом `world_seed`
    ///
    /// `aspect` задаёт отношение высоты карты к ширине: широта масштабируется так,
    /// чтобы детали не вытягивались по вертикали.
    #[must_use]
    pub fn new(world_seed: u64, settings: &NoiseSettings, aspect: f32) -> Self {
        let mut noise = FastNoiseLite::new();
        noise.set_seed(Some(fold_seed(world_seed.wrapping_add(settings.seed_offset))));
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(i32::from(settings.octaves)));
        noise.set_fractal_gain(Some(settings.persistence));
        noise.set_fractal_lacunarity(Some(settings.lacunarity));
        // Частоту задаём масштабом координат
        noise.set_frequency(Some(1.0));

        Self {
            settings: settings.clone(),
            radius: settings.scale / TAU,
            vertical_scale: settings.scale * aspect,
            noise,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    /// Значение поля в точке `(долгота, широта)`, обе нормированы в `[0, 1]`
    ///
    /// Результат лежит в `[-1, 1]`. Долгота замкнута: `1.0` совпадает с `0.0`.
    #[must_use]
    pub fn sample(&self, longitude: f32, latitude: f32) -> f32 {
        let angle = longitude.rem_euclid(1.0) * TAU - PI;
        let nx = self.radius * fast_sin(angle);
        let nz = self.radius * fast_cos(angle);
        let ny = latitude * self.vertical_scale;

        self.noise.get_noise_3d(nx, ny, nz).clamp(-1.0, 1.0)
    }
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField")
            .field("settings", &self.settings)
            .field("radius", &self.radius)
            .field("vertical_scale", &self.vertical_scale)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field(seed: u64) -> NoiseField {
        NoiseField::new(seed, &NoiseSettings::new(4.0, 5, 0), 0.5)
    }

    #[test]
    fn fast_trig_is_close_to_exact() {
        let mut x = -PI;
        while x <= PI {
            assert!((fast_sin(x) - x.sin()).abs() < 0.06, "sin({x})");
            assert!((fast_cos(x) - x.cos()).abs() < 0.06, "cos({x})");
            x += 0.01;
        }
    }

    #[test]
    fn fast_trig_meets_at_the_seam() {
        assert!((fast_sin(-PI) - fast_sin(PI)).abs() < 1e-5);
        assert!((fast_cos(-PI) - fast_cos(PI)).abs() < 1e-5);
    }

    #[test]
    fn same_seed_same_values() {
        let a = field(7);
        let b = field(7);
        for i in 0..50 {
            let lon = i as f32 / 50.0;
            let lat = 1.0 - lon;
            assert_eq!(a.sample(lon, lat), b.sample(lon, lat));
        }
    }

    #[test]
    fn different_seeds_differ() {
        let a = field(1);
        let b = field(2);
        let differs = (0..50).any(|i| {
            let lon = i as f32 / 50.0;
            a.sample(lon, 0.3) != b.sample(lon, 0.3)
        });
        assert!(differs);
    }

    #[test]
    fn high_seed_bits_change_the_field() {
        let low = field(7);
        let high = field(7 + (1 << 32));
        let differs = (0..100).any(|i| {
            let lon = i as f32 / 100.0;
            low.sample(lon, 0.3) != high.sample(lon, 0.3)
        });
        assert!(differs);
        assert_ne!(fold_seed(7), fold_seed(7 + (1 << 32)));
    }

    #[test]
    fn longitude_wraps() {
        let f = field(3);
        assert_eq!(f.sample(1.25, 0.4), f.sample(0.25, 0.4));
        assert_eq!(f.sample(-0.75, 0.4), f.sample(0.25, 0.4));
    }

    proptest! {
        #[test]
        fn output_stays_in_range(lon in 0.0f32..1.0, lat in 0.0f32..1.0) {
            let v = field(11).sample(lon, lat);
            prop_assert!((-1.0..=1.0).contains(&v));
        }

        #[test]
        fn small_steps_give_small_changes(lon in 0.0f32..1.0, lat in 0.0f32..1.0) {
            let f = field(5);
            let d = 1e-4;
            prop_assert!((f.sample(lon + d, lat) - f.sample(lon, lat)).abs() < 0.1);
            prop_assert!((f.sample(lon, lat + d) - f.sample(lon, lat)).abs() < 0.1);
        }

        #[test]
        fn seam_is_continuous(lat in 0.0f32..1.0) {
            let f = field(9);
            prop_assert!((f.sample(0.99999, lat) - f.sample(0.0, lat)).abs() < 0.05);
        }
    }
}
