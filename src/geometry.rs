//! Обход координат: отрезки, кольца и случайное блуждание
//!
//! Функции ничего не знают о тайлах. Каждая вызывает посетителя для очередной точки,
//! и посетитель возвращает `true`, чтобы продолжить обход, или `false`, чтобы остановить его.

use std::collections::HashSet;

use rand::Rng;

pub type Point = (i32, i32);

/// Обходит клетки отрезка от `from` до `to` включительно (алгоритм Брезенхэма)
pub fn visit_ray_trace(from: Point, to: Point, mut visit: impl FnMut(Point) -> bool) {
    let (x1, y1) = to;
    let dx = (x1 - from.0).abs();
    let dy = -(y1 - from.1).abs();
    let sx = if from.0 < x1 { 1 } else { -1 };
    let sy = if from.1 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let (mut x, mut y) = from;
    loop {
        if !visit((x, y)) || (x == x1 && y == y1) {
            return;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Обходит квадратное кольцо радиуса `radius` вокруг `center`, ровно `8 * radius` точек
///
/// Порядок: верхняя сторона слева направо, правая сверху вниз, нижняя справа налево,
/// левая снизу вверх. Радиус 0 не поддерживается.
pub fn visit_range_bounds(center: Point, radius: i32, mut visit: impl FnMut(Point) -> bool) {
    debug_assert!(radius > 0, "range bounds need a positive radius");
    let (cx, cy) = center;
    let (left, right, top, bottom) = (cx - radius, cx + radius, cy - radius, cy + radius);

    let ring = (left..=right)
        .map(|x| (x, top))
        .chain((top + 1..=bottom).map(|y| (right, y)))
        .chain((left..right).rev().map(|x| (x, bottom)))
        .chain((top + 1..bottom).rev().map(|y| (left, y)));

    for point in ring {
        if !visit(point) {
            return;
        }
    }
}

/// Случайное блуждание по 8 направлениям с пропуском уже посещённых клеток
///
/// Повторные заходы не расходуют бюджет: обход заканчивается, когда посещено
/// `max_visits` различных клеток или посетитель вернул `false`.
pub fn visit_random_walk<R: Rng + ?Sized>(
    start: Point,
    max_visits: usize,
    rng: &mut R,
    mut visit: impl FnMut(Point) -> bool,
) {
    let mut visited = HashSet::new();
    let (mut x, mut y) = start;

    while visited.len() < max_visits {
        if visited.insert((x, y)) && !visit((x, y)) {
            return;
        }
        x += rng.gen_range(-1..=1);
        y += rng.gen_range(-1..=1);
    }
}
