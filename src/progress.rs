//! Кооперативные точки прогресса генерации
//!
//! Генерация блокирующая и самая дорогая операция в игре. Хост получает управление
//! после каждого завершённого прохода по строке, когда процент меняется, и может
//! отменить прогон, вернув `false`.

/// Получатель прогресса генерации
pub trait Checkpoint {
    /// `percent` не убывает между вызовами. `false` прерывает генерацию
    fn report(&mut self, percent: u8) -> bool;
}

/// Прогресс никому не нужен
#[derive(Debug, Default, Clone, Copy)]
pub struct Unobserved;

impl Checkpoint for Unobserved {
    fn report(&mut self, _percent: u8) -> bool {
        true
    }
}

impl<F: FnMut(u8) -> bool> Checkpoint for F {
    fn report(&mut self, percent: u8) -> bool {
        self(percent)
    }
}

/// Переводит число выполненных шагов в проценты и зовёт [`Checkpoint`] только при изменении
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    total: usize,
    done: usize,
    last: Option<u8>,
}

impl ProgressTracker {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total: total.max(1),
            done: 0,
            last: None,
        }
    }

    pub(crate) fn percent(&self) -> u8 {
        (self.done.min(self.total) * 100 / self.total) as u8
    }

    /// Сообщает текущий процент, если он изменился; `false`, если хост просит остановиться
    pub(crate) fn report(&mut self, checkpoint: &mut impl Checkpoint) -> bool {
        let percent = self.percent();
        if self.last == Some(percent) {
            return true;
        }
        self.last = Some(percent);
        checkpoint.report(percent)
    }

    pub(crate) fn advance(&mut self, checkpoint: &mut impl Checkpoint) -> bool {
        self.done += 1;
        self.report(checkpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_each_percent_once_and_never_decreases() {
        let mut seen = Vec::new();
        let mut checkpoint = |p: u8| {
            seen.push(p);
            true
        };
        let mut tracker = ProgressTracker::new(400);
        assert!(tracker.report(&mut checkpoint));
        for _ in 0..400 {
            assert!(tracker.advance(&mut checkpoint));
        }

        assert_eq!(seen.len(), 101);
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn coarse_runs_skip_percentages() {
        let mut seen = Vec::new();
        let mut checkpoint = |p: u8| {
            seen.push(p);
            true
        };
        let mut tracker = ProgressTracker::new(3);
        tracker.report(&mut checkpoint);
        for _ in 0..3 {
            tracker.advance(&mut checkpoint);
        }
        assert_eq!(seen, vec![0, 33, 66, 100]);
    }

    #[test]
    fn refusal_is_passed_through() {
        let mut tracker = ProgressTracker::new(10);
        let mut checkpoint = |p: u8| p < 30;
        assert!(tracker.advance(&mut checkpoint));
        assert!(tracker.advance(&mut checkpoint));
        assert!(!tracker.advance(&mut checkpoint));
    }

    #[test]
    fn unobserved_always_continues() {
        assert!(Unobserved.report(50));
    }
}
