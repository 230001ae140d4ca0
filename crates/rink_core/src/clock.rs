//! Fonte de tempo injetável.
//!
//! O loop de telemetria não chama `Utc::now()` nem `thread::sleep` direto:
//! recebe um [`Clock`]. Em produção é o [`SystemClock`]; nos testes o
//! [`ManualClock`] avança o tempo sem esperar.

use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::time::{Duration, Instant};

/// Capacidade de ler o horário e dormir.
pub trait Clock {
    /// Horário UTC atual (timestamp das leituras).
    fn utc_now(&self) -> DateTime<Utc>;

    /// Tempo monotônico desde a criação do relógio (cadência do loop).
    fn monotonic(&self) -> Duration;

    /// Suspende pela duração dada.
    fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn utc_now(&self) -> DateTime<Utc> {
        (**self).utc_now()
    }

    fn monotonic(&self) -> Duration {
        (**self).monotonic()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

// ──────────────────────────────────────────────
// Relógio real
// ──────────────────────────────────────────────

/// Relógio do sistema.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

// ──────────────────────────────────────────────
// Relógio manual
// ──────────────────────────────────────────────

/// Relógio determinístico: `sleep` apenas avança o tempo.
#[derive(Debug)]
pub struct ManualClock {
    start: DateTime<Utc>,
    elapsed: Cell<Duration>,
    slept: Cell<u32>,
}

impl ManualClock {
    /// Cria um relógio parado em `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            elapsed: Cell::new(Duration::ZERO),
            slept: Cell::new(0),
        }
    }

    /// Avança o tempo sem contar como sleep.
    pub fn advance(&self, duration: Duration) {
        self.elapsed.set(self.elapsed.get() + duration);
    }

    /// Quantas vezes `sleep` foi chamado.
    pub fn sleeps(&self) -> u32 {
        self.slept.get()
    }
}

impl Clock for ManualClock {
    fn utc_now(&self) -> DateTime<Utc> {
        chrono::Duration::from_std(self.elapsed.get())
            .ok()
            .and_then(|offset| self.start.checked_add_signed(offset))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn monotonic(&self) -> Duration {
        self.elapsed.get()
    }

    fn sleep(&self, duration: Duration) {
        self.slept.set(self.slept.get() + 1);
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_moves_only_when_told() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.utc_now(), start);

        clock.sleep(Duration::from_secs(10));
        clock.advance(Duration::from_millis(250));

        assert_eq!(clock.monotonic(), Duration::from_millis(10_250));
        assert_eq!(clock.utc_now(), start + chrono::Duration::milliseconds(10_250));
        assert_eq!(clock.sleeps(), 1);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.monotonic();
        clock.sleep(Duration::from_millis(5));
        let b = clock.monotonic();
        assert!(b >= a + Duration::from_millis(5));
    }
}
