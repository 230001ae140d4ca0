//! Gerador de leituras sintéticas.
//!
//! Sorteia cada campo uniformemente dentro da sua faixa e o local dentro do
//! conjunto configurado. A aleatoriedade e o horário são injetados, então o
//! gerador é determinístico com uma semente fixa.

use crate::types::{
    EXTERNAL_TEMPERATURE_RANGE, ICE_THICKNESS_RANGE, Reading, SNOW_ACCUMULATION_RANGE,
    SURFACE_TEMPERATURE_RANGE, round_tenth,
};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Erros de configuração do gerador.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    #[error("Conjunto de locais vazio")]
    NoLocations,

    #[error("Nome de local em branco na posição {0}")]
    BlankLocation(usize),
}

/// Gera uma [`Reading`] nova a cada chamada.
#[derive(Debug, Clone)]
pub struct ReadingGenerator {
    locations: Vec<String>,
}

impl ReadingGenerator {
    /// Cria o gerador para um conjunto fixo de locais.
    pub fn new<I, S>(locations: I) -> Result<Self, GeneratorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let locations: Vec<String> = locations.into_iter().map(Into::into).collect();
        if locations.is_empty() {
            return Err(GeneratorError::NoLocations);
        }
        if let Some(i) = locations.iter().position(|l| l.trim().is_empty()) {
            return Err(GeneratorError::BlankLocation(i));
        }
        Ok(Self { locations })
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Sorteia uma leitura com horário `now`.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> Reading {
        let location = &self.locations[rng.random_range(0..self.locations.len())];

        Reading::from_parts(
            location.clone(),
            rng.random_range(ICE_THICKNESS_RANGE),
            round_tenth(rng.random_range(SURFACE_TEMPERATURE_RANGE)),
            rng.random_range(SNOW_ACCUMULATION_RANGE),
            round_tenth(rng.random_range(EXTERNAL_TEMPERATURE_RANGE)),
            now,
        )
    }
}

impl Default for ReadingGenerator {
    fn default() -> Self {
        Self {
            locations: crate::types::DEFAULT_LOCATIONS
                .iter()
                .map(|l| l.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn every_field_stays_in_range() {
        let generator = ReadingGenerator::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..5_000 {
            let r = generator.generate(&mut rng, now());
            assert!(r.check().is_ok(), "fora da faixa: {r:?}");
            assert!(generator.locations().iter().any(|l| l == r.location()));
        }
    }

    #[test]
    fn decimals_have_one_place() {
        let generator = ReadingGenerator::default();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..1_000 {
            let r = generator.generate(&mut rng, now());
            for v in [r.surface_temperature(), r.external_temperature()] {
                assert_eq!(v, round_tenth(v), "mais de uma casa decimal: {v}");
            }
        }
    }

    #[test]
    fn all_locations_and_bounds_are_reached() {
        let generator = ReadingGenerator::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = HashSet::new();
        let mut ice = HashSet::new();

        for _ in 0..5_000 {
            let r = generator.generate(&mut rng, now());
            seen.insert(r.location().to_string());
            ice.insert(r.ice_thickness());
        }

        assert_eq!(seen.len(), 3);
        assert!(ice.contains(&20) && ice.contains(&35));
    }

    #[test]
    fn each_call_is_rerandomised() {
        let generator = ReadingGenerator::default();
        let mut rng = StdRng::seed_from_u64(42);
        let readings: Vec<_> = (0..20).map(|_| generator.generate(&mut rng, now())).collect();
        assert!(readings.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn same_seed_same_readings() {
        let generator = ReadingGenerator::default();
        let a = generator.generate(&mut StdRng::seed_from_u64(99), now());
        let b = generator.generate(&mut StdRng::seed_from_u64(99), now());
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bad_location_sets() {
        assert_eq!(
            ReadingGenerator::new(Vec::<String>::new()).unwrap_err(),
            GeneratorError::NoLocations
        );
        assert_eq!(
            ReadingGenerator::new(["NAC", " "]).unwrap_err(),
            GeneratorError::BlankLocation(1)
        );
    }

    #[test]
    fn single_location_is_always_chosen() {
        let generator = ReadingGenerator::new(["Dow's Lake"]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(generator.generate(&mut rng, now()).location(), "Dow's Lake");
        }
    }
}
