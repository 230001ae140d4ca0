//! Definição da leitura de condição do gelo.
//!
//! Uma [`Reading`] é criada a cada tick, serializada, enviada e descartada.
//! Os campos são privados: depois de construída a leitura não muda.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

// ──────────────────────────────────────────────
// Faixas válidas
// ──────────────────────────────────────────────

/// Espessura do gelo (cm).
pub const ICE_THICKNESS_RANGE: RangeInclusive<u32> = 20..=35;
/// Temperatura da superfície do gelo (°C).
pub const SURFACE_TEMPERATURE_RANGE: RangeInclusive<f64> = -10.0..=0.0;
/// Acúmulo de neve (cm).
pub const SNOW_ACCUMULATION_RANGE: RangeInclusive<u32> = 0..=15;
/// Temperatura externa (°C).
pub const EXTERNAL_TEMPERATURE_RANGE: RangeInclusive<f64> = -15.0..=5.0;

/// Locais monitorados por padrão.
pub const DEFAULT_LOCATIONS: [&str; 3] = ["Dow's Lake", "Fifth Avenue", "NAC"];

/// Erros de construção de uma leitura.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReadingError {
    #[error("Local vazio")]
    EmptyLocation,

    #[error("{field} fora da faixa: {value} (esperado {min}–{max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} com mais de uma casa decimal: {value}")]
    TooPrecise { field: &'static str, value: f64 },
}

// ──────────────────────────────────────────────
// Reading
// ──────────────────────────────────────────────

/// Uma leitura sintética do sensor.
///
/// A ordem dos campos é a ordem das chaves no JSON enviado ao hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Reading {
    location: String,
    ice_thickness: u32,
    surface_temperature: f64,
    snow_accumulation: u32,
    external_temperature: f64,
    #[serde(with = "iso8601_micros")]
    timestamp: DateTime<Utc>,
}

impl Reading {
    /// Cria uma leitura validando todas as faixas.
    ///
    /// As temperaturas são arredondadas para uma casa decimal.
    pub fn new(
        location: impl Into<String>,
        ice_thickness: u32,
        surface_temperature: f64,
        snow_accumulation: u32,
        external_temperature: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ReadingError> {
        let reading = Self::from_parts(
            location.into(),
            ice_thickness,
            round_tenth(surface_temperature),
            snow_accumulation,
            round_tenth(external_temperature),
            timestamp,
        );
        reading.check()?;
        Ok(reading)
    }

    /// Construção sem validação, usada pelo gerador (que já respeita as faixas).
    ///
    /// O timestamp é truncado em microssegundos, a precisão do formato de fio.
    pub(crate) fn from_parts(
        location: String,
        ice_thickness: u32,
        surface_temperature: f64,
        snow_accumulation: u32,
        external_temperature: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            location,
            ice_thickness,
            surface_temperature,
            snow_accumulation,
            external_temperature,
            timestamp: timestamp.trunc_subsecs(6),
        }
    }

    /// Verifica se todos os campos estão dentro das faixas declaradas
    /// e se as temperaturas têm no máximo uma casa decimal.
    pub fn check(&self) -> Result<(), ReadingError> {
        if self.location.trim().is_empty() {
            return Err(ReadingError::EmptyLocation);
        }
        check_range(
            "iceThickness",
            f64::from(self.ice_thickness),
            &to_f64_range(&ICE_THICKNESS_RANGE),
        )?;
        check_range(
            "surfaceTemperature",
            self.surface_temperature,
            &SURFACE_TEMPERATURE_RANGE,
        )?;
        check_range(
            "snowAccumulation",
            f64::from(self.snow_accumulation),
            &to_f64_range(&SNOW_ACCUMULATION_RANGE),
        )?;
        check_range(
            "externalTemperature",
            self.external_temperature,
            &EXTERNAL_TEMPERATURE_RANGE,
        )?;
        check_tenth("surfaceTemperature", self.surface_temperature)?;
        check_tenth("externalTemperature", self.external_temperature)?;
        Ok(())
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Espessura do gelo (cm)
    pub fn ice_thickness(&self) -> u32 {
        self.ice_thickness
    }

    /// Temperatura da superfície (°C)
    pub fn surface_temperature(&self) -> f64 {
        self.surface_temperature
    }

    /// Acúmulo de neve (cm)
    pub fn snow_accumulation(&self) -> u32 {
        self.snow_accumulation
    }

    /// Temperatura externa (°C)
    pub fn external_temperature(&self) -> f64 {
        self.external_temperature
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Arredonda para uma casa decimal. `-0.0` vira `0.0`.
pub fn round_tenth(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn to_f64_range(range: &RangeInclusive<u32>) -> RangeInclusive<f64> {
    f64::from(*range.start())..=f64::from(*range.end())
}

fn check_range(
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<(), ReadingError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ReadingError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

fn check_tenth(field: &'static str, value: f64) -> Result<(), ReadingError> {
    if round_tenth(value) == value {
        Ok(())
    } else {
        Err(ReadingError::TooPrecise { field, value })
    }
}

/// Timestamp ISO-8601 UTC com microssegundos e sufixo `Z`
/// (ex: `2026-01-15T14:03:27.512004Z`).
pub(crate) mod iso8601_micros {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
