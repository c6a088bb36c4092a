use anyhow::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    CaregivingWomen,
    CareerMillennials,
    ChronicIllnessPatients,
    ClinicalProviders,
}

impl Persona {
    pub fn all() -> [Persona; 4] {
        [
            Persona::CaregivingWomen,
            Persona::CareerMillennials,
            Persona::ChronicIllnessPatients,
            Persona::ClinicalProviders,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            Persona::CaregivingWomen => "caregiving_women",
            Persona::CareerMillennials => "career_millennials",
            Persona::ChronicIllnessPatients => "chronic_illness_patients",
            Persona::ClinicalProviders => "clinical_providers",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Persona::CaregivingWomen => "Women 45-65, Caregiving Role",
            Persona::CareerMillennials => "Female Millennials, Career-Focused",
            Persona::ChronicIllnessPatients => "Female Patients, Chronic Illness Management",
            Persona::ClinicalProviders => "Female Healthcare Providers, Clinical Setting",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Persona {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Persona::all()
            .into_iter()
            .find(|persona| {
                persona.name().eq_ignore_ascii_case(needle)
                    || persona.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| anyhow::anyhow!("persona inconnu: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Empathetic,
    Clinical,
    Inspirational,
    Direct,
}

impl Tone {
    pub fn all() -> [Tone; 4] {
        [
            Tone::Empathetic,
            Tone::Clinical,
            Tone::Inspirational,
            Tone::Direct,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            Tone::Empathetic => "empathetic",
            Tone::Clinical => "clinical",
            Tone::Inspirational => "inspirational",
            Tone::Direct => "direct",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tone::Empathetic => "Empathetic",
            Tone::Clinical => "Clinical",
            Tone::Inspirational => "Inspirational",
            Tone::Direct => "Direct",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Tone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Tone::all()
            .into_iter()
            .find(|tone| {
                tone.name().eq_ignore_ascii_case(needle)
                    || tone.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| anyhow::anyhow!("ton inconnu: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_from_name_or_label() {
        assert_eq!(
            Persona::from_str("caregiving_women").unwrap(),
            Persona::CaregivingWomen
        );
        assert_eq!(
            Persona::from_str("Female Millennials, Career-Focused").unwrap(),
            Persona::CareerMillennials
        );
        assert!(Persona::from_str("teenagers").is_err());
    }

    #[test]
    fn tone_from_name_or_label() {
        assert_eq!(Tone::from_str("empathetic").unwrap(), Tone::Empathetic);
        assert_eq!(Tone::from_str("Direct").unwrap(), Tone::Direct);
        assert!(Tone::from_str("sarcastic").is_err());
    }
}
