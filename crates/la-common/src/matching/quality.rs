use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::SKILL_DIMENSIONS;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QualityError {
    #[error("skill component {index} is not numeric: {value:?}")]
    Coercion { index: usize, value: String },
}

/// A raw vector component as it arrives from forms or JSON: a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillComponent {
    Number(f64),
    Text(String),
}

impl fmt::Display for SkillComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for SkillComponent {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for SkillComponent {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Anything that can be read as a proficiency value.
///
/// `index` is the component position, used only for error reporting.
pub trait SkillValue {
    fn to_skill_f64(&self, index: usize) -> Result<f64, QualityError>;
}

fn parse_component(raw: &str, index: usize) -> Result<f64, QualityError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| QualityError::Coercion {
            index,
            value: raw.to_string(),
        })
}

macro_rules! impl_skill_value_numeric {
    ($($ty:ty),*) => {
        $(
            impl SkillValue for $ty {
                fn to_skill_f64(&self, _index: usize) -> Result<f64, QualityError> {
                    Ok(f64::from(*self))
                }
            }
        )*
    };
}

impl_skill_value_numeric!(f64, f32, i8, i16, i32, u8, u16, u32);

impl SkillValue for str {
    fn to_skill_f64(&self, index: usize) -> Result<f64, QualityError> {
        parse_component(self, index)
    }
}

impl SkillValue for String {
    fn to_skill_f64(&self, index: usize) -> Result<f64, QualityError> {
        parse_component(self, index)
    }
}

impl SkillValue for SkillComponent {
    fn to_skill_f64(&self, index: usize) -> Result<f64, QualityError> {
        match self {
            Self::Number(v) => Ok(*v),
            Self::Text(s) => parse_component(s, index),
        }
    }
}

impl<T: SkillValue + ?Sized> SkillValue for &T {
    fn to_skill_f64(&self, index: usize) -> Result<f64, QualityError> {
        (**self).to_skill_f64(index)
    }
}

/// Skill quality: dot product over the first `min(3, |skills|, |requirements|)`
/// components, always divided by 3.
///
/// Short vectors are penalized rather than renormalized. Empty input on either
/// side scores 0.0. Only the compared components are coerced.
pub fn quality<S, R>(skills: &[S], requirements: &[R]) -> Result<f64, QualityError>
where
    S: SkillValue,
    R: SkillValue,
{
    let n = SKILL_DIMENSIONS.min(skills.len()).min(requirements.len());
    if n == 0 {
        return Ok(0.0);
    }

    let mut dot = 0.0;
    for i in 0..n {
        dot += skills[i].to_skill_f64(i)? * requirements[i].to_skill_f64(i)?;
    }

    Ok(dot / SKILL_DIMENSIONS as f64)
}

/// [`quality`] over already-coerced vectors; cannot fail.
pub fn quality_vectors(skills: &[f64], requirements: &[f64]) -> f64 {
    skills
        .iter()
        .zip(requirements)
        .take(SKILL_DIMENSIONS)
        .map(|(s, r)| s * r)
        .sum::<f64>()
        / SKILL_DIMENSIONS as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: &[f64] = &[];

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_side_scores_zero() {
        assert_eq!(quality(EMPTY, &[1.0, 1.0, 1.0]).unwrap(), 0.0);
        assert_eq!(quality(&[1.0, 1.0, 1.0], EMPTY).unwrap(), 0.0);
        assert_eq!(quality_vectors(&[], &[1.0]), 0.0);
    }

    #[test]
    fn zero_vectors_score_zero() {
        assert_eq!(quality(&[0, 0, 0], &[0, 0, 0]).unwrap(), 0.0);
    }

    #[test]
    fn full_match_scores_one() {
        assert!(close(quality(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]).unwrap(), 1.0));
    }

    #[test]
    fn dot_product_over_three() {
        let q = quality(&[1.0, 0.5, 0.0], &[0.5, 0.5, 1.0]).unwrap();
        assert!(close(q, (1.0 * 0.5 + 0.5 * 0.5 + 0.0 * 1.0) / 3.0));
    }

    #[test]
    fn longer_vectors_are_clipped_to_three() {
        let q = quality(&[1, 1, 1, 1, 1], &[0.2, 0.2, 0.2, 0.2]).unwrap();
        assert!(close(q, 0.6 / 3.0));
        assert!(close(
            q,
            quality(&[1, 1, 1], &[0.2, 0.2, 0.2]).unwrap()
        ));
    }

    #[test]
    fn short_vectors_still_divide_by_three() {
        let q = quality(&[1.0, 0.0], &[1.0, 1.0]).unwrap();
        assert!(close(q, (1.0 * 1.0 + 0.0 * 1.0) / 3.0));

        let q = quality(&[1.0, 0.5], &[0.5, 0.5, 0.5]).unwrap();
        assert!(close(q, (1.0 * 0.5 + 0.5 * 0.5) / 3.0));
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let skills = vec![
            SkillComponent::from("0.7"),
            SkillComponent::from(0.2),
            SkillComponent::from("0.1"),
        ];
        let requirements = vec![
            SkillComponent::from(1.0),
            SkillComponent::from("0.5"),
            SkillComponent::from(0.0),
        ];

        let q = quality(&skills, &requirements).unwrap();
        assert!(close(q, (0.7 * 1.0 + 0.2 * 0.5 + 0.1 * 0.0) / 3.0));
        assert!((0.0..=1.0).contains(&q));
    }

    #[test]
    fn non_numeric_component_is_an_error() {
        let err = quality(&["0.5", "lots"], &[1.0, 1.0]).unwrap_err();
        assert_eq!(
            err,
            QualityError::Coercion {
                index: 1,
                value: "lots".into()
            }
        );
    }

    #[test]
    fn components_past_the_compared_prefix_are_not_coerced() {
        let q = quality(&["1", "1", "1", "n/a"], &[1.0, 1.0, 1.0]).unwrap();
        assert!(close(q, 1.0));
    }

    #[test]
    fn untagged_component_deserializes_from_json() {
        let parsed: Vec<SkillComponent> = serde_json::from_str(r#"[0.5, "0.25", 1]"#).unwrap();
        assert_eq!(parsed[0], SkillComponent::Number(0.5));
        assert_eq!(parsed[1], SkillComponent::Text("0.25".into()));
        assert_eq!(parsed[2], SkillComponent::Number(1.0));
    }

    #[test]
    fn infallible_variant_agrees() {
        let s = [0.2, 0.4, 0.6, 0.8];
        let r = [0.5, 0.5];
        assert!(close(quality_vectors(&s, &r), quality(&s, &r).unwrap()));
    }
}
