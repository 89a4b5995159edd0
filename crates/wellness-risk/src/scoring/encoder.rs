use std::collections::HashMap;

use super::domain::RiskDomain;

/// Label vocabulary a classifier was trained with.
///
/// A label's code is its position in the vocabulary.
#[derive(Debug, Clone)]
pub struct CategoryEncoder {
    field: &'static str,
    classes: Vec<String>,
    codes: HashMap<String, u32>,
}

impl CategoryEncoder {
    pub fn new(field: &'static str, classes: Vec<String>) -> Result<Self, EncoderBuildError> {
        if classes.is_empty() {
            return Err(EncoderBuildError::Empty { field });
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (position, class) in classes.iter().enumerate() {
            let code = u32::try_from(position).map_err(|_| EncoderBuildError::TooLarge { field })?;
            if codes.insert(class.clone(), code).is_some() {
                return Err(EncoderBuildError::Duplicate {
                    field,
                    class: class.clone(),
                });
            }
        }

        Ok(Self {
            field,
            classes,
            codes,
        })
    }

    pub fn encode(&self, domain: RiskDomain, value: &str) -> Result<u32, UnknownCategoryError> {
        self.codes
            .get(value)
            .copied()
            .ok_or_else(|| UnknownCategoryError {
                domain,
                field: self.field,
                value: value.to_string(),
            })
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Requested category is absent from the model's trained vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} category '{value}' for the {domain} model")]
pub struct UnknownCategoryError {
    pub domain: RiskDomain,
    pub field: &'static str,
    pub value: String,
}

/// Vocabulary rejected while loading an artifact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncoderBuildError {
    #[error("encoder '{field}' has an empty vocabulary")]
    Empty { field: &'static str },
    #[error("encoder '{field}' lists '{class}' more than once")]
    Duplicate { field: &'static str, class: String },
    #[error("encoder '{field}' vocabulary is too large")]
    TooLarge { field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age_encoder() -> CategoryEncoder {
        CategoryEncoder::new(
            "value",
            vec!["18–24".to_string(), "25–34".to_string(), "35–44".to_string()],
        )
        .expect("valid vocabulary")
    }

    #[test]
    fn codes_follow_vocabulary_order() {
        let encoder = age_encoder();
        assert_eq!(encoder.encode(RiskDomain::Eye, "18–24"), Ok(0));
        assert_eq!(encoder.encode(RiskDomain::Eye, "35–44"), Ok(2));
    }

    #[test]
    fn unknown_value_carries_domain_field_and_value() {
        let err = age_encoder()
            .encode(RiskDomain::Posture, "99+")
            .expect_err("value outside vocabulary");
        assert_eq!(err.domain, RiskDomain::Posture);
        assert_eq!(err.field, "value");
        assert_eq!(err.value, "99+");
        assert_eq!(
            err.to_string(),
            "unknown value category '99+' for the Posture model"
        );
    }

    #[test]
    fn rejects_empty_and_duplicate_vocabularies() {
        assert_eq!(
            CategoryEncoder::new("type", Vec::new()).err(),
            Some(EncoderBuildError::Empty { field: "type" })
        );
        let duplicate = CategoryEncoder::new("type", vec!["Age".to_string(), "Age".to_string()]);
        assert!(matches!(
            duplicate,
            Err(EncoderBuildError::Duplicate { class, .. }) if class == "Age"
        ));
    }
}
