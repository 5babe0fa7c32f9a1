//! CV content model
//!
//! The résumé content is supplied by the hosting page at mount time and is
//! read-only for the lifetime of the viewer. Sequence order is render order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Complete CV content object
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CvData {
    pub profile: Profile,

    /// Work history, rendered in sequence order
    pub experience: Vec<Experience>,

    /// Education history, rendered in sequence order
    pub education: Vec<Education>,

    /// Skill terms (carried in the model, not rendered by the document view)
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Header and contact information
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Profile {
    pub name: String,
    pub role: String,

    /// Free text; blank lines separate paragraphs
    pub summary: String,

    pub email: String,

    /// LinkedIn address without scheme (e.g. `linkedin.com/in/someone`)
    pub linkedin: String,

    /// GitHub address without scheme (e.g. `github.com/someone`)
    pub github: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub role: String,
    pub period: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Education {
    pub id: String,
    pub degree: String,
    pub institution: String,
    pub period: String,
}

/// Problems found while loading or checking CV content
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CvDataError {
    #[error("Invalid CV JSON: {0}")]
    Json(String),

    #[error("Invalid CV YAML: {0}")]
    Yaml(String),

    #[error("Duplicate {section} id '{id}'")]
    DuplicateId { section: &'static str, id: String },
}

impl CvData {
    /// Parse CV content from a JSON string
    pub fn from_json(json: &str) -> Result<Self, CvDataError> {
        serde_json::from_str(json).map_err(|e| CvDataError::Json(e.to_string()))
    }

    /// Parse CV content from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, CvDataError> {
        serde_yaml::from_str(yaml).map_err(|e| CvDataError::Yaml(e.to_string()))
    }

    /// Check that `id` fields are unique within their sequence.
    ///
    /// Rendering does not depend on this; the viewer only logs the result.
    pub fn validate(&self) -> Result<(), CvDataError> {
        check_unique("experience", self.experience.iter().map(|e| e.id.as_str()))?;
        check_unique("education", self.education.iter().map(|e| e.id.as_str()))?;
        Ok(())
    }

    /// Summary paragraphs, split on blank-line boundaries
    pub fn summary_paragraphs(&self) -> impl Iterator<Item = &str> {
        self.profile.summary.split("\n\n")
    }
}

fn check_unique<'a>(
    section: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CvDataError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CvDataError::DuplicateId {
                section,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "profile": {
            "name": "Ada Example",
            "role": "Frontend Engineer",
            "summary": "First paragraph.\n\nSecond paragraph.",
            "email": "ada@example.com",
            "linkedin": "linkedin.com/in/ada",
            "github": "github.com/ada"
        },
        "experience": [
            {"id": "a", "company": "Acme", "role": "Dev", "period": "2020 - 2022"},
            {"id": "b", "company": "Initech", "role": "Lead", "period": "2022 - Now", "bullets": ["Shipped"]}
        ],
        "education": [
            {"id": "e1", "degree": "BSc", "institution": "Uni", "period": "2016"}
        ]
    }"#;

    #[test]
    fn test_parse_json_with_defaults() {
        let cv = CvData::from_json(SAMPLE).unwrap();
        assert_eq!(cv.experience.len(), 2);
        assert!(cv.experience[0].bullets.is_empty());
        assert_eq!(cv.experience[1].bullets, vec!["Shipped".to_string()]);
        assert!(cv.skills.is_empty());
        assert!(cv.validate().is_ok());
    }

    #[test]
    fn test_summary_paragraphs() {
        let cv = CvData::from_json(SAMPLE).unwrap();
        let paragraphs: Vec<&str> = cv.summary_paragraphs().collect();
        assert_eq!(paragraphs, vec!["First paragraph.", "Second paragraph."]);
    }

    #[test]
    fn test_duplicate_experience_id() {
        let mut cv = CvData::from_json(SAMPLE).unwrap();
        cv.experience[1].id = "a".to_string();
        assert_eq!(
            cv.validate(),
            Err(CvDataError::DuplicateId {
                section: "experience",
                id: "a".to_string()
            })
        );
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
profile:
  name: Ada
  role: Dev
  summary: Hello
  email: a@b.c
  linkedin: linkedin.com/in/a
  github: github.com/a
experience: []
education: []
skills: [Rust, Go]
"#;
        let cv = CvData::from_yaml(yaml).unwrap();
        assert_eq!(cv.skills, vec!["Rust".to_string(), "Go".to_string()]);
    }

    #[test]
    fn test_invalid_json_reports_error() {
        assert!(matches!(CvData::from_json("{"), Err(CvDataError::Json(_))));
    }
}
