//! Question catalog loading and runtime entities
//!
//! This module parses the static question document into the runtime
//! [`Catalog`] the game plays from. The document is a JSON file with a
//! top-level list of categories, each carrying an English name, an Arabic
//! display name, and exactly six question records. Loading is fail-soft:
//! a malformed or invalid document degrades to an empty catalog so the
//! presentation layer renders an empty board instead of crashing.

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{constants, id::Id};

/// Errors that can occur while loading a question catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The document is not valid JSON
    #[error("catalog document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but violates the catalog shape
    #[error("catalog document is invalid: {0}")]
    Invalid(#[from] garde::Report),
}

/// Validates that a question value is one of the allowed point values
fn validate_question_value(value: &u64, _ctx: &()) -> garde::Result {
    if constants::board::QUESTION_VALUES.contains(value) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "question value {value} is not one of {:?}",
            constants::board::QUESTION_VALUES
        )))
    }
}

/// A single question record as it appears in the catalog document
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionDocument {
    /// Label of the category this question belongs to
    #[garde(skip)]
    pub category: String,
    /// Point value awarded for a correct answer
    #[garde(custom(validate_question_value))]
    pub value: u64,
    /// The prompt shown to the answering team
    #[garde(length(min = 1))]
    pub text: String,
    /// The expected answer, revealed after the timer or a manual submit
    #[garde(length(min = 1))]
    pub answer: String,
    /// Optional path to an image shown alongside the prompt
    #[garde(skip)]
    pub image: Option<String>,
}

/// A category record as it appears in the catalog document
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryDocument {
    /// English name of the category
    #[garde(length(min = 1))]
    pub name: String,
    /// Arabic display name of the category
    #[garde(length(min = 1))]
    #[serde(rename = "nameAr")]
    pub name_ar: String,
    /// The category's question records, exactly six
    #[garde(
        length(
            min = crate::constants::board::QUESTIONS_PER_CATEGORY,
            max = crate::constants::board::QUESTIONS_PER_CATEGORY,
        ),
        dive
    )]
    pub questions: Vec<QuestionDocument>,
}

/// The top-level catalog document
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CatalogDocument {
    /// All categories available for the draft
    #[garde(dive)]
    pub categories: Vec<CategoryDocument>,
}

/// A question ready for play
///
/// Immutable once loaded; the id is minted at load time and is the handle
/// the rest of the game uses for answering and answered-set membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier assigned at load time
    pub id: Id,
    /// Label of the category this question belongs to
    pub category: String,
    /// Point value awarded for a correct answer
    pub value: u64,
    /// The prompt shown to the answering team
    pub text: String,
    /// The expected answer
    pub answer: String,
    /// Optional path to an image shown alongside the prompt
    pub image: Option<String>,
}

/// A category ready for play
///
/// Immutable once loaded apart from its draft pool membership, which is
/// tracked by the draft, not on the category itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier assigned at load time
    pub id: Id,
    /// English name of the category
    pub name: String,
    /// Arabic display name of the category
    pub name_ar: String,
    /// The category's questions in board order: 200, 200, 400, 400, 600, 600
    pub questions: Vec<Question>,
}

impl From<CategoryDocument> for Category {
    /// Mints runtime entities with fresh identifiers from a document record
    fn from(doc: CategoryDocument) -> Self {
        Self {
            id: Id::new(),
            name: doc.name,
            name_ar: doc.name_ar,
            questions: doc
                .questions
                .into_iter()
                .map(|q| Question {
                    id: Id::new(),
                    category: q.category,
                    value: q.value,
                    text: q.text,
                    answer: q.answer,
                    image: q.image,
                })
                .collect(),
        }
    }
}

/// The full set of categories available to a game
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Categories in document order
    pub categories: Vec<Category>,
}

impl Catalog {
    /// Loads a catalog from a JSON document, degrading to empty on failure
    ///
    /// Parse and validation failures are logged and swallowed; callers must
    /// handle an empty board gracefully, which is the same surface as a
    /// document with no categories.
    pub fn from_json(document: &str) -> Self {
        match Self::try_from_json(document) {
            Ok(catalog) => catalog,
            Err(error) => {
                warn!(%error, "failed to load question catalog, starting with an empty board");
                Self::default()
            }
        }
    }

    /// Loads a catalog from a JSON document
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the document is not valid JSON and
    /// [`CatalogError::Invalid`] if it parses but violates the catalog shape
    /// (wrong question count, value outside the allowed set, empty names).
    pub fn try_from_json(document: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(document)?;
        document.validate()?;
        Ok(Self {
            categories: document.categories.into_iter().map(Category::from).collect(),
        })
    }

    /// Whether the catalog holds no categories
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of questions across all categories
    pub fn question_count(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }

    /// Looks up a question by id across all categories
    pub fn find_question(&self, question_id: Id) -> Option<&Question> {
        self.categories
            .iter()
            .flat_map(|c| c.questions.iter())
            .find(|q| q.id == question_id)
    }

    /// A small built-in board used by demos and tests
    pub fn sample() -> Self {
        const CATEGORIES: [(&str, &str); 4] = [
            ("General Knowledge", "معلومات عامة"),
            ("History", "تاريخ"),
            ("Science", "علوم"),
            ("Sports", "رياضة"),
        ];

        Self {
            categories: CATEGORIES
                .iter()
                .map(|(name, name_ar)| Category {
                    id: Id::new(),
                    name: (*name).to_owned(),
                    name_ar: (*name_ar).to_owned(),
                    questions: [200, 200, 400, 400, 600, 600]
                        .iter()
                        .enumerate()
                        .map(|(i, value)| Question {
                            id: Id::new(),
                            category: (*name).to_owned(),
                            value: *value,
                            text: format!("{name} question {}", i + 1),
                            answer: format!("{name} answer {}", i + 1),
                            image: None,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
