use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new id from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a Question within the bank.
    QuestionId
);
string_id!(
    /// Unique identifier for a Subcategory.
    SubcategoryId
);
string_id!(
    /// Unique identifier for a QuestionSet.
    SetId
);
string_id!(
    /// Unique identifier for a Category.
    CategoryId
);
string_id!(
    /// Key of an answer option, unique within its question.
    OptionKey
);
string_id!(
    /// Unique identifier for a finalized attempt.
    AttemptId
);

impl AttemptId {
    /// Generates a fresh attempt id in the `att_<millis>_<hex>` shape.
    #[must_use]
    pub fn generate(finished_at: DateTime<Utc>) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "att_{}_{}",
            finished_at.timestamp_millis(),
            &suffix[..12]
        ))
    }
}
