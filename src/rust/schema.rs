/// Field names the heart-disease classifiers are trained on, in the column
/// order they expect.
pub const HEART_DISEASE_FIELDS: [&str; 13] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg",
    "thalach", "exang", "oldpeak", "slope", "ca", "thal",
];

/// An ordered list of required column names.
///
/// Matching against a table is exact and case-sensitive. The order only
/// matters for projection: validated batches are re-ordered to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    /// Creates a schema from field names. Repeated names keep their first position.
    ///
    /// # Example
    /// ```
    /// use cardioscreen::Schema;
    ///
    /// let schema = Schema::new(["age", "chol", "age"]);
    /// assert_eq!(schema.fields(), ["age", "chol"]);
    /// ```
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !unique.contains(&field) {
                unique.push(field);
            }
        }
        Self { fields: unique }
    }

    /// The 13-field schema of the heart-disease models.
    pub fn heart_disease() -> Self {
        Self::new(HEART_DISEASE_FIELDS)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::heart_disease()
    }
}
