//! Index labels attached to block expressions.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{BlockExprError, Result};

/// Ordered index labels, one per dimension of a block.
///
/// Labels match dimensions across operands Einstein-style: two operands that
/// use the same label refer to the same logical index, whatever its position.
/// Parsing is infallible; whether the labels fit an array is checked when a
/// block is built or assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    labels: Arc<[String]>,
}

impl Annotation {
    /// Parse a comma separated label list such as `"i,j"` or `"a, b, c"`.
    ///
    /// The empty string (or one made of whitespace) is the rank-0 annotation.
    pub fn parse(vars: &str) -> Self {
        if vars.trim().is_empty() {
            return Self {
                labels: Arc::from(Vec::new()),
            };
        }
        let labels: Vec<String> = vars.split(',').map(|s| s.trim().to_string()).collect();
        Self {
            labels: Arc::from(labels),
        }
    }

    /// Build an annotation from individual labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        Self {
            labels: Arc::from(labels),
        }
    }

    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of `label`, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Whether both annotations carry the same labels, in any order.
    pub fn same_labels(&self, other: &Annotation) -> bool {
        self.len() == other.len() && other.labels.iter().all(|l| self.position(l).is_some())
    }

    /// For each label of `self`, its position in `other`.
    ///
    /// Returns `None` unless `other` is a permutation of `self`.
    pub fn permutation_to(&self, other: &Annotation) -> Option<Vec<usize>> {
        if self.len() != other.len() {
            return None;
        }
        self.labels.iter().map(|l| other.position(l)).collect()
    }

    /// Check that every label is non-empty and appears once.
    pub fn check_labels(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for label in self.labels.iter() {
            if label.is_empty() {
                return Err(self.invalid("empty label"));
            }
            if !seen.insert(label.as_str()) {
                return Err(self.invalid(format!("duplicate label '{label}'")));
            }
        }
        Ok(())
    }

    /// Check the labels and that there is exactly one per dimension.
    pub fn validate(&self, rank: usize) -> Result<()> {
        self.check_labels()?;
        if self.len() != rank {
            return Err(self.invalid(format!(
                "{} labels for an array of rank {rank}",
                self.len()
            )));
        }
        Ok(())
    }

    pub(crate) fn invalid(&self, reason: impl Into<String>) -> BlockExprError {
        BlockExprError::InvalidAnnotation {
            annotation: self.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.labels.join(","))
    }
}

impl From<&str> for Annotation {
    fn from(vars: &str) -> Self {
        Annotation::parse(vars)
    }
}

impl From<String> for Annotation {
    fn from(vars: String) -> Self {
        Annotation::parse(&vars)
    }
}

impl From<&Annotation> for Annotation {
    fn from(annotation: &Annotation) -> Self {
        annotation.clone()
    }
}

impl From<Vec<&str>> for Annotation {
    fn from(labels: Vec<&str>) -> Self {
        Annotation::from_labels(labels)
    }
}
