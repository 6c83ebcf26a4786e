//! Pre-trained classifier artifacts.
//!
//! Artifacts are JSON documents tagged by `kind`. Shape checks run once at
//! load time; after that inference on a row of the declared width cannot
//! fail.

use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/random_forest_model.json";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model expects {found} features, schema has {expected}")]
    FeatureCount { expected: usize, found: usize },
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

/// Anything that can classify one schema-ordered row.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    /// Width of the rows this model accepts.
    fn n_features(&self) -> usize;

    /// Predicted class label for a single row.
    fn predict(&self, row: &[f64]) -> usize;

    /// Per-class probabilities for a single row; sums to 1.
    fn predict_proba(&self, row: &[f64]) -> Vec<f64>;
}

/// A node in a binary decision tree.
///
/// Rows go left when `row[feature] <= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        class: usize,
    },
}

impl TreeNode {
    pub fn classify(&self, row: &[f64]) -> usize {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { class } => return *class,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        &**left
                    } else {
                        &**right
                    };
                }
            }
        }
    }

    fn check(&self, n_features: usize, n_classes: usize) -> Result<(), ModelError> {
        match self {
            TreeNode::Leaf { class } if *class >= n_classes => Err(ModelError::Invalid(format!(
                "leaf class {class} outside 0..{n_classes}"
            ))),
            TreeNode::Leaf { .. } => Ok(()),
            TreeNode::Split { feature, .. } if *feature >= n_features => Err(
                ModelError::Invalid(format!("split on feature {feature} outside 0..{n_features}")),
            ),
            TreeNode::Split { left, right, .. } => {
                left.check(n_features, n_classes)?;
                right.check(n_features, n_classes)
            }
        }
    }
}

/// Majority-vote ensemble of decision trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    #[serde(default = "default_n_classes")]
    pub n_classes: usize,
    pub trees: Vec<TreeNode>,
}

fn default_n_classes() -> usize {
    2
}

impl RandomForest {
    fn votes(&self, row: &[f64]) -> Vec<usize> {
        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            votes[tree.classify(row)] += 1;
        }
        votes
    }

    fn check(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("random forest has no trees".into()));
        }
        if self.n_classes < 2 {
            return Err(ModelError::Invalid(format!(
                "need at least 2 classes, got {}",
                self.n_classes
            )));
        }
        self.trees
            .iter()
            .try_for_each(|t| t.check(self.n_features, self.n_classes))
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, row: &[f64]) -> usize {
        // first maximum wins ties, so the lower class label is preferred
        let votes = self.votes(row);
        let mut best = 0;
        for (class, &count) in votes.iter().enumerate() {
            if count > votes[best] {
                best = class;
            }
        }
        best
    }

    fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let n_trees = self.trees.len() as f64;
        self.votes(row)
            .into_iter()
            .map(|v| v as f64 / n_trees)
            .collect()
    }
}

/// Binary logistic regression: `p(1) = sigmoid(w·x + b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logistic {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl Logistic {
    fn positive(&self, row: &[f64]) -> f64 {
        let z = self
            .weights
            .iter()
            .zip(row.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;
        1.0 / (1.0 + (-z).exp())
    }
}

impl Classifier for Logistic {
    fn name(&self) -> &str {
        "logistic"
    }

    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, row: &[f64]) -> usize {
        usize::from(self.positive(row) > 0.5)
    }

    fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let p = self.positive(row);
        vec![1.0 - p, p]
    }
}

/// On-disk model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForest),
    Logistic(Logistic),
}

impl ModelArtifact {
    /// Parse and check an artifact expecting rows of `n_features` values.
    pub fn from_json_str(s: &str, n_features: usize) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(s)?;
        artifact.check(n_features)?;
        Ok(artifact)
    }

    /// Load the artifact at `path` for rows of `n_features` values.
    pub fn load(path: impl AsRef<Path>, n_features: usize) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let s = read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact = Self::from_json_str(&s, n_features)?;
        log::info!(
            "loaded {} model from '{}'",
            artifact.name(),
            path.display()
        );
        Ok(artifact)
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            ModelArtifact::RandomForest(m) => m,
            ModelArtifact::Logistic(m) => m,
        }
    }

    fn check(&self, expected: usize) -> Result<(), ModelError> {
        let found = self.n_features();
        if found != expected {
            return Err(ModelError::FeatureCount { expected, found });
        }
        match self {
            ModelArtifact::RandomForest(forest) => forest.check(),
            ModelArtifact::Logistic(_) => Ok(()),
        }
    }
}

impl Classifier for ModelArtifact {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn predict(&self, row: &[f64]) -> usize {
        self.inner().predict(row)
    }

    fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        self.inner().predict_proba(row)
    }
}
