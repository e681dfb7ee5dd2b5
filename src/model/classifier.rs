//! 線形分類器。シリアライズ済みの重みを読み込み、決定関数を適用する。
use anyhow::{Context, Result};
use serde::Deserialize;

use super::vectorizer::FeatureVector;

#[derive(Debug, Deserialize)]
struct ClassifierArtifact {
    classes: Vec<i64>,
    weights: Vec<f32>,
    intercept: f32,
}

impl ClassifierArtifact {
    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.classes.len() == 2,
            "classifier must be binary, got {} classes",
            self.classes.len()
        );
        anyhow::ensure!(!self.weights.is_empty(), "classifier weights are empty");
        Ok(())
    }
}

#[derive(Debug)]
pub struct LinearClassifier {
    classes: [i64; 2],
    weights: Vec<f32>,
    intercept: f32,
}

impl LinearClassifier {
    /// シリアライズ済みアーティファクトから分類器を復元する。
    ///
    /// # Errors
    /// JSON のパースに失敗した場合、またはクラス数が 2 でない場合は
    /// エラーを返す。
    pub fn from_json(raw: &str) -> Result<Self> {
        let artifact: ClassifierArtifact =
            serde_json::from_str(raw).context("failed to parse classifier artifact json")?;
        artifact.validate()?;

        Ok(Self {
            classes: [artifact.classes[0], artifact.classes[1]],
            weights: artifact.weights,
            intercept: artifact.intercept,
        })
    }

    #[must_use]
    pub fn feature_dim(&self) -> usize {
        self.weights.len()
    }

    /// 特徴ベクトルに対する予測ラベルを返す。
    ///
    /// 決定関数 `w . x + b` が正なら正例クラス、そうでなければ負例クラス。
    ///
    /// # Errors
    /// 特徴次元が重みの次元と一致しない場合、またはインデックスが
    /// 次元の範囲外の場合はエラーを返す。
    pub fn predict(&self, features: &FeatureVector) -> Result<i64> {
        anyhow::ensure!(
            features.dim == self.weights.len(),
            "feature dimension mismatch: expected {}, got {}",
            self.weights.len(),
            features.dim
        );

        let mut score = self.intercept;
        for (&idx, &value) in features.indices.iter().zip(&features.values) {
            let weight = self
                .weights
                .get(idx)
                .ok_or_else(|| anyhow::anyhow!("feature index {idx} out of range"))?;
            score += value * weight;
        }

        if score > 0.0 {
            Ok(self.classes[1])
        } else {
            Ok(self.classes[0])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_classifier() -> LinearClassifier {
        LinearClassifier::from_json(
            r#"{
                "classes": [0, 1],
                "weights": [1.0, -1.0, 0.5],
                "intercept": -0.1
            }"#,
        )
        .expect("classifier should parse")
    }

    fn features(dim: usize, indices: Vec<usize>, values: Vec<f32>) -> FeatureVector {
        FeatureVector {
            dim,
            indices,
            values,
        }
    }

    #[test]
    fn rejects_non_binary_class_list() {
        let result = LinearClassifier::from_json(
            r#"{"classes": [0, 1, 2], "weights": [1.0], "intercept": 0.0}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_empty_weights() {
        let result = LinearClassifier::from_json(
            r#"{"classes": [0, 1], "weights": [], "intercept": 0.0}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn positive_score_selects_positive_class() {
        let classifier = sample_classifier();
        let label = classifier
            .predict(&features(3, vec![0], vec![0.9]))
            .expect("predict should succeed");
        assert_eq!(label, 1);
    }

    #[test]
    fn non_positive_score_selects_negative_class() {
        let classifier = sample_classifier();
        let label = classifier
            .predict(&features(3, vec![1], vec![0.9]))
            .expect("predict should succeed");
        assert_eq!(label, 0);

        // 空の特徴ベクトルは intercept のみで判定される。
        let label = classifier
            .predict(&features(3, vec![], vec![]))
            .expect("predict should succeed");
        assert_eq!(label, 0);
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let classifier = sample_classifier();
        let result = classifier.predict(&features(7, vec![0], vec![1.0]));
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_index_is_an_error_not_a_panic() {
        let classifier = sample_classifier();
        let result = classifier.predict(&features(3, vec![5], vec![1.0]));
        assert!(result.is_err());
    }
}
