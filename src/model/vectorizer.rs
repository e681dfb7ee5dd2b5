//! 学習時に確定した語彙と IDF から特徴ベクトルを生成する。
use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;

/// シリアライズされたベクトライザの状態。語彙と IDF は学習ツール側で
/// 確定済みであり、本サービスは読み込んで適用するだけ。
#[derive(Debug, Deserialize)]
struct VectorizerArtifact {
    vocabulary: Vec<String>,
    idf: Vec<f32>,
}

impl VectorizerArtifact {
    fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.vocabulary.is_empty(), "vectorizer vocabulary is empty");
        anyhow::ensure!(
            self.vocabulary.len() == self.idf.len(),
            "vocabulary/idf length mismatch: {} vs {}",
            self.vocabulary.len(),
            self.idf.len()
        );
        Ok(())
    }
}

/// TF-IDF 変換結果。語彙外のトークンしか含まない入力では空になる。
#[derive(Debug, Clone)]
pub struct FeatureVector {
    pub dim: usize,
    pub indices: Vec<usize>,
    pub values: Vec<f32>,
}

#[derive(Debug)]
pub struct TfidfVectorizer {
    vocab_index: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// シリアライズ済みアーティファクトからベクトライザを復元する。
    ///
    /// # Errors
    /// JSON のパースに失敗した場合、または語彙と IDF の長さが一致しない
    /// 場合はエラーを返す。
    pub fn from_json(raw: &str) -> Result<Self> {
        let artifact: VectorizerArtifact =
            serde_json::from_str(raw).context("failed to parse vectorizer artifact json")?;
        artifact.validate()?;

        let vocab_index = artifact
            .vocabulary
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();

        Ok(Self {
            vocab_index,
            idf: artifact.idf,
        })
    }

    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }

    /// 入力テキストを TF-IDF 特徴ベクトルへ変換する。
    ///
    /// トークン化は学習時の設定と同じ: 小文字化し、2 文字以上の
    /// 英数字の連続をトークンとして扱う。TF と IDF の積を L2 正規化する。
    #[must_use]
    pub fn transform(&self, text: &str) -> FeatureVector {
        let mut term_counts: HashMap<usize, f32> = HashMap::new();
        for token in tokenize(text) {
            if let Some(&idx) = self.vocab_index.get(&token) {
                *term_counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f32)> = term_counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();
        entries.sort_unstable_by_key(|(idx, _)| *idx);

        let norm: f32 = entries
            .iter()
            .map(|(_, value)| value * value)
            .sum::<f32>()
            .sqrt();
        if norm > 0.0 {
            for (_, value) in &mut entries {
                *value /= norm;
            }
        }

        let (indices, values) = entries.into_iter().unzip();
        FeatureVector {
            dim: self.idf.len(),
            indices,
            values,
        }
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_lowercase)
}
