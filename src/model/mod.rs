//! 起動時に一度だけ読み込まれる学習済みアーティファクト。
//!
//! ベクトライザと分類器は学習ツールが出力した JSON ブロブであり、
//! 本サービスにとっては不透明な状態。読み込み後は変更されず、
//! 全リクエストから読み取り専用で共有される。
pub mod classifier;
pub mod vectorizer;

use std::{fs, path::Path};

use anyhow::{Context, Result};

use self::classifier::LinearClassifier;
use self::vectorizer::TfidfVectorizer;

const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
const CLASSIFIER_FILE: &str = "classifier.json";

const DEFAULT_VECTORIZER_JSON: &str = include_str!("../resources/tfidf_vectorizer.json");
const DEFAULT_CLASSIFIER_JSON: &str = include_str!("../resources/classifier.json");

#[derive(Debug)]
pub struct ArtifactStore {
    vectorizer: TfidfVectorizer,
    classifier: LinearClassifier,
}

impl ArtifactStore {
    /// アーティファクトを読み込み、整合性を検証してストアを構築する。
    ///
    /// `dir` が指定された場合はそのディレクトリの
    /// `tfidf_vectorizer.json` / `classifier.json` を読む。指定がない
    /// 場合はクレートに同梱されたデフォルトを使う。読み込み失敗は
    /// 起動時の致命的エラーとして呼び出し側が扱う。
    ///
    /// # Errors
    /// ファイルの読み込み・パースに失敗した場合、または分類器の重み
    /// 次元が語彙サイズと一致しない場合はエラーを返す。
    pub fn load<P: AsRef<Path>>(dir: Option<P>) -> Result<Self> {
        let (vectorizer_raw, classifier_raw) = match dir {
            Some(dir) => {
                let dir = dir.as_ref();
                let vectorizer_raw = fs::read_to_string(dir.join(VECTORIZER_FILE))
                    .with_context(|| {
                        format!("failed to read {VECTORIZER_FILE} from {}", dir.display())
                    })?;
                let classifier_raw = fs::read_to_string(dir.join(CLASSIFIER_FILE))
                    .with_context(|| {
                        format!("failed to read {CLASSIFIER_FILE} from {}", dir.display())
                    })?;
                (vectorizer_raw, classifier_raw)
            }
            None => (
                DEFAULT_VECTORIZER_JSON.to_string(),
                DEFAULT_CLASSIFIER_JSON.to_string(),
            ),
        };

        let vectorizer = TfidfVectorizer::from_json(&vectorizer_raw)?;
        let classifier = LinearClassifier::from_json(&classifier_raw)?;

        anyhow::ensure!(
            classifier.feature_dim() == vectorizer.vocabulary_len(),
            "classifier weight dimension {} does not match vocabulary size {}",
            classifier.feature_dim(),
            vectorizer.vocabulary_len()
        );

        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    #[must_use]
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    #[must_use]
    pub fn classifier(&self) -> &LinearClassifier {
        &self.classifier
    }
}
