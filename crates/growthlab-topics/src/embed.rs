//! Title embedders: a shared sentence model and an offline lexical fallback

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use regex::Regex;
use std::sync::{Mutex, OnceLock};
use thiserror::Error;
use tracing::info;

// A failed load is cached as well; later calls return the same error without
// retrying the download.
static SENTENCE_MODEL: OnceLock<Result<Mutex<TextEmbedding>, String>> = OnceLock::new();
static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbedError {
    #[error("failed to load embedding model: {0}")]
    ModelInit(String),

    #[error("embedding failed: {0}")]
    Inference(String),

    #[error("embedder returned {got} vectors for {expected} titles")]
    CountMismatch { expected: usize, got: usize },
}

/// Maps titles to fixed-dimension, L2-normalized vectors
pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

pub fn l2_normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-8 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

/// all-MiniLM-L6-v2 sentence embeddings. The model is loaded once per process
/// on first use and shared by every `SemanticEmbedder`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticEmbedder;

impl SemanticEmbedder {
    pub fn new() -> Self {
        Self
    }

    /// Load the model now instead of on the first request
    pub fn warm_up(&self) -> Result<(), EmbedError> {
        Self::model().map(|_| ())
    }

    fn model() -> Result<&'static Mutex<TextEmbedding>, EmbedError> {
        SENTENCE_MODEL
            .get_or_init(|| {
                info!("Loading sentence embedding model");
                TextEmbedding::try_new(
                    InitOptions::new(EmbeddingModel::AllMiniLML6V2)
                        .with_show_download_progress(false),
                )
                .map(Mutex::new)
                .map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|e| EmbedError::ModelInit(e.clone()))
    }
}

impl Embedder for SemanticEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut model = Self::model()?
            .lock()
            .map_err(|_| EmbedError::Inference("embedding model lock poisoned".to_string()))?;
        let vectors = model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbedError::Inference(e.to_string()))?;
        Ok(vectors.into_iter().map(l2_normalize).collect())
    }
}

/// Hashed bag-of-words vectors. Titles sharing words land close together;
/// no model download needed.
#[derive(Debug, Clone, Copy)]
pub struct LexicalEmbedder {
    pub dimensions: usize,
}

impl LexicalEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let re = TOKEN_RE.get_or_init(|| Regex::new(r"[a-z0-9]+").unwrap());
        let mut v = vec![0.0f32; self.dimensions];
        for token in re.find_iter(&text.to_lowercase()) {
            let bucket = (fnv1a(token.as_str()) % self.dimensions as u64) as usize;
            v[bucket] += 1.0;
        }
        l2_normalize(v)
    }
}

impl Default for LexicalEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Embedder for LexicalEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(0xcbf29ce484222325u64, |hash, b| {
        (hash ^ u64::from(b)).wrapping_mul(0x100000001b3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f32>().sqrt()
    }

    #[test]
    fn test_l2_normalize() {
        let v = l2_normalize(vec![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert_eq!(l2_normalize(vec![0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_lexical_vectors_normalized() {
        let embedder = LexicalEmbedder::default();
        let out = embedder
            .embed(&["Rust async tips".to_string(), String::new()])
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].len(), 256);
        let norm: f32 = out[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert!(out[1].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_lexical_similar_titles_closer() {
        let embedder = LexicalEmbedder::default();
        let out = embedder
            .embed(&[
                "sourdough bread baking guide".to_string(),
                "Sourdough Bread Baking Guide part 2".to_string(),
                "mountain bike repair".to_string(),
            ])
            .unwrap();
        assert!(distance(&out[0], &out[1]) < distance(&out[0], &out[2]));
    }

    #[test]
    fn test_lexical_deterministic() {
        let embedder = LexicalEmbedder::new(64);
        let a = embedder.embed(&["same title".to_string()]).unwrap();
        let b = embedder.embed(&["same title".to_string()]).unwrap();
        assert_eq!(a, b);
    }
}
